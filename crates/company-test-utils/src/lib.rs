//! # Company Test Utilities
//!
//! Shared test utilities for Company Service.
//!
//! This crate provides:
//! - Server test harness (`TestCompanyServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use company_test_utils::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_example(pool: PgPool) -> Result<()> {
//!     let server = TestCompanyServer::spawn(pool).await?;
//!     let client = reqwest::Client::new();
//!
//!     let response = client
//!         .get(&format!("{}/health", server.url()))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use server_harness::*;
