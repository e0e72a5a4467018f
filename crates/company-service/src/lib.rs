//! Company Service library.
//!
//! REST API for managing company records, with bearer token authentication
//! and geo-IP country restriction on mutating routes.
//!
//! Exposes internal modules for testing purposes.

pub mod auth;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
