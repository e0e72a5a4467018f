//! Test server harness for E2E testing
//!
//! Provides `TestCompanyServer` for spawning real Company Service instances
//! in tests. The geo-IP endpoint is replaced by a `MockCountryDetector`.

use company_service::auth::TokenService;
use company_service::config::Config;
use company_service::routes::{self, AppState};
use company_service::services::{CountryDetector, MockCountryDetector};
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Country the test server accepts requests from.
pub const TEST_ALLOWED_COUNTRY: &str = "Cyprus";

/// Signing secret used by the test server.
pub const TEST_TOKEN_SECRET: &str = "test-token-secret";

/// Test harness for spawning Company Service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[sqlx::test(migrations = "../../migrations")]
/// async fn test_create_company(pool: PgPool) -> Result<()> {
///     let server = TestCompanyServer::spawn(pool).await?;
///     let token = server.issue_token()?;
///
///     let response = reqwest::Client::new()
///         .post(&format!("{}/api/v1/companies", server.url()))
///         .bearer_auth(token)
///         .json(&body)
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 201);
///     Ok(())
/// }
/// ```
pub struct TestCompanyServer {
    addr: SocketAddr,
    pool: PgPool,
    config: Config,
    token_service: TokenService,
    _handle: JoinHandle<()>,
}

impl TestCompanyServer {
    /// Spawn a server whose country lookups always resolve to
    /// [`TEST_ALLOWED_COUNTRY`].
    pub async fn spawn(pool: PgPool) -> Result<Self, anyhow::Error> {
        Self::spawn_with_detector(
            pool,
            Arc::new(MockCountryDetector::returning(TEST_ALLOWED_COUNTRY)),
        )
        .await
    }

    /// Spawn a server using the given country detector.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    pub async fn spawn_with_detector(
        pool: PgPool,
        country_detector: Arc<dyn CountryDetector>,
    ) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "postgresql://test/test".to_string(),
            ),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("TOKEN_SECRET".to_string(), TEST_TOKEN_SECRET.to_string()),
            (
                "GEOIP_ALLOWED_COUNTRY_NAME".to_string(),
                TEST_ALLOWED_COUNTRY.to_string(),
            ),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let token_service = TokenService::new(&config.token);

        let state = Arc::new(AppState {
            pool: pool.clone(),
            config: config.clone(),
            token_validator: Arc::new(TokenService::new(&config.token)),
            country_detector,
        });

        // A recorder that is never installed globally, so every test server
        // gets its own handle.
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            // The country check reads the caller's address from ConnectInfo
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            pool,
            config,
            token_service,
            _handle: handle,
        })
    }

    /// Issue a bearer token the server accepts.
    pub fn issue_token(&self) -> Result<String, anyhow::Error> {
        self.token_service
            .issue_token()
            .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))
    }

    /// Get reference to the database pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestCompanyServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_server_spawns_successfully(pool: PgPool) -> Result<(), anyhow::Error> {
        let server = TestCompanyServer::spawn(pool).await?;

        assert!(server.url().starts_with("http://127.0.0.1:"));

        let response = reqwest::get(&format!("{}/health", server.url())).await?;
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "healthy");

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_server_provides_pool_access(pool: PgPool) -> Result<(), anyhow::Error> {
        let server = TestCompanyServer::spawn(pool).await?;

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(server.pool())
            .await?;

        assert_eq!(result.0, 1);

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_server_config_uses_test_values(pool: PgPool) -> Result<(), anyhow::Error> {
        let server = TestCompanyServer::spawn(pool).await?;

        assert_eq!(
            server.config().geoip.allowed_country_name,
            TEST_ALLOWED_COUNTRY
        );
        assert!(server.addr().ip().is_loopback());
        assert!(!server.issue_token()?.is_empty());

        Ok(())
    }
}
