//! Issue a client bearer token.
//!
//! Reads the `TOKEN_*` variables, signs one token, and prints it to stdout.
//!
//! ```text
//! TOKEN_SECRET=... issue-token
//! ```

use company_service::auth::TokenService;
use company_service::config::TokenConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = TokenConfig::from_env()?;
    let token = TokenService::new(&config).issue_token()?;

    println!("{token}");

    Ok(())
}
