//! Print a session token for local testing.
//!
//! Reads `AUTH_SECRET` (and the other required settings) from the environment
//! or `.env`, then signs a token for the given photographer.
//!
//! ```sh
//! cargo run --example issue_token -- <user-uuid> <email> <name> [ttl-hours]
//! ```

use chrono::Duration;
use uuid::Uuid;

use galleria_backend::{config::Config, services::auth_service::AuthService, AppError, Result};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [user_id, email, name, rest @ ..] = args.as_slice() else {
        return Err(AppError::Validation(
            "usage: issue_token <user-uuid> <email> <name> [ttl-hours]".to_string(),
        ));
    };

    let user_id = Uuid::parse_str(user_id)
        .map_err(|e| AppError::Validation(format!("Invalid user id: {}", e)))?;
    let ttl_hours = match rest.first() {
        Some(v) => v
            .parse::<i64>()
            .map_err(|_| AppError::Validation(format!("Invalid ttl: {}", v)))?,
        None => 24,
    };

    let config = Config::from_env()?;
    let token = AuthService::new(&config).issue_access_token(
        user_id,
        email,
        name,
        Duration::hours(ttl_hours),
    )?;

    println!("{}", token);
    Ok(())
}
