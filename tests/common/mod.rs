use std::sync::Arc;

use campus_board::core::app::AppState;
use campus_board::core::config::{AuthConfig, Config, DatabaseConfig, ServerConfig};
use campus_board::core::types::{CreateUserRequest, User};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            base_url: "http://localhost".to_string(),
        },
        database: DatabaseConfig {
            // A single connection keeps the whole test on one in-memory db
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig {
            login_url: "/auth/login".to_string(),
            session_ttl_days: 30,
        },
    }
}

pub async fn test_state() -> Arc<AppState> {
    Arc::new(
        AppState::new(test_config())
            .await
            .expect("Failed to build test state"),
    )
}

pub async fn register_user(state: &AppState, username: &str) -> User {
    state
        .auth_service
        .register(CreateUserRequest {
            username: username.to_string(),
            email: None,
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .expect("Failed to register test user")
}
