use anyhow::Result;
use handlebars::Handlebars;
use std::sync::Arc;
use tracing::info;

use crate::auth::service::AuthService;
use crate::board::service::BoardService;
use crate::comment::service::CommentService;
use crate::core::config::Config;
use crate::crypto::service::CryptoService;
use crate::storage::database::Database;
use crate::web::{routes, templates};

pub struct App {
    state: Arc<AppState>,
}

impl App {
    pub async fn new(config: Config) -> Result<Self> {
        let state = AppState::new(config).await?;
        Ok(Self {
            state: Arc::new(state),
        })
    }

    pub async fn run(self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.state.config.server.host, self.state.config.server.port
        );
        let app = routes::create_router(Arc::clone(&self.state));

        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    pub board_service: Arc<BoardService>,
    pub comment_service: Arc<CommentService>,
    pub templates: Arc<Handlebars<'static>>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing application components");

        // Initialize database
        let db = Arc::new(Database::new(&config.database).await?);

        // Run migrations
        db.migrate().await?;

        // Initialize crypto service
        let crypto_service = Arc::new(CryptoService::new());

        // Initialize services
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&db),
            Arc::clone(&crypto_service),
            config.auth.clone(),
        ));

        let comment_service = Arc::new(CommentService::new(Arc::clone(&db)));

        let board_service = Arc::new(BoardService::new(
            Arc::clone(&db),
            Arc::clone(&comment_service),
        ));

        // Drop stale sessions left over from previous runs
        auth_service.cleanup_expired_sessions().await?;

        let templates = Arc::new(templates::build_registry()?);

        Ok(Self {
            config,
            db,
            auth_service,
            board_service,
            comment_service,
            templates,
        })
    }
}
