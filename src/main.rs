use anyhow::Result;
use tracing::{error, info};

use campus_board::core::app::App;
use campus_board::core::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    info!("Starting campus board");

    // Load configuration
    let config = Config::load()?;

    // Initialize the application
    let app = App::new(config).await?;

    // Start the application
    if let Err(e) = app.run().await {
        error!("Application error: {}", e);
        return Err(e);
    }

    Ok(())
}
