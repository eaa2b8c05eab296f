use cookbook::{api, config, errors::Result};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Server settings (config.toml + environment overrides)
    let server_config = config::server::load_server_config()
        .inspect_err(|e| error!("Failed to load server configuration: {}", e))?;
    info!("Successfully processed server configuration.");

    // 4. Connect to the database and make sure the tables exist
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Serve
    api::serve(db, &server_config)
        .await
        .inspect_err(|e| error!("Server error: {}", e))?;

    Ok(())
}
