use market_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Set up the environment (dotenv, logging)
    setup_environment()?;

    tracing::info!("Market server starting...");

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize server state (database, collaborators)
    let state = ServerState::initialize(&config).await?;

    // 4. Run the HTTP server
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
