//! Bariatric Care Manager (BCM)
//!
//! An MCP server for bariatric nutrition targets and supplement scheduling.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use bcm::config::Config;
use bcm::mcp::BcmService;
use bcm::{build_info, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bcm=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");
    tracing::info!("{}", build_info::version_string());

    let config = Config::from_env();
    tracing::info!(path = %config.database_path.display(), "Database path");

    config.ensure_data_dir()?;

    let database = db::Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        tracing::info!(version, "Database schema ready");
        Ok(())
    })?;

    let service = BcmService::new(config.database_path, database);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
