use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use latchkey_adapters::{LatchkeySettings, MockEmailClient, telemetry::init_tracing};
use latchkey_service::LatchkeyService;

#[derive(Debug, Parser)]
#[command(name = "latchkey")]
#[command(about = "Latchkey credential and session tooling")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Verify a session token against the configured secret and print its
    /// claims as JSON
    CheckToken {
        /// The bearer token, without the `Bearer ` prefix
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let settings = LatchkeySettings::load()?;
    let service = LatchkeyService::in_memory(&settings, MockEmailClient::new())?;

    match cli.command {
        Commands::CheckToken { token } => {
            let claims = service.check_token(&token)?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
        }
    }
    Ok(())
}
