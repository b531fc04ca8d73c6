use anyhow::Context;
use clap::{Parser, Subcommand};
use hadith_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "hadith", version, about = "Hadith API server and tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API until interrupted
    Serve {
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the effective configuration as JSON (secrets redacted)
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().context("failed to load hadith-api settings")?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            hadith_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "serving hadith-api");
            hadith_api::run(settings).await
        }
        Command::Settings => {
            let rendered =
                serde_json::to_string_pretty(&settings).context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
