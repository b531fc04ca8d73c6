use anyhow::Context;
use hadith_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load hadith-api settings")?;
    hadith_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        debug = settings.server.debug,
        "hadith-api starting"
    );

    hadith_api::run(settings).await
}
