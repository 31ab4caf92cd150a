use anyhow::Result;
use i18n_sync::config::Config;
use i18n_sync::openai::OpenAiTranslator;
use i18n_sync::sync::Synchronizer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when the variables are already set)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_sync=info".parse()?),
        )
        .init();

    info!("Starting i18n sync");

    // Load configuration from environment
    let config = Config::from_env()?;

    let translator = OpenAiTranslator::new(reqwest::Client::new(), &config);
    let synchronizer = Synchronizer::new(&translator, config.concurrency);

    let report = i18n_sync::run(&config, &synchronizer).await?;

    let up_to_date = report.files.iter().filter(|f| !f.written).count();
    info!(
        "{} of {} language files were already up to date",
        up_to_date,
        report.files.len()
    );
    info!(
        "Filled {} keys in {} files ({} translated, {} fallbacks, {} refusals)",
        report.metrics.keys_filled(),
        report.metrics.files_written,
        report.metrics.keys_translated,
        report.metrics.fallbacks,
        report.metrics.refusals
    );
    if !report.collisions.is_empty() {
        info!(
            "{} keys are defined in more than one reference file",
            report.collisions.len()
        );
    }

    Ok(())
}
