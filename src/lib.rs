//! Keeps localized JSON string tables in sync with the reference language.
//!
//! A run loads the languages manifest and the reference KeyFiles, regenerates
//! the `Translations` type declaration, then fills every missing key of every
//! target language through a [`translation::Translator`].

pub mod config;
pub mod error;
pub mod i18n;
pub mod openai;
pub mod retry;
pub mod sync;
pub mod translation;

use config::Config;
use error::SyncError;
use i18n::{KeyCollision, LanguageManifest, MetricsReport, ReferenceSet, SyncMetrics};
use sync::{FileOutcome, Synchronizer};
use tracing::info;

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub types_updated: bool,
    pub collisions: Vec<KeyCollision>,
    pub files: Vec<FileOutcome>,
    pub metrics: MetricsReport,
}

/// Run the whole job: load, regenerate the type, synchronize translations.
///
/// Configuration problems and a missing type declaration fail before any
/// language file is touched.
pub async fn run(config: &Config, synchronizer: &Synchronizer<'_>) -> Result<RunReport, SyncError> {
    let manifest = LanguageManifest::load(&config.manifest_path(), &config.reference_language)?;
    info!(
        "Loaded {} languages (reference: {})",
        manifest.languages().len(),
        manifest.reference()
    );

    let reference = ReferenceSet::load(&config.i18n_root.join(manifest.reference().as_str()))?;
    info!(
        "Loaded {} keys from {} reference files",
        reference.merged().len(),
        reference.files().len()
    );

    let types_updated =
        i18n::update_types_file(&config.types_file, &config.type_name, reference.keys())?;

    let metrics = SyncMetrics::new();
    let files = synchronizer
        .run(&config.i18n_root, &manifest, &reference, &metrics)
        .await?;

    info!("Done!");

    Ok(RunReport {
        types_updated,
        collisions: reference.collisions().to_vec(),
        files,
        metrics: metrics.report(),
    })
}
