//! Fills missing keys in every target language's KeyFiles.

use crate::error::SyncError;
use crate::i18n::{KeyFile, Language, LanguageManifest, ReferenceFile, ReferenceSet, SyncMetrics};
use crate::retry::RetryConfig;
use crate::translation::{resolve_translation, Translator};
use futures::stream::{self, StreamExt};
use std::path::Path;
use tracing::{debug, info};

/// What happened to one (language, KeyFile) unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub language: String,
    pub file: String,
    pub keys_added: usize,
    pub written: bool,
}

/// Translation Synchronizer.
///
/// Units are processed one at a time: languages in manifest order, KeyFiles
/// in reference order. Inside a unit the missing keys are translated through
/// a pool of at most `concurrency` in-flight requests, and the unit's file is
/// written once after every key has resolved.
pub struct Synchronizer<'a> {
    translator: &'a dyn Translator,
    concurrency: usize,
    retry: RetryConfig,
}

impl<'a> Synchronizer<'a> {
    pub fn new(translator: &'a dyn Translator, concurrency: usize) -> Self {
        Self {
            translator,
            concurrency: concurrency.max(1),
            retry: RetryConfig::refusal(),
        }
    }

    /// Override how refused translations are retried
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Synchronize every target language under `root`.
    pub async fn run(
        &self,
        root: &Path,
        manifest: &LanguageManifest,
        reference: &ReferenceSet,
        metrics: &SyncMetrics,
    ) -> Result<Vec<FileOutcome>, SyncError> {
        let mut outcomes = Vec::new();

        for language in manifest.targets() {
            for file in reference.files() {
                outcomes.push(self.sync_file(root, language, file, metrics).await?);
            }
        }

        Ok(outcomes)
    }

    /// Fill the gaps of one language's copy of `file`.
    pub async fn sync_file(
        &self,
        root: &Path,
        language: &Language,
        file: &ReferenceFile,
        metrics: &SyncMetrics,
    ) -> Result<FileOutcome, SyncError> {
        let path = root.join(language.code().as_str()).join(&file.name);
        let mut target = KeyFile::open_or_create(&path)?;

        let mut missing = Vec::new();
        for (key, text) in &file.entries {
            if target.is_settled(key, text) {
                metrics.record_present();
            } else {
                missing.push((key, text));
            }
        }

        debug!(
            "{}/{}: {} of {} keys missing",
            language.code(),
            file.name,
            missing.len(),
            file.entries.len()
        );

        let translator = self.translator;
        let retry = &self.retry;

        // `buffered` yields in input order, so keys land in reference order
        let resolved: Vec<(&String, String)> = stream::iter(missing)
            .map(move |(key, text)| async move {
                let resolution =
                    resolve_translation(translator, retry, metrics, text, language).await;
                (key, resolution.into_value())
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut keys_added = 0;
        for (key, value) in resolved {
            if target.fill(key, value) {
                keys_added += 1;
            }
        }

        let written = keys_added > 0 || !target.existed();
        if written {
            target.save()?;
            metrics.record_file_written();
            info!("Updated {}/{}", language.code(), file.name);
        } else {
            info!("{}/{} is up to date", language.code(), file.name);
        }

        Ok(FileOutcome {
            language: language.code().to_string(),
            file: file.name.clone(),
            keys_added,
            written,
        })
    }
}
