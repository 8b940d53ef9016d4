use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::CatalogSnapshot;
use crate::error::{EngineError, EngineResult};
use crate::flagmark;
use crate::language::LanguageDescriptor;

/// One (key, source text) pair of a translation batch. `text` has already
/// been through [`flagmark::encode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchItem {
    pub key: String,
    pub text: String,
}

/// Opaque external translation capability.
///
/// One invocation handles one whole (target, batch) pair. The returned
/// mapping may cover any subset of the requested keys; a missing key is
/// expected partial failure, not an error. A failed call is terminal for
/// the batch.
pub trait TranslationCapability {
    fn translate(
        &self,
        batch: &[BatchItem],
        target: &LanguageDescriptor,
    ) -> anyhow::Result<BTreeMap<String, String>>;
}

/// key -> translated text for one target language. Held in memory until
/// explicitly committed; blank results are already dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackfillResult {
    pub lang: String,
    pub texts: BTreeMap<String, String>,
}

/// Drives one backfill call: batch assembly from source-language entries,
/// flag encoding, a single capability invocation, flag decoding.
pub struct BackfillOrchestrator<'a> {
    source_lang: &'a str,
    languages: &'a [LanguageDescriptor],
    capability: &'a dyn TranslationCapability,
}

impl<'a> BackfillOrchestrator<'a> {
    #[must_use]
    pub fn new(
        source_lang: &'a str,
        languages: &'a [LanguageDescriptor],
        capability: &'a dyn TranslationCapability,
    ) -> Self {
        Self {
            source_lang,
            languages,
            capability,
        }
    }

    /// Translate `keys` into `target`'s language.
    ///
    /// Keys with no source-language entry are excluded from the batch; an
    /// empty batch short-circuits without invoking the capability. Keys
    /// absent from the capability's response are simply absent from the
    /// result, never synthesized or retried. Nothing is persisted here.
    pub fn backfill(
        &self,
        snapshot: &CatalogSnapshot,
        target: &LanguageDescriptor,
        keys: &BTreeSet<String>,
    ) -> EngineResult<BackfillResult> {
        let mut batch: Vec<BatchItem> = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(text) = snapshot.text(key, self.source_lang) else {
                continue;
            };
            batch.push(BatchItem {
                key: key.clone(),
                text: flagmark::encode(text, self.languages),
            });
        }

        let mut result = BackfillResult {
            lang: target.code.clone(),
            texts: BTreeMap::new(),
        };
        if batch.is_empty() {
            return Ok(result);
        }

        let raw = self
            .capability
            .translate(&batch, target)
            .map_err(EngineError::Capability)?;

        for (key, text) in raw {
            let text = flagmark::decode(&text, target);
            if text.trim().is_empty() {
                continue;
            }
            result.texts.insert(key, text);
        }
        Ok(result)
    }
}
