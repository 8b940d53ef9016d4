use std::collections::{BTreeMap, BTreeSet};

use crate::backfill::{BackfillOrchestrator, BackfillResult, TranslationCapability};
use crate::catalog::{CatalogSnapshot, CatalogStore, LanguageDirectory};
use crate::coverage::{self, CoverageRecord};
use crate::error::{EngineError, EngineResult};
use crate::language::LanguageDescriptor;
use crate::merge;
use crate::selector;

/// Ties the storage collaborators, the translation capability and the
/// catalog policy together behind the operations the surrounding
/// application calls. Holds no state of its own between calls; everything
/// lives in the collaborators.
pub struct BackfillEngine<'a> {
    catalog: &'a dyn CatalogStore,
    directory: &'a dyn LanguageDirectory,
    capability: Option<&'a dyn TranslationCapability>,
    source_lang: String,
    reserved_key: String,
}

impl<'a> BackfillEngine<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a dyn CatalogStore,
        directory: &'a dyn LanguageDirectory,
        capability: Option<&'a dyn TranslationCapability>,
        source_lang: &str,
        reserved_key: &str,
    ) -> Self {
        Self {
            catalog,
            directory,
            capability,
            source_lang: source_lang.to_string(),
            reserved_key: reserved_key.to_string(),
        }
    }

    fn snapshot(&self) -> EngineResult<CatalogSnapshot> {
        Ok(CatalogSnapshot::from_entries(self.catalog.read_all()?))
    }

    fn require_language(&self, code: &str) -> EngineResult<LanguageDescriptor> {
        self.directory
            .read_all()?
            .into_iter()
            .find(|l| l.code == code)
            .ok_or_else(|| EngineError::UnknownLanguage(code.to_string()))
    }

    /// Coverage for every language in the directory.
    pub fn coverage(&self) -> EngineResult<BTreeMap<String, CoverageRecord>> {
        let snapshot = self.snapshot()?;
        let languages = self.directory.read_all()?;
        Ok(coverage::compute_coverage(
            &snapshot,
            &languages,
            &self.source_lang,
            &self.reserved_key,
        ))
    }

    /// Canonical keys not yet translated into `lang`.
    pub fn missing_keys(&self, lang: &str) -> EngineResult<BTreeSet<String>> {
        let target = self.require_language(lang)?;
        let snapshot = self.snapshot()?;
        Ok(coverage::missing_keys(
            &snapshot,
            &target.code,
            &self.source_lang,
            &self.reserved_key,
        ))
    }

    /// Backfill every missing key for `lang` without persisting anything.
    pub fn preview(&self, lang: &str) -> EngineResult<BackfillResult> {
        let target = self.require_language(lang)?;
        let snapshot = self.snapshot()?;
        let languages = self.directory.read_all()?;
        let keys = coverage::missing_keys(
            &snapshot,
            &target.code,
            &self.source_lang,
            &self.reserved_key,
        );
        let capability = self.capability.ok_or_else(|| {
            EngineError::Capability(anyhow::anyhow!("no translation capability configured"))
        })?;
        let orchestrator =
            BackfillOrchestrator::new(&self.source_lang, &languages, capability);
        orchestrator.backfill(&snapshot, &target, &keys)
    }

    /// Commit an arbitrary key -> text mapping for `lang`, first-write
    /// wins. Returns the number of rows actually added.
    pub fn commit(&self, lang: &str, texts: &BTreeMap<String, String>) -> EngineResult<usize> {
        let target = self.require_language(lang)?;
        merge::commit(self.catalog, &target.code, texts)
    }

    /// Backfill and commit in one step. The count reflects the rows the
    /// merge actually added, not the size of the capability's reply.
    pub fn backfill_and_commit(&self, lang: &str) -> EngineResult<(BackfillResult, usize)> {
        let result = self.preview(lang)?;
        let added = merge::commit(self.catalog, &result.lang, &result.texts)?;
        Ok((result, added))
    }

    /// Languages a catalog view shows, in display order. `preview` names a
    /// language being onboarded; it narrows the view to source + target.
    pub fn view_languages(&self, preview: Option<&str>) -> EngineResult<Vec<LanguageDescriptor>> {
        let snapshot = self.snapshot()?;
        let languages = self.directory.read_all()?;
        let target = match preview {
            Some(code) => Some(self.require_language(code)?),
            None => None,
        };
        Ok(selector::select_languages_for_view(
            &languages,
            snapshot.used_language_codes(),
            &self.source_lang,
            target.as_ref(),
        ))
    }

    /// Languages with no catalog entries that are open for onboarding.
    pub fn onboarding_candidates(&self) -> EngineResult<Vec<LanguageDescriptor>> {
        let snapshot = self.snapshot()?;
        let languages = self.directory.read_all()?;
        Ok(coverage::unused_languages(&snapshot, &languages)
            .into_iter()
            .filter(|l| l.available)
            .collect())
    }
}
