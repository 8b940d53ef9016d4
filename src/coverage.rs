use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::CatalogSnapshot;
use crate::language::LanguageDescriptor;

/// Per-language completeness against the canonical key set. Derived, never
/// persisted; `filled + missing == total` at every observation point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoverageRecord {
    pub filled: usize,
    pub missing: usize,
    pub total: usize,
}

/// Distinct keys present for the source language, minus the reserved key.
///
/// The reserved key backs an initial-contact message rendered elsewhere
/// and never contributes to completeness accounting.
#[must_use]
pub fn canonical_keys(
    snapshot: &CatalogSnapshot,
    source_lang: &str,
    reserved_key: &str,
) -> BTreeSet<String> {
    let mut keys = snapshot.keys_for(source_lang);
    keys.remove(reserved_key);
    keys
}

/// Coverage for every language in `languages`. The source language is the
/// origin of truth, so its record always comes out with `missing == 0`.
#[must_use]
pub fn compute_coverage(
    snapshot: &CatalogSnapshot,
    languages: &[LanguageDescriptor],
    source_lang: &str,
    reserved_key: &str,
) -> BTreeMap<String, CoverageRecord> {
    let canonical = canonical_keys(snapshot, source_lang, reserved_key);
    let total = canonical.len();
    let mut out = BTreeMap::new();
    for lang in languages {
        let filled = canonical
            .iter()
            .filter(|key| snapshot.has(key, &lang.code))
            .count();
        out.insert(
            lang.code.clone(),
            CoverageRecord {
                filled,
                missing: total - filled,
                total,
            },
        );
    }
    out
}

/// Canonical keys with no entry for `target_lang`.
#[must_use]
pub fn missing_keys(
    snapshot: &CatalogSnapshot,
    target_lang: &str,
    source_lang: &str,
    reserved_key: &str,
) -> BTreeSet<String> {
    canonical_keys(snapshot, source_lang, reserved_key)
        .into_iter()
        .filter(|key| !snapshot.has(key, target_lang))
        .collect()
}

/// Languages with zero catalog entries of any key.
#[must_use]
pub fn unused_languages(
    snapshot: &CatalogSnapshot,
    languages: &[LanguageDescriptor],
) -> Vec<LanguageDescriptor> {
    languages
        .iter()
        .filter(|lang| !snapshot.used_language_codes().contains(&lang.code))
        .cloned()
        .collect()
}
