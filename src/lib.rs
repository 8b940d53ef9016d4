pub mod backfill;
pub mod catalog;
pub mod config;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod flagmark;
pub mod gpt;
pub mod language;
pub mod merge;
pub mod progress;
pub mod selector;
pub mod store;

pub use backfill::{BackfillOrchestrator, BackfillResult, BatchItem, TranslationCapability};
pub use catalog::{CatalogEntry, CatalogSnapshot, CatalogStore, LanguageDirectory};
pub use coverage::CoverageRecord;
pub use engine::BackfillEngine;
pub use error::EngineError;
pub use language::LanguageDescriptor;
