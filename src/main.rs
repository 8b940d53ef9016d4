use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use lingo_backfill::backfill::TranslationCapability;
use lingo_backfill::config::{
    find_default_config, init_default_config, load_config, resolve_path, AppConfig,
    DEFAULT_CONFIG_FILENAME,
};
use lingo_backfill::engine::BackfillEngine;
use lingo_backfill::gpt::{ChatTranslator, ChatTranslatorConfig};
use lingo_backfill::progress::ConsoleProgress;
use lingo_backfill::store::{JsonCatalogStore, JsonLanguageDirectory};

#[derive(Parser, Debug)]
#[command(name = "lingo-backfill")]
#[command(about = "Translation catalog coverage and backfill via an external translator", long_about = None)]
struct Args {
    /// Generate a default config file, then exit
    #[arg(long)]
    init_config: bool,

    /// Directory to write the config file (default: current directory)
    #[arg(long, value_name = "DIR")]
    init_config_dir: Option<PathBuf>,

    /// Overwrite an existing config when used with --init-config
    #[arg(long)]
    force: bool,

    /// Config file path (default: search for lingo-backfill.toml upwards)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-language translation coverage against the source language
    Coverage,
    /// Keys present for the source language but absent for LANG
    Missing {
        lang: String,
    },
    /// Backfill LANG through the translator without persisting anything
    Preview {
        lang: String,
        /// Write the key→text result JSON here instead of stdout
        #[arg(short, long, value_name = "JSON")]
        output: Option<PathBuf>,
    },
    /// Backfill LANG and commit the result (insert-if-absent)
    Backfill {
        lang: String,
    },
    /// Commit a key→text JSON mapping for LANG (insert-if-absent)
    Import {
        lang: String,
        file: PathBuf,
    },
    /// Language directory, catalog usage and onboarding candidates
    Languages,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let progress = ConsoleProgress::new(true);

    if args.init_config {
        let dir = args
            .init_config_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let cfg_path = init_default_config(&dir, args.force).context("init default config")?;
        eprintln!("Wrote config: {}", cfg_path.display());
        return Ok(());
    }

    let Some(command) = args.command else {
        eprintln!(
            "No command given. Try `lingo-backfill coverage`, or `lingo-backfill --init-config` \
             to write a starter {DEFAULT_CONFIG_FILENAME}."
        );
        return Ok(());
    };

    let config_path = match args.config {
        Some(p) => p,
        None => find_default_config().context(
            "no config found; run `lingo-backfill --init-config` or pass --config",
        )?,
    };
    let cfg = load_config(&config_path)?;
    progress.info(format!("Config: {}", config_path.display()));

    let catalog_path = resolve_path(&config_path, &cfg.catalog.catalog_path);
    let languages_path = resolve_path(&config_path, &cfg.catalog.languages_path);
    let catalog = JsonCatalogStore::open(&catalog_path)?;
    let directory = JsonLanguageDirectory::open(&languages_path)?;

    let translator = if matches!(&command, Command::Preview { .. } | Command::Backfill { .. }) {
        Some(build_translator(&cfg)?)
    } else {
        None
    };
    let capability = translator
        .as_ref()
        .map(|t| t as &dyn TranslationCapability);

    let engine = BackfillEngine::new(
        &catalog,
        &directory,
        capability,
        &cfg.catalog.source_lang,
        &cfg.catalog.reserved_key,
    );

    match command {
        Command::Coverage => {
            let coverage = engine.coverage()?;
            for (code, rec) in &coverage {
                println!(
                    "{code}: {}/{} filled, {} missing",
                    rec.filled, rec.total, rec.missing
                );
            }
        }
        Command::Missing { lang } => {
            let missing = engine.missing_keys(&lang)?;
            progress.info(format!("{}: {} missing keys", lang, missing.len()));
            for key in missing {
                println!("{key}");
            }
        }
        Command::Preview { lang, output } => {
            progress.info(format!("Preview backfill: {lang}"));
            let result = engine.preview(&lang)?;
            progress.info(format!("Translated {} keys (nothing persisted)", result.texts.len()));
            let json = serde_json::to_string_pretty(&result.texts)
                .context("serialize preview result")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("write preview: {}", path.display()))?;
                    progress.info(format!("Wrote {}", path.display()));
                }
                None => println!("{json}"),
            }
        }
        Command::Backfill { lang } => {
            progress.info(format!("Backfill: {lang}"));
            let (result, added) = engine.backfill_and_commit(&lang)?;
            progress.info(format!(
                "Translated {} keys, added {} new entries",
                result.texts.len(),
                added
            ));
            println!("{added}");
        }
        Command::Import { lang, file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("read mapping: {}", file.display()))?;
            let texts: BTreeMap<String, String> =
                serde_json::from_str(&text).with_context(|| format!("parse mapping: {}", file.display()))?;
            let added = engine.commit(&lang, &texts)?;
            progress.info(format!(
                "Imported {} of {} entries for {lang}",
                added,
                texts.len()
            ));
            println!("{added}");
        }
        Command::Languages => {
            let shown = engine.view_languages(None)?;
            println!("In use:");
            for lang in &shown {
                let marker = lang.marker().unwrap_or("-");
                println!("  {} {} {}", lang.code, marker, lang.name);
            }
            let candidates = engine.onboarding_candidates()?;
            if !candidates.is_empty() {
                println!("Available for onboarding:");
                for lang in &candidates {
                    let marker = lang.marker().unwrap_or("-");
                    println!("  {} {} {}", lang.code, marker, lang.name);
                }
            }
        }
    }

    Ok(())
}

fn build_translator(cfg: &AppConfig) -> anyhow::Result<ChatTranslator> {
    let api_key = cfg.translator.api_key()?;
    ChatTranslator::new(ChatTranslatorConfig {
        endpoint: cfg.translator.endpoint.clone(),
        model: cfg.translator.model.clone(),
        api_key,
        temperature: cfg.translator.temperature,
        timeout_secs: cfg.translator.timeout_secs,
    })
}
