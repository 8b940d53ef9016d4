use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{anyhow, Context};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::backfill::{BatchItem, TranslationCapability};
use crate::flagmark::FLAG;
use crate::language::LanguageDescriptor;

#[derive(Clone, Debug)]
pub struct ChatTranslatorConfig {
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

/// Translation capability backed by an OpenAI-compatible chat-completions
/// endpoint. The batch goes out as `key: text` lines and comes back in the
/// same line protocol; the system prompt pins down every token the model
/// must preserve verbatim.
pub struct ChatTranslator {
    cfg: ChatTranslatorConfig,
    client: Client,
}

impl ChatTranslator {
    pub fn new(cfg: ChatTranslatorConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self { cfg, client })
    }

    fn system_prompt(target: &LanguageDescriptor) -> String {
        let marker = target.marker().unwrap_or("");
        format!(
            "You are a professional UI translator.\n\
             Translate the text to the right of each colon into {} {}.\n\
             Keep line breaks (\\n and \\n\\n), the {} token, and placeholders \
             such as {{text}} and {{moderator}} exactly as they appear.\n\
             Answer format: key: translated text",
            target.name, marker, FLAG
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

impl TranslationCapability for ChatTranslator {
    fn translate(
        &self,
        batch: &[BatchItem],
        target: &LanguageDescriptor,
    ) -> anyhow::Result<BTreeMap<String, String>> {
        let user = batch
            .iter()
            .map(|item| format!("{}: {}", item.key, item.text))
            .collect::<Vec<_>>()
            .join("\n");
        let system = Self::system_prompt(target);

        let request = ChatRequest {
            model: &self.cfg.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: self.cfg.temperature,
        };

        let response = self
            .client
            .post(&self.cfg.endpoint)
            .bearer_auth(&self.cfg.api_key)
            .json(&request)
            .send()
            .context("send translation request")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!(
                "translation endpoint returned {status}: {}",
                body.chars().take(200).collect::<String>()
            ));
        }

        let body: ChatResponse = response.json().context("parse translation response")?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| anyhow!("translation response had no choices"))?;
        Ok(parse_key_lines(content))
    }
}

/// Parse `key: text` lines. Lines without a colon are skipped; later
/// occurrences of the same key win, matching the line order of the reply.
#[must_use]
pub fn parse_key_lines(raw: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for line in raw.lines() {
        let Some((key, text)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        out.insert(key.to_string(), text.trim().to_string());
    }
    out
}
