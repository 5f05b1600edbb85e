//! Colaborador de SEO: metadados de busca para um artigo pronto.
//!
//! O [`SeoAgent`] implementa [`SeoWriter`] sobre qualquer [`Generator`].
//! Campos ausentes ou inválidos na resposta são preenchidos a partir do
//! título e do conteúdo; a descrição nunca passa de
//! [`META_DESCRIPTION_MAX_CHARS`] caracteres.

use std::future::Future;

use serde_json::Value;

use crate::extract::{self, Record};
use crate::generation::{DEFAULT_TEMPERATURE, GenerationError, Generator};
use crate::job::SeoMetadata;

/// Capacidade de SEO consumida pelo orquestrador:
/// `metadata(title, content) -> {meta_title, meta_description, keywords}`.
pub trait SeoWriter: Sync {
    fn metadata(
        &self,
        title: &str,
        content: &str,
    ) -> impl Future<Output = Result<SeoMetadata, GenerationError>> + Send;
}

/// Produz metadados de busca usando o backend de geração.
#[derive(Debug, Clone)]
pub struct SeoAgent<G> {
    // Backend usado para a chamada de SEO.
    client: G,
}

// Orçamento de tokens da chamada de SEO.
const MAX_TOKENS: u32 = 200;
// Trecho do conteúdo embutido no prompt.
const PROMPT_CONTENT_CHARS: usize = 400;
// Tamanho da descrição derivada do conteúdo quando a resposta não traz uma.
const FALLBACK_DESCRIPTION_CHARS: usize = 150;
/// Limite rígido da meta description.
pub const META_DESCRIPTION_MAX_CHARS: usize = 160;
// Palavras do título usadas como keywords de fallback.
const FALLBACK_KEYWORDS: usize = 6;

impl<G> SeoAgent<G> {
    pub fn new(client: G) -> Self {
        Self { client }
    }
}

impl<G: Generator> SeoWriter for SeoAgent<G> {
    async fn metadata(&self, title: &str, content: &str) -> Result<SeoMetadata, GenerationError> {
        let excerpt: String = content.chars().take(PROMPT_CONTENT_CHARS).collect();
        let prompt = format!(
            "Given this page title: {title} and content: {excerpt}, generate: meta_title, \
             meta_description (<={META_DESCRIPTION_MAX_CHARS} chars), keywords (comma separated). Return JSON."
        );
        let text = self
            .client
            .complete(&prompt, MAX_TOKENS, DEFAULT_TEMPERATURE)
            .await?;
        Ok(parse_seo(title, content, &text))
    }
}

/// Lê os metadados de uma resposta, completando o que faltar a partir do
/// título e do conteúdo.
pub fn parse_seo(title: &str, content: &str, text: &str) -> SeoMetadata {
    let record = extract::extract_object(text).unwrap_or_default();

    let meta_title = extract::text_field(&record, &["meta_title", "title"])
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| title.to_string());
    let meta_description = extract::text_field(&record, &["meta_description", "description"])
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| fallback_description(content));
    let keywords = parse_keywords(&record).unwrap_or_else(|| fallback_keywords(title));

    SeoMetadata {
        meta_title,
        meta_description: truncate_chars(&meta_description, META_DESCRIPTION_MAX_CHARS),
        keywords,
    }
}

// Aceita `keywords` como array ou como string separada por vírgulas.
fn parse_keywords(record: &Record) -> Option<Vec<String>> {
    let keywords: Vec<String> = match record.get("keywords")? {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|k| k.trim().to_string())
            .collect(),
        Value::String(s) => s.split(',').map(|k| k.trim().to_string()).collect(),
        _ => return None,
    };
    let keywords: Vec<String> = keywords.into_iter().filter(|k| !k.is_empty()).collect();
    (!keywords.is_empty()).then_some(keywords)
}

// Primeiros caracteres do conteúdo em uma linha, com reticências.
fn fallback_description(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let head: String = content.chars().take(FALLBACK_DESCRIPTION_CHARS).collect();
    format!("{}...", head.replace('\n', " "))
}

fn fallback_keywords(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split_whitespace()
        .take(FALLBACK_KEYWORDS)
        .map(str::to_string)
        .collect()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
