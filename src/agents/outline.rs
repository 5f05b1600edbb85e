//! Colaborador de planejamento: gera o outline de um artigo.
//!
//! O [`OutlineAgent`] implementa [`Outliner`] sobre qualquer [`Generator`].
//! Respostas malformadas nunca falham: [`parse_outline`] tenta registros
//! JSON, depois linhas soltas e por fim o esqueleto de cinco seções.

use std::future::Future;

use serde_json::Value;

use crate::extract::{self, Record, UNTITLED};
use crate::generation::{DEFAULT_TEMPERATURE, GenerationError, Generator};
use crate::job::OutlineEntry;

/// Capacidade de outline consumida pelo orquestrador:
/// `outline(topic, audience) -> entradas ordenadas`.
pub trait Outliner: Sync {
    fn outline(
        &self,
        topic: &str,
        audience: &str,
    ) -> impl Future<Output = Result<Vec<OutlineEntry>, GenerationError>> + Send;
}

/// Planeja as seções de um artigo usando o backend de geração.
#[derive(Debug, Clone)]
pub struct OutlineAgent<G> {
    // Backend usado para a chamada de outline.
    client: G,
}

// Orçamento de tokens da chamada de outline.
const MAX_TOKENS: u32 = 400;
// Quantidade de seções pedidas e aproveitadas da heurística de linhas.
const SECTION_COUNT: usize = 5;
// Limite de caracteres de um heading extraído de uma linha solta.
const HEADING_MAX_CHARS: usize = 120;

impl<G> OutlineAgent<G> {
    pub fn new(client: G) -> Self {
        Self { client }
    }
}

impl<G: Generator> Outliner for OutlineAgent<G> {
    /// Pede ao backend um outline de `topic` voltado para `audience`.
    ///
    /// Apenas uma falha na chamada de geração vira erro.
    async fn outline(
        &self,
        topic: &str,
        audience: &str,
    ) -> Result<Vec<OutlineEntry>, GenerationError> {
        let prompt = format!(
            "Create a blog post outline for the topic: '{topic}' targeting '{audience}'. \
             Return {SECTION_COUNT} sections as JSON array where each section has 'heading' and 'bullets'."
        );
        let text = self
            .client
            .complete(&prompt, MAX_TOKENS, DEFAULT_TEMPERATURE)
            .await?;
        Ok(parse_outline(&text))
    }
}

/// Converte uma resposta em entradas de outline.
///
/// Registros estruturados vencem; senão cada linha não vazia vira um
/// heading; senão retorna o esqueleto genérico de cinco seções.
pub fn parse_outline(text: &str) -> Vec<OutlineEntry> {
    if let Ok(records) = extract::extract_records(text) {
        let entries: Vec<OutlineEntry> = records.iter().map(entry_from_record).collect();
        if !entries.is_empty() {
            return entries;
        }
    }

    let from_lines: Vec<OutlineEntry> = text
        .lines()
        .map(|line| line.trim().trim_matches(|c| c == '-' || c == ' '))
        .filter(|line| !line.is_empty())
        .take(SECTION_COUNT)
        .map(|line| OutlineEntry {
            heading: line.chars().take(HEADING_MAX_CHARS).collect(),
            bullets: vec!["Point 1".to_string(), "Point 2".to_string()],
        })
        .collect();
    if !from_lines.is_empty() {
        return from_lines;
    }

    default_outline()
}

/// Esqueleto usado quando o backend não entrega nada aproveitável.
pub fn default_outline() -> Vec<OutlineEntry> {
    vec![
        OutlineEntry::new("Introduction", &["What this article covers"]),
        OutlineEntry::new("Background", &["Context and definitions"]),
        OutlineEntry::new("Main Points", &["Key idea 1", "Key idea 2"]),
        OutlineEntry::new("Examples", &["Example 1", "Example 2"]),
        OutlineEntry::new("Conclusion", &["Summary and next steps"]),
    ]
}

// Lê `heading`/`title` e `bullets`/`points` de um registro.
fn entry_from_record(record: &Record) -> OutlineEntry {
    let heading = extract::text_field(record, &["heading", "title"])
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());
    let bullets = match record.get("bullets").or_else(|| record.get("points")) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    };
    OutlineEntry { heading, bullets }
}
