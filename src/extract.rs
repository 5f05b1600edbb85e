//! Recuperação de registros estruturados a partir de saída livre do backend.
//!
//! Os backends recebem pedido de um array JSON de registros, mas costumam
//! embrulhá-lo em prosa, code fences ou num objeto externo, ou devolver algo
//! que nem é JSON. [`extract_records`] tenta, em ordem:
//!
//! 1. o texto inteiro como JSON (um array, ou objeto com array `sections`),
//! 2. o primeiro trecho não guloso `[{ ... }]` que seja array de objetos,
//! 3. o trecho do primeiro `[` ao último `]`.
//!
//! Se nada funciona o chamador recebe [`NoStructuredData`] e decide como
//! degradar. A ordem dos registros é sempre a do array de origem.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::job::Section;

/// Um registro JSON (objeto) extraído da resposta.
pub type Record = Map<String, Value>;

/// Nenhum dado estruturado aproveitável no texto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no structured data found")]
pub struct NoStructuredData;

/// Heading usado quando o registro não traz `heading` nem `title`.
pub const UNTITLED: &str = "Untitled";

static RECORD_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[\s*\{.*?\}\s*\]").expect("record array pattern is valid")
});

/// Encontra o array de registros embutido em `text`.
pub fn extract_records(text: &str) -> Result<Vec<Record>, NoStructuredData> {
    if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
        match value {
            Value::Array(items) => return Ok(keep_objects(items)),
            Value::Object(mut map) => {
                if let Some(Value::Array(items)) = map.remove("sections") {
                    return Ok(keep_objects(items));
                }
            }
            _ => {}
        }
    }

    for candidate in RECORD_ARRAY.find_iter(text) {
        if let Ok(records) = serde_json::from_str::<Vec<Record>>(candidate.as_str()) {
            return Ok(records);
        }
    }

    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']'))
        && start < end
        && let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&text[start..=end])
    {
        return Ok(keep_objects(items));
    }

    Err(NoStructuredData)
}

/// Extrai seções `{heading, content}`, normalizando nomes alternativos.
///
/// `heading` cai para `title` e depois para [`UNTITLED`]; `content` cai para
/// `body` e depois para texto vazio.
pub fn extract_sections(text: &str) -> Result<Vec<Section>, NoStructuredData> {
    let records = extract_records(text)?;
    Ok(records.iter().map(normalize_section).collect())
}

pub fn normalize_section(record: &Record) -> Section {
    Section {
        heading: text_field(record, &["heading", "title"]).unwrap_or_else(|| UNTITLED.to_string()),
        content: text_field(record, &["content", "body"]).unwrap_or_default(),
    }
}

/// Encontra um único objeto JSON em `text`: o texto inteiro, senão o trecho
/// do primeiro `{` ao último `}`.
pub fn extract_object(text: &str) -> Result<Record, NoStructuredData> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text.trim()) {
        return Ok(map);
    }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}'))
        && start < end
        && let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&text[start..=end])
    {
        return Ok(map);
    }
    Err(NoStructuredData)
}

/// Primeira das `keys` com string ou escalar, renderizada como texto.
pub fn text_field(record: &Record, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

// Descarta itens do array que não são objetos.
fn keep_objects(items: Vec<Value>) -> Vec<Record> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}
