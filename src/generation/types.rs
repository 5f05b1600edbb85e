//! Tipos de wire do endpoint HTTP de completion.
//!
//! O endpoint recebe `{prompt, max_tokens, temperature}` e responde com um
//! objeto JSON cujo campo `text` traz a completion. Backends com outro
//! formato continuam utilizáveis: o corpo inteiro volta como texto e o
//! extrator de saída estruturada cuida dele.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Corpo da requisição de completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Corpo da resposta de completion.
///
/// Só `text` é interpretado; o resto fica em `extra` para que uma resposta
/// sem `text` possa ser devolvida como JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl CompletionResponse {
    /// Texto da completion, ou o corpo serializado quando `text` falta ou está vazio.
    pub fn into_text(self) -> String {
        match self.text {
            Some(text) if !text.is_empty() => text,
            _ => serde_json::to_string(&self.extra).unwrap_or_default(),
        }
    }
}
