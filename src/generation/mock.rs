//! Backend de geração offline.

use super::Generator;
use super::error::GenerationError;

/// Backend offline que ecoa o começo do prompt.
///
/// Usado quando nenhum endpoint está configurado. A saída nunca traz os
/// dados estruturados que o caminho batch pede, então jobs rodados com ele
/// exercitam o fallback por seção.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockGenerator;

// Caracteres do prompt incluídos no eco.
const ECHO_CHARS: usize = 200;

impl Generator for MockGenerator {
    async fn complete(
        &self,
        prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, GenerationError> {
        let head: String = prompt.chars().take(ECHO_CHARS).collect();
        Ok(format!("[MOCK OUTPUT] {head}..."))
    }
}
