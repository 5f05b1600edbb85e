//! Expansão de uma entrada de outline em prosa.

use crate::generation::{DEFAULT_TEMPERATURE, GenerationError, Generator};

/// Expande uma entrada de outline em prosa corrida.
pub struct DraftAgent;

/// Tamanho alvo, em palavras, de cada seção rascunhada.
pub const DEFAULT_TARGET_WORDS: u32 = 300;

impl DraftAgent {
    /// Rascunha a seção `heading` cobrindo `bullets`.
    ///
    /// O orçamento de tokens é `target_words + 200`.
    pub async fn expand(
        client: &impl Generator,
        heading: &str,
        bullets: &[String],
        target_words: u32,
    ) -> Result<String, GenerationError> {
        let points = if bullets.is_empty() {
            "(none)".to_string()
        } else {
            bullets.join("; ")
        };
        let prompt = format!(
            "Write a {target_words}-word section with heading: '{heading}'. Use these bullet points: {points}. \
             Write clear, human-friendly prose suitable for a blog post."
        );
        client
            .complete(&prompt, target_words + 200, DEFAULT_TEMPERATURE)
            .await
    }
}
