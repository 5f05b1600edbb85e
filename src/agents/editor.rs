//! Revisão de uma seção rascunhada.

use crate::generation::{DEFAULT_TEMPERATURE, GenerationError, Generator};

/// Revisa clareza, gramática e concisão de uma seção.
pub struct EditorAgent;

// Orçamento de tokens da chamada de edição.
const MAX_TOKENS: u32 = 400;

impl EditorAgent {
    pub async fn run(client: &impl Generator, draft: &str) -> Result<String, GenerationError> {
        let prompt = format!(
            "Edit the following blog section for clarity, grammar, and conciseness.\n\n{draft}\n\n\
             Provide only the edited section."
        );
        client
            .complete(&prompt, MAX_TOKENS, DEFAULT_TEMPERATURE)
            .await
    }
}
