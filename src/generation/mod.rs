//! Capacidade de geração de texto consumida pelo pipeline.
//!
//! Todo o resto conversa com um [`Generator`]; o backend HTTP e o mock
//! offline são as duas implementações distribuídas com o binário.

pub mod client;
pub mod error;
pub mod mock;
pub mod types;

use std::future::Future;

pub use client::HttpGenerator;
pub use error::GenerationError;
pub use mock::MockGenerator;

/// Temperatura de amostragem padrão das chamadas do pipeline.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// `complete(prompt, max_tokens, temperature) -> text`.
///
/// A saída é texto livre. Quem precisa de dados estruturados deve passá-la
/// por [`crate::extract`].
pub trait Generator: Sync {
    fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}
