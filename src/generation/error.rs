//! Tipos de erro do backend de geração de texto.
//!
//! Define [`GenerationError`] com variantes para rate limiting, respostas
//! HTTP de erro, falhas de rede e backends indisponíveis. Usa `thiserror`
//! para derivar `Display` e `Error` a partir dos atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que um [`Generator`](super::Generator) pode retornar em `complete`.
///
/// - [`RateLimited`](GenerationError::RateLimited): o servidor retornou HTTP 429
/// - [`ApiError`](GenerationError::ApiError): qualquer outro status de erro (4xx/5xx)
/// - [`NetworkError`](GenerationError::NetworkError): falha na camada de rede
/// - [`Unavailable`](GenerationError::Unavailable): backend inutilizável
#[derive(Debug, Error)]
pub enum GenerationError {
    /// O servidor retornou HTTP 429 (rate limit).
    /// O campo `retry_after_ms` indica quanto esperar antes de tentar de novo.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Erro retornado pelo endpoint (ex.: 401 chave inválida, 500 erro interno).
    /// Contém o status HTTP e o corpo da resposta.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    /// Encapsula o erro original do `reqwest` via `#[from]`.
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// O backend não consegue atender requisições.
    #[error("generation backend unavailable: {0}")]
    Unavailable(String),
}
