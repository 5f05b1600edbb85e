//! Erros expostos a quem chama o orquestrador.
//!
//! Falhas de extração e de seções individuais nunca chegam aqui: são
//! tratadas dentro do pipeline.

use thiserror::Error;

use crate::generation::GenerationError;
use crate::job::Stage;

/// Erros reportados a quem chama o orquestrador.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Nenhum job com o id informado.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Falhou um colaborador sem o qual o job não pode seguir (outline, SEO).
    #[error("{stage} collaborator failed: {source}")]
    Collaborator {
        stage: Stage,
        #[source]
        source: GenerationError,
    },

    /// Erro do session store.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Erros do [`SessionStore`](crate::session::SessionStore).
#[derive(Debug, Error)]
pub enum SessionError {
    /// `create` com um id que já existe.
    #[error("Job already exists: {0}")]
    DuplicateJob(String),
}
