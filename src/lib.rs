//! blogsmith: pipeline de conteúdo que transforma tema e público em um
//! artigo planejado, rascunhado e revisado, com metadados de SEO.
//!
//! O [`orchestrator`] sequencia os estágios e acompanha o ciclo de vida dos
//! jobs no [`session`] store. O [`pipeline`] gera as seções com uma chamada
//! batch e recorre a chamadas concorrentes por seção, usando [`extract`] para
//! tirar registros estruturados da saída livre do backend.

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod generation;
pub mod job;
pub mod logging;
pub mod orchestrator;
pub mod pipeline;
pub mod profile;
pub mod scraper;
pub mod session;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{PipelineError, SessionError};
pub use orchestrator::JobOrchestrator;
