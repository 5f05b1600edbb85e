//! Status do ciclo de vida e estágios de um job.
//!
//! [`JobStatus`] define as transições legais; [`Stage`] indica em que ponto
//! do pipeline o job está.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status do ciclo de vida de um job.
///
/// Transições legais: running → paused, paused → running,
/// running → completed. `Completed` é terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Executando (ou aguardando o próximo estágio).
    #[default]
    Running,
    /// Pausado: o próximo estágio só começa após um resume.
    Paused,
    /// Concluído, com `result` gravado.
    Completed,
}

impl JobStatus {
    /// Verifica se `self → next` é uma transição legal.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Running, JobStatus::Paused)
                | (JobStatus::Paused, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Completed)
        )
    }

    /// Retorna `true` para o status final (`Completed`).
    pub fn is_terminal(self) -> bool {
        self == JobStatus::Completed
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Running => write!(f, "running"),
            JobStatus::Paused => write!(f, "paused"),
            JobStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Estágios que um job percorre, em ordem:
/// CREATED → RESEARCH → OUTLINE → SECTIONS → ASSEMBLY → SEO → DONE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Created,
    Research,
    Outline,
    Sections,
    Assembly,
    Seo,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Created => write!(f, "CREATED"),
            Stage::Research => write!(f, "RESEARCH"),
            Stage::Outline => write!(f, "OUTLINE"),
            Stage::Sections => write!(f, "SECTIONS"),
            Stage::Assembly => write!(f, "ASSEMBLY"),
            Stage::Seo => write!(f, "SEO"),
            Stage::Done => write!(f, "DONE"),
        }
    }
}
