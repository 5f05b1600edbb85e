//! Interface de linha de comando do blogsmith baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (run, demo, profile)
//! e flags globais (--workers, --endpoint, --verbose).

use clap::{Parser, Subcommand};

/// blogsmith: transforma um tema em um post de blog planejado, rascunhado e revisado.
#[derive(Debug, Parser)]
#[command(name = "blogsmith", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Seções rascunhadas em paralelo quando o caminho batch falha.
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Endpoint HTTP de completion (sobrescreve o blogsmith.toml).
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Habilita logs de debug (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Subcomandos disponíveis.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Gera um artigo sobre um tema.
    Run {
        /// Tema do artigo.
        topic: String,

        /// Público-alvo do artigo.
        #[arg(long, default_value = "General readers")]
        audience: String,

        /// URL de referência para pesquisa (pode repetir).
        #[arg(long = "reference", short = 'r')]
        references: Vec<String>,
    },

    /// Executa o pipeline com o backend mock offline.
    Demo,

    /// Lê ou grava perfis de usuário.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

/// Ações sobre o store de perfis.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// Grava um perfil JSON para um usuário.
    Set { user_id: String, profile: String },
    /// Imprime o perfil de um usuário.
    Get { user_id: String },
}
