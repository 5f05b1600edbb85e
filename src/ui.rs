//! Interface de terminal do blogsmith: spinner e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner de progresso e `console` para
//! estilização com cores. O [`JobProgress`] acompanha visualmente o estágio
//! de um job no terminal.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::job::{Job, SectionStrategy, Stage};

/// Indicador visual de progresso de um job no terminal.
///
/// Exibe um spinner com o estágio atual e mensagens coloridas para sucesso
/// (verde), falha (vermelho) e uso do fallback (amarelo).
pub struct JobProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    // Estilo verde para mensagens de sucesso.
    green: Style,
    // Estilo vermelho para mensagens de falha.
    red: Style,
    // Estilo amarelo para o aviso de fallback.
    yellow: Style,
}

impl JobProgress {
    /// Inicia o spinner com o tema do job.
    pub fn start(topic: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{}: {topic}", Stage::Created));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Atualiza a mensagem do spinner com o estágio atual.
    pub fn update_stage(&self, stage: Stage) {
        self.pb.set_message(format!("{stage}"));
    }

    /// Encerra o spinner e informa a conclusão do job.
    pub fn succeeded(&self, job: &Job) {
        self.pb.finish_and_clear();
        println!(
            "  {} Job {} completed",
            self.green.apply_to("✓"),
            job.id
        );
        if job.strategy == Some(SectionStrategy::Fallback) {
            println!(
                "  {} Batch output was unusable; sections were drafted one by one",
                self.yellow.apply_to("↻")
            );
        }
    }

    /// Encerra o spinner e informa a falha do job.
    pub fn failed(&self, reason: &str) {
        self.pb.finish_and_clear();
        println!("  {} Job failed: {reason}", self.red.apply_to("✗"));
    }
}

/// Imprime o artigo, os metadados de SEO e o outline.
pub fn print_article(job: &Job) {
    let heading = Style::new().cyan().bold();
    println!();
    println!("{}", heading.apply_to("─── Article ───"));
    println!("# {}\n\n{}", job.topic, job.content);
    println!();
    println!("{}", heading.apply_to("─── SEO ───"));
    println!(
        "{}",
        serde_json::to_string_pretty(&job.seo).unwrap_or_default()
    );
    println!();
    println!("{}", heading.apply_to("─── Outline ───"));
    println!(
        "{}",
        serde_json::to_string_pretty(&job.outline).unwrap_or_default()
    );
}
