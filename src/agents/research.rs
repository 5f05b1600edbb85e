//! Pesquisa de referências: um resumo por URL, na ordem recebida.

use tracing::{debug, warn};

use crate::job::{Citation, Research};
use crate::scraper::Summarizer;

/// Reúne os resumos das referências de um job.
pub struct ResearchAgent;

impl ResearchAgent {
    /// Resume cada referência em sequência. URLs sem resumo ficam de fora;
    /// sem referências o agregado sai vazio.
    pub async fn run(summarizer: &impl Summarizer, references: &[String]) -> Research {
        let mut citations = Vec::with_capacity(references.len());
        for url in references {
            let summary = summarizer.summarize(url).await;
            if summary.is_empty() {
                warn!(url = %url, "reference produced no summary");
                continue;
            }
            debug!(url = %url, chars = summary.len(), "reference summarized");
            citations.push(Citation {
                url: url.clone(),
                summary,
            });
        }
        Research::from_citations(citations)
    }
}
