//! Geração de seções em duas camadas.
//!
//! O caminho batch pede todas as seções em uma chamada e as revisa em uma
//! segunda. Se a resposta batch não vira seções, cada entrada do outline é
//! rascunhada e revisada por conta própria, com no máximo `workers` entradas
//! em andamento. Nenhum dos caminhos falha o job: o pior resultado é uma
//! seção com conteúdo vazio.

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::agents::{DEFAULT_TARGET_WORDS, DraftAgent, EditorAgent};
use crate::extract::{self, NoStructuredData};
use crate::generation::{DEFAULT_TEMPERATURE, GenerationError, Generator};
use crate::job::{OutlineEntry, Section, SectionStrategy};

// Orçamento de tokens das chamadas batch (geração e edição).
const BATCH_MAX_TOKENS: u32 = 2048;

/// Motivo pelo qual o caminho batch desistiu. Nunca sai deste módulo.
#[derive(Debug, Error)]
enum BatchFailure {
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Extraction(#[from] NoStructuredData),
    #[error("reply contained no sections")]
    Empty,
    #[error("edit returned {got} sections for {expected}")]
    CountMismatch { expected: usize, got: usize },
}

/// Seções produzidas e a estratégia que as produziu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub sections: Vec<Section>,
    pub strategy: SectionStrategy,
}

/// Pipeline de seções com batch primeiro e fallback concorrente.
#[derive(Debug, Clone)]
pub struct SectionPipeline {
    // Limite de entradas em andamento no fallback (mínimo 1).
    workers: usize,
    // Tamanho alvo de cada rascunho no fallback.
    target_words: u32,
}

impl SectionPipeline {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            target_words: DEFAULT_TARGET_WORDS,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Produz uma seção por entrada do outline, tentando o batch primeiro.
    pub async fn run(&self, client: &impl Generator, outline: &[OutlineEntry]) -> PipelineOutput {
        if outline.is_empty() {
            return PipelineOutput {
                sections: Vec::new(),
                strategy: SectionStrategy::Fallback,
            };
        }

        match self.batch(client, outline).await {
            Ok(sections) => {
                info!(sections = sections.len(), "batch generation succeeded");
                PipelineOutput {
                    sections,
                    strategy: SectionStrategy::Batch,
                }
            }
            Err(reason) => {
                warn!(%reason, "batch generation failed, drafting sections individually");
                PipelineOutput {
                    sections: self.fallback(client, outline).await,
                    strategy: SectionStrategy::Fallback,
                }
            }
        }
    }

    // Geração batch seguida da edição batch; edição falha mantém o rascunho.
    async fn batch(
        &self,
        client: &impl Generator,
        outline: &[OutlineEntry],
    ) -> Result<Vec<Section>, BatchFailure> {
        let outline_json = serde_json::to_string_pretty(outline).unwrap_or_default();
        let prompt = format!(
            "Write the full blog post from this outline. Respond with ONLY a JSON array, \
             one object per outline entry in the same order, each with keys \"heading\" and \
             \"content\". Each content should be 150-250 words of clear prose that covers the \
             entry's bullets.\n\nOutline:\n{outline_json}"
        );
        let reply = client
            .complete(&prompt, BATCH_MAX_TOKENS, DEFAULT_TEMPERATURE)
            .await?;
        let sections = extract::extract_sections(&reply)?;
        if sections.is_empty() {
            return Err(BatchFailure::Empty);
        }

        match self.batch_edit(client, &sections).await {
            Ok(edited) => Ok(edited),
            Err(reason) => {
                warn!(%reason, "batch edit failed, keeping unedited sections");
                Ok(sections)
            }
        }
    }

    async fn batch_edit(
        &self,
        client: &impl Generator,
        sections: &[Section],
    ) -> Result<Vec<Section>, BatchFailure> {
        let sections_json = serde_json::to_string_pretty(sections).unwrap_or_default();
        let prompt = format!(
            "Edit each of these blog sections for clarity, grammar, and conciseness. Respond \
             with ONLY a JSON array of the same length and order, each object with keys \
             \"heading\" and \"content\".\n\nSections:\n{sections_json}"
        );
        let reply = client
            .complete(&prompt, BATCH_MAX_TOKENS, DEFAULT_TEMPERATURE)
            .await?;
        let edited = extract::extract_sections(&reply)?;
        if edited.is_empty() {
            return Err(BatchFailure::Empty);
        }
        // A edição não pode descartar seções.
        if edited.len() != sections.len() {
            return Err(BatchFailure::CountMismatch {
                expected: sections.len(),
                got: edited.len(),
            });
        }
        Ok(edited)
    }

    /// Rascunha e revisa cada entrada de forma independente, `workers` por vez.
    ///
    /// As entradas terminam em qualquer ordem; cada resultado cai no slot do
    /// seu índice no outline, então a saída segue sempre a ordem do outline.
    pub async fn fallback(&self, client: &impl Generator, outline: &[OutlineEntry]) -> Vec<Section> {
        let mut slots: Vec<Option<Section>> = vec![None; outline.len()];

        let mut completed = stream::iter(outline.iter().enumerate())
            .map(|(index, entry)| async move { (index, self.draft_and_edit(client, entry).await) })
            .buffer_unordered(self.workers);

        while let Some((index, section)) = completed.next().await {
            debug!(index, heading = %section.heading, "section finished");
            slots[index] = Some(section);
        }

        slots
            .into_iter()
            .zip(outline)
            .map(|(slot, entry)| slot.unwrap_or_else(|| Section::new(entry.heading.clone(), "")))
            .collect()
    }

    // Erro no rascunho deixa a seção vazia; erro ou edição em branco mantém
    // o rascunho.
    async fn draft_and_edit(&self, client: &impl Generator, entry: &OutlineEntry) -> Section {
        let heading = entry.heading.clone();

        let draft =
            match DraftAgent::expand(client, &heading, &entry.bullets, self.target_words).await {
                Ok(draft) => draft,
                Err(e) => {
                    warn!(heading = %heading, error = %e, "draft failed, leaving section empty");
                    return Section::new(heading, "");
                }
            };

        match EditorAgent::run(client, &draft).await {
            Ok(edited) if !edited.trim().is_empty() => Section::new(heading, edited),
            Ok(_) => {
                warn!(heading = %heading, "editor returned nothing, keeping draft");
                Section::new(heading, draft)
            }
            Err(e) => {
                warn!(heading = %heading, error = %e, "edit failed, keeping draft");
                Section::new(heading, draft)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;

    const BATCH: &str = "Write the full blog post";
    const BATCH_EDIT: &str = "Edit each of these blog sections";
    const EDIT: &str = "Edit the following blog section";

    fn outline(headings: &[&str]) -> Vec<OutlineEntry> {
        headings
            .iter()
            .map(|h| OutlineEntry::new(*h, &["point"]))
            .collect()
    }

    fn headings(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.heading.as_str()).collect()
    }

    #[tokio::test]
    async fn fallback_keeps_outline_order_despite_completion_order() {
        let client = ScriptedGenerator::new()
            .delay("heading: 'First'", 60)
            .delay("heading: 'Second'", 30);
        let pipeline = SectionPipeline::new(4);

        let sections = pipeline
            .fallback(&client, &outline(&["First", "Second", "Third"]))
            .await;

        assert_eq!(headings(&sections), vec!["First", "Second", "Third"]);
        for section in &sections {
            assert!(section.content.starts_with("echo: Edit the following"));
            assert!(section.content.contains(&format!("heading: '{}'", section.heading)));
        }
    }

    #[tokio::test]
    async fn fallback_of_empty_outline_is_empty() {
        let client = ScriptedGenerator::new();
        let sections = SectionPipeline::new(2).fallback(&client, &[]).await;
        assert!(sections.is_empty());
        assert_eq!(client.calls_matching(""), 0);
    }

    #[tokio::test]
    async fn fallback_runs_entries_concurrently_within_bound() {
        let client = ScriptedGenerator::new().delay("Write a 300-word section", 25);
        let pipeline = SectionPipeline::new(2);

        let sections = pipeline
            .fallback(&client, &outline(&["A", "B", "C", "D", "E"]))
            .await;

        assert_eq!(sections.len(), 5);
        assert_eq!(client.max_concurrency(), 2);
        assert_eq!(client.calls_matching(EDIT), 5);
        assert_eq!(client.calls_matching(""), 10);
    }

    #[tokio::test]
    async fn draft_failure_leaves_only_that_section_empty() {
        let client = ScriptedGenerator::new().fail(&["Write a 300-word", "heading: 'B'"]);
        let sections = SectionPipeline::new(3)
            .fallback(&client, &outline(&["A", "B", "C"]))
            .await;

        assert_eq!(headings(&sections), vec!["A", "B", "C"]);
        assert!(sections[1].content.is_empty());
        assert!(!sections[0].content.is_empty());
        assert!(!sections[2].content.is_empty());
    }

    #[tokio::test]
    async fn edit_failure_keeps_raw_draft() {
        let client = ScriptedGenerator::new()
            .fail(&[EDIT, "raw draft of B"])
            .reply(&["Write a 300-word", "heading: 'B'"], "raw draft of B");
        let sections = SectionPipeline::new(2)
            .fallback(&client, &outline(&["A", "B"]))
            .await;

        assert_eq!(sections[1], Section::new("B", "raw draft of B"));
        assert!(sections[0].content.starts_with("echo: Edit the following"));
    }

    #[tokio::test]
    async fn blank_edit_keeps_raw_draft() {
        let client = ScriptedGenerator::new()
            .reply(&[EDIT], "   ")
            .reply(&["Write a 300-word"], "the draft");
        let sections = SectionPipeline::new(1)
            .fallback(&client, &outline(&["Only"]))
            .await;
        assert_eq!(sections, vec![Section::new("Only", "the draft")]);
    }

    #[tokio::test]
    async fn batch_success_returns_edited_sections() {
        let client = ScriptedGenerator::new()
            .reply(
                &[BATCH_EDIT],
                r#"[{"heading":"A","content":"edited a"},{"heading":"B","content":"edited b"}]"#,
            )
            .reply(
                &[BATCH],
                r#"Here: [{"heading":"A","content":"draft a"},{"heading":"B","content":"draft b"}]"#,
            );
        let output = SectionPipeline::new(2)
            .run(&client, &outline(&["A", "B"]))
            .await;

        assert_eq!(output.strategy, SectionStrategy::Batch);
        assert_eq!(
            output.sections,
            vec![Section::new("A", "edited a"), Section::new("B", "edited b")]
        );
        assert_eq!(client.calls_matching("Write a 300-word"), 0);
    }

    #[tokio::test]
    async fn unparsable_batch_edit_keeps_unedited_sections() {
        let client = ScriptedGenerator::new()
            .reply(&[BATCH_EDIT], "I made it better but forgot the JSON")
            .reply(&[BATCH], r#"[{"title":"A","body":"draft a"}]"#);
        let output = SectionPipeline::new(2).run(&client, &outline(&["A"])).await;

        assert_eq!(output.strategy, SectionStrategy::Batch);
        assert_eq!(output.sections, vec![Section::new("A", "draft a")]);
    }

    #[tokio::test]
    async fn truncated_batch_edit_keeps_unedited_sections() {
        let client = ScriptedGenerator::new()
            .reply(&[BATCH_EDIT], r#"[{"heading":"A","content":"edited a"}]"#)
            .reply(
                &[BATCH],
                r#"[{"heading":"A","content":"draft a"},{"heading":"B","content":"draft b"},{"heading":"C","content":"draft c"}]"#,
            );
        let output = SectionPipeline::new(2)
            .run(&client, &outline(&["A", "B", "C"]))
            .await;

        assert_eq!(output.strategy, SectionStrategy::Batch);
        assert_eq!(
            output.sections,
            vec![
                Section::new("A", "draft a"),
                Section::new("B", "draft b"),
                Section::new("C", "draft c"),
            ]
        );
    }

    #[tokio::test]
    async fn failed_batch_edit_call_keeps_unedited_sections() {
        let client = ScriptedGenerator::new()
            .fail(&[BATCH_EDIT])
            .reply(&[BATCH], r#"[{"heading":"A","content":"draft a"}]"#);
        let output = SectionPipeline::new(2).run(&client, &outline(&["A"])).await;

        assert_eq!(output.strategy, SectionStrategy::Batch);
        assert_eq!(output.sections, vec![Section::new("A", "draft a")]);
    }

    #[tokio::test]
    async fn malformed_batch_falls_back_per_entry() {
        let client = ScriptedGenerator::new().reply(&[BATCH], "Sorry, here is some prose instead.");
        let output = SectionPipeline::new(2)
            .run(&client, &outline(&["A", "B", "C"]))
            .await;

        assert_eq!(output.strategy, SectionStrategy::Fallback);
        assert_eq!(headings(&output.sections), vec!["A", "B", "C"]);
        assert_eq!(client.calls_matching(BATCH_EDIT), 0);
    }

    #[tokio::test]
    async fn batch_generation_error_falls_back() {
        let client = ScriptedGenerator::new().fail(&[BATCH]);
        let output = SectionPipeline::new(2)
            .run(&client, &outline(&["A", "B"]))
            .await;

        assert_eq!(output.strategy, SectionStrategy::Fallback);
        assert_eq!(output.sections.len(), 2);
    }

    #[tokio::test]
    async fn empty_batch_array_falls_back() {
        let client = ScriptedGenerator::new().reply(&[BATCH], "[]");
        let output = SectionPipeline::new(2).run(&client, &outline(&["A"])).await;

        assert_eq!(output.strategy, SectionStrategy::Fallback);
        assert_eq!(headings(&output.sections), vec!["A"]);
    }

    #[tokio::test]
    async fn shorter_batch_reply_is_accepted() {
        let client = ScriptedGenerator::new()
            .reply(&[BATCH_EDIT], "no json")
            .reply(&[BATCH], r#"[{"heading":"A","content":"only one"}]"#);
        let output = SectionPipeline::new(2)
            .run(&client, &outline(&["A", "B"]))
            .await;

        assert_eq!(output.strategy, SectionStrategy::Batch);
        assert_eq!(output.sections.len(), 1);
    }

    #[test]
    fn worker_count_is_at_least_one() {
        assert_eq!(SectionPipeline::new(0).workers(), 1);
        assert_eq!(SectionPipeline::new(8).workers(), 8);
    }
}
