//! Orquestrador de jobs: sequencia os estágios e controla o ciclo de vida.
//!
//! O [`JobOrchestrator`] conduz cada job por research, outline, seções,
//! montagem e SEO, gravando o resultado de cada estágio no
//! [`SessionStore`] antes de iniciar o próximo. Pausa e retomada atuam nas
//! fronteiras entre estágios.

use tokio::sync::Notify;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::agents::{OutlineAgent, Outliner, ResearchAgent, SeoAgent, SeoWriter};
use crate::error::PipelineError;
use crate::generation::Generator;
use crate::job::{Job, JobResult, JobStatus, JobUpdate, Section, Stage};
use crate::pipeline::SectionPipeline;
use crate::scraper::Summarizer;
use crate::session::SessionStore;

/// Conduz jobs por research → outline → seções → montagem → SEO.
///
/// Um job pausado termina o estágio em que está e espera na fronteira até
/// ser retomado. Os colaboradores de outline e SEO são injetáveis via
/// [`with_collaborators`](Self::with_collaborators); [`new`](Self::new)
/// monta os padrões sobre o próprio gerador.
pub struct JobOrchestrator<G, S, O = OutlineAgent<G>, E = SeoAgent<G>> {
    // Backend usado pelo pipeline de seções.
    generator: G,
    // Capacidade de pesquisa das referências.
    summarizer: S,
    // Colaborador que produz o outline.
    outliner: O,
    // Colaborador que produz os metadados de SEO.
    seo: E,
    // Estado compartilhado de todos os jobs.
    sessions: SessionStore,
    // Estratégia de geração das seções.
    pipeline: SectionPipeline,
    // Acorda jobs parados em uma fronteira de estágio após um resume.
    resumed: Notify,
}

impl<G: Generator + Clone, S: Summarizer> JobOrchestrator<G, S> {
    /// Cria um orquestrador cujos colaboradores de outline e SEO usam
    /// clones de `generator`.
    pub fn new(generator: G, summarizer: S, workers: usize) -> Self {
        let outliner = OutlineAgent::new(generator.clone());
        let seo = SeoAgent::new(generator.clone());
        Self::with_collaborators(generator, summarizer, outliner, seo, workers)
    }
}

impl<G, S, O, E> JobOrchestrator<G, S, O, E>
where
    G: Generator,
    S: Summarizer,
    O: Outliner,
    E: SeoWriter,
{
    pub fn with_collaborators(
        generator: G,
        summarizer: S,
        outliner: O,
        seo: E,
        workers: usize,
    ) -> Self {
        Self {
            generator,
            summarizer,
            outliner,
            seo,
            sessions: SessionStore::new(),
            pipeline: SectionPipeline::new(workers),
            resumed: Notify::new(),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Executa um novo job até o fim e retorna o registro final.
    ///
    /// Falhas de outline e SEO encerram o job com
    /// [`PipelineError::Collaborator`]; a mensagem também fica no campo
    /// `error` do job.
    pub async fn start_job(
        &self,
        topic: &str,
        audience: &str,
        references: &[String],
    ) -> Result<Job, PipelineError> {
        let job_id = Uuid::new_v4().to_string();
        self.sessions.create(Job::new(&job_id, topic, audience))?;
        info!(
            job_id = %job_id,
            topic,
            audience,
            references = references.len(),
            workers = self.pipeline.workers(),
            "starting job"
        );

        match self.run_stages(&job_id, topic, audience, references).await {
            Ok(job) => {
                info!(job_id = %job_id, "job completed");
                Ok(job)
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "job stopped");
                self.sessions.update(
                    &job_id,
                    JobUpdate {
                        error: Some(e.to_string()),
                        ..Default::default()
                    },
                );
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        job_id: &str,
        topic: &str,
        audience: &str,
        references: &[String],
    ) -> Result<Job, PipelineError> {
        self.enter_stage(job_id, Stage::Research).await?;
        let research = ResearchAgent::run(&self.summarizer, references).await;
        self.sessions.update(
            job_id,
            JobUpdate {
                research: Some(research),
                ..Default::default()
            },
        );

        self.enter_stage(job_id, Stage::Outline).await?;
        let outline = self
            .outliner
            .outline(topic, audience)
            .await
            .map_err(|source| PipelineError::Collaborator {
                stage: Stage::Outline,
                source,
            })?;
        info!(job_id, entries = outline.len(), "outline ready");
        self.sessions.update(
            job_id,
            JobUpdate {
                outline: Some(outline.clone()),
                ..Default::default()
            },
        );

        self.enter_stage(job_id, Stage::Sections).await?;
        let output = self.pipeline.run(&self.generator, &outline).await;
        info!(job_id, sections = output.sections.len(), strategy = ?output.strategy, "sections ready");
        let content = assemble(&output.sections);
        self.sessions.update(
            job_id,
            JobUpdate {
                sections: Some(output.sections),
                strategy: Some(output.strategy),
                ..Default::default()
            },
        );

        self.enter_stage(job_id, Stage::Assembly).await?;
        self.sessions.update(
            job_id,
            JobUpdate {
                content: Some(content.clone()),
                ..Default::default()
            },
        );

        self.enter_stage(job_id, Stage::Seo).await?;
        let seo = self
            .seo
            .metadata(topic, &content)
            .await
            .map_err(|source| PipelineError::Collaborator {
                stage: Stage::Seo,
                source,
            })?;
        self.sessions.update(
            job_id,
            JobUpdate {
                seo: Some(seo),
                ..Default::default()
            },
        );

        self.complete(job_id).await
    }

    // Espera a pausa terminar e registra o novo estágio.
    async fn enter_stage(&self, job_id: &str, stage: Stage) -> Result<(), PipelineError> {
        self.wait_while_paused(job_id).await?;
        debug!(job_id, %stage, "entering stage");
        self.sessions.update(job_id, JobUpdate::stage(stage));
        Ok(())
    }

    /// Marca o job como concluído com o snapshot do resultado, respeitando
    /// uma pausa pendente.
    async fn complete(&self, job_id: &str) -> Result<Job, PipelineError> {
        loop {
            self.wait_while_paused(job_id).await?;
            let finished = self
                .sessions
                .modify(job_id, |job| match job.status {
                    status if status.is_terminal() => Some(job.clone()),
                    JobStatus::Paused => None,
                    _ => {
                        JobUpdate::stage(Stage::Done).apply(job);
                        let result = JobResult::from_job(job);
                        JobUpdate {
                            status: Some(JobStatus::Completed),
                            result: Some(result),
                            ..Default::default()
                        }
                        .apply(job);
                        Some(job.clone())
                    }
                })
                .ok_or_else(|| PipelineError::JobNotFound(job_id.to_string()))?;
            if let Some(job) = finished {
                return Ok(job);
            }
        }
    }

    // Retorna quando o job não está pausado. O waiter é registrado antes da
    // leitura do status para não perder um resume concorrente.
    async fn wait_while_paused(&self, job_id: &str) -> Result<(), PipelineError> {
        loop {
            let resumed = self.resumed.notified();
            tokio::pin!(resumed);
            resumed.as_mut().enable();

            let job = self.get_job(job_id)?;
            if job.status != JobStatus::Paused {
                return Ok(());
            }
            debug!(job_id, stage = %job.stage, "job paused, holding next stage");
            resumed.await;
        }
    }

    /// Pausa um job em execução. O trabalho em andamento termina; o próximo
    /// estágio espera por [`resume_job`](Self::resume_job). Em qualquer
    /// outro status o job volta inalterado.
    pub fn pause_job(&self, job_id: &str) -> Result<Job, PipelineError> {
        self.sessions
            .modify(job_id, |job| {
                if job.status.can_transition_to(JobStatus::Paused) {
                    JobUpdate::status(JobStatus::Paused).apply(job);
                    info!(job_id, stage = %job.stage, "paused job");
                } else {
                    warn!(
                        job_id,
                        status = %job.status,
                        terminal = job.status.is_terminal(),
                        "pause ignored"
                    );
                }
                job.clone()
            })
            .ok_or_else(|| PipelineError::JobNotFound(job_id.to_string()))
    }

    /// Retoma um job pausado. Qualquer outro status volta inalterado.
    pub fn resume_job(&self, job_id: &str) -> Result<Job, PipelineError> {
        let job = self
            .sessions
            .modify(job_id, |job| {
                if job.status == JobStatus::Paused {
                    JobUpdate::status(JobStatus::Running).apply(job);
                    info!(job_id, "resumed job");
                }
                job.clone()
            })
            .ok_or_else(|| PipelineError::JobNotFound(job_id.to_string()))?;
        self.resumed.notify_waiters();
        Ok(job)
    }

    /// Snapshot do job, ou [`PipelineError::JobNotFound`].
    pub fn get_job(&self, job_id: &str) -> Result<Job, PipelineError> {
        self.sessions
            .get(job_id)
            .ok_or_else(|| PipelineError::JobNotFound(job_id.to_string()))
    }

    /// IDs de todos os jobs conhecidos, sem ordem garantida.
    pub fn list_jobs(&self) -> Vec<String> {
        self.sessions.list()
    }
}

/// Junta as seções em blocos `## heading` separados por linha em branco.
pub fn assemble(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| format!("## {}\n\n{}", s.heading, s.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
