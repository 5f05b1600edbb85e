//! Registros de um job e atualizações parciais aplicadas a ele.
//!
//! O [`Job`] acumula o resultado de cada estágio; o [`JobUpdate`] é a forma
//! única de alterá-lo; o [`JobResult`] é o snapshot gravado na conclusão.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::{JobStatus, Stage};

/// Uma seção planejada: heading mais os pontos que ela deve cobrir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub heading: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl OutlineEntry {
    pub fn new(heading: impl Into<String>, bullets: &[&str]) -> Self {
        Self {
            heading: heading.into(),
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
        }
    }
}

/// Uma seção gerada. `content` fica vazio quando a geração falhou de vez.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub content: String,
}

impl Section {
    pub fn new(heading: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            content: content.into(),
        }
    }
}

/// Resumo de uma referência e a URL de onde veio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub url: String,
    pub summary: String,
}

/// Agregado dos resumos de referência reunidos para um job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Research {
    pub research_summary: String,
    pub citations: Vec<Citation>,
}

impl Research {
    /// Monta o agregado; o resumo geral junta os resumos com `\n`.
    pub fn from_citations(citations: Vec<Citation>) -> Self {
        let research_summary = citations
            .iter()
            .map(|c| c.summary.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            research_summary,
            citations,
        }
    }
}

/// Metadados de busca do artigo final.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMetadata {
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: Vec<String>,
}

/// Estratégia que produziu as seções de um job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStrategy {
    /// Uma chamada para todas as seções, mais uma edição em lote.
    Batch,
    /// Rascunho e edição por entrada, em paralelo limitado.
    Fallback,
}

/// Uma execução do pipeline de conteúdo, como mantida no session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Identificador único (UUID v4 quando criado pelo orquestrador).
    pub id: String,
    /// Status atual do ciclo de vida.
    pub status: JobStatus,
    /// Estágio atual do pipeline.
    pub stage: Stage,
    /// Estágios já deixados para trás, em ordem.
    pub stage_history: Vec<Stage>,
    pub topic: String,
    pub audience: String,
    /// Agregado da pesquisa, presente após o estágio RESEARCH.
    pub research: Option<Research>,
    pub outline: Vec<OutlineEntry>,
    pub sections: Vec<Section>,
    /// Estratégia usada no estágio SECTIONS.
    pub strategy: Option<SectionStrategy>,
    /// Documento montado a partir das seções.
    pub content: String,
    pub seo: Option<SeoMetadata>,
    /// Snapshot final; presente somente em jobs concluídos.
    pub result: Option<JobResult>,
    /// Mensagem da falha de colaborador que parou o job, se houver.
    pub error: Option<String>,
    /// Timestamp de criação (UTC).
    pub created_at: DateTime<Utc>,
    /// Timestamp da última alteração (UTC).
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Cria um job em `Running`, no estágio `Created`.
    pub fn new(id: impl Into<String>, topic: impl Into<String>, audience: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: JobStatus::Running,
            stage: Stage::Created,
            stage_history: Vec::new(),
            topic: topic.into(),
            audience: audience.into(),
            research: None,
            outline: Vec::new(),
            sections: Vec::new(),
            strategy: None,
            content: String::new(),
            seo: None,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Conjunto parcial de campos mesclado em um [`Job`].
///
/// `None` deixa o campo intacto. Campos são substituídos por inteiro, nunca
/// editados no lugar.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub stage: Option<Stage>,
    pub research: Option<Research>,
    pub outline: Option<Vec<OutlineEntry>>,
    pub sections: Option<Vec<Section>>,
    pub strategy: Option<SectionStrategy>,
    pub content: Option<String>,
    pub seo: Option<SeoMetadata>,
    pub result: Option<JobResult>,
    pub error: Option<String>,
}

impl JobUpdate {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn stage(stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            ..Default::default()
        }
    }

    /// Mescla em `job`. Gravar `result` também marca o job como concluído.
    pub fn apply(self, job: &mut Job) {
        if let Some(stage) = self.stage
            && stage != job.stage
        {
            job.stage_history.push(job.stage);
            job.stage = stage;
        }
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(research) = self.research {
            job.research = Some(research);
        }
        if let Some(outline) = self.outline {
            job.outline = outline;
        }
        if let Some(sections) = self.sections {
            job.sections = sections;
        }
        if let Some(strategy) = self.strategy {
            job.strategy = Some(strategy);
        }
        if let Some(content) = self.content {
            job.content = content;
        }
        if let Some(seo) = self.seo {
            job.seo = Some(seo);
        }
        if let Some(error) = self.error {
            job.error = Some(error);
        }
        if let Some(result) = self.result {
            job.status = JobStatus::Completed;
            job.result = Some(result);
        }
        job.updated_at = Utc::now();
    }
}

/// Snapshot de tudo que um job produziu, gravado na conclusão.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: String,
    pub topic: String,
    pub audience: String,
    pub research: Option<Research>,
    pub outline: Vec<OutlineEntry>,
    pub sections: Vec<Section>,
    pub strategy: Option<SectionStrategy>,
    pub content: String,
    pub seo: Option<SeoMetadata>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Duração total do job, de `started_at` a `completed_at`.
    pub duration_ms: i64,
}

impl JobResult {
    pub fn from_job(job: &Job) -> Self {
        let now = Utc::now();
        let duration = now - job.created_at;
        Self {
            job_id: job.id.clone(),
            topic: job.topic.clone(),
            audience: job.audience.clone(),
            research: job.research.clone(),
            outline: job.outline.clone(),
            sections: job.sections.clone(),
            strategy: job.strategy,
            content: job.content.clone(),
            seo: job.seo.clone(),
            started_at: job.created_at,
            completed_at: now,
            duration_ms: duration.num_milliseconds(),
        }
    }
}
