//! Modelo de dados dos jobs: registros, status e estágios.

mod record;
mod state;

pub use record::{
    Citation, Job, JobResult, JobUpdate, OutlineEntry, Research, Section, SectionStrategy,
    SeoMetadata,
};
pub use state::{JobStatus, Stage};
