//! Colaboradores construídos sobre as capacidades de geração e pesquisa.
//!
//! Outline e SEO são instâncias injetáveis no orquestrador (traits
//! [`Outliner`] e [`SeoWriter`]). Rascunho e edição são usados apenas pelo
//! pipeline de seções e recebem o backend a cada chamada.

mod draft;
mod editor;
mod outline;
mod research;
mod seo;

pub use draft::{DEFAULT_TARGET_WORDS, DraftAgent};
pub use editor::EditorAgent;
pub use outline::{OutlineAgent, Outliner, default_outline, parse_outline};
pub use research::ResearchAgent;
pub use seo::{META_DESCRIPTION_MAX_CHARS, SeoAgent, SeoWriter, parse_seo};
