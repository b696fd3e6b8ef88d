//! Request handling for sample metadata intake.
//!
//! One request is one upload or one grid submission. Every stage appends to
//! the request's [`mgm_model::Report`], so the caller sees all problems at
//! once; only fatal problems stop the pipeline early.

mod context;
mod pipeline;

pub use context::RequestContext;
pub use pipeline::{Outcome, SaveArtifact, build_artifact, process_form, process_upload};
