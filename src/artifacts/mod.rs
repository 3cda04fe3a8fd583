//! Model artifact registration.

pub mod listing;
pub mod register_model;

pub use listing::ModelSummary;

pub use register_model::{
	Label, ModelArtifact, PathScheme, RegisterModelForm, TargetPath, build_model_artifact,
	registration_notice,
};
