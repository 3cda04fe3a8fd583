//! "Register model" form: validation and translation into the artifact the
//! backend stores.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::error::{DashboardError, Result};

const KEY_MAX_LEN: usize = 253;
const DESCRIPTION_MAX_LEN: usize = 500;
const TAG_MAX_LEN: usize = 63;

pub const SUCCESS_MESSAGE: &str = "Model initiated successfully";
pub const FAILURE_MESSAGE: &str = "Model failed to initiate";

/// Storage scheme offered in front of the target path in demo mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathScheme {
	Store,
	V3io,
	S3,
	Gs,
	Az,
	Http,
	Https,
}

impl PathScheme {
	pub const ALL: [PathScheme; 7] = [
		PathScheme::Store,
		PathScheme::V3io,
		PathScheme::S3,
		PathScheme::Gs,
		PathScheme::Az,
		PathScheme::Http,
		PathScheme::Https,
	];

	pub fn prefix(self) -> &'static str {
		match self {
			PathScheme::Store => "store://",
			PathScheme::V3io => "v3io:///",
			PathScheme::S3 => "s3://",
			PathScheme::Gs => "gs://",
			PathScheme::Az => "az://",
			PathScheme::Http => "http://",
			PathScheme::Https => "https://",
		}
	}

	/// Inverse of [`PathScheme::prefix`], used by the scheme `<select>`.
	pub fn from_prefix(prefix: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|scheme| scheme.prefix() == prefix)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetPath {
	pub scheme: Option<PathScheme>,
	pub path: String,
}

impl TargetPath {
	pub fn full_path(&self) -> String {
		let path = self.path.trim();
		match self.scheme {
			Some(scheme) => format!("{}{path}", scheme.prefix()),
			None => path.to_string(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Label {
	pub key: String,
	pub value: String,
}

/// What the user typed into the modal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterModelForm {
	pub key: String,
	pub description: String,
	pub target_path: TargetPath,
	pub labels: Vec<Label>,
}

impl RegisterModelForm {
	/// First problem found, if any.
	pub fn validate(&self) -> Result<()> {
		let key = self.key.trim();
		if key.is_empty() {
			return Err(DashboardError::validation("metadata.key", "Name is required"));
		}
		if key.len() > KEY_MAX_LEN {
			return Err(DashboardError::validation(
				"metadata.key",
				format!("Name must be at most {KEY_MAX_LEN} characters"),
			));
		}
		if !is_key_like(key) {
			return Err(DashboardError::validation(
				"metadata.key",
				"Valid characters: a-z, 0-9, -, _, . and must begin and end with a letter or digit",
			));
		}
		if self.description.chars().count() > DESCRIPTION_MAX_LEN {
			return Err(DashboardError::validation(
				"metadata.description",
				format!("Description must be at most {DESCRIPTION_MAX_LEN} characters"),
			));
		}
		if self.target_path.path.trim().is_empty() {
			return Err(DashboardError::validation("spec.target_path", "Target path is required"));
		}

		let mut seen = HashSet::new();
		for label in &self.labels {
			for part in [&label.key, &label.value] {
				if part.len() > TAG_MAX_LEN || !is_tag_like(part) {
					return Err(DashboardError::validation(
						"metadata.labels",
						format!("Invalid label `{}: {}`", label.key, label.value),
					));
				}
			}
			if !seen.insert(label.key.as_str()) {
				return Err(DashboardError::validation(
					"metadata.labels",
					format!("Duplicate label key `{}`", label.key),
				));
			}
		}
		Ok(())
	}
}

fn is_key_like(s: &str) -> bool {
	is_tag_like(s) && !s.chars().any(|c| c.is_ascii_uppercase())
}

fn is_tag_like(s: &str) -> bool {
	let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
	edge_ok(s.chars().next())
		&& edge_ok(s.chars().last())
		&& s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Artifact body sent to the backend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelArtifact {
	pub kind: String,
	pub metadata: ArtifactMetadata,
	pub project: String,
	pub spec: ArtifactSpec,
	pub status: BTreeMap<String, String>,
	pub uid: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArtifactMetadata {
	pub key: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub labels: BTreeMap<String, String>,
	pub project: String,
	pub tree: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArtifactSpec {
	pub db_key: String,
	pub producer: Producer,
	pub target_path: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub model_file: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Producer {
	pub kind: String,
	pub uri: String,
}

/// Validate `form` and build the artifact registered under `project`.
///
/// `uid` doubles as the artifact tree. `host` identifies the producer.
pub fn build_model_artifact(form: &RegisterModelForm, project: &str, uid: Uuid, host: &str) -> Result<ModelArtifact> {
	form.validate()?;

	let uid = uid.to_string();
	let key = form.key.trim().to_string();
	let (target_path, model_file) = split_target_path(&form.target_path.full_path());
	let description = Some(form.description.trim().to_string()).filter(|d| !d.is_empty());

	Ok(ModelArtifact {
		kind: "model".into(),
		metadata: ArtifactMetadata {
			key: key.clone(),
			description,
			labels: form
				.labels
				.iter()
				.map(|label| (label.key.clone(), label.value.clone()))
				.collect(),
			project: project.to_string(),
			tree: uid.clone(),
		},
		project: project.to_string(),
		spec: ArtifactSpec {
			db_key: key,
			producer: Producer {
				kind: "api".into(),
				uri: host.to_string(),
			},
			target_path,
			model_file,
		},
		status: BTreeMap::new(),
		uid,
	})
}

/// `dir/model.pkl` becomes (`dir/`, `model.pkl`). Paths without a `/` stay whole.
fn split_target_path(path: &str) -> (String, Option<String>) {
	match path.rfind('/') {
		Some(idx) => {
			let file = &path[idx + 1..];
			(
				path[..=idx].to_string(),
				Some(file.to_string()).filter(|f| !f.is_empty()),
			)
		}
		None => (path.to_string(), None),
	}
}

/// Status, message and retry flag for the notification after a registration attempt.
pub fn registration_notice(result: &Result<u16>) -> (u16, &'static str, bool) {
	match result {
		Ok(status) => (*status, SUCCESS_MESSAGE, false),
		Err(_) => (400, FAILURE_MESSAGE, true),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn form() -> RegisterModelForm {
		RegisterModelForm {
			key: "churn-model".into(),
			description: "  weekly retrain  ".into(),
			target_path: TargetPath {
				scheme: None,
				path: "s3://models/churn/model.pkl".into(),
			},
			labels: vec![Label {
				key: "team".into(),
				value: "risk".into(),
			}],
		}
	}

	fn uid() -> Uuid {
		Uuid::parse_str("6f1c1f6e-3a5b-4b44-9a3b-0d1f6f0c2a11").unwrap()
	}

	#[test]
	fn builds_artifact_body() {
		let artifact = build_model_artifact(&form(), "fraud", uid(), "dashboard.local:8080").unwrap();
		let body = serde_json::to_value(&artifact).unwrap();

		assert_eq!(body["kind"], "model");
		assert_eq!(body["uid"], uid().to_string());
		assert_eq!(body["project"], "fraud");
		assert_eq!(body["metadata"]["key"], "churn-model");
		assert_eq!(body["metadata"]["tree"], uid().to_string());
		assert_eq!(body["metadata"]["description"], "weekly retrain");
		assert_eq!(body["metadata"]["labels"]["team"], "risk");
		assert_eq!(body["spec"]["db_key"], "churn-model");
		assert_eq!(body["spec"]["producer"]["kind"], "api");
		assert_eq!(body["spec"]["producer"]["uri"], "dashboard.local:8080");
		assert_eq!(body["spec"]["target_path"], "s3://models/churn/");
		assert_eq!(body["spec"]["model_file"], "model.pkl");
		assert_eq!(body["status"], serde_json::json!({}));
	}

	#[test]
	fn path_without_slash_is_kept_whole() {
		let mut f = form();
		f.target_path.path = "model.pkl".into();
		f.description.clear();
		let artifact = build_model_artifact(&f, "p", uid(), "h").unwrap();
		assert_eq!(artifact.spec.target_path, "model.pkl");
		assert_eq!(artifact.spec.model_file, None);
		assert_eq!(artifact.metadata.description, None);
	}

	#[test]
	fn scheme_prefix_is_prepended() {
		let mut f = form();
		f.target_path = TargetPath {
			scheme: Some(PathScheme::V3io),
			path: "projects/models/m.onnx".into(),
		};
		let artifact = build_model_artifact(&f, "p", uid(), "h").unwrap();
		assert_eq!(artifact.spec.target_path, "v3io:///projects/models/");
		assert_eq!(artifact.spec.model_file.as_deref(), Some("m.onnx"));
		assert_eq!(PathScheme::from_prefix("v3io:///"), Some(PathScheme::V3io));
	}

	#[test]
	fn trailing_slash_has_no_model_file() {
		assert_eq!(split_target_path("s3://bucket/"), ("s3://bucket/".to_string(), None));
	}

	#[test]
	fn validation_failures() {
		let field_of = |f: RegisterModelForm| match f.validate() {
			Err(DashboardError::Validation { field, .. }) => field,
			other => panic!("expected validation error, got {other:?}"),
		};

		let mut f = form();
		f.key = "  ".into();
		assert_eq!(field_of(f), "metadata.key");

		let mut f = form();
		f.key = "-starts-with-dash".into();
		assert_eq!(field_of(f), "metadata.key");

		let mut f = form();
		f.key = "ChurnModel".into();
		assert_eq!(field_of(f), "metadata.key");

		let mut f = form();
		f.description = "x".repeat(501);
		assert_eq!(field_of(f), "metadata.description");

		let mut f = form();
		f.target_path.path.clear();
		assert_eq!(field_of(f), "spec.target_path");

		let mut f = form();
		f.labels.push(Label {
			key: "team".into(),
			value: "ops".into(),
		});
		assert_eq!(field_of(f), "metadata.labels");

		let mut f = form();
		f.labels[0].value = "has space".into();
		assert_eq!(field_of(f), "metadata.labels");
	}

	#[test]
	fn labels_may_use_uppercase() {
		let mut f = form();
		f.labels[0].value = "Risk-Team".into();
		assert!(f.validate().is_ok());
	}

	#[test]
	fn invalid_form_builds_nothing() {
		let mut f = form();
		f.key.clear();
		assert!(build_model_artifact(&f, "p", uid(), "h").is_err());
	}

	#[test]
	fn notices() {
		assert_eq!(registration_notice(&Ok(201)), (201, SUCCESS_MESSAGE, false));
		let failed = Err(DashboardError::Status {
			status: 500,
			url: "u".into(),
		});
		assert_eq!(registration_notice(&failed), (400, FAILURE_MESSAGE, true));
	}
}
