//! Backend REST client.

use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::artifacts::{ModelArtifact, ModelSummary};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::routes::encode_segment;
use crate::workflow::{JobSummary, Workflow};

/// JSON client for the pipelines backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: String,
	http: reqwest::Client,
}

impl ApiClient {
	/// `base_url` must be absolute, e.g. `https://host/api/v1`.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into().trim_end_matches('/').to_string(),
			http: reqwest::Client::new(),
		}
	}

	/// Client for the configured base URL, resolved against the page origin
	/// when it is relative.
	pub fn from_config(config: &DashboardConfig) -> Self {
		let origin = web_sys::window().and_then(|w| w.location().origin().ok());
		Self::new(absolute_base(&config.api_base_url, origin.as_deref()))
	}

	/// The absolute API root, without a trailing `/`.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Workflow graph and run metadata of `workflow_id`.
	pub async fn fetch_workflow(&self, project: &str, workflow_id: &str) -> Result<Workflow> {
		self.get_json(&self.workflow_url(project, workflow_id)).await
	}

	/// Every run of `project`, newest first as the server orders them.
	pub async fn fetch_runs(&self, project: &str) -> Result<Vec<JobSummary>> {
		let response: RunsResponse = self.get_json(&self.project_url(project, "runs")).await?;
		Ok(response.runs.into_iter().map(JobSummary::from).collect())
	}

	/// Model artifacts registered in `project`.
	pub async fn fetch_models(&self, project: &str) -> Result<Vec<ModelSummary>> {
		let url = format!("{}?category=model", self.project_url(project, "artifacts"));
		let response: ArtifactsResponse = self.get_json(&url).await?;
		Ok(response.artifacts.into_iter().map(ModelSummary::from).collect())
	}

	/// Store `artifact`, returning the response status.
	pub async fn register_artifact(&self, project: &str, artifact: &ModelArtifact) -> Result<u16> {
		let url = self.artifact_url(project, artifact);
		debug!("POST {url}");
		let response = self.http.post(&url).json(artifact).send().await?;
		let status = response.status().as_u16();
		if !response.status().is_success() {
			return Err(DashboardError::Status { status, url });
		}
		Ok(status)
	}

	fn project_url(&self, project: &str, resource: &str) -> String {
		format!("{}/projects/{}/{resource}", self.base_url, encode_segment(project))
	}

	fn workflow_url(&self, project: &str, workflow_id: &str) -> String {
		format!("{}/{}", self.project_url(project, "pipelines"), encode_segment(workflow_id))
	}

	fn artifact_url(&self, project: &str, artifact: &ModelArtifact) -> String {
		format!(
			"{}/{}/{}",
			self.project_url(project, "artifacts"),
			encode_segment(&artifact.uid),
			encode_segment(&artifact.metadata.key)
		)
	}

	async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
		debug!("GET {url}");
		let response = self.http.get(url).send().await?;
		if !response.status().is_success() {
			return Err(DashboardError::Status {
				status: response.status().as_u16(),
				url: url.to_string(),
			});
		}
		let body = response.text().await?;
		Ok(serde_json::from_str(&body)?)
	}
}

fn absolute_base(base: &str, origin: Option<&str>) -> String {
	match origin {
		Some(origin) if base.starts_with('/') => format!("{}{base}", origin.trim_end_matches('/')),
		_ => base.to_string(),
	}
}

#[derive(Debug, Default, Deserialize)]
struct RunsResponse {
	#[serde(default)]
	runs: Vec<RunRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct RunRecord {
	#[serde(default)]
	metadata: RunMetadata,
	#[serde(default)]
	status: RunStatus,
}

#[derive(Debug, Default, Deserialize)]
struct RunMetadata {
	#[serde(default)]
	uid: String,
	#[serde(default)]
	name: String,
}

#[derive(Debug, Default, Deserialize)]
struct RunStatus {
	state: Option<String>,
	start_time: Option<String>,
}

impl From<RunRecord> for JobSummary {
	fn from(run: RunRecord) -> Self {
		JobSummary {
			uid: run.metadata.uid,
			name: run.metadata.name,
			state: run.status.state,
			started_at: run.status.start_time,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct ArtifactsResponse {
	#[serde(default)]
	artifacts: Vec<ArtifactRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct ArtifactRecord {
	#[serde(default)]
	metadata: ArtifactRecordMetadata,
	#[serde(default)]
	spec: ArtifactRecordSpec,
}

#[derive(Debug, Default, Deserialize)]
struct ArtifactRecordMetadata {
	#[serde(default)]
	key: String,
	#[serde(default)]
	tree: String,
	description: Option<String>,
	#[serde(default)]
	labels: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct ArtifactRecordSpec {
	target_path: Option<String>,
}

impl From<ArtifactRecord> for ModelSummary {
	fn from(record: ArtifactRecord) -> Self {
		ModelSummary {
			key: record.metadata.key,
			tree: record.metadata.tree,
			description: record.metadata.description,
			target_path: record.spec.target_path,
			labels: record.metadata.labels,
		}
	}
}
