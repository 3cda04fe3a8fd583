//! Server-side workflow data as the dashboard receives it.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// How a step was executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunType {
	/// Deploys a function; the node links to the function, not a run.
	Deploy,
	/// Executes a function as a run.
	Run,
	/// Anything the dashboard does not treat specially (build, local, ...).
	#[serde(other)]
	Other,
}

/// An executable pipeline step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepJob {
	pub id: String,
	pub name: String,
	/// Function reference, `<project>/<name>@<hash>`.
	pub function: Option<String>,
	pub run_uid: Option<String>,
	pub run_type: Option<RunType>,
	pub children: Vec<String>,
}

/// A sub-DAG grouping other jobs. Never drawn itself.
#[derive(Clone, Debug, PartialEq)]
pub struct DagContainer {
	pub id: String,
	pub name: String,
	pub children: Vec<String>,
}

/// One entry of a workflow graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawJob", into = "RawJob")]
pub enum JobNode {
	/// An executable step.
	Step(StepJob),
	/// A container of other jobs.
	Dag(DagContainer),
}

impl JobNode {
	/// Job id, unique within its graph.
	pub fn id(&self) -> &str {
		match self {
			JobNode::Step(step) => &step.id,
			JobNode::Dag(dag) => &dag.id,
		}
	}

	/// Ordered child job ids.
	pub fn children(&self) -> &[String] {
		match self {
			JobNode::Step(step) => &step.children,
			JobNode::Dag(dag) => &dag.children,
		}
	}

	/// The step payload, `None` for containers.
	pub fn as_step(&self) -> Option<&StepJob> {
		match self {
			JobNode::Step(step) => Some(step),
			JobNode::Dag(_) => None,
		}
	}
}

/// Wire shape of a job: a flat object discriminated by `type`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct RawJob {
	#[serde(default)]
	id: String,
	#[serde(rename = "type", default)]
	kind: String,
	#[serde(default)]
	name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	function: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	run_uid: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	run_type: Option<RunType>,
	#[serde(default)]
	children: Vec<String>,
}

const DAG_KIND: &str = "DAG";
const STEP_KIND: &str = "STEP";

impl From<RawJob> for JobNode {
	fn from(raw: RawJob) -> Self {
		if raw.kind == DAG_KIND {
			return JobNode::Dag(DagContainer {
				id: raw.id,
				name: raw.name,
				children: raw.children,
			});
		}
		JobNode::Step(StepJob {
			id: raw.id,
			name: raw.name,
			function: raw.function.filter(|f| !f.is_empty()),
			run_uid: raw.run_uid.filter(|uid| !uid.is_empty()),
			run_type: raw.run_type,
			children: raw.children,
		})
	}
}

impl From<JobNode> for RawJob {
	fn from(job: JobNode) -> Self {
		match job {
			JobNode::Dag(dag) => RawJob {
				id: dag.id,
				kind: DAG_KIND.into(),
				name: dag.name,
				children: dag.children,
				..Default::default()
			},
			JobNode::Step(step) => RawJob {
				id: step.id,
				kind: STEP_KIND.into(),
				name: step.name,
				function: step.function,
				run_uid: step.run_uid,
				run_type: step.run_type,
				children: step.children,
			},
		}
	}
}

/// Job id to job. Iterates in ascending id order, which is the canonical
/// order for everything derived from it.
pub type WorkflowGraph = BTreeMap<String, JobNode>;

/// Run-level metadata of a workflow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
}

/// A fetched workflow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
	#[serde(default)]
	pub run: WorkflowRun,
	#[serde(default)]
	pub graph: WorkflowGraph,
}

impl Workflow {
	/// Run uids of every step that has one.
	pub fn run_uids(&self) -> HashSet<String> {
		self.graph
			.values()
			.filter_map(JobNode::as_step)
			.filter_map(|step| step.run_uid.clone())
			.collect()
	}
}

/// One row of the project's flat run listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
	pub uid: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub started_at: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	const WORKFLOW_JSON: &str = r#"{
		"run": {"id": "wf-1", "name": "training-pipeline"},
		"graph": {
			"root": {"id": "root", "type": "DAG", "name": "root", "children": ["prep"]},
			"prep": {"id": "prep", "type": "STEP", "name": "prep-data",
			         "function": "proj/prep@aa11", "run_uid": "uid-prep",
			         "run_type": "run", "children": ["serve"]},
			"serve": {"id": "serve", "type": "STEP", "name": "deploy",
			          "function": "proj/server@bb22", "run_type": "deploy",
			          "run_uid": "", "children": []},
			"odd": {"id": "odd", "type": "STEP", "name": "odd", "run_type": "build"}
		}
	}"#;

	#[test]
	fn decodes_tagged_jobs() {
		let workflow: Workflow = serde_json::from_str(WORKFLOW_JSON).unwrap();
		assert_eq!(workflow.run.name, "training-pipeline");
		assert!(matches!(workflow.graph["root"], JobNode::Dag(_)));

		let serve = workflow.graph["serve"].as_step().unwrap();
		assert_eq!(serve.run_type, Some(RunType::Deploy));
		assert_eq!(serve.run_uid, None, "empty uid is treated as absent");

		let odd = workflow.graph["odd"].as_step().unwrap();
		assert_eq!(odd.run_type, Some(RunType::Other));
		assert!(odd.children.is_empty());
	}

	#[test]
	fn graph_iterates_in_id_order() {
		let workflow: Workflow = serde_json::from_str(WORKFLOW_JSON).unwrap();
		let ids: Vec<&str> = workflow.graph.keys().map(String::as_str).collect();
		assert_eq!(ids, ["odd", "prep", "root", "serve"]);
	}

	#[test]
	fn run_uids_skip_missing() {
		let workflow: Workflow = serde_json::from_str(WORKFLOW_JSON).unwrap();
		assert_eq!(workflow.run_uids(), HashSet::from(["uid-prep".to_string()]));
	}

	#[test]
	fn serializes_back_to_wire_shape() {
		let workflow: Workflow = serde_json::from_str(WORKFLOW_JSON).unwrap();
		let value = serde_json::to_value(&workflow.graph["root"]).unwrap();
		assert_eq!(value["type"], "DAG");
		assert_eq!(value["children"][0], "prep");
		assert!(value.get("run_uid").is_none());
	}
}
