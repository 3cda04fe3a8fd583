//! State behind the workflow page.
//!
//! The controller performs no I/O. [`WorkflowController::request_fetch`]
//! hands out a [`FetchTicket`]; the caller runs the request and reports back
//! through [`WorkflowController::complete_fetch`]. Only the most recent
//! ticket is honoured, so responses for a workflow the user already left are
//! dropped.

use std::collections::HashSet;

use log::{debug, info, warn};

use super::graph_builder;
use super::layout::LayoutEngine;
use super::jobs::filter_jobs_content;
use super::model::{JobNode, JobSummary, RunType, Workflow};
use super::selection::{DetailTarget, Selection};
use super::types::GraphElements;
use crate::error::Result;
use crate::yaml::YamlView;

/// Whether the workflow shows as a graph or as a table of runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
	/// DAG drawing.
	#[default]
	Graph,
	/// Table of the workflow's runs.
	List,
}

impl ViewMode {
	/// The other mode.
	pub fn toggled(self) -> Self {
		match self {
			ViewMode::Graph => ViewMode::List,
			ViewMode::List => ViewMode::Graph,
		}
	}
}

/// Permission to fetch one workflow. Stale once a newer ticket is issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
	/// Workflow to request.
	pub workflow_id: String,
	generation: u64,
}

/// Progress of the current workflow's fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
	/// Nothing in flight.
	#[default]
	Idle,
	/// Waiting on the request this ticket was issued for.
	Loading(FetchTicket),
	/// Last fetch failed; nothing is refetched until [`WorkflowController::retry`].
	Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
struct LoadedWorkflow {
	workflow_id: String,
	workflow: Workflow,
	run_uids: HashSet<String>,
}

/// Loaded workflow, fetch state, view mode and YAML panel of one page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkflowController {
	workflow_id: Option<String>,
	loaded: Option<LoadedWorkflow>,
	load: LoadState,
	generation: u64,
	view_mode: ViewMode,
	yaml: YamlView,
}

impl WorkflowController {
	/// Empty controller starting in `view_mode`.
	pub fn new(view_mode: ViewMode) -> Self {
		Self {
			view_mode,
			..Self::default()
		}
	}

	/// Point the controller at `workflow_id`, fetching it if needed.
	///
	/// A different id invalidates any fetch still in flight. The previous
	/// graph stays on screen until the new one arrives.
	pub fn set_workflow_id(&mut self, workflow_id: &str) -> Option<FetchTicket> {
		if self.workflow_id.as_deref() != Some(workflow_id) {
			debug!("workflow changed to `{workflow_id}`");
			self.workflow_id = Some(workflow_id.to_string());
			self.generation += 1;
			self.load = LoadState::Idle;
			self.yaml.hide();
		}
		self.request_fetch()
	}

	/// A ticket if the current workflow is neither loaded, loading, nor failed.
	pub fn request_fetch(&mut self) -> Option<FetchTicket> {
		let workflow_id = self.workflow_id.clone()?;
		if self.is_loaded() || self.load != LoadState::Idle {
			return None;
		}
		self.generation += 1;
		let ticket = FetchTicket {
			workflow_id,
			generation: self.generation,
		};
		info!("fetching workflow `{}`", ticket.workflow_id);
		self.load = LoadState::Loading(ticket.clone());
		Some(ticket)
	}

	/// Apply a fetch result. Returns `false` when the ticket was stale and
	/// the result dropped.
	pub fn complete_fetch(&mut self, ticket: &FetchTicket, result: Result<Workflow>) -> bool {
		if !matches!(&self.load, LoadState::Loading(current) if current == ticket) {
			debug!("discarding stale response for workflow `{}`", ticket.workflow_id);
			return false;
		}
		match result {
			Ok(workflow) => {
				info!(
					"loaded workflow `{}` with {} jobs",
					ticket.workflow_id,
					workflow.graph.len()
				);
				self.loaded = Some(LoadedWorkflow {
					workflow_id: ticket.workflow_id.clone(),
					run_uids: workflow.run_uids(),
					workflow,
				});
				self.load = LoadState::Idle;
			}
			Err(err) => {
				warn!("failed to load workflow `{}`: {err}", ticket.workflow_id);
				self.load = LoadState::Failed(err.to_string());
			}
		}
		true
	}

	/// Clear a failure and fetch again.
	pub fn retry(&mut self) -> Option<FetchTicket> {
		if matches!(self.load, LoadState::Failed(_)) {
			self.load = LoadState::Idle;
		}
		self.request_fetch()
	}

	/// Whether the current workflow's graph is in hand.
	pub fn is_loaded(&self) -> bool {
		matches!(
			(&self.loaded, &self.workflow_id),
			(Some(loaded), Some(id)) if &loaded.workflow_id == id
		)
	}

	/// A fetch is in flight.
	pub fn is_loading(&self) -> bool {
		matches!(self.load, LoadState::Loading(_))
	}

	/// Message of the last failed fetch, until retried.
	pub fn error(&self) -> Option<&str> {
		match &self.load {
			LoadState::Failed(message) => Some(message),
			_ => None,
		}
	}

	/// The workflow on screen, possibly one the user already navigated away from.
	pub fn workflow(&self) -> Option<&Workflow> {
		self.loaded.as_ref().map(|loaded| &loaded.workflow)
	}

	pub fn view_mode(&self) -> ViewMode {
		self.view_mode
	}

	/// Switch between graph and list. Only user actions call this.
	pub fn toggle_view_mode(&mut self) {
		self.view_mode = self.view_mode.toggled();
	}

	/// Runs from `content` that belong to the displayed workflow.
	pub fn jobs_content(&self, content: &[JobSummary]) -> Vec<JobSummary> {
		match &self.loaded {
			Some(loaded) => filter_jobs_content(content, &loaded.run_uids),
			None => Vec::new(),
		}
	}

	/// Positioned graph elements for the displayed workflow.
	pub fn elements(&self, selection: &Selection, layout: &impl LayoutEngine) -> GraphElements {
		match self.workflow() {
			Some(workflow) => layout.layout(graph_builder::build(&workflow.graph, selection)),
			None => GraphElements::default(),
		}
	}

	/// The YAML panel.
	pub fn yaml(&self) -> &YamlView {
		&self.yaml
	}

	/// Show or hide the YAML of the selected job, the selected function, or
	/// the whole workflow when nothing is selected.
	pub fn toggle_yaml(&mut self, selection: &Selection) -> Result<()> {
		if self.yaml.is_visible() {
			self.yaml.hide();
			return Ok(());
		}
		let Some(workflow) = self.loaded.as_ref().map(|loaded| &loaded.workflow) else {
			return Ok(());
		};
		match selected_job(workflow, selection) {
			Some(job) => self.yaml.toggle(job),
			None => self.yaml.toggle(workflow),
		}
	}
}

fn selected_job<'a>(workflow: &'a Workflow, selection: &Selection) -> Option<&'a JobNode> {
	let target = selection.detail_target()?;
	workflow.graph.values().find(|job| {
		let Some(step) = job.as_step() else {
			return false;
		};
		match target {
			DetailTarget::Job(selected) => step.run_uid.as_deref() == Some(selected.uid.as_str()),
			DetailTarget::Function(selected) => {
				step.run_type == Some(RunType::Deploy)
					&& step
						.function
						.as_deref()
						.is_some_and(|function| function.contains(&selected.hash))
			}
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::DashboardError;
	use crate::workflow::layout::LayeredLayout;
	use crate::workflow::model::{StepJob, WorkflowRun};

	fn workflow(name: &str, uids: &[&str]) -> Workflow {
		let graph = uids
			.iter()
			.enumerate()
			.map(|(i, uid)| {
				let id = format!("{name}-{i}");
				let job = JobNode::Step(StepJob {
					id: id.clone(),
					name: id.clone(),
					function: Some(format!("proj/{name}@hash{i}")),
					run_uid: Some(uid.to_string()),
					run_type: Some(RunType::Run),
					children: Vec::new(),
				});
				(id, job)
			})
			.collect();
		Workflow {
			run: WorkflowRun {
				id: name.into(),
				name: name.into(),
				..Default::default()
			},
			graph,
		}
	}

	fn failure() -> DashboardError {
		DashboardError::Status {
			status: 503,
			url: "/api/v1/projects/p/pipelines/wf".into(),
		}
	}

	#[test]
	fn fetches_once_on_mount() {
		let mut controller = WorkflowController::default();
		let ticket = controller.set_workflow_id("wf-1").unwrap();
		assert_eq!(ticket.workflow_id, "wf-1");
		assert!(controller.is_loading());

		// re-renders while in flight do not issue another request
		assert_eq!(controller.set_workflow_id("wf-1"), None);
		assert_eq!(controller.request_fetch(), None);

		assert!(controller.complete_fetch(&ticket, Ok(workflow("a", &["u1"]))));
		assert!(controller.is_loaded());
		assert_eq!(controller.request_fetch(), None);
	}

	#[test]
	fn discards_response_for_previous_workflow() {
		let mut controller = WorkflowController::default();
		let first = controller.set_workflow_id("wf-1").unwrap();
		let second = controller.set_workflow_id("wf-2").unwrap();

		assert!(!controller.complete_fetch(&first, Ok(workflow("old", &["u1"]))));
		assert_eq!(controller.workflow(), None);

		assert!(controller.complete_fetch(&second, Ok(workflow("new", &["u2"]))));
		assert_eq!(controller.workflow().unwrap().run.name, "new");
	}

	#[test]
	fn keeps_stale_graph_until_replaced() {
		let mut controller = WorkflowController::default();
		let first = controller.set_workflow_id("wf-1").unwrap();
		controller.complete_fetch(&first, Ok(workflow("one", &["u1"])));

		let second = controller.set_workflow_id("wf-2").unwrap();
		assert!(!controller.is_loaded());
		assert_eq!(controller.workflow().unwrap().run.name, "one");

		controller.complete_fetch(&second, Ok(workflow("two", &["u2"])));
		assert_eq!(controller.workflow().unwrap().run.name, "two");
	}

	#[test]
	fn failure_is_recoverable() {
		let mut controller = WorkflowController::default();
		let ticket = controller.set_workflow_id("wf-1").unwrap();
		assert!(controller.complete_fetch(&ticket, Err(failure())));
		assert!(controller.error().unwrap().contains("503"));
		assert_eq!(controller.request_fetch(), None, "no automatic refetch loop");

		let retry = controller.retry().unwrap();
		assert_eq!(controller.error(), None);
		controller.complete_fetch(&retry, Ok(workflow("a", &["u1"])));
		assert!(controller.is_loaded());
	}

	#[test]
	fn view_mode_toggle_keeps_data() {
		let mut controller = WorkflowController::new(ViewMode::Graph);
		let ticket = controller.set_workflow_id("wf-1").unwrap();
		controller.complete_fetch(&ticket, Ok(workflow("a", &["u1", "u2"])));

		controller.toggle_view_mode();
		assert_eq!(controller.view_mode(), ViewMode::List);
		assert!(controller.is_loaded());
		controller.toggle_view_mode();
		assert_eq!(controller.view_mode(), ViewMode::Graph);
	}

	#[test]
	fn jobs_content_follows_loaded_graph() {
		let content = vec![
			JobSummary {
				uid: "x".into(),
				..Default::default()
			},
			JobSummary {
				uid: "y".into(),
				..Default::default()
			},
		];
		let mut controller = WorkflowController::default();
		assert!(controller.jobs_content(&content).is_empty());

		let ticket = controller.set_workflow_id("wf-1").unwrap();
		controller.complete_fetch(&ticket, Ok(workflow("a", &["y"])));
		let jobs = controller.jobs_content(&content);
		assert_eq!(jobs.len(), 1);
		assert_eq!(jobs[0].uid, "y");
	}

	#[test]
	fn elements_track_selection() {
		let layout = LayeredLayout::default();
		let mut controller = WorkflowController::default();
		assert!(controller.elements(&Selection::none(), &layout).is_empty());

		let ticket = controller.set_workflow_id("wf-1").unwrap();
		controller.complete_fetch(&ticket, Ok(workflow("a", &["u1", "u2"])));

		let elements = controller.elements(&Selection::job("u2"), &layout);
		assert_eq!(elements.nodes.len(), 2);
		assert!(!elements.nodes[0].selected);
		assert!(elements.nodes[1].selected);
	}

	#[test]
	fn yaml_shows_selected_job_then_hides() {
		let mut controller = WorkflowController::default();
		let ticket = controller.set_workflow_id("wf-1").unwrap();
		controller.complete_fetch(&ticket, Ok(workflow("a", &["u1", "u2"])));

		controller.toggle_yaml(&Selection::job("u2")).unwrap();
		assert!(controller.yaml().is_visible());
		assert!(controller.yaml().text().contains("run_uid: u2"));
		assert!(!controller.yaml().text().contains("u1"));

		controller.toggle_yaml(&Selection::job("u2")).unwrap();
		assert!(!controller.yaml().is_visible());
		assert_eq!(controller.yaml().text(), "");
	}

	#[test]
	fn yaml_without_selection_shows_workflow() {
		let mut controller = WorkflowController::default();
		controller.toggle_yaml(&Selection::none()).unwrap();
		assert!(!controller.yaml().is_visible(), "nothing loaded yet");

		let ticket = controller.set_workflow_id("wf-1").unwrap();
		controller.complete_fetch(&ticket, Ok(workflow("a", &["u1"])));
		controller.toggle_yaml(&Selection::none()).unwrap();
		assert!(controller.yaml().text().contains("graph:"));
	}

	#[test]
	fn yaml_for_function_picks_the_highlighted_deploy_step() {
		let step = |id: &str, run_type| {
			JobNode::Step(StepJob {
				id: id.into(),
				name: id.into(),
				function: Some("proj/serving@h1".into()),
				run_uid: None,
				run_type: Some(run_type),
				children: Vec::new(),
			})
		};
		let mut wf = workflow("a", &[]);
		wf.graph.insert("a-test".into(), step("a-test", RunType::Run));
		wf.graph.insert("b-deploy".into(), step("b-deploy", RunType::Deploy));

		let mut controller = WorkflowController::default();
		let ticket = controller.set_workflow_id("wf-1").unwrap();
		controller.complete_fetch(&ticket, Ok(wf));

		controller.toggle_yaml(&Selection::function("serving", "h1")).unwrap();
		let text = controller.yaml().text();
		assert!(text.contains("id: b-deploy"), "{text}");
		assert!(!text.contains("a-test"), "{text}");
	}
}
