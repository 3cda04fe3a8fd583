//! Workflow graph to drawable nodes and edges.
//!
//! Nodes come out in ascending job-id order (the graph's iteration order),
//! edges in parent order then child order. DAG containers produce edges but
//! no node. A child listed twice under the same parent is linked once.

use super::model::{JobNode, StepJob, WorkflowGraph};
use super::selection::Selection;
use super::types::{GraphElements, Position, RenderEdge, RenderNode};

/// Build the unpositioned elements for `graph` under `selection`.
pub fn build(graph: &WorkflowGraph, selection: &Selection) -> GraphElements {
	let mut elements = GraphElements::default();

	for job in graph.values() {
		if let JobNode::Step(step) = job {
			elements.nodes.push(render_node(step, selection));
		}
		for (i, child) in job.children().iter().enumerate() {
			if job.children()[..i].contains(child) {
				continue;
			}
			elements.edges.push(RenderEdge {
				id: edge_id(job.id(), child),
				source: job.id().to_string(),
				target: child.clone(),
			});
		}
	}

	elements
}

/// Edge id for the `source` to `target` link.
pub fn edge_id(source: &str, target: &str) -> String {
	format!("e.{source}.{target}")
}

fn render_node(step: &StepJob, selection: &Selection) -> RenderNode {
	let mut node = RenderNode {
		id: step.id.clone(),
		label: step.name.clone(),
		function_ref: step.function.clone(),
		run_uid: step.run_uid.clone(),
		run_type: step.run_type,
		selected: false,
		selectable: false,
		position: Position::default(),
	};
	node.selectable = node.run_uid.is_some() || (node.is_deploy() && node.function_ref.is_some());
	node.selected = is_selected(&node, selection);
	node
}

fn is_selected(node: &RenderNode, selection: &Selection) -> bool {
	let job_match = match (node.run_uid.as_deref(), selection.job_uid()) {
		(Some(uid), Some(selected)) => uid == selected,
		_ => false,
	};
	let function_match = match (node.function_ref.as_deref(), selection.function_hash()) {
		(Some(function), Some(hash)) => node.is_deploy() && function.contains(hash),
		_ => false,
	};
	job_match || function_match
}
