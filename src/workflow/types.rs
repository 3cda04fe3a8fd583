//! Elements handed to layout and drawing.

use super::model::RunType;

/// Top-left corner of a node in graph coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

/// A drawable workflow step.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderNode {
	/// Job id, unique within the workflow.
	pub id: String,
	/// Step name shown inside the node.
	pub label: String,
	/// `project/name@hash` of the step's function.
	pub function_ref: Option<String>,
	pub run_uid: Option<String>,
	pub run_type: Option<RunType>,
	/// Highlighted by the current selection.
	pub selected: bool,
	/// Clicking navigates to the job or function.
	pub selectable: bool,
	/// Set by the layout engine.
	pub position: Position,
}

impl RenderNode {
	/// A deploy step; only these can be selected by function.
	pub fn is_deploy(&self) -> bool {
		self.run_type == Some(RunType::Deploy)
	}
}

/// Parent to child link, `id` is `e.<source>.<target>`.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderEdge {
	pub id: String,
	pub source: String,
	pub target: String,
}

/// Everything one frame of the graph draws.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphElements {
	pub nodes: Vec<RenderNode>,
	pub edges: Vec<RenderEdge>,
}

impl GraphElements {
	/// No nodes to draw. Dangling edges alone do not count.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Node with `id`, if drawn.
	pub fn node(&self, id: &str) -> Option<&RenderNode> {
		self.nodes.iter().find(|node| node.id == id)
	}
}
