use crate::workflow::layout::{LayoutConfig, LayoutDirection};
use crate::workflow::{GraphElements, Position, RenderNode};

/// Pointer travel below which a press/release pair counts as a click.
pub const CLICK_SLOP: f64 = 4.0;
const FIT_PADDING: f64 = 40.0;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

pub struct GraphCanvasState {
	pub elements: GraphElements,
	pub layout: LayoutConfig,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hovered: Option<usize>,
	pub width: f64,
	pub height: f64,
	/// Set whenever the next frame differs from the last one drawn.
	pub dirty: bool,
	fitted: bool,
}

impl GraphCanvasState {
	pub fn new(elements: GraphElements, layout: LayoutConfig, width: f64, height: f64) -> Self {
		let mut state = Self {
			elements,
			layout,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			pan: PanState::default(),
			hovered: None,
			width,
			height,
			dirty: true,
			fitted: false,
		};
		state.fit_to_view();
		state
	}

	/// Swap in recomputed elements. The view is only refitted the first time
	/// a non-empty graph arrives, so selection changes keep the user's pan/zoom.
	pub fn set_elements(&mut self, elements: GraphElements) {
		self.elements = elements;
		self.hovered = None;
		if !self.fitted {
			self.fit_to_view();
		}
		self.dirty = true;
	}

	pub fn fit_to_view(&mut self) {
		if self.elements.is_empty() {
			return;
		}
		let (min, max) = self.bounds();
		let (gw, gh) = (max.x - min.x, max.y - min.y);
		let k = ((self.width - 2.0 * FIT_PADDING) / gw)
			.min((self.height - 2.0 * FIT_PADDING) / gh)
			.clamp(0.1, 1.0);
		self.transform = ViewTransform {
			x: (self.width - gw * k) / 2.0 - min.x * k,
			y: (self.height - gh * k) / 2.0 - min.y * k,
			k,
		};
		self.fitted = true;
		self.dirty = true;
	}

	fn bounds(&self) -> (Position, Position) {
		let mut min = Position {
			x: f64::INFINITY,
			y: f64::INFINITY,
		};
		let mut max = Position {
			x: f64::NEG_INFINITY,
			y: f64::NEG_INFINITY,
		};
		for node in &self.elements.nodes {
			min.x = min.x.min(node.position.x);
			min.y = min.y.min(node.position.y);
			max.x = max.x.max(node.position.x + self.layout.node_width);
			max.y = max.y.max(node.position.y + self.layout.node_height);
		}
		(min, max)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.elements.nodes.iter().position(|node| {
			gx >= node.position.x
				&& gx <= node.position.x + self.layout.node_width
				&& gy >= node.position.y
				&& gy <= node.position.y + self.layout.node_height
		})
	}

	pub fn node(&self, idx: usize) -> Option<&RenderNode> {
		self.elements.nodes.get(idx)
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hovered != node {
			self.hovered = node;
			self.dirty = true;
		}
	}

	pub fn hovered_selectable(&self) -> bool {
		self.hovered
			.and_then(|idx| self.node(idx))
			.is_some_and(|node| node.selectable)
	}

	/// Where an edge leaves `node`.
	pub fn out_anchor(&self, node: &RenderNode) -> (f64, f64) {
		let (w, h) = (self.layout.node_width, self.layout.node_height);
		match self.layout.direction {
			LayoutDirection::LeftToRight => (node.position.x + w, node.position.y + h / 2.0),
			LayoutDirection::TopToBottom => (node.position.x + w / 2.0, node.position.y + h),
		}
	}

	/// Where an edge enters `node`.
	pub fn in_anchor(&self, node: &RenderNode) -> (f64, f64) {
		let (w, h) = (self.layout.node_width, self.layout.node_height);
		match self.layout.direction {
			LayoutDirection::LeftToRight => (node.position.x, node.position.y + h / 2.0),
			LayoutDirection::TopToBottom => (node.position.x + w / 2.0, node.position.y),
		}
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, zoom_in: bool) {
		let factor = if zoom_in { 1.1 } else { 0.9 };
		let new_k = (self.transform.k * factor).clamp(0.1, 4.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
		self.dirty = true;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.dirty = true;
	}
}
