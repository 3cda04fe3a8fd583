//! Where a click on a graph node leads.

use log::{debug, warn};

use super::types::RenderNode;
use crate::routes::RouteParams;

/// Name and content hash parsed out of a function reference such as
/// `nuclio/my-func@a1b2c3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionRef<'a> {
	pub name: &'a str,
	pub hash: &'a str,
}

impl<'a> FunctionRef<'a> {
	/// `name` is what sits between the last `/` and the last `@`, `hash` what
	/// follows the last `@`. Both must be non-empty.
	pub fn parse(raw: &'a str) -> Option<Self> {
		let at = raw.rfind('@')?;
		let slash = raw[..at].rfind('/')?;
		let (name, hash) = (&raw[slash + 1..at], &raw[at + 1..]);
		if name.is_empty() || hash.is_empty() {
			return None;
		}
		Some(Self { name, hash })
	}
}

/// History integration.
pub trait Navigator {
	fn push(&self, url: &str);
}

/// Destination for a click on `node`, `None` when the click does nothing.
pub fn resolve(node: &RenderNode, route: &RouteParams) -> Option<String> {
	if let Some(run_uid) = &node.run_uid {
		return Some(route.job_details_link(run_uid));
	}
	if !node.is_deploy() {
		return None;
	}
	let raw = node.function_ref.as_deref()?;
	match FunctionRef::parse(raw) {
		Some(function) => Some(route.function_details_link(function.name, function.hash)),
		None => {
			warn!("node `{}` has malformed function reference `{raw}`", node.id);
			None
		}
	}
}

/// Resolve a click and push the destination once. Returns whether it navigated.
pub fn navigate_on_click(node: &RenderNode, route: &RouteParams, navigator: &impl Navigator) -> bool {
	match resolve(node, route) {
		Some(url) => {
			debug!("navigating from node `{}` to {url}", node.id);
			navigator.push(&url);
			true
		}
		None => false,
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;
	use crate::workflow::model::RunType;
	use crate::workflow::types::Position;

	#[derive(Default)]
	struct RecordingNavigator {
		pushed: RefCell<Vec<String>>,
	}

	impl Navigator for RecordingNavigator {
		fn push(&self, url: &str) {
			self.pushed.borrow_mut().push(url.to_string());
		}
	}

	fn node(run_uid: Option<&str>, run_type: Option<RunType>, function_ref: Option<&str>) -> RenderNode {
		RenderNode {
			id: "n1".into(),
			label: "n1".into(),
			function_ref: function_ref.map(Into::into),
			run_uid: run_uid.map(Into::into),
			run_type,
			selected: false,
			selectable: true,
			position: Position::default(),
		}
	}

	fn route() -> RouteParams {
		RouteParams::new("proj", "monitor-workflows", "wf-1")
	}

	#[test]
	fn parses_function_refs() {
		assert_eq!(
			FunctionRef::parse("nuclio/my-func@a1b2c3"),
			Some(FunctionRef {
				name: "my-func",
				hash: "a1b2c3"
			})
		);
		assert_eq!(
			FunctionRef::parse("db://proj/serving@ff00").map(|f| f.name),
			Some("serving")
		);
	}

	#[test]
	fn malformed_refs_do_not_parse() {
		for raw in ["malformed-string", "no-slash@abc", "a/b", "x@y/z", "proj/@abc", "proj/name@", ""] {
			assert_eq!(FunctionRef::parse(raw), None, "{raw}");
		}
	}

	#[test]
	fn run_uid_wins() {
		let target = node(Some("abc"), Some(RunType::Deploy), Some("p/f@h"));
		assert_eq!(
			resolve(&target, &route()).as_deref(),
			Some("/projects/proj/jobs/monitor-workflows/workflow/wf-1/abc/overview")
		);
	}

	#[test]
	fn deploy_links_to_function() {
		let target = node(None, Some(RunType::Deploy), Some("nuclio/my-func@a1b2c3"));
		let url = resolve(&target, &route()).unwrap();
		assert!(url.contains("/my-func/"));
		assert!(url.contains("/a1b2c3/"));
	}

	#[test]
	fn malformed_deploy_ref_is_a_noop() {
		let navigator = RecordingNavigator::default();
		let target = node(None, Some(RunType::Deploy), Some("malformed-string"));
		assert!(!navigate_on_click(&target, &route(), &navigator));
		assert!(navigator.pushed.borrow().is_empty());
	}

	#[test]
	fn unselectable_nodes_do_nothing() {
		assert_eq!(resolve(&node(None, Some(RunType::Run), Some("p/f@h")), &route()), None);
		assert_eq!(resolve(&node(None, Some(RunType::Deploy), None), &route()), None);
		assert_eq!(resolve(&node(None, None, None), &route()), None);
	}

	#[test]
	fn pushes_exactly_once_per_click() {
		let navigator = RecordingNavigator::default();
		assert!(navigate_on_click(&node(Some("abc"), None, None), &route(), &navigator));
		assert_eq!(navigator.pushed.borrow().len(), 1);
	}
}
