//! URLs the workflow view links to.
//!
//! Layout: `/projects/{project}/jobs/{tab}/workflow/{workflow}` for the
//! workflow itself, with `/{run_uid}/{details_tab}` or
//! `/{function}/{hash}/{details_tab}` appended for a selected item.

/// Details tab opened when navigating from the graph.
pub const DETAILS_OVERVIEW_TAB: &str = "overview";

/// Route parameters identifying one workflow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteParams {
	pub project_name: String,
	/// Jobs page tab the workflow was opened from.
	pub page_tab: String,
	pub workflow_id: String,
}

impl RouteParams {
	pub fn new(project_name: impl Into<String>, page_tab: impl Into<String>, workflow_id: impl Into<String>) -> Self {
		Self {
			project_name: project_name.into(),
			page_tab: page_tab.into(),
			workflow_id: workflow_id.into(),
		}
	}

	/// The jobs page the workflow was opened from.
	pub fn back_link(&self) -> String {
		format!(
			"/projects/{}/jobs/{}",
			encode_segment(&self.project_name),
			encode_segment(&self.page_tab)
		)
	}

	/// The workflow with nothing selected; closes the details panel.
	pub fn close_details_link(&self) -> String {
		format!("{}/workflow/{}", self.back_link(), encode_segment(&self.workflow_id))
	}

	/// Details of the run `run_uid`.
	pub fn job_details_link(&self, run_uid: &str) -> String {
		format!(
			"{}/{}/{DETAILS_OVERVIEW_TAB}",
			self.close_details_link(),
			encode_segment(run_uid)
		)
	}

	/// Details of a deployed function.
	pub fn function_details_link(&self, name: &str, hash: &str) -> String {
		format!(
			"{}/{}/{}/{DETAILS_OVERVIEW_TAB}",
			self.close_details_link(),
			encode_segment(name),
			encode_segment(hash)
		)
	}
}

/// Percent-encode one path segment, leaving only the unreserved set.
pub(crate) fn encode_segment(segment: &str) -> String {
	urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params() -> RouteParams {
		RouteParams::new("fraud", "monitor-workflows", "wf-42")
	}

	#[test]
	fn builds_links() {
		let p = params();
		assert_eq!(p.back_link(), "/projects/fraud/jobs/monitor-workflows");
		assert_eq!(p.close_details_link(), "/projects/fraud/jobs/monitor-workflows/workflow/wf-42");
		assert_eq!(
			p.job_details_link("abc123"),
			"/projects/fraud/jobs/monitor-workflows/workflow/wf-42/abc123/overview"
		);
		assert_eq!(
			p.function_details_link("my-func", "a1b2c3"),
			"/projects/fraud/jobs/monitor-workflows/workflow/wf-42/my-func/a1b2c3/overview"
		);
	}

	#[test]
	fn encodes_reserved_characters() {
		assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
		assert_eq!(encode_segment("plain-1.2_~"), "plain-1.2_~");
	}

	#[test]
	fn links_escape_each_segment() {
		let p = RouteParams::new("my proj", "monitor-workflows", "wf/1");
		assert_eq!(
			p.job_details_link("a?b"),
			"/projects/my%20proj/jobs/monitor-workflows/workflow/wf%2F1/a%3Fb/overview"
		);
	}
}
