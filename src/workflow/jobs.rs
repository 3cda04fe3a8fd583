use std::collections::HashSet;

use super::model::JobSummary;

/// Rows of `content` whose uid belongs to the workflow, in `content` order.
pub fn filter_jobs_content(content: &[JobSummary], workflow_uids: &HashSet<String>) -> Vec<JobSummary> {
	if workflow_uids.is_empty() {
		return Vec::new();
	}
	content
		.iter()
		.filter(|job| workflow_uids.contains(&job.uid))
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn job(uid: &str) -> JobSummary {
		JobSummary {
			uid: uid.into(),
			name: format!("job-{uid}"),
			..Default::default()
		}
	}

	#[test]
	fn keeps_content_order() {
		let content = [job("x"), job("z"), job("y")];
		let uids = HashSet::from(["y".to_string(), "z".to_string()]);
		let uids_of = |jobs: Vec<JobSummary>| jobs.into_iter().map(|j| j.uid).collect::<Vec<_>>();
		assert_eq!(uids_of(filter_jobs_content(&content, &uids)), ["z", "y"]);
	}

	#[test]
	fn spec_example() {
		let content = [job("x"), job("y"), job("z")];
		let uids = HashSet::from(["y".to_string(), "z".to_string()]);
		assert_eq!(filter_jobs_content(&content, &uids), vec![job("y"), job("z")]);
	}

	#[test]
	fn empty_inputs() {
		assert!(filter_jobs_content(&[], &HashSet::from(["a".to_string()])).is_empty());
		assert!(filter_jobs_content(&[job("a")], &HashSet::new()).is_empty());
	}
}
