//! Which job or function is selected, and what that implies for the view.

/// A selected job run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedJob {
	pub uid: String,
}

/// A selected deployed function.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedFunction {
	pub name: String,
	pub hash: String,
}

/// Current selection. The two halves are set independently upstream and may
/// both be present; highlighting applies both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
	pub job: Option<SelectedJob>,
	pub function: Option<SelectedFunction>,
}

/// The entity the details panel shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailTarget<'a> {
	/// A job run.
	Job(&'a SelectedJob),
	/// A deployed function.
	Function(&'a SelectedFunction),
}

impl Selection {
	/// Nothing selected.
	pub fn none() -> Self {
		Self::default()
	}

	/// Select a job run by uid.
	pub fn job(uid: impl Into<String>) -> Self {
		Self {
			job: Some(SelectedJob { uid: uid.into() }),
			function: None,
		}
	}

	/// Select a deployed function.
	pub fn function(name: impl Into<String>, hash: impl Into<String>) -> Self {
		Self {
			job: None,
			function: Some(SelectedFunction {
				name: name.into(),
				hash: hash.into(),
			}),
		}
	}

	/// Selection encoded in the details part of a workflow URL. A function
	/// needs both its name and hash.
	pub fn from_route(job_id: Option<String>, function_name: Option<String>, function_hash: Option<String>) -> Self {
		Self {
			job: job_id.map(|uid| SelectedJob { uid }),
			function: match (function_name, function_hash) {
				(Some(name), Some(hash)) => Some(SelectedFunction { name, hash }),
				_ => None,
			},
		}
	}

	/// Uid of the selected job, ignoring empty values.
	pub fn job_uid(&self) -> Option<&str> {
		self.job
			.as_ref()
			.map(|job| job.uid.as_str())
			.filter(|uid| !uid.is_empty())
	}

	/// Hash of the selected function, ignoring empty values.
	pub fn function_hash(&self) -> Option<&str> {
		self.function
			.as_ref()
			.map(|function| function.hash.as_str())
			.filter(|hash| !hash.is_empty())
	}

	pub fn has_job_selection(&self) -> bool {
		self.job_uid().is_some()
	}

	pub fn has_function_selection(&self) -> bool {
		self.function_hash().is_some()
	}

	/// Whether the details side panel is open.
	pub fn any_selected(&self) -> bool {
		self.has_job_selection() || self.has_function_selection()
	}

	/// Job wins over function when both are set.
	pub fn detail_target(&self) -> Option<DetailTarget<'_>> {
		if self.has_job_selection() {
			return self.job.as_ref().map(DetailTarget::Job);
		}
		if self.has_function_selection() {
			return self.function.as_ref().map(DetailTarget::Function);
		}
		None
	}
}
