//! Crate-wide error type and result alias.

use thiserror::Error;

/// Everything that can go wrong between the dashboard and its backend.
#[derive(Error, Debug)]
pub enum DashboardError {
	/// Transport failure (network down, CORS, aborted request).
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	/// The server answered with a non-success status.
	#[error("{url} responded with status {status}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Request URL.
		url: String,
	},

	/// A response body did not have the expected shape.
	#[error("could not decode response: {0}")]
	Decode(#[from] serde_json::Error),

	/// YAML conversion failed.
	#[error("YAML conversion failed: {0}")]
	Yaml(#[from] serde_yaml::Error),

	/// A form field failed validation.
	#[error("{field}: {message}")]
	Validation {
		/// Form field path, e.g. `metadata.key`.
		field: &'static str,
		/// Human readable reason.
		message: String,
	},

	/// The embedded dashboard configuration is unusable.
	#[error("configuration error: {0}")]
	Config(String),
}

impl DashboardError {
	pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
		Self::Validation {
			field,
			message: message.into(),
		}
	}
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DashboardError>;
