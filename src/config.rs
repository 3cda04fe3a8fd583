//! Dashboard configuration.
//!
//! The host page may embed a JSON object in
//! `<script id="dashboard-config" type="application/json">`. Every field is
//! optional; anything missing falls back to the defaults below.

use log::{Level, warn};
use serde::Deserialize;

use crate::error::{DashboardError, Result};
use crate::workflow::layout::LayoutConfig;

/// Id of the `<script>` element carrying the configuration blob.
pub const CONFIG_ELEMENT_ID: &str = "dashboard-config";

/// Runtime settings for the dashboard.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
	/// Prefix for every backend request, without a trailing slash.
	pub api_base_url: String,
	/// Enables features still in preview, such as the target path scheme picker.
	pub demo_mode: bool,
	/// One of `error`, `warn`, `info`, `debug`, `trace`.
	pub log_level: String,
	/// Graph layout geometry.
	pub layout: LayoutConfig,
}

impl Default for DashboardConfig {
	fn default() -> Self {
		Self {
			api_base_url: "/api/v1".into(),
			demo_mode: false,
			log_level: if cfg!(debug_assertions) { "debug" } else { "info" }.into(),
			layout: LayoutConfig::default(),
		}
	}
}

impl DashboardConfig {
	/// Parse a configuration blob.
	pub fn from_json(raw: &str) -> Result<Self> {
		let mut config: Self =
			serde_json::from_str(raw).map_err(|e| DashboardError::Config(e.to_string()))?;
		config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
		if parse_level(&config.log_level).is_none() {
			return Err(DashboardError::Config(format!(
				"unknown log level `{}`",
				config.log_level
			)));
		}
		Ok(config)
	}

	/// Read the blob embedded in the current document.
	///
	/// A missing element yields the defaults; a malformed one yields the
	/// defaults and a warning.
	pub fn from_document() -> Self {
		let raw = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
			.and_then(|el| el.text_content());

		match raw {
			Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw).unwrap_or_else(|e| {
				warn!("ignoring embedded dashboard config: {e}");
				Self::default()
			}),
			_ => Self::default(),
		}
	}

	/// The configured log level, `Info` when unrecognised.
	pub fn level(&self) -> Level {
		parse_level(&self.log_level).unwrap_or(Level::Info)
	}
}

fn parse_level(s: &str) -> Option<Level> {
	match s.trim().to_lowercase().as_str() {
		"error" => Some(Level::Error),
		"warn" | "warning" => Some(Level::Warn),
		"info" => Some(Level::Info),
		"debug" => Some(Level::Debug),
		"trace" => Some(Level::Trace),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::workflow::layout::LayoutDirection;

	#[test]
	fn empty_object_gives_defaults() {
		let config = DashboardConfig::from_json("{}").unwrap();
		assert_eq!(config, DashboardConfig::default());
		assert_eq!(config.api_base_url, "/api/v1");
	}

	#[test]
	fn partial_overrides_are_merged() {
		let config = DashboardConfig::from_json(
			r#"{"api_base_url": "https://mlrun.example/api/v1/", "demo_mode": true,
			    "log_level": "WARN", "layout": {"direction": "top_to_bottom"}}"#,
		)
		.unwrap();
		assert_eq!(config.api_base_url, "https://mlrun.example/api/v1");
		assert!(config.demo_mode);
		assert_eq!(config.level(), Level::Warn);
		assert_eq!(config.layout.direction, LayoutDirection::TopToBottom);
		assert_eq!(config.layout.node_width, LayoutConfig::default().node_width);
	}

	#[test]
	fn rejects_unknown_log_level() {
		let err = DashboardConfig::from_json(r#"{"log_level": "loud"}"#).unwrap_err();
		assert!(matches!(err, DashboardError::Config(_)));
	}

	#[test]
	fn rejects_malformed_json() {
		assert!(DashboardConfig::from_json("{not json").is_err());
	}
}
