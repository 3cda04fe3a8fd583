use std::collections::BTreeMap;

/// One row of the project's model listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelSummary {
	/// Registered name.
	pub key: String,
	/// Artifact tree (the uid it was registered under).
	pub tree: String,
	pub description: Option<String>,
	pub target_path: Option<String>,
	pub labels: BTreeMap<String, String>,
}

impl ModelSummary {
	/// `key:value` pairs in key order, for chips.
	pub fn label_chips(&self) -> Vec<String> {
		self.labels.iter().map(|(k, v)| format!("{k}: {v}")).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn chips_follow_key_order() {
		let summary = ModelSummary {
			labels: [("team".to_string(), "risk".to_string()), ("env".to_string(), "prod".to_string())]
				.into_iter()
				.collect(),
			..Default::default()
		};
		assert_eq!(summary.label_chips(), ["env: prod", "team: risk"]);
	}
}
