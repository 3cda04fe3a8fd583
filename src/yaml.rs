//! Toggleable YAML rendering of whatever the user is looking at.

use serde::Serialize;

use crate::error::Result;

/// Holds the converted text while the YAML modal is open.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct YamlView {
	text: String,
}

impl YamlView {
	/// Show `value` as YAML, or hide the modal if it is already shown.
	pub fn toggle<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
		if self.is_visible() {
			self.text.clear();
		} else {
			self.text = serde_yaml::to_string(value)?;
		}
		Ok(())
	}

	pub fn hide(&mut self) {
		self.text.clear();
	}

	pub fn is_visible(&self) -> bool {
		!self.text.is_empty()
	}

	pub fn text(&self) -> &str {
		&self.text
	}
}
