//! User-facing notifications.

/// A toast shown in the corner of the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
	pub id: u64,
	/// HTTP-like status; anything outside 2xx renders as an error.
	pub status: u16,
	pub message: String,
	/// Offer a retry button that re-runs the failed action.
	pub retry: bool,
}

impl Notification {
	pub fn is_error(&self) -> bool {
		!(200..300).contains(&self.status)
	}
}

/// Notifications in arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationQueue {
	next_id: u64,
	items: Vec<Notification>,
}

impl NotificationQueue {
	pub fn push(&mut self, status: u16, message: impl Into<String>, retry: bool) -> u64 {
		self.next_id += 1;
		self.items.push(Notification {
			id: self.next_id,
			status,
			message: message.into(),
			retry,
		});
		self.next_id
	}

	pub fn dismiss(&mut self, id: u64) {
		self.items.retain(|n| n.id != id);
	}

	pub fn iter(&self) -> impl Iterator<Item = &Notification> {
		self.items.iter()
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_are_unique_and_dismissable() {
		let mut queue = NotificationQueue::default();
		let ok = queue.push(201, "Model initiated successfully", false);
		let failed = queue.push(400, "Model failed to initiate", true);
		assert_ne!(ok, failed);
		assert_eq!(queue.len(), 2);

		queue.dismiss(ok);
		let remaining: Vec<_> = queue.iter().collect();
		assert_eq!(remaining.len(), 1);
		assert!(remaining[0].is_error());
		assert!(remaining[0].retry);

		queue.dismiss(failed);
		assert!(queue.is_empty());
	}
}
