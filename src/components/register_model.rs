use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use uuid::Uuid;

use crate::api::ApiClient;
use crate::artifacts::{Label, PathScheme, RegisterModelForm, TargetPath, build_model_artifact, registration_notice};
use crate::notifications::NotificationQueue;

/// Validate, build and send the registration, then report the outcome.
pub fn submit_registration(
	api: ApiClient,
	project: String,
	form: RegisterModelForm,
	notifications: RwSignal<NotificationQueue>,
	on_registered: Callback<()>,
) -> crate::error::Result<()> {
	let host = web_sys::window()
		.and_then(|w| w.location().host().ok())
		.unwrap_or_default();
	let artifact = build_model_artifact(&form, &project, Uuid::new_v4(), &host)?;

	spawn_local(async move {
		let result = api.register_artifact(&project, &artifact).await;
		match &result {
			Ok(_) => info!("registered model `{}` in `{project}`", artifact.metadata.key),
			Err(e) => warn!("model registration failed: {e}"),
		}
		let (status, message, retry) = registration_notice(&result);
		notifications.update(|q| {
			q.push(status, message, retry);
		});
		if result.is_ok() {
			on_registered.run(());
		}
	});
	Ok(())
}

/// Signals behind the registration modal.
#[derive(Clone, Copy)]
struct FormFields {
	key: RwSignal<String>,
	description: RwSignal<String>,
	scheme: RwSignal<Option<PathScheme>>,
	path: RwSignal<String>,
	labels: RwSignal<Vec<Label>>,
	label_input: RwSignal<String>,
	error: RwSignal<Option<String>>,
	submitting: RwSignal<bool>,
	demo_mode: bool,
}

impl FormFields {
	fn new(demo_mode: bool) -> Self {
		Self {
			key: RwSignal::new(String::new()),
			description: RwSignal::new(String::new()),
			scheme: RwSignal::new(initial_scheme(demo_mode)),
			path: RwSignal::new(String::new()),
			labels: RwSignal::new(Vec::new()),
			label_input: RwSignal::new(String::new()),
			error: RwSignal::new(None),
			submitting: RwSignal::new(false),
			demo_mode,
		}
	}

	/// Back to what a freshly opened modal shows, scheme included.
	fn reset(&self) {
		self.key.set(String::new());
		self.description.set(String::new());
		self.scheme.set(initial_scheme(self.demo_mode));
		self.path.set(String::new());
		self.labels.set(Vec::new());
		self.label_input.set(String::new());
		self.error.set(None);
		self.submitting.set(false);
	}

	fn form(&self) -> RegisterModelForm {
		RegisterModelForm {
			key: self.key.get_untracked(),
			description: self.description.get_untracked(),
			target_path: TargetPath {
				scheme: self.scheme.get_untracked(),
				path: self.path.get_untracked(),
			},
			labels: self.labels.get_untracked(),
		}
	}

	/// Move the `key:value` in the label input into the label list.
	fn add_label(&self) {
		let raw = self.label_input.get_untracked();
		let Some((k, v)) = raw.split_once(':') else {
			self.error.set(Some("Labels are written as key:value".into()));
			return;
		};
		self.labels.update(|l| {
			l.push(Label {
				key: k.trim().to_string(),
				value: v.trim().to_string(),
			})
		});
		self.label_input.set(String::new());
		self.error.set(None);
	}
}

fn initial_scheme(demo_mode: bool) -> Option<PathScheme> {
	demo_mode.then_some(PathScheme::Store)
}

/// "Register model" modal.
///
/// On failure the submitted form is kept in `last_submitted` so a retry from
/// the notification can resend it. `on_registered` runs after the backend
/// accepted the artifact.
#[component]
pub fn RegisterModelPopUp(
	is_open: RwSignal<bool>,
	#[prop(into)] project_name: Signal<String>,
	api: ApiClient,
	demo_mode: bool,
	notifications: RwSignal<NotificationQueue>,
	last_submitted: RwSignal<Option<RegisterModelForm>>,
	on_registered: Callback<()>,
) -> impl IntoView {
	let api = StoredValue::new_local(api);
	let fields = FormFields::new(demo_mode);
	let FormFields {
		key,
		description,
		scheme,
		path,
		labels,
		label_input,
		error,
		submitting,
		..
	} = fields;

	let close = move |_| {
		fields.reset();
		is_open.set(false);
	};

	let submit = move |_| {
		let form = fields.form();
		submitting.set(true);
		last_submitted.set(Some(form.clone()));
		match submit_registration(
			api.get_value(),
			project_name.get_untracked(),
			form,
			notifications,
			on_registered,
		) {
			Ok(()) => {
				fields.reset();
				is_open.set(false);
			}
			Err(e) => {
				submitting.set(false);
				error.set(Some(e.to_string()));
			}
		}
	};

	view! {
		<Show when=move || is_open.get()>
			<div class="pop-up-dialog register-model form">
				<div class="pop-up-dialog__header">
					<h3>"Register model"</h3>
				</div>
				<div class="form-row">
					<label>
						"Name"
						<input
							type="text"
							required
							title="Artifacts names in the same project must be unique."
							prop:value=move || key.get()
							on:input=move |ev| key.set(event_target_value(&ev))
						/>
					</label>
				</div>
				<div class="form-row">
					<label>
						"Description"
						<textarea
							maxlength="500"
							prop:value=move || description.get()
							on:input=move |ev| description.set(event_target_value(&ev))
						/>
					</label>
				</div>
				<div class="form-row">
					<label>
						"Target path"
						<Show when=move || demo_mode>
							<select
								prop:value=move || scheme.get().map(PathScheme::prefix).unwrap_or_default()
								on:change=move |ev| scheme.set(PathScheme::from_prefix(&event_target_value(&ev)))
							>
								{PathScheme::ALL
									.into_iter()
									.map(|s| view! { <option value=s.prefix()>{s.prefix()}</option> })
									.collect_view()}
							</select>
						</Show>
						<input
							type="text"
							required
							prop:value=move || path.get()
							on:input=move |ev| path.set(event_target_value(&ev))
						/>
					</label>
				</div>
				<div class="form-row">
					<label>
						"Labels"
						<input
							type="text"
							placeholder="key:value"
							prop:value=move || label_input.get()
							on:input=move |ev| label_input.set(event_target_value(&ev))
						/>
					</label>
					<button type="button" on:click=move |_| fields.add_label()>"Add"</button>
					<div class="chips">
						{move || {
							labels
								.get()
								.into_iter()
								.enumerate()
								.map(|(i, label)| view! {
									<span class="chip">
										{format!("{}: {}", label.key, label.value)}
										<button
											type="button"
											on:click=move |_| labels.update(|l| {
												l.remove(i);
											})
										>
											"×"
										</button>
									</span>
								})
								.collect_view()
						}}
					</div>
				</div>
				<Show when=move || error.get().is_some()>
					<div class="form-error">{move || error.get().unwrap_or_default()}</div>
				</Show>
				<div class="pop-up-dialog__footer">
					<button type="button" class="btn-tertiary" on:click=close>"Cancel"</button>
					<button
						type="button"
						class="btn-secondary"
						disabled=move || submitting.get()
						on:click=submit
					>
						"Register"
					</button>
				</div>
			</div>
		</Show>
	}
}

/// Toasts. `on_retry` receives the id of the notification whose retry was pressed.
#[component]
pub fn NotificationList(notifications: RwSignal<NotificationQueue>, on_retry: Callback<u64>) -> impl IntoView {
	view! {
		<div class="notifications">
			{move || {
				notifications
					.get()
					.iter()
					.cloned()
					.map(|n| {
						let (id, retry) = (n.id, n.retry);
						let class = if n.is_error() { "notification notification_error" } else { "notification" };
						view! {
							<div class=class>
								<span>{n.message}</span>
								{retry.then(|| view! {
									<button on:click=move |_| {
										notifications.update(|q| q.dismiss(id));
										on_retry.run(id);
									}>"Retry"</button>
								})}
								<button on:click=move |_| notifications.update(|q| q.dismiss(id))>"×"</button>
							</div>
						}
					})
					.collect_view()
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reset_restores_demo_scheme() {
		let fields = FormFields::new(true);
		fields.scheme.set(Some(PathScheme::S3));
		fields.path.set("bucket/model.pkl".into());
		fields.reset();
		assert_eq!(fields.scheme.get_untracked(), Some(PathScheme::Store));
		assert_eq!(fields.form().target_path.full_path(), "store://");

		let fields = FormFields::new(false);
		fields.reset();
		assert_eq!(fields.scheme.get_untracked(), None);
	}

	#[test]
	fn adding_a_label_clears_the_error() {
		let fields = FormFields::new(false);
		fields.label_input.set("broken".into());
		fields.add_label();
		assert!(fields.error.get_untracked().is_some());

		fields.label_input.set("team: risk".into());
		fields.add_label();
		assert_eq!(fields.error.get_untracked(), None);
		assert_eq!(fields.label_input.get_untracked(), "");
		assert_eq!(
			fields.form().labels,
			[Label {
				key: "team".into(),
				value: "risk".into()
			}]
		);
	}
}
