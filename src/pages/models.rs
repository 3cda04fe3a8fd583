use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;
use log::warn;

use crate::api::ApiClient;
use crate::artifacts::{ModelSummary, RegisterModelForm};
use crate::components::register_model::{NotificationList, RegisterModelPopUp, submit_registration};
use crate::config::DashboardConfig;
use crate::notifications::NotificationQueue;

/// Project models page: the model listing and the registration modal.
#[component]
pub fn ModelsPage(config: DashboardConfig) -> impl IntoView {
	let params = use_params_map();
	let project = Memo::new(move |_| params.with(|p| p.get("project_name").unwrap_or_default()));

	let api = ApiClient::from_config(&config);
	let page_api = StoredValue::new_local(api.clone());
	let is_open = RwSignal::new(false);
	let notifications = RwSignal::new(NotificationQueue::default());
	let last_submitted = RwSignal::new(None::<RegisterModelForm>);
	let models = RwSignal::new(Vec::<ModelSummary>::new());
	// bumped after each accepted registration to reload the listing
	let refresh = RwSignal::new(0u64);

	Effect::new(move |_| {
		let project = project.get();
		refresh.track();
		let api = page_api.get_value();
		spawn_local(async move {
			match api.fetch_models(&project).await {
				Ok(list) => models.set(list),
				Err(e) => warn!("failed to list models of `{project}`: {e}"),
			}
		});
	});

	let on_registered = Callback::new(move |_| refresh.update(|n| *n += 1));

	let on_retry = Callback::new(move |_id: u64| {
		let Some(form) = last_submitted.get_untracked() else {
			return;
		};
		let result = submit_registration(
			page_api.get_value(),
			project.get_untracked(),
			form,
			notifications,
			on_registered,
		);
		if let Err(e) = result {
			warn!("retry rejected: {e}");
		}
	});

	view! {
		<div class="models-page">
			<div class="models-page__header">
				<h2>{move || project.get()}</h2>
				<button class="btn-secondary" on:click=move |_| is_open.set(true)>
					"Register model"
				</button>
			</div>
			<table class="table">
				<thead>
					<tr>
						<th>"Name"</th>
						<th>"Labels"</th>
						<th>"Path"</th>
						<th>"Description"</th>
					</tr>
				</thead>
				<tbody>
					{move || {
						models
							.get()
							.into_iter()
							.map(|model| {
								let chips = model
									.label_chips()
									.into_iter()
									.map(|chip| view! { <span class="chip">{chip}</span> })
									.collect_view();
								view! {
									<tr class="table-row">
										<td title=model.tree>{model.key}</td>
										<td>{chips}</td>
										<td>{model.target_path.unwrap_or_default()}</td>
										<td>{model.description.unwrap_or_default()}</td>
									</tr>
								}
							})
							.collect_view()
					}}
				</tbody>
			</table>
			<RegisterModelPopUp
				is_open=is_open
				project_name=project
				api=api
				demo_mode=config.demo_mode
				notifications=notifications
				last_submitted=last_submitted
				on_registered=on_registered
			/>
			<NotificationList notifications=notifications on_retry=on_retry />
		</div>
	}
}
