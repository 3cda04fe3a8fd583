use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Outlet;
use leptos_router::hooks::use_params_map;
use log::warn;

use crate::api::ApiClient;
use crate::components::register_model::NotificationList;
use crate::components::workflow_view::WorkflowView;
use crate::config::DashboardConfig;
use crate::notifications::NotificationQueue;
use crate::routes::RouteParams;
use crate::workflow::JobSummary;
use crate::workflow::selection::Selection;

/// Selection published by the active details route.
#[derive(Clone, Copy)]
struct RouteSelection(RwSignal<Selection>);

/// Workflow page. Mounted once per visit; the nested details routes only
/// change the selection, so the controller, view mode and canvas survive.
#[component]
pub fn WorkflowPage(config: DashboardConfig) -> impl IntoView {
	let params = use_params_map();
	let route = Memo::new(move |_| {
		params.with(|p| {
			RouteParams::new(
				p.get("project_name").unwrap_or_default(),
				p.get("page_tab").unwrap_or_default(),
				p.get("workflow_id").unwrap_or_default(),
			)
		})
	});
	let selection = RwSignal::new(Selection::none());
	provide_context(RouteSelection(selection));

	let api = ApiClient::from_config(&config);
	let content = RwSignal::new(Vec::<JobSummary>::new());
	let notifications = RwSignal::new(NotificationQueue::default());
	let runs_api = StoredValue::new_local(api.clone());

	// project run listing backs the list view and the details panel
	let project = Memo::new(move |_| route.with(|r| r.project_name.clone()));
	Effect::new(move |_| {
		let project = project.get();
		let api = runs_api.get_value();
		spawn_local(async move {
			match api.fetch_runs(&project).await {
				Ok(runs) => content.set(runs),
				Err(e) => {
					warn!("failed to list runs of `{project}`: {e}");
					notifications.update(|q| {
						q.push(400, "Failed to fetch jobs", false);
					});
				}
			}
		});
	});

	view! {
		<WorkflowView
			route=route
			selection=selection
			content=content
			api=api
			layout=config.layout.clone()
		/>
		<NotificationList notifications=notifications on_retry=Callback::new(|_| ()) />
		<Outlet />
	}
}

/// Nested under [`WorkflowPage`]: copies the details segments of the URL into
/// the page's selection.
#[component]
pub fn SelectionFromRoute() -> impl IntoView {
	let params = use_params_map();
	let target = use_context::<RouteSelection>();
	Effect::new(move |_| {
		let next = params.with(|p| {
			Selection::from_route(p.get("job_id"), p.get("function_name"), p.get("function_hash"))
		});
		let Some(RouteSelection(selection)) = target else {
			warn!("details route rendered outside a workflow page");
			return;
		};
		if selection.with_untracked(|current| *current != next) {
			selection.set(next);
		}
	});
}
