use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use log::warn;

use super::workflow_graph::WorkflowGraphCanvas;
use crate::api::ApiClient;
use crate::routes::RouteParams;
use crate::workflow::navigation::{Navigator, navigate_on_click};
use crate::workflow::{
	DetailTarget, FetchTicket, JobSummary, LayeredLayout, LayoutConfig, RenderNode, Selection, ViewMode,
	WorkflowController,
};

/// `Navigator` over the router's history.
struct RouterNavigator<F>(F);

impl<F: Fn(&str, NavigateOptions)> Navigator for RouterNavigator<F> {
	fn push(&self, url: &str) {
		(self.0)(url, NavigateOptions::default());
	}
}

fn spawn_fetch(api: ApiClient, project: String, ticket: FetchTicket, controller: RwSignal<WorkflowController>) {
	spawn_local(async move {
		let result = api.fetch_workflow(&project, &ticket.workflow_id).await;
		controller.update(|c| {
			c.complete_fetch(&ticket, result);
		});
	});
}

/// Workflow page body: header, graph or list, details panel and YAML modal.
#[component]
pub fn WorkflowView(
	#[prop(into)] route: Signal<RouteParams>,
	#[prop(into)] selection: Signal<Selection>,
	#[prop(into)] content: Signal<Vec<JobSummary>>,
	api: ApiClient,
	layout: LayoutConfig,
) -> impl IntoView {
	let controller = RwSignal::new(WorkflowController::new(ViewMode::Graph));
	let api = StoredValue::new_local(api);
	let navigator = StoredValue::new_local(RouterNavigator(use_navigate()));

	// fetch on mount and whenever the workflow id changes
	Effect::new(move |_| {
		let route = route.get();
		if let Some(ticket) = controller.try_update(|c| c.set_workflow_id(&route.workflow_id)).flatten() {
			spawn_fetch(api.get_value(), route.project_name, ticket, controller);
		}
	});

	let engine = LayeredLayout::new(layout.clone());
	let layout = StoredValue::new(layout);
	let elements = Memo::new(move |_| controller.with(|c| c.elements(&selection.get(), &engine)));
	let jobs_content = Memo::new(move |_| controller.with(|c| c.jobs_content(&content.get())));
	let view_mode = Memo::new(move |_| controller.with(|c| c.view_mode()));

	let on_node_click = Callback::new(move |node: RenderNode| {
		let route = route.get_untracked();
		navigator.with_value(|nav| {
			navigate_on_click(&node, &route, nav);
		});
	});

	let on_retry = move |_| {
		if let Some(ticket) = controller.try_update(|c| c.retry()).flatten() {
			spawn_fetch(api.get_value(), route.get_untracked().project_name, ticket, controller);
		}
	};

	let toggle_yaml = move |_| {
		controller.update(|c| {
			if let Err(e) = c.toggle_yaml(&selection.get_untracked()) {
				warn!("could not render YAML: {e}");
			}
		});
	};

	let workflow_name = move || {
		controller.with(|c| c.workflow().map(|w| w.run.name.clone()).unwrap_or_default())
	};
	let graph_class = move || {
		if selection.get().any_selected() {
			"graph-view with-selected-job"
		} else {
			"graph-view"
		}
	};

	view! {
		<div class="workflow-container">
			<div class="workflow-header">
				<div class="link-back">
					<a href=move || route.get().back_link() class="link-back__icon" title="Back">
						"←"
					</a>
					<div class="link-back__title" title=workflow_name>
						{workflow_name}
					</div>
				</div>
				<div class="actions">
					<button class="yaml-btn" title="View YAML" on:click=toggle_yaml>
						"YAML"
					</button>
					<button
						class="toggle-view-btn"
						title=move || match view_mode.get() {
							ViewMode::Graph => "Switch to list view",
							ViewMode::List => "Switch to graph view",
						}
						on:click=move |_| controller.update(|c| c.toggle_view_mode())
					>
						{move || match view_mode.get() {
							ViewMode::Graph => "List",
							ViewMode::List => "Graph",
						}}
					</button>
				</div>
			</div>

			<Show when=move || controller.with(|c| c.error().is_some())>
				<div class="workflow-error">
					<span>
						"Failed to load workflow: "
						{move || controller.with(|c| c.error().unwrap_or_default().to_string())}
					</span>
					<button on:click=on_retry>"Retry"</button>
				</div>
			</Show>

			<div class="workflow-content">
				<Show
					when=move || view_mode.get() == ViewMode::Graph
					fallback=move || view! { <JobsTable jobs=jobs_content route=route selection=selection /> }
				>
					<div class=graph_class>
						<Show
							when=move || !elements.get().is_empty()
							fallback=move || {
								view! {
									<div class="graph-empty">
										{move || {
											if controller.with(|c| c.is_loading()) {
												"Loading workflow…"
											} else {
												"No steps to display"
											}
										}}
									</div>
								}
							}
						>
							<WorkflowGraphCanvas
								elements=elements
								layout=layout.get_value()
								on_node_click=on_node_click
							/>
						</Show>
						<Show when=move || selection.get().any_selected()>
							<DetailsPanel route=route selection=selection content=content />
						</Show>
					</div>
				</Show>

				<Show when=move || controller.with(|c| c.yaml().is_visible())>
					<div class="yaml-modal">
						<div class="yaml-modal__header">
							<span>"YAML"</span>
							<button on:click=toggle_yaml>"Close"</button>
						</div>
						<pre class="yaml-modal__body">
							{move || controller.with(|c| c.yaml().text().to_string())}
						</pre>
					</div>
				</Show>
			</div>
		</div>
	}
}

/// Side panel for the selected job or function. The job wins when both are set.
#[component]
fn DetailsPanel(
	#[prop(into)] route: Signal<RouteParams>,
	#[prop(into)] selection: Signal<Selection>,
	#[prop(into)] content: Signal<Vec<JobSummary>>,
) -> impl IntoView {
	let rows = move || {
		let selection = selection.get();
		match selection.detail_target() {
			Some(DetailTarget::Job(job)) => {
				let summary = content.with(|c| c.iter().find(|s| s.uid == job.uid).cloned());
				let mut rows = vec![("UID", job.uid.clone())];
				if let Some(summary) = summary {
					rows.push(("Name", summary.name));
					rows.extend(summary.state.map(|s| ("State", s)));
					rows.extend(summary.started_at.map(|s| ("Started", s)));
				}
				rows
			}
			Some(DetailTarget::Function(function)) => {
				vec![("Function", function.name.clone()), ("Hash", function.hash.clone())]
			}
			None => Vec::new(),
		}
	};

	view! {
		<aside class="table__item">
			<div class="item-header">
				<a href=move || route.get().close_details_link() class="item-header__close">
					"✕"
				</a>
			</div>
			<dl class="item-info">
				{move || {
					rows()
						.into_iter()
						.map(|(label, value)| view! {
							<dt>{label}</dt>
							<dd>{value}</dd>
						})
						.collect_view()
				}}
			</dl>
		</aside>
	}
}

/// List view: the workflow's runs in the order the project listing returned them.
#[component]
fn JobsTable(
	#[prop(into)] jobs: Signal<Vec<JobSummary>>,
	#[prop(into)] route: Signal<RouteParams>,
	#[prop(into)] selection: Signal<Selection>,
) -> impl IntoView {
	view! {
		<table class="table">
			<thead>
				<tr>
					<th>"Name"</th>
					<th>"UID"</th>
					<th>"State"</th>
					<th>"Started"</th>
				</tr>
			</thead>
			<tbody>
				{move || {
					let route = route.get();
					let selected = selection.get().job_uid().map(str::to_string);
					jobs.get()
						.into_iter()
						.map(|job| {
							let class = if selected.as_deref() == Some(job.uid.as_str()) {
								"table-row row_active"
							} else {
								"table-row"
							};
							view! {
								<tr class=class>
									<td>
										<a href=route.job_details_link(&job.uid)>{job.name}</a>
									</td>
									<td>{job.uid}</td>
									<td>{job.state.unwrap_or_default()}</td>
									<td>{job.started_at.unwrap_or_default()}</td>
								</tr>
							}
						})
						.collect_view()
				}}
			</tbody>
		</table>
	}
}
