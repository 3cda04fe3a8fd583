//! Leptos client-side dashboard for pipeline workflows and model registration.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod api;
pub mod artifacts;
pub mod config;
pub mod error;
pub mod notifications;
pub mod routes;
pub mod workflow;
pub mod yaml;

// UI
mod components;
mod pages;

use crate::config::DashboardConfig;
use crate::pages::models::ModelsPage;
use crate::pages::not_found::NotFound;
use crate::pages::workflow::{SelectionFromRoute, WorkflowPage};

pub use crate::error::DashboardError;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging(level: Level) {
	let _ = console_log::init_with_level(level);
	console_error_panic_hook::set_once();
	info!("Logging initialized at {level}");
}

/// The dashboard router.
#[component]
pub fn App(config: DashboardConfig) -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let (workflow_cfg, models_cfg) = (config.clone(), config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		<Title text="Pipelines" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				// selecting a job or function swaps the outlet only; the workflow page stays mounted
				<ParentRoute
					path=path!("/projects/:project_name/jobs/:page_tab/workflow/:workflow_id")
					view=move || view! { <WorkflowPage config=workflow_cfg.clone() /> }
				>
					<Route path=path!("") view=SelectionFromRoute />
					<Route path=path!(":job_id/:tab") view=SelectionFromRoute />
					<Route path=path!(":function_name/:function_hash/:tab") view=SelectionFromRoute />
				</ParentRoute>
				<Route
					path=path!("/projects/:project_name/models")
					view=move || view! { <ModelsPage config=models_cfg.clone() /> }
				/>
			</Routes>
		</Router>
	}
}
