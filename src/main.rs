use leptos::prelude::*;
use pipeline_dashboard::config::DashboardConfig;
use pipeline_dashboard::{App, init_logging};

fn main() {
	let config = DashboardConfig::from_document();
	init_logging(config.level());
	leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
