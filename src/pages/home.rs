use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::components::force_graph::{ForceGraphCanvas, LoadStatus};
use crate::components::year_select::YearSelect;
use crate::config::AppConfig;

fn status_text(status: Option<LoadStatus>) -> String {
	match status {
		None => String::new(),
		Some(LoadStatus::Loading(year)) => format!("Loading {year}…"),
		Some(LoadStatus::Loaded { year, nodes, links }) => {
			format!("{year}: {nodes} papers, {links} citations")
		}
		Some(LoadStatus::Failed { year, message }) => format!("Could not load {year}: {message}"),
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let query = use_query_map();
	let initial = config.year_or_initial(query.get_untracked().get("year").as_deref());
	let (year, set_year) = signal(initial);
	let (status, set_status) = signal(None::<LoadStatus>);

	// Keep the selection in the URL so a reload shows the same year.
	let navigate = use_navigate();
	Effect::new(move |_| {
		let year = year.get();
		navigate(
			&format!("/?year={year}"),
			NavigateOptions {
				replace: true,
				..Default::default()
			},
		);
	});

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas
				year=year
				on_status=move |s: LoadStatus| set_status.set(Some(s))
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Citation Network"</h1>
				<YearSelect years=config.years.clone() selected=year set_selected=set_year />
				<p class="status" class:error=move || matches!(status.get(), Some(LoadStatus::Failed { .. }))>
					{move || status_text(status.get())}
				</p>
				<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_lines() {
		assert_eq!(status_text(None), "");
		assert_eq!(status_text(Some(LoadStatus::Loading(1990))), "Loading 1990…");
		assert_eq!(
			status_text(Some(LoadStatus::Loaded {
				year: 1990,
				nodes: 2,
				links: 1
			})),
			"1990: 2 papers, 1 citations"
		);
		assert_eq!(
			status_text(Some(LoadStatus::Failed {
				year: 1991,
				message: "HTTP 404".into()
			})),
			"Could not load 1991: HTTP 404"
		);
	}
}
