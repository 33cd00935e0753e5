use std::ops::RangeInclusive;

use leptos::prelude::*;
use log::warn;

/// Drop-down of the selectable dataset years.
#[component]
pub fn YearSelect(
	years: RangeInclusive<u16>,
	#[prop(into)] selected: Signal<u16>,
	set_selected: WriteSignal<u16>,
) -> impl IntoView {
	let options = years
		.map(|y| {
			view! {
				<option value=y.to_string() prop:selected=move || selected.get() == y>
					{y}
				</option>
			}
		})
		.collect_view();

	let on_change = move |ev: leptos::ev::Event| match event_target_value(&ev).parse::<u16>() {
		Ok(year) => set_selected.set(year),
		Err(err) => warn!("ignoring year selection: {err}"),
	};

	view! {
		<label class="year-select">
			"Year "
			<select id="yearSelect" on:change=on_change>
				{options}
			</select>
		</label>
	}
}
