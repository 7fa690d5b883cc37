use leptos::ev;
use leptos::prelude::*;

use crate::graph::FilterCriteria;

fn options(values: Vec<String>) -> impl IntoView {
	values
		.into_iter()
		.map(|value| {
			let text = value.clone();
			view! { <option value=value>{text}</option> }
		})
		.collect_view()
}

/// Score threshold plus category and region selectors. An empty selection
/// means "All".
#[component]
pub fn FilterPanel(
	criteria: RwSignal<FilterCriteria>,
	#[prop(into)] categories: Signal<Vec<String>>,
	#[prop(into)] regions: Signal<Vec<String>>,
) -> impl IntoView {
	let on_score = move |ev: ev::Event| {
		let value = event_target_value(&ev).parse::<f64>().unwrap_or(0.0);
		criteria.update(|c| c.min_score = value.max(0.0));
	};
	let on_category = move |ev: ev::Event| {
		let value = event_target_value(&ev);
		criteria.update(|c| c.category = (!value.is_empty()).then_some(value));
	};
	let on_region = move |ev: ev::Event| {
		let value = event_target_value(&ev);
		criteria.update(|c| c.region = (!value.is_empty()).then_some(value));
	};

	view! {
		<section class="panel filter-panel">
			<h3>"Filters"</h3>
			<label>
				{move || format!("Minimum score: {}", criteria.with(|c| c.min_score))}
				<input
					type="range"
					min="0"
					max="100"
					step="1"
					prop:value=move || criteria.with(|c| c.min_score.to_string())
					on:input=on_score
				/>
			</label>
			<label>
				"Category"
				<select
					prop:value=move || criteria.with(|c| c.category.clone().unwrap_or_default())
					on:change=on_category
				>
					<option value="">"All"</option>
					{move || options(categories.get())}
				</select>
			</label>
			<label>
				"Region"
				<select
					prop:value=move || criteria.with(|c| c.region.clone().unwrap_or_default())
					on:change=on_region
				>
					<option value="">"All"</option>
					{move || options(regions.get())}
				</select>
			</label>
			<button on:click=move |_| criteria.set(FilterCriteria::default())>"Reset filters"</button>
		</section>
	}
}
