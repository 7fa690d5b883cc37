use leptos::ev;
use leptos::prelude::*;
use log::warn;

use crate::graph::NodeDraft;

/// Form for a new node. Blank labels are rejected here and never reach the
/// graph.
#[component]
pub fn AddNodeForm(
	#[prop(into)] categories: Signal<Vec<String>>,
	on_submit: Callback<NodeDraft>,
) -> impl IntoView {
	let label = RwSignal::new(String::new());
	let category = RwSignal::new(String::new());
	let region = RwSignal::new(String::new());
	let score = RwSignal::new(50.0_f64);
	let error = RwSignal::new(None::<&'static str>);

	let submit = move |ev: ev::SubmitEvent| {
		ev.prevent_default();
		let text = label.get_untracked();
		if text.trim().is_empty() {
			warn!("Rejected new node: empty label");
			error.set(Some("A label is required"));
			return;
		}
		error.set(None);
		let non_empty = |v: String| Some(v).filter(|v| !v.trim().is_empty());
		on_submit.run(NodeDraft {
			label: text.trim().to_string(),
			category: non_empty(category.get_untracked()),
			region: non_empty(region.get_untracked()),
			score: score.get_untracked().max(0.0),
			influence: None,
		});
		label.set(String::new());
	};

	view! {
		<form class="panel add-node" on:submit=submit>
			<h3>"Add node"</h3>
			<input
				type="text"
				placeholder="Label"
				prop:value=move || label.get()
				on:input=move |ev| label.set(event_target_value(&ev))
			/>
			<select on:change=move |ev| category.set(event_target_value(&ev))>
				<option value="">"No category"</option>
				{move || {
					categories
						.get()
						.into_iter()
						.map(|c| {
							let text = c.clone();
							view! { <option value=c>{text}</option> }
						})
						.collect_view()
				}}
			</select>
			<input
				type="text"
				placeholder="Region"
				prop:value=move || region.get()
				on:input=move |ev| region.set(event_target_value(&ev))
			/>
			<input
				type="number"
				min="0"
				prop:value=move || score.get().to_string()
				on:input=move |ev| score.set(event_target_value(&ev).parse().unwrap_or(0.0))
			/>
			{move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
			<button type="submit">"Add"</button>
		</form>
	}
}
