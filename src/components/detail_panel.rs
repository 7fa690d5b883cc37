use leptos::ev;
use leptos::prelude::*;

use crate::graph::{NodeDetails, NodeDraft, NodeId};

/// Snapshot of the selected node. Renders nothing when nothing is selected.
#[component]
pub fn DetailPanel(
	#[prop(into)] details: Signal<Option<NodeDetails>>,
	on_close: Callback<()>,
	on_delete: Callback<NodeId>,
	on_edit: Callback<(NodeId, NodeDraft)>,
) -> impl IntoView {
	let editing = RwSignal::new(false);
	let draft = RwSignal::new(NodeDraft::default());

	// A new selection always opens read-only.
	Effect::new(move |_| {
		details.track();
		editing.set(false);
	});

	let start_edit = move |d: &NodeDetails| {
		draft.set(NodeDraft {
			label: d.label.clone(),
			category: d.category.clone(),
			region: d.region.clone(),
			score: d.score,
			influence: d.influence,
		});
		editing.set(true);
	};

	let summary = move |d: NodeDetails| {
		let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".into());
		let id = d.id.clone();
		let snapshot = d.clone();
		view! {
			<dl>
				<dt>"Id"</dt>
				<dd>{d.id.to_string()}</dd>
				<dt>"Category"</dt>
				<dd>{or_dash(d.category)}</dd>
				<dt>"Region"</dt>
				<dd>{or_dash(d.region)}</dd>
				<dt>"Score"</dt>
				<dd>{d.score.to_string()}</dd>
				<dt>"Influence"</dt>
				<dd>{d.magnitude.to_string()}</dd>
				<dt>"Connections"</dt>
				<dd>{d.connections}</dd>
				<dt>"Size"</dt>
				<dd>{format!("{:.0}px", d.radius * 2.0)}</dd>
			</dl>
			<div class="actions">
				<button on:click=move |_| start_edit(&snapshot)>"Edit"</button>
				<button class="danger" on:click=move |_| on_delete.run(id.clone())>
					"Delete node"
				</button>
			</div>
		}
	};

	let editor = move |id: NodeId| {
		let submit = move |ev: ev::SubmitEvent| {
			ev.prevent_default();
			on_edit.run((id.clone(), draft.get_untracked()));
			editing.set(false);
		};
		let text = |v: Option<String>| v.unwrap_or_default();
		let optional = |v: String| Some(v).filter(|v| !v.trim().is_empty());
		view! {
			<form class="edit-node" on:submit=submit>
				<input
					type="text"
					placeholder="Label"
					prop:value=move || draft.with(|d| d.label.clone())
					on:input=move |ev| draft.update(|d| d.label = event_target_value(&ev))
				/>
				<input
					type="text"
					placeholder="Category"
					prop:value=move || draft.with(|d| text(d.category.clone()))
					on:input=move |ev| draft.update(|d| d.category = optional(event_target_value(&ev)))
				/>
				<input
					type="text"
					placeholder="Region"
					prop:value=move || draft.with(|d| text(d.region.clone()))
					on:input=move |ev| draft.update(|d| d.region = optional(event_target_value(&ev)))
				/>
				<input
					type="number"
					min="0"
					prop:value=move || draft.with(|d| d.score.to_string())
					on:input=move |ev| {
						draft.update(|d| d.score = event_target_value(&ev).parse().unwrap_or(0.0))
					}
				/>
				<input
					type="number"
					min="0"
					placeholder="Influence"
					prop:value=move || draft.with(|d| d.influence.map(|v| v.to_string()).unwrap_or_default())
					on:input=move |ev| {
						draft.update(|d| d.influence = event_target_value(&ev).parse().ok())
					}
				/>
				<div class="actions">
					<button type="submit">"Save"</button>
					<button type="button" on:click=move |_| editing.set(false)>
						"Cancel"
					</button>
				</div>
			</form>
		}
	};

	move || {
		details.get().map(|d| {
			let body = if editing.get() {
				editor(d.id.clone()).into_any()
			} else {
				summary(d.clone()).into_any()
			};
			view! {
				<aside class="panel detail-panel">
					<header>
						<span class="swatch" style=format!("background: {};", d.color)></span>
						<h3>{d.label.clone()}</h3>
						<button class="close" title="Close" on:click=move |_| on_close.run(())>
							"×"
						</button>
					</header>
					{body}
				</aside>
			}
		})
	}
}
