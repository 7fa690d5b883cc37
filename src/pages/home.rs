use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use std::time::Duration;

use crate::components::add_node::AddNodeForm;
use crate::components::detail_panel::DetailPanel;
use crate::components::filters::FilterPanel;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::graph3d::Graph3dCanvas;
use crate::components::ranking::RankingPanel;
use crate::components::toolbar::{Toolbar, ViewMode};
use crate::graph::{
	FilterCriteria, Graph, GraphConfig, GraphData, Intent, NodeDraft, NodeId, filter, loader,
	rank,
};

const STATUS_TTL: Duration = Duration::from_millis(2500);

/// Influence network page. Owns the graph; every panel and canvas reads
/// from it and writes back only through intents and callbacks.
#[component]
pub fn Home() -> impl IntoView {
	let config = GraphConfig::default();

	let graph = RwSignal::new(Graph::default());
	let loading = RwSignal::new(true);
	let criteria = RwSignal::new(FilterCriteria::default());
	let selected = RwSignal::new(None::<NodeId>);
	let connecting = RwSignal::new(false);
	let mode = RwSignal::new(ViewMode::default());
	let status = RwSignal::new(None::<String>);
	let status_timer = StoredValue::new(None::<TimeoutHandle>);

	let url = config.data_url.clone();
	spawn_local(async move {
		let data = loader::load_or_placeholder(&url).await;
		graph.set(Graph::from_data(data));
		loading.set(false);
	});

	// Short-lived message; a newer one replaces the pending timer.
	let notify = move |message: String| {
		if let Some(handle) = status_timer.get_value() {
			handle.clear();
		}
		status.set(Some(message));
		match set_timeout_with_handle(move || status.set(None), STATUS_TTL) {
			Ok(handle) => status_timer.set_value(Some(handle)),
			Err(err) => warn!("Status timer failed: {err:?}"),
		}
	};
	on_cleanup(move || {
		if let Some(Some(handle)) = status_timer.try_get_value() {
			handle.clear();
		}
	});

	let view_data = Memo::new(move |_| criteria.with(|c| graph.with(|g| c.apply(g))));
	let categories = Memo::new(move |_| graph.with(|g| filter::categories(g.nodes())));
	let regions = Memo::new(move |_| graph.with(|g| filter::regions(g.nodes())));
	let ranking_size = config.ranking_size;
	let ranking = Memo::new(move |_| view_data.with(|d| rank(&d.nodes, ranking_size)));
	let style = config.style.clone();
	let details = Memo::new(move |_| {
		let id = selected.get()?;
		graph.with(|g| g.details(&id, &style))
	});
	let layout = Signal::derive(move || mode.get().layout());
	let has_selection = Signal::derive(move || selected.with(Option::is_some));

	// Drop a selection that the filter hides or that no longer exists.
	Effect::new(move |_| {
		let visible = view_data.with(|d| {
			selected.with_untracked(|s| s.as_ref().is_none_or(|id| d.nodes.iter().any(|n| &n.id == id)))
		});
		if !visible {
			selected.set(None);
		}
	});

	let remove = move |id: NodeId| {
		if let Some(node) = graph.try_update(|g| g.remove_node(&id)).flatten() {
			info!("Removed node {}", node.id);
			selected.set(None);
			notify(format!("Removed {}", node.label));
		}
	};

	let on_intent = Callback::new(move |intent: Intent| match intent {
		Intent::Selected(id) => selected.set(id),
		Intent::Connect { source, target } => match graph.try_update(|g| g.connect(&source, &target)) {
			Some(Ok(())) => notify("Link created".into()),
			Some(Err(err)) => warn!("Link rejected: {err}"),
			None => {}
		},
		Intent::Remove(id) => remove(id),
		Intent::ConnectModeChanged(on) => connecting.set(on),
		Intent::Pin { .. } | Intent::MoveTo { .. } | Intent::Release(_) => {}
	});

	let on_add = Callback::new(move |draft: NodeDraft| {
		let now = js_sys::Date::now() as i64;
		match graph.try_update(|g| g.add_node(draft, now)) {
			Some(Ok(id)) => {
				selected.set(Some(id));
				notify("Node added".into());
			}
			Some(Err(err)) => {
				warn!("Rejected new node: {err}");
				notify(err.to_string());
			}
			None => {}
		}
	});
	let on_edit = Callback::new(move |(id, draft): (NodeId, NodeDraft)| {
		match graph.try_update(|g| g.edit_node(&id, draft)) {
			Some(Ok(())) => notify("Node updated".into()),
			Some(Err(err)) => {
				warn!("Rejected edit of {id}: {err}");
				notify(err.to_string());
			}
			None => {}
		}
	});
	let on_select = Callback::new(move |id: NodeId| selected.set(Some(id)));
	let on_close = Callback::new(move |()| selected.set(None));
	let on_delete = Callback::new(remove);
	let on_delete_selected = Callback::new(move |()| {
		if let Some(id) = selected.get_untracked() {
			remove(id);
		}
	});

	let config = StoredValue::new(config);
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="influence-app">
				<header class="app-header">
					<h1>"Influence Network"</h1>
					<Toolbar
						mode=mode
						connecting=connecting
						has_selection=has_selection
						on_delete=on_delete_selected
					/>
				</header>

				<aside class="sidebar">
					<FilterPanel criteria=criteria categories=categories regions=regions />
					<RankingPanel ranking=ranking on_select=on_select />
					<AddNodeForm categories=categories on_submit=on_add />
				</aside>

				<main class="graph-area">
					<Show
						when=move || !loading.get()
						fallback=|| view! { <p class="empty-state">"Loading network..."</p> }
					>
						<Show
							when=move || !view_data.with(GraphData::is_empty)
							fallback=|| {
								view! {
									<p class="empty-state">
										"No nodes. Adjust the filters or add a node."
									</p>
								}
							}
						>
							<Show
								when=move || mode.get() == ViewMode::Scene3d
								fallback=move || {
									view! {
										<ForceGraphCanvas
											data=view_data
											layout=layout
											connecting=connecting
											selected=selected
											on_intent=on_intent
											config=config.get_value()
										/>
									}
								}
							>
								<Graph3dCanvas
									data=view_data
									connecting=connecting
									selected=selected
									on_intent=on_intent
									config=config.get_value()
								/>
							</Show>
						</Show>
					</Show>

					<Show when=move || connecting.get()>
						<div class="graph-overlay connect-hint">
							"Click the source node, then the target. Escape cancels."
						</div>
					</Show>
					{move || status.get().map(|message| view! { <div class="status-toast">{message}</div> })}
				</main>

				<DetailPanel
					details=details
					on_close=on_close
					on_delete=on_delete
					on_edit=on_edit
				/>
			</div>
		</ErrorBoundary>
	}
}
