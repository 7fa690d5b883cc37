use leptos::prelude::*;

use crate::graph::style;
use crate::graph::{NodeId, Ranking};

/// Top-N list by magnitude. Read-only; clicking an entry only asks the owner
/// to select it.
#[component]
pub fn RankingPanel(#[prop(into)] ranking: Signal<Ranking>, on_select: Callback<NodeId>) -> impl IntoView {
	view! {
		<section class="panel ranking-panel">
			<h3>"Influence ranking"</h3>
			<Show
				when=move || !ranking.with(Ranking::is_empty)
				fallback=|| view! { <p class="empty-state">"No ranked nodes"</p> }
			>
				<ol class="ranking-list">
					{move || {
						ranking
							.get()
							.entries()
							.iter()
							.map(|entry| {
								let color = style::node_color(&entry.node).to_string();
								let id = entry.node.id.clone();
								view! {
									<li
										class="ranking-item"
										style=format!(
											"background: {color}20; border-left: 3px solid {color};",
										)
										on:click=move |_| on_select.run(id.clone())
									>
										<span class="ranking-position">{entry.position}</span>
										<div class="ranking-info">
											<div class="ranking-name">{entry.node.label.clone()}</div>
											<div class="ranking-score">
												{format!("{} pts", entry.node.magnitude())}
											</div>
										</div>
									</li>
								}
							})
							.collect_view()
					}}
				</ol>
			</Show>
		</section>
	}
}
