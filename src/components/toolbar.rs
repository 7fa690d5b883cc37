use leptos::prelude::*;

use crate::graph::LayoutKind;

/// Which view the graph area shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
	#[default]
	Network,
	Orbital,
	Scene3d,
}

impl ViewMode {
	pub const ALL: [ViewMode; 3] = [ViewMode::Network, ViewMode::Orbital, ViewMode::Scene3d];

	pub fn label(self) -> &'static str {
		match self {
			ViewMode::Network => "Network",
			ViewMode::Orbital => "Orbital",
			ViewMode::Scene3d => "3D",
		}
	}

	/// 2D layout strategy; the 3D view places nodes itself.
	pub fn layout(self) -> LayoutKind {
		match self {
			ViewMode::Orbital => LayoutKind::Orbital,
			ViewMode::Network | ViewMode::Scene3d => LayoutKind::Force,
		}
	}
}

#[component]
pub fn Toolbar(
	mode: RwSignal<ViewMode>,
	connecting: RwSignal<bool>,
	#[prop(into)] has_selection: Signal<bool>,
	on_delete: Callback<()>,
) -> impl IntoView {
	view! {
		<nav class="toolbar">
			<div class="mode-tabs">
				{ViewMode::ALL
					.into_iter()
					.map(|m| {
						view! {
							<button
								class=move || if mode.get() == m { "tab active" } else { "tab" }
								on:click=move |_| mode.set(m)
							>
								{m.label()}
							</button>
						}
					})
					.collect_view()}
			</div>
			<button
				class=move || if connecting.get() { "active" } else { "" }
				on:click=move |_| connecting.update(|on| *on = !*on)
			>
				{move || if connecting.get() { "Cancel link" } else { "Connect nodes" }}
			</button>
			<button disabled=move || !has_selection.get() on:click=move |_| on_delete.run(())>
				"Delete selected"
			</button>
		</nav>
	}
}
