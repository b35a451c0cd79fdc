use leptos::prelude::*;

use chronoatlas_shared::chronology::format_year;
use chronoatlas_shared::colors::empire_color;
use chronoatlas_shared::coordinator::{Selection, ViewerState};

use crate::app::ShowPanel;
use crate::colors::rgba_css;
use wasm_bindgen::JsCast;

/// Right-hand info panel: era summary, empire roster, and the detail view
/// for whatever is selected on the map. Collapsible via the edge toggle;
/// the open/closed state is remembered across sessions.
#[component]
pub fn InfoPanel() -> impl IntoView {
    let viewer: RwSignal<ViewerState> = expect_context();
    let ShowPanel(panel_open) = expect_context();

    let summary = move || viewer.with(|vs| vs.snapshot().map(|s| s.era_summary.clone()));
    let empires = move || {
        viewer.with(|vs| {
            vs.snapshot()
                .map(|s| {
                    s.empires
                        .iter()
                        .enumerate()
                        .map(|(i, e)| (i, e.name.clone(), empire_color(&e.name, &e.color)))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
    };

    view! {
        <button
            title=move || if panel_open.get() { "Hide panel (I)" } else { "Show panel (I)" }
            style="position: absolute; top: 16px; z-index: 21; width: 32px; height: 32px; background: #13161f; border: 1px solid #282c3e; border-radius: 6px; cursor: pointer; display: flex; align-items: center; justify-content: center; transition: border-color 0.15s, background 0.15s, color 0.15s, right 0.15s; color: #5a5860; font-family: 'JetBrains Mono', monospace; font-size: 1.1rem; line-height: 1;"
            style:right=move || if panel_open.get() { "312px" } else { "16px" }
            on:click=move |_| panel_open.update(|v| *v = !*v)
            on:mouseenter=move |e| {
                if let Some(el) = e.target().and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) {
                    el.style().set_property("border-color", "rgba(245,197,66,0.4)").ok();
                    el.style().set_property("color", "#f5c542").ok();
                }
            }
            on:mouseleave=move |e| {
                if let Some(el) = e.target().and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) {
                    el.style().set_property("border-color", "#282c3e").ok();
                    el.style().set_property("color", "#5a5860").ok();
                }
            }
        >
            {move || if panel_open.get() { "\u{00BB}" } else { "\u{00AB}" }}
        </button>
        <div
            style="position: absolute; top: 0; right: 0; bottom: 76px; width: 300px; z-index: 20; background: rgba(19,22,31,0.92); border-left: 1px solid #282c3e; display: flex; flex-direction: column; overflow-y: auto; font-family: 'Inter', system-ui, sans-serif;"
            style:display=move || if panel_open.get() { "flex" } else { "none" }
        >
            // Header
            <div style="padding: 14px 16px 10px; border-bottom: 1px solid #282c3e;">
                <div style="font-size: 0.95rem; font-weight: 700; color: #e2e0d8; font-family: 'JetBrains Mono', monospace; letter-spacing: 0.04em;">
                    "ChronoAtlas"
                </div>
                <div style="font-size: 0.72rem; color: #f5c542; font-family: 'JetBrains Mono', monospace; margin-top: 2px; font-variant-numeric: tabular-nums;">
                    {move || {
                        viewer.with(|vs| match vs.snapshot() {
                            Some(s) => format_year(s.year),
                            None => format_year(vs.target_year()),
                        })
                    }}
                </div>
            </div>

            // Era summary
            {move || {
                summary().map(|text| view! {
                    <div style="padding: 12px 16px; border-bottom: 1px solid #282c3e;">
                        <div style="font-size: 0.62rem; color: #5a5860; font-family: 'JetBrains Mono', monospace; letter-spacing: 0.08em; margin-bottom: 6px;">
                            "THE ERA"
                        </div>
                        <div style="font-size: 0.74rem; color: #9a9590; line-height: 1.5;">
                            {text}
                        </div>
                    </div>
                })
            }}

            // Empire roster
            {move || {
                let list = empires();
                (!list.is_empty()).then(|| view! {
                    <div style="padding: 12px 16px; border-bottom: 1px solid #282c3e;">
                        <div style="font-size: 0.62rem; color: #5a5860; font-family: 'JetBrains Mono', monospace; letter-spacing: 0.08em; margin-bottom: 6px;">
                            "POWERS"
                        </div>
                        {list.into_iter().map(|(i, name, (r, g, b))| {
                            let is_selected = move || {
                                viewer.with(|vs| vs.selection() == Selection::Empire(i))
                            };
                            view! {
                                <button
                                    style="display: flex; align-items: center; gap: 8px; width: 100%; background: none; border: none; border-radius: 4px; padding: 5px 6px; cursor: pointer; text-align: left; font-size: 0.74rem; color: #e2e0d8; font-family: 'Inter', system-ui, sans-serif;"
                                    style:background=move || {
                                        if is_selected() { "rgba(245,197,66,0.08)" } else { "transparent" }
                                    }
                                    on:click=move |_| viewer.update(|vs| vs.select_empire(i))
                                >
                                    <span style={format!(
                                        "width: 10px; height: 10px; border-radius: 50%; flex-shrink: 0; background: {};",
                                        rgba_css(r, g, b, 0.9)
                                    )} />
                                    {name}
                                </button>
                            }
                        }).collect::<Vec<_>>()}
                    </div>
                })
            }}

            // Selection detail
            {move || {
                viewer.with(|vs| {
                    if let Some(empire) = vs.selected_empire() {
                        let (r, g, b) = empire_color(&empire.name, &empire.color);
                        Some(view! {
                            <div style="padding: 12px 16px;">
                                <DetailHeader label="EMPIRE" />
                                <div style="display: flex; align-items: center; gap: 8px; margin-bottom: 6px;">
                                    <span style={format!(
                                        "width: 10px; height: 10px; border-radius: 50%; flex-shrink: 0; background: {};",
                                        rgba_css(r, g, b, 0.9)
                                    )} />
                                    <span style="font-size: 0.82rem; font-weight: 700; color: #e2e0d8;">
                                        {empire.name.clone()}
                                    </span>
                                </div>
                                <div style="font-size: 0.72rem; color: #9a9590; line-height: 1.5;">
                                    {empire.description.clone()}
                                </div>
                                <div style="font-size: 0.65rem; color: #5a5860; font-family: 'JetBrains Mono', monospace; margin-top: 8px;">
                                    {format!("Sphere of influence ~{:.0} km", empire.radius_km)}
                                </div>
                            </div>
                        }.into_any())
                    } else if let Some(event) = vs.selected_event() {
                        Some(view! {
                            <div style="padding: 12px 16px;">
                                <DetailHeader label="EVENT" />
                                <div style="display: flex; align-items: center; gap: 8px; margin-bottom: 6px;">
                                    <span style="font-size: 0.58rem; color: #fbbf24; border: 1px solid rgba(251,191,36,0.4); border-radius: 3px; padding: 1px 6px; font-family: 'JetBrains Mono', monospace; letter-spacing: 0.05em;">
                                        {event.kind.label()}
                                    </span>
                                    <span style="font-size: 0.82rem; font-weight: 700; color: #e2e0d8;">
                                        {event.title.clone()}
                                    </span>
                                </div>
                                <div style="font-size: 0.72rem; color: #9a9590; line-height: 1.5;">
                                    {event.description.clone()}
                                </div>
                            </div>
                        }.into_any())
                    } else {
                        None
                    }
                })
            }}
        </div>
    }
}

#[component]
fn DetailHeader(label: &'static str) -> impl IntoView {
    let viewer: RwSignal<ViewerState> = expect_context();
    view! {
        <div style="display: flex; align-items: center; justify-content: space-between; margin-bottom: 6px;">
            <span style="font-size: 0.62rem; color: #5a5860; font-family: 'JetBrains Mono', monospace; letter-spacing: 0.08em;">
                {label}
            </span>
            <button
                title="Close (Esc)"
                style="background: none; border: none; color: #5a5860; cursor: pointer; font-size: 0.8rem; line-height: 1; padding: 2px 4px;"
                on:click=move |_| viewer.update(|vs| vs.clear_selection())
            >
                "\u{2715}"
            </button>
        </div>
    }
}
