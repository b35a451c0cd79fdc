use leptos::prelude::*;
use wasm_bindgen::JsCast;

use std::cell::RefCell;

use chronoatlas_shared::chronology::{YEAR_STEP, clamp_year};
use chronoatlas_shared::colors::empire_color;
use chronoatlas_shared::coordinator::ViewerState;
use chronoatlas_shared::overlay::OverlayHit;

use crate::colors::rgba_css;

use gloo_storage::Storage;

use crate::basemap::{self, BasemapStatus};
use crate::canvas::MapCanvas;
use crate::chronicle;
use crate::infopanel::InfoPanel;
use crate::timeline::Timeline;
use crate::viewport::Viewport;

/// Year shown on first load, before the user touches the timeline.
const INITIAL_YEAR: i32 = 100;

pub(crate) fn canvas_dimensions() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1200.0, 800.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (w, h)
}

struct KeydownBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

thread_local! {
    static KEYDOWN_BINDING: RefCell<Option<KeydownBinding>> = const { RefCell::new(None) };
}

/// Newtype wrappers to give same-shaped signals distinct types for Leptos
/// context. (Without them `provide_context` overwrites one with another.)
#[derive(Clone, Copy)]
pub(crate) struct Hovered(pub RwSignal<Option<OverlayHit>>);
#[derive(Clone, Copy)]
pub(crate) struct PlaybackActive(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct ShowLabels(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct ShowEvents(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct ShowPanel(pub RwSignal<bool>);

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Settings {
    last_year: i32,
    show_labels: bool,
    show_events: bool,
    show_panel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_year: INITIAL_YEAR,
            show_labels: true,
            show_events: true,
            show_panel: true,
        }
    }
}

/// Root application component. Provides global reactive signals via context.
#[component]
pub fn App() -> impl IntoView {
    let saved: Settings = gloo_storage::LocalStorage::get("chronoatlas_settings").unwrap_or_default();
    let start_year = clamp_year(saved.last_year);

    let viewer: RwSignal<ViewerState> = RwSignal::new(ViewerState::new(start_year));
    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());
    let hovered: RwSignal<Option<OverlayHit>> = RwSignal::new(None);
    let mouse_pos: RwSignal<(f64, f64)> = RwSignal::new((0.0, 0.0));
    let basemap_status: RwSignal<BasemapStatus, LocalStorage> =
        RwSignal::new_local(BasemapStatus::Loading);
    let playback_active: RwSignal<bool> = RwSignal::new(false);

    let show_labels: RwSignal<bool> = RwSignal::new(saved.show_labels);
    let show_events: RwSignal<bool> = RwSignal::new(saved.show_events);
    let show_panel: RwSignal<bool> = RwSignal::new(saved.show_panel);

    provide_context(viewer);
    provide_context(viewport);
    provide_context(Hovered(hovered));
    provide_context(mouse_pos);
    provide_context(basemap_status);
    provide_context(PlaybackActive(playback_active));
    provide_context(ShowLabels(show_labels));
    provide_context(ShowEvents(show_events));
    provide_context(ShowPanel(show_panel));

    // Persist settings to localStorage on any change
    Effect::new(move || {
        let settings = Settings {
            last_year: viewer.with(|vs| vs.committed_year().unwrap_or(vs.target_year())),
            show_labels: show_labels.get(),
            show_events: show_events.get(),
            show_panel: show_panel.get(),
        };
        let _ = gloo_storage::LocalStorage::set("chronoatlas_settings", &settings);
    });

    // One-time basemap load
    let basemap_started = RwSignal::new(false);
    Effect::new(move || {
        if basemap_started.get_untracked() {
            return;
        }
        basemap_started.set(true);
        basemap::load_topology(basemap_status);
    });

    // Initial snapshot for the default year, through the immediate path
    let initial_fetched = RwSignal::new(false);
    Effect::new(move || {
        if initial_fetched.get_untracked() {
            return;
        }
        initial_fetched.set(true);
        chronicle::commit_year(viewer, start_year);
    });

    // Playback engine (runs continuously, only advances while playing)
    Effect::new(move || {
        crate::playback::start_playback_engine();
    });

    // Global keyboard shortcuts
    Effect::new(move || {
        use wasm_bindgen::prelude::*;

        let Some(window) = web_sys::window() else {
            return;
        };

        KEYDOWN_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "keydown",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler =
            Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
                let key = e.key();
                let target_tag = e
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
                    .map(|el| el.tag_name())
                    .unwrap_or_default();

                // Don't intercept when typing in an input; the slider is
                // the exception so arrow keys keep stepping years.
                if target_tag == "TEXTAREA" {
                    return;
                }

                match key.as_str() {
                    "Escape" => {
                        viewer.update(|vs| vs.clear_selection());
                        hovered.set(None);
                    }
                    " " => {
                        e.prevent_default();
                        playback_active.update(|v| *v = !*v);
                    }
                    "ArrowLeft" => {
                        e.prevent_default();
                        playback_active.set(false);
                        let target = viewer.with_untracked(|vs| vs.target_year()) - YEAR_STEP;
                        chronicle::commit_year(viewer, target);
                    }
                    "ArrowRight" => {
                        e.prevent_default();
                        playback_active.set(false);
                        let target = viewer.with_untracked(|vs| vs.target_year()) + YEAR_STEP;
                        chronicle::commit_year(viewer, target);
                    }
                    "l" => {
                        show_labels.update(|v| *v = !*v);
                    }
                    "e" => {
                        show_events.update(|v| *v = !*v);
                    }
                    "i" => {
                        show_panel.update(|v| *v = !*v);
                    }
                    "0" | "r" => {
                        viewport.update(|vp| vp.reset());
                    }
                    "+" | "=" => {
                        e.prevent_default();
                        let (cw, ch) = canvas_dimensions();
                        viewport.update(|vp| vp.zoom_at(-120.0, cw / 2.0, ch / 2.0));
                    }
                    "-" => {
                        e.prevent_default();
                        let (cw, ch) = canvas_dimensions();
                        viewport.update(|vp| vp.zoom_at(120.0, cw / 2.0, ch / 2.0));
                    }
                    _ => {}
                }
            });

        if window
            .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            KEYDOWN_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(KeydownBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    view! {
        <div style="width: 100%; height: 100%; position: relative; overflow: hidden; background: #0c0e17;">
            <MapCanvas />
            <InfoPanel />
            <Timeline />
            <Tooltip />
        </div>
    }
}

/// What the cursor tooltip shows for a hovered overlay: headline,
/// secondary line, and accent color.
fn hover_caption(vs: &ViewerState, hit: OverlayHit) -> Option<(String, String, (u8, u8, u8))> {
    let snap = vs.snapshot()?;
    match hit {
        OverlayHit::Empire(i) => {
            let empire = snap.empires.get(i)?;
            Some((
                empire.name.clone(),
                format!("Sphere of influence ~{:.0} km", empire.radius_km),
                empire_color(&empire.name, &empire.color),
            ))
        }
        OverlayHit::Event(i) => {
            let event = snap.events.get(i)?;
            Some((
                event.title.clone(),
                event.kind.label().to_string(),
                (0xfb, 0xbf, 0x24),
            ))
        }
    }
}

/// Tooltip that follows the mouse cursor when hovering an empire circle
/// or an event pin.
#[component]
fn Tooltip() -> impl IntoView {
    let Hovered(hovered) = expect_context();
    let viewer: RwSignal<ViewerState> = expect_context();
    let mouse_pos: RwSignal<(f64, f64)> = expect_context();

    let caption = Memo::new(move |_| {
        let hit = hovered.get()?;
        viewer.with(|vs| hover_caption(vs, hit))
    });

    view! {
        {move || {
            let Some((headline, detail, (r, g, b))) = caption.get() else {
                return view! { <div style="display:none;" /> }.into_any();
            };
            let (x, y) = mouse_pos.get();
            view! {
                <div
                    style:left=format!("{}px", x + 16.0)
                    style:top=format!("{}px", y - 8.0)
                    style="position: fixed; pointer-events: none; z-index: 100; background: #161921; border: 1px solid #282c3e; border-radius: 6px; overflow: hidden; box-shadow: 0 4px 16px rgba(0,0,0,0.5); max-width: 220px; display: flex; flex-direction: row;"
                >
                    <div style={format!("width: 3px; flex-shrink: 0; background: {};", rgba_css(r, g, b, 0.85))} />
                    <div style="padding: 7px 10px; flex: 1;">
                        <div style="font-size: 0.76rem; font-weight: 700; color: #e2e0d8; font-family: 'JetBrains Mono', monospace; line-height: 1.3;">
                            {headline}
                        </div>
                        <div style="font-size: 0.65rem; color: #9a9590; font-family: 'JetBrains Mono', monospace; margin-top: 2px;">
                            {detail}
                        </div>
                    </div>
                </div>
            }.into_any()
        }}
    }
}
