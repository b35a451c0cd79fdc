use leptos::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;

use chronoatlas_shared::chronology::{MAX_YEAR, MIN_YEAR, PRESETS, YEAR_STEP, format_year};
use chronoatlas_shared::coordinator::{DEBOUNCE_MS, ViewerState};

use crate::app::PlaybackActive;
use crate::chronicle;
use gloo_timers::callback::Timeout;

/// Retry delay when a debounce timer fires before its deadline has
/// elapsed (the wall clock stepped backward under the timer).
const DEBOUNCE_RETRY_MS: u32 = 100;

/// Arm the debounce timer. On fire it polls the deadline: due means
/// fetch; a moved deadline means a newer scrub superseded this timer and
/// nothing happens; still-pending means the clock went backward, so a
/// short retry is armed rather than stranding the scrub.
fn arm_debounce(
    viewer: RwSignal<ViewerState>,
    slot: Rc<RefCell<Option<Timeout>>>,
    delay_ms: u32,
) {
    let rearm_slot = Rc::clone(&slot);
    let timeout = Timeout::new(delay_ms, move || {
        let mut due = None;
        viewer.update(|vs| {
            due = vs.poll(js_sys::Date::now());
        });
        if let Some(year) = due {
            chronicle::spawn_fetch(viewer, year);
        } else if viewer.with_untracked(|vs| vs.debounce_pending()) {
            arm_debounce(viewer, rearm_slot, DEBOUNCE_RETRY_MS);
        }
    });
    *slot.borrow_mut() = Some(timeout);
}

/// Timeline bar: year slider with debounced fetch, transport controls,
/// and era presets.
#[component]
pub fn Timeline() -> impl IntoView {
    let viewer: RwSignal<ViewerState> = expect_context();
    let PlaybackActive(playing) = expect_context();

    // Debounce timer for scrubbing.
    // Hold the timeout handle so we can cancel without leaking JS callbacks.
    let debounce_timeout = Rc::new(RefCell::new(None::<Timeout>));

    let on_range_input = {
        let debounce_timeout = Rc::clone(&debounce_timeout);
        move |e: web_sys::Event| {
            let Some(target) = e.target() else {
                return;
            };
            let Ok(input) = target.dyn_into::<web_sys::HtmlInputElement>() else {
                return;
            };
            let val: i32 = input.value().parse().unwrap_or(0);

            // Update the displayed year immediately; scrubbing takes over
            // from playback.
            playing.set(false);
            viewer.update(|vs| vs.scrub(val, js_sys::Date::now()));

            // Debounce the actual fetch. A cancelled-too-late timeout that
            // still fires polls against a moved deadline and does nothing.
            if let Some(timeout) = debounce_timeout.borrow_mut().take() {
                timeout.cancel();
            }
            arm_debounce(viewer, Rc::clone(&debounce_timeout), DEBOUNCE_MS as u32);
        }
    };

    let step_year = move |delta: i32| {
        playing.set(false);
        let target = viewer.with_untracked(|vs| vs.target_year()) + delta;
        chronicle::commit_year(viewer, target);
    };

    // SVG icon constants
    let play_svg = r#"<svg width="12" height="14" viewBox="0 0 12 14" fill="currentColor" xmlns="http://www.w3.org/2000/svg"><path d="M1 1.5v11l10-5.5z"/></svg>"#;
    let pause_svg = r#"<svg width="12" height="14" viewBox="0 0 12 14" fill="currentColor" xmlns="http://www.w3.org/2000/svg"><rect x="1" y="1" width="3.5" height="12" rx="0.75"/><rect x="7.5" y="1" width="3.5" height="12" rx="0.75"/></svg>"#;
    let skip_back_svg = r#"<svg width="14" height="12" viewBox="0 0 14 12" fill="currentColor" xmlns="http://www.w3.org/2000/svg"><rect x="1" y="1" width="2" height="10" rx="0.5"/><path d="M13 1v10L5.5 6z"/></svg>"#;
    let skip_fwd_svg = r#"<svg width="14" height="12" viewBox="0 0 14 12" fill="currentColor" xmlns="http://www.w3.org/2000/svg"><rect x="11" y="1" width="2" height="10" rx="0.5"/><path d="M1 1v10l7.5-5z"/></svg>"#;

    view! {
        <div
            class="timeline-bar"
            style="position: absolute; bottom: 0; left: 0; right: 0; z-index: 25; background: #13161f; border-top: 1px solid rgba(245,197,66,0.15); display: flex; flex-direction: column; font-family: 'JetBrains Mono', monospace; font-size: 0.72rem; padding: 8px 16px; gap: 6px;"
        >
            // --- Row 1: Transport + slider ---
            <div style="display: flex; align-items: center; gap: 0; width: 100%; min-width: 0;">
                // Play/Pause button
                <button
                    title=move || if playing.get() { "Pause (Space)" } else { "Play (Space)" }
                    style="width: 32px; height: 32px; background: #1a1d2a; border: 1px solid #282c3e; border-radius: 6px; cursor: pointer; color: #f5c542; display: flex; align-items: center; justify-content: center; flex-shrink: 0; transition: background 0.15s ease, border-color 0.15s ease;"
                    inner_html=move || if playing.get() { pause_svg } else { play_svg }
                    on:click=move |_| playing.update(|v| *v = !*v)
                    on:mouseenter=move |e| {
                        if let Some(el) = e.target().and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) {
                            el.style().set_property("background", "#232738").ok();
                            el.style().set_property("border-color", "#3a3f5c").ok();
                        }
                    }
                    on:mouseleave=move |e| {
                        if let Some(el) = e.target().and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) {
                            el.style().set_property("background", "#1a1d2a").ok();
                            el.style().set_property("border-color", "#282c3e").ok();
                        }
                    }
                />

                // Step back one century
                <button
                    title="Back 100 years (Left)"
                    style="width: 28px; height: 28px; background: #1a1d2a; border: 1px solid #282c3e; border-radius: 4px; cursor: pointer; color: #9a9590; display: flex; align-items: center; justify-content: center; flex-shrink: 0; margin-left: 4px; transition: background 0.15s ease, color 0.15s ease;"
                    inner_html=skip_back_svg
                    on:click=move |_| step_year(-YEAR_STEP)
                />

                // Step forward one century
                <button
                    title="Forward 100 years (Right)"
                    style="width: 28px; height: 28px; background: #1a1d2a; border: 1px solid #282c3e; border-radius: 4px; cursor: pointer; color: #9a9590; display: flex; align-items: center; justify-content: center; flex-shrink: 0; margin-left: 4px; transition: background 0.15s ease, color 0.15s ease;"
                    inner_html=skip_fwd_svg
                    on:click=move |_| step_year(YEAR_STEP)
                />

                // Divider: transport | slider
                <div style="width: 1px; height: 24px; background: #282c3e; margin: 0 10px; flex-shrink: 0;" />

                // Left bound label
                <span style="color: #5a5860; flex-shrink: 0; font-size: 0.65rem;">
                    {format_year(MIN_YEAR)}
                </span>

                // Year slider
                <input
                    type="range"
                    class="timeline-slider"
                    style="flex: 1; margin: 0 8px;"
                    min=MIN_YEAR.to_string()
                    max=MAX_YEAR.to_string()
                    step=YEAR_STEP.to_string()
                    prop:value=move || viewer.with(|vs| vs.target_year()).to_string()
                    on:input=on_range_input
                />

                // Right bound label
                <span style="color: #5a5860; flex-shrink: 0; font-size: 0.65rem;">
                    {format_year(MAX_YEAR)}
                </span>

                <div style="width: 1px; height: 24px; background: #282c3e; margin: 0 10px; flex-shrink: 0;" />

                // Current year display
                <span style="color: #e2e0d8; flex-shrink: 0; min-width: 86px; text-align: center; font-size: 0.78rem; font-weight: 700; font-variant-numeric: tabular-nums;">
                    {move || format_year(viewer.with(|vs| vs.target_year()))}
                </span>

                // Fetch-in-flight marker
                <span
                    style:visibility=move || {
                        if viewer.with(|vs| vs.loading()) { "visible" } else { "hidden" }
                    }
                    style="color: #f5c542; flex-shrink: 0; margin-left: 8px; font-size: 0.62rem; letter-spacing: 0.05em;"
                >
                    "Consulting the chronicle"
                </span>
            </div>

            // --- Row 2: Era presets ---
            <div style="display: flex; align-items: center; gap: 6px; flex-wrap: wrap;">
                {PRESETS.iter().map(|&(label, year)| {
                    view! {
                        <button
                            style="background: #1a1d2a; border: 1px solid #282c3e; border-radius: 4px; color: #9a9590; font-size: 0.62rem; padding: 3px 8px; cursor: pointer; font-family: 'JetBrains Mono', monospace; transition: border-color 0.15s ease, color 0.15s ease;"
                            style:border-color=move || {
                                if viewer.with(|vs| vs.target_year()) == year { "rgba(245,197,66,0.4)" } else { "#282c3e" }
                            }
                            style:color=move || {
                                if viewer.with(|vs| vs.target_year()) == year { "#f5c542" } else { "#9a9590" }
                            }
                            on:click=move |_| {
                                playing.set(false);
                                chronicle::commit_year(viewer, year);
                            }
                        >
                            {label}
                        </button>
                    }
                }).collect::<Vec<_>>()}
            </div>
        </div>
    }
}
