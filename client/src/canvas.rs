use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent};

use chronoatlas_shared::colors::empire_color;
use chronoatlas_shared::coordinator::{Selection, ViewerState};
use chronoatlas_shared::geo::{MapProjection, geodesic_circle, km_to_angular_radius};
use chronoatlas_shared::overlay::{self, OverlayHit, PIN_RADIUS};
use chronoatlas_shared::snapshot::Snapshot;
use chronoatlas_shared::topology::WorldTopology;

use crate::app::{Hovered, ShowEvents, ShowLabels};
use crate::basemap::BasemapStatus;
use crate::colors::{brighten, rgba_css};
use crate::render_loop::RenderScheduler;
use crate::viewport::Viewport;

const OCEAN_COLOR: &str = "#0c1524";
const LAND_COLOR: &str = "#1e2b3c";
const BORDER_COLOR: &str = "rgba(255,255,255,0.10)";
const PIN_FILL: &str = "#fbbf24";

/// Vertex count for empire circle outlines. Enough that a continent-sized
/// circle stays smooth at max zoom.
const CIRCLE_SEGMENTS: usize = 64;

const CIRCLE_FILL_ALPHA: f64 = 0.3;
const CIRCLE_FILL_ALPHA_ACTIVE: f64 = 0.5;

/// Maximum pointer travel for a press to still count as a click.
const CLICK_DRAG_TOLERANCE_PX: f64 = 5.0;

struct ResizeBinding {
    window: web_sys::Window,
    _handler: Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

/// Canvas map renderer: basemap, empire circles, event pins and labels on
/// a single 2D canvas, repainted through the rAF scheduler.
#[component]
pub fn MapCanvas() -> impl IntoView {
    let viewer: RwSignal<ViewerState> = expect_context();
    let viewport: RwSignal<Viewport> = expect_context();
    let Hovered(hovered) = expect_context();
    let mouse_pos: RwSignal<(f64, f64)> = expect_context();
    let basemap: RwSignal<BasemapStatus, LocalStorage> = expect_context();
    let ShowLabels(show_labels) = expect_context();
    let ShowEvents(show_events) = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    // Track drag state
    let is_dragging = Rc::new(Cell::new(false));
    let drag_start_x = Rc::new(Cell::new(0.0f64));
    let drag_start_y = Rc::new(Cell::new(0.0f64));
    let last_x = Rc::new(Cell::new(0.0f64));
    let last_y = Rc::new(Cell::new(0.0f64));

    // Track pinch state
    let pinch_dist = Rc::new(Cell::new(0.0f64));

    // Cached 2D context (invalidated on canvas resize)
    let cached_ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));
    let cached_ctx_render = cached_ctx.clone();

    let scheduler = RenderScheduler::new(move || {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let canvas: &HtmlCanvasElement = &canvas;
        let Some(parent) = canvas.parent_element() else {
            return;
        };
        let w = parent.client_width() as f64;
        let h = parent.client_height() as f64;
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let dpr = web_sys::window()
            .map(|win| win.device_pixel_ratio())
            .unwrap_or(1.0);
        let pw = (w * dpr).round().max(1.0) as u32;
        let ph = (h * dpr).round().max(1.0) as u32;
        if canvas.width() != pw || canvas.height() != ph {
            canvas.set_width(pw);
            canvas.set_height(ph);
            // Canvas resize resets 2D context state — invalidate cache
            *cached_ctx_render.borrow_mut() = None;
        }

        let ctx = {
            let mut ctx_cache = cached_ctx_render.borrow_mut();
            if ctx_cache.is_none() {
                let Some(ctx) = canvas
                    .get_context("2d")
                    .ok()
                    .flatten()
                    .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
                else {
                    return;
                };
                *ctx_cache = Some(ctx);
            }
            let Some(ctx) = ctx_cache.clone() else {
                return;
            };
            ctx
        };

        let vp = viewport.get_untracked();
        let projection = MapProjection::fit(w, h);
        let hov = hovered.get_untracked();

        // Ocean background in device pixels, then translate-then-scale so
        // every layer below moves with the viewport.
        ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok();
        ctx.set_fill_style_str(OCEAN_COLOR);
        ctx.fill_rect(0.0, 0.0, w, h);
        ctx.set_transform(
            dpr * vp.scale,
            0.0,
            0.0,
            dpr * vp.scale,
            dpr * vp.offset_x,
            dpr * vp.offset_y,
        )
        .ok();

        if let BasemapStatus::Ready(topology) = basemap.get_untracked() {
            draw_land(&ctx, &projection, &topology, vp.scale);
        }

        viewer.with_untracked(|vs| {
            let Some(snapshot) = vs.snapshot() else {
                return;
            };
            draw_empires(&ctx, &projection, snapshot, vs.selection(), hov);
            if show_labels.get_untracked() {
                draw_empire_labels(&ctx, &projection, snapshot);
            }
            if show_events.get_untracked() {
                draw_event_pins(&ctx, &projection, snapshot, vs.selection(), hov);
            }
        });
    });
    let scheduler = Rc::new(scheduler);

    // Repaint on any data, viewport, hover or setting change.
    let sched_state = scheduler.clone();
    Effect::new(move || {
        viewer.track();
        viewport.track();
        hovered.track();
        basemap.track();
        show_labels.track();
        show_events.track();
        sched_state.mark_dirty();
    });

    // Window resize: canvas dimensions only change inside the render pass,
    // so a resize has to force one.
    let sched_resize = scheduler.clone();
    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        RESIZE_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "resize",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });
        let sched = sched_resize.clone();
        let handler = Closure::<dyn Fn()>::new(move || {
            sched.mark_dirty();
        });
        if window
            .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            RESIZE_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(ResizeBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    // Local pointer coords relative to the canvas.
    let local_pos = move |client_x: f64, client_y: f64| -> (f64, f64, f64, f64) {
        canvas_ref
            .get_untracked()
            .map(|el| {
                let rect = el.get_bounding_client_rect();
                (
                    client_x - rect.left(),
                    client_y - rect.top(),
                    rect.width(),
                    rect.height(),
                )
            })
            .unwrap_or((client_x, client_y, 1.0, 1.0))
    };

    // --- Input handlers ---

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let delta = e.delta_y();
        let x = e.offset_x() as f64;
        let y = e.offset_y() as f64;
        viewport.update(|vp| vp.zoom_at(delta, x, y));
    };

    let on_pointer_down = {
        let is_dragging = is_dragging.clone();
        let drag_start_x = drag_start_x.clone();
        let drag_start_y = drag_start_y.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            is_dragging.set(true);
            hovered.set(None);
            drag_start_x.set(e.client_x() as f64);
            drag_start_y.set(e.client_y() as f64);
            last_x.set(e.client_x() as f64);
            last_y.set(e.client_y() as f64);

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
        }
    };

    let on_pointer_move = {
        let is_dragging = is_dragging.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            if is_dragging.get() {
                let dx = e.client_x() as f64 - last_x.get();
                let dy = e.client_y() as f64 - last_y.get();
                last_x.set(e.client_x() as f64);
                last_y.set(e.client_y() as f64);
                viewport.update(|vp| vp.pan(dx, dy));
            } else {
                mouse_pos.set((e.client_x() as f64, e.client_y() as f64));
                let (lx, ly, w, h) = local_pos(e.client_x() as f64, e.client_y() as f64);
                let vp = viewport.get_untracked();
                let (wx, wy) = vp.screen_to_world(lx, ly);
                let projection = MapProjection::fit(w, h);
                let hit =
                    viewer.with_untracked(|vs| {
                        vs.snapshot()
                            .and_then(|s| overlay::pick(s, &projection, wx, wy))
                    });
                let hit_is_some = hit.is_some();
                if hit != hovered.get_untracked() {
                    hovered.set(hit);
                }
                if let Some(target) = e.target()
                    && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
                {
                    let cursor = if hit_is_some { "pointer" } else { "grab" };
                    el.style().set_property("cursor", cursor).ok();
                }
            }
        }
    };

    let on_pointer_up = {
        let is_dragging = is_dragging.clone();
        move |e: PointerEvent| {
            is_dragging.set(false);
            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.style().set_property("cursor", "grab").ok();
            }
        }
    };

    // A press that barely moved is a click: select what's under it, or
    // clear the selection on open water.
    let on_click = {
        let drag_start_x = drag_start_x.clone();
        let drag_start_y = drag_start_y.clone();
        move |e: MouseEvent| {
            let dx = (e.client_x() as f64 - drag_start_x.get()).abs();
            let dy = (e.client_y() as f64 - drag_start_y.get()).abs();
            if dx >= CLICK_DRAG_TOLERANCE_PX || dy >= CLICK_DRAG_TOLERANCE_PX {
                return;
            }
            let (lx, ly, w, h) = local_pos(e.client_x() as f64, e.client_y() as f64);
            let vp = viewport.get_untracked();
            let (wx, wy) = vp.screen_to_world(lx, ly);
            let projection = MapProjection::fit(w, h);
            viewer.update(|vs| {
                let hit = vs
                    .snapshot()
                    .and_then(|s| overlay::pick(s, &projection, wx, wy));
                match hit {
                    Some(OverlayHit::Empire(i)) => vs.select_empire(i),
                    Some(OverlayHit::Event(i)) => vs.select_event(i),
                    None => vs.clear_selection(),
                }
            });
        }
    };

    let on_pointer_leave = move |_: PointerEvent| {
        if hovered.get_untracked().is_some() {
            hovered.set(None);
        }
    };

    let on_touch_start = {
        let pinch_dist = pinch_dist.clone();
        move |e: web_sys::TouchEvent| {
            let touches = e.touches();
            if touches.length() == 2 {
                e.prevent_default();
                let (Some(t0), Some(t1)) = (touches.get(0), touches.get(1)) else {
                    return;
                };
                let dx = (t1.client_x() - t0.client_x()) as f64;
                let dy = (t1.client_y() - t0.client_y()) as f64;
                pinch_dist.set((dx * dx + dy * dy).sqrt());
            }
        }
    };

    let on_touch_move = {
        let pinch_dist = pinch_dist.clone();
        move |e: web_sys::TouchEvent| {
            let touches = e.touches();
            if touches.length() == 2 {
                e.prevent_default();
                let (Some(t0), Some(t1)) = (touches.get(0), touches.get(1)) else {
                    return;
                };
                let dx = (t1.client_x() - t0.client_x()) as f64;
                let dy = (t1.client_y() - t0.client_y()) as f64;
                let new_dist = (dx * dx + dy * dy).sqrt();
                let old_dist = pinch_dist.get();

                if old_dist > 0.0 {
                    let mid_x = (t0.client_x() + t1.client_x()) as f64 / 2.0;
                    let mid_y = (t0.client_y() + t1.client_y()) as f64 / 2.0;
                    let delta = -(new_dist - old_dist) * 2.0;
                    viewport.update(|vp| vp.zoom_at(delta, mid_x, mid_y));
                }

                pinch_dist.set(new_dist);
            }
        }
    };

    view! {
        <div
            style="position: relative; width: 100%; height: 100%; overflow: hidden;"
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointerleave=on_pointer_leave
            on:click=on_click
            on:touchstart=on_touch_start
            on:touchmove=on_touch_move
        >
            <canvas
                node_ref=canvas_ref
                style="position: absolute; inset: 0; width: 100%; height: 100%; touch-action: none; cursor: grab;"
            />
            // Basemap lifecycle notices
            {move || match basemap.get() {
                BasemapStatus::Loading => Some(view! {
                    <div style="position: absolute; top: 12px; left: 50%; transform: translateX(-50%); z-index: 15; background: rgba(19,22,31,0.9); border: 1px solid #282c3e; border-radius: 6px; padding: 6px 14px; color: #9a9590; font-family: 'JetBrains Mono', monospace; font-size: 0.7rem;">
                        "Loading map"
                    </div>
                }.into_any()),
                BasemapStatus::Failed => Some(view! {
                    <div style="position: absolute; top: 12px; left: 50%; transform: translateX(-50%); z-index: 15; background: rgba(60,24,24,0.9); border: 1px solid rgba(180,70,70,0.5); border-radius: 6px; padding: 6px 14px; color: #e0a0a0; font-family: 'JetBrains Mono', monospace; font-size: 0.7rem;">
                        "Map data unavailable"
                    </div>
                }.into_any()),
                BasemapStatus::Ready(_) => None,
            }}
            // Snapshot fetch indicator
            {move || {
                viewer.with(|vs| vs.loading()).then(|| view! {
                    <div style="position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); z-index: 15; background: rgba(19,22,31,0.85); border: 1px solid rgba(245,197,66,0.3); border-radius: 8px; padding: 10px 20px; color: #f5c542; font-family: 'JetBrains Mono', monospace; font-size: 0.75rem; letter-spacing: 0.04em; pointer-events: none;">
                        "Consulting the chronicle\u{2026}"
                    </div>
                })
            }}
        </div>
    }
}

fn trace_ring(ctx: &CanvasRenderingContext2d, projection: &MapProjection, ring: &[(f64, f64)]) {
    for (i, &(lon, lat)) in ring.iter().enumerate() {
        let (x, y) = projection.project_clamped(lon, lat);
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.close_path();
}

fn draw_land(
    ctx: &CanvasRenderingContext2d,
    projection: &MapProjection,
    topology: &WorldTopology,
    zoom: f64,
) {
    ctx.begin_path();
    for ring in topology.rings() {
        for (i, &[lon, lat]) in ring.iter().enumerate() {
            let (x, y) = projection.project_clamped(lon, lat);
            if i == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        ctx.close_path();
    }
    ctx.set_fill_style_str(LAND_COLOR);
    ctx.fill();
    ctx.set_stroke_style_str(BORDER_COLOR);
    // Coastlines stay hairline-thin regardless of zoom.
    ctx.set_line_width(0.5 / zoom);
    ctx.stroke();
}

fn is_active(selection: Selection, hovered: Option<OverlayHit>, index: usize) -> bool {
    selection == Selection::Empire(index) || hovered == Some(OverlayHit::Empire(index))
}

fn draw_empires(
    ctx: &CanvasRenderingContext2d,
    projection: &MapProjection,
    snapshot: &Snapshot,
    selection: Selection,
    hovered: Option<OverlayHit>,
) {
    let dash = js_sys::Array::of2(&4.0.into(), &2.0.into());
    ctx.set_line_dash(&dash).ok();
    for (i, empire) in snapshot.empires.iter().enumerate() {
        let radius = km_to_angular_radius(empire.radius_km);
        let ring = geodesic_circle(empire.longitude, empire.latitude, radius, CIRCLE_SEGMENTS);

        ctx.begin_path();
        trace_ring(ctx, projection, &ring);

        let (r, g, b) = empire_color(&empire.name, &empire.color);
        let active = is_active(selection, hovered, i);
        let alpha = if active {
            CIRCLE_FILL_ALPHA_ACTIVE
        } else {
            CIRCLE_FILL_ALPHA
        };
        ctx.set_fill_style_str(&rgba_css(r, g, b, alpha));
        ctx.fill();

        let (sr, sg, sb) = if active {
            brighten(r, g, b, 1.3)
        } else {
            (r, g, b)
        };
        ctx.set_stroke_style_str(&rgba_css(sr, sg, sb, 0.9));
        ctx.set_line_width(if active { 2.0 } else { 1.0 });
        ctx.stroke();
    }
    ctx.set_line_dash(&js_sys::Array::new()).ok();
}

fn draw_empire_labels(
    ctx: &CanvasRenderingContext2d,
    projection: &MapProjection,
    snapshot: &Snapshot,
) {
    ctx.set_font("700 11px 'Inter', system-ui, sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    for empire in &snapshot.empires {
        let Some((x, y)) = projection.project(empire.longitude, empire.latitude) else {
            continue;
        };
        ctx.set_stroke_style_str("rgba(8,10,18,0.9)");
        ctx.set_line_width(3.0);
        ctx.stroke_text(&empire.name, x, y).ok();
        ctx.set_fill_style_str("rgba(226,224,216,0.92)");
        ctx.fill_text(&empire.name, x, y).ok();
    }
}

fn draw_event_pins(
    ctx: &CanvasRenderingContext2d,
    projection: &MapProjection,
    snapshot: &Snapshot,
    selection: Selection,
    hovered: Option<OverlayHit>,
) {
    use std::f64::consts::TAU;

    // Pins are sized in base map units so their drawn extent matches the
    // hit-test radius at every zoom level.
    for (i, event) in snapshot.events.iter().enumerate() {
        let Some((x, y)) = projection.project(event.longitude, event.latitude) else {
            continue;
        };
        let active = selection == Selection::Event(i) || hovered == Some(OverlayHit::Event(i));
        let radius = PIN_RADIUS * if active { 1.4 } else { 1.0 };

        ctx.begin_path();
        ctx.arc(x, y, radius, 0.0, TAU).ok();
        ctx.set_fill_style_str(PIN_FILL);
        ctx.fill();
        ctx.set_stroke_style_str("#ffffff");
        ctx.set_line_width(1.0);
        ctx.stroke();
    }
}
