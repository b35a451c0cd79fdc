use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use chronoatlas_shared::coordinator::{PLAYBACK_INTERVAL_MS, ViewerState};

use crate::app::PlaybackActive;
use crate::chronicle;

struct PlaybackIntervalBinding {
    window: web_sys::Window,
    interval_id: i32,
    _callback: Closure<dyn Fn()>,
}

thread_local! {
    static PLAYBACK_INTERVAL_BINDING: RefCell<Option<PlaybackIntervalBinding>> = const { RefCell::new(None) };
}

/// Starts the playback engine. Call this once from an Effect.
///
/// The interval runs continuously but only advances the year while
/// playback is active. At the upper year bound the coordinator returns
/// no further year and the tick becomes a no-op — playback holds there
/// instead of pausing or wrapping.
pub fn start_playback_engine() {
    PLAYBACK_INTERVAL_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            old.window.clear_interval_with_handle(old.interval_id);
        }
    });

    let viewer: RwSignal<ViewerState> = expect_context();
    let PlaybackActive(playing) = expect_context();

    let Some(window) = web_sys::window() else {
        return;
    };
    let cb = Closure::<dyn Fn()>::new(move || {
        if !playing.get_untracked() {
            return;
        }

        let mut next = None;
        viewer.update(|vs| {
            next = vs.advance_playback();
        });
        if let Some(year) = next {
            chronicle::spawn_fetch(viewer, year);
        }
    });

    let Ok(interval_id) = window.set_interval_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        PLAYBACK_INTERVAL_MS as i32,
    ) else {
        return;
    };
    PLAYBACK_INTERVAL_BINDING.with(|slot| {
        *slot.borrow_mut() = Some(PlaybackIntervalBinding {
            window: window.clone(),
            interval_id,
            _callback: cb,
        });
    });
}
