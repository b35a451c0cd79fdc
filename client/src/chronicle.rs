use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use chronoatlas_shared::coordinator::ViewerState;
use chronoatlas_shared::snapshot::Snapshot;

const SNAPSHOT_ENDPOINT: &str = "/api/snapshot";

/// Summary text shown when the generative backend cannot be reached.
/// The degraded snapshot has the same shape as a real one, so nothing
/// downstream special-cases the failure.
const DEGRADED_SUMMARY: &str =
    "The chronicle for this year could not be retrieved. The map shows geography only; \
     move the timeline or try again to consult it anew.";

async fn request_snapshot(year: i32) -> Result<Snapshot, String> {
    let url = format!("{SNAPSHOT_ENDPOINT}?year={year}");
    let resp = gloo_net::http::Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<Snapshot>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

/// Fetch the snapshot for a year. Never fails to the caller: transport,
/// HTTP and parse errors all resolve to a degraded snapshot carrying an
/// explanatory summary, logged as a console warning.
pub async fn fetch_snapshot(year: i32) -> Snapshot {
    match request_snapshot(year).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            web_sys::console::warn_1(&format!("Snapshot fetch failed for {year}: {e}").into());
            Snapshot::degraded(year, DEGRADED_SUMMARY)
        }
    }
}

/// Run the fetch for an already-committed year and hand the result to the
/// coordinator. `accept` re-validates the year at completion time, so a
/// response superseded mid-flight is discarded there — fetches are never
/// cancelled.
pub fn spawn_fetch(viewer: RwSignal<ViewerState>, year: i32) {
    spawn_local(async move {
        let snapshot = fetch_snapshot(year).await;
        viewer.update(|vs| {
            vs.accept(snapshot);
        });
    });
}

/// Immediate commit path: step buttons, presets, playback and the initial
/// load bypass the scrub debounce.
pub fn commit_year(viewer: RwSignal<ViewerState>, year: i32) {
    let mut committed = 0;
    viewer.update(|vs| {
        committed = vs.jump(year);
    });
    spawn_fetch(viewer, committed);
}
