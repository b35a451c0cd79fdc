use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use chronoatlas_shared::topology::WorldTopology;

/// Versioned static asset; cache-friendly, fetched once per process.
const TOPOLOGY_URL: &str = "/assets/world-110m.v1.json";

/// Lifecycle of the land-polygon basemap. `Failed` is terminal for the
/// session — the canvas keeps rendering overlays over empty ocean and
/// shows a persistent notice.
#[derive(Clone, PartialEq)]
pub enum BasemapStatus {
    Loading,
    Ready(Rc<WorldTopology>),
    Failed,
}

async fn request_topology() -> Result<WorldTopology, String> {
    let resp = gloo_net::http::Request::get(TOPOLOGY_URL)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<WorldTopology>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

/// Kick off the one-time topology load. Call once from an Effect on mount.
pub fn load_topology(status: RwSignal<BasemapStatus, LocalStorage>) {
    spawn_local(async move {
        match request_topology().await {
            Ok(topology) => status.set(BasemapStatus::Ready(Rc::new(topology))),
            Err(e) => {
                web_sys::console::warn_1(&format!("Basemap load failed: {e}").into());
                status.set(BasemapStatus::Failed);
            }
        }
    });
}
