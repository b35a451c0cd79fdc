use serde::{Deserialize, Serialize};

/// The complete dataset for one year: era summary plus the empires and
/// events the generative backend produced for it.
///
/// Immutable once fetched; identified by `year`. A later snapshot for a
/// different year supersedes it, it is never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub year: i32,
    #[serde(default)]
    pub era_summary: String,
    #[serde(default)]
    pub empires: Vec<Empire>,
    #[serde(default)]
    pub events: Vec<HistoricalEvent>,
}

impl Snapshot {
    /// Empty fallback shape used when the data source fails: same schema,
    /// no overlays, the summary carries the explanation. Keeps the
    /// coordinator free of a distinct error state.
    pub fn degraded(year: i32, summary: impl Into<String>) -> Self {
        Self {
            year,
            era_summary: summary.into(),
            empires: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empires.is_empty() && self.events.is_empty()
    }
}

/// A power's zone of influence, approximated as a geodesic circle around
/// its center coordinate. Ephemeral per-snapshot data — there is no
/// identity continuity for an empire across years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Empire {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

/// A point-located historical occurrence, ephemeral per-snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub kind: EventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    War,
    Political,
    Cultural,
    Discovery,
    Disaster,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::War => "War",
            EventKind::Political => "Political",
            EventKind::Cultural => "Cultural",
            EventKind::Discovery => "Discovery",
            EventKind::Disaster => "Disaster",
        }
    }
}
