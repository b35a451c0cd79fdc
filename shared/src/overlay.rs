use crate::geo::{MapProjection, angular_distance, km_to_angular_radius};
use crate::snapshot::Snapshot;

/// Drawn radius of an event pin, in base map pixels.
pub const PIN_RADIUS: f64 = 4.0;

/// Hit-test radius of an event pin. Wider than the drawn dot so pins are
/// clickable without pixel-perfect aim.
pub const PIN_HIT_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayHit {
    Empire(usize),
    Event(usize),
}

/// Hit-test a point in base map coordinates against the snapshot's
/// overlays. Pins win over empire circles, and within each layer the
/// last-drawn (topmost) overlay wins.
///
/// Pins are tested in screen space with a fixed pixel radius; empires are
/// tested on the sphere, since their circles are geodesic and a screen-space
/// test would drift at high latitudes.
pub fn pick(snapshot: &Snapshot, projection: &MapProjection, x: f64, y: f64) -> Option<OverlayHit> {
    for (i, event) in snapshot.events.iter().enumerate().rev() {
        if let Some((ex, ey)) = projection.project(event.longitude, event.latitude) {
            let (dx, dy) = (x - ex, y - ey);
            if dx * dx + dy * dy <= PIN_HIT_RADIUS * PIN_HIT_RADIUS {
                return Some(OverlayHit::Event(i));
            }
        }
    }

    let (lon, lat) = projection.unproject(x, y);
    for (i, empire) in snapshot.empires.iter().enumerate().rev() {
        let radius = km_to_angular_radius(empire.radius_km);
        if angular_distance(lon, lat, empire.longitude, empire.latitude) <= radius {
            return Some(OverlayHit::Empire(i));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Empire, EventKind, HistoricalEvent};

    fn projection() -> MapProjection {
        MapProjection::fit(1300.0, 650.0)
    }

    fn empire(name: &str, lon: f64, lat: f64, radius_km: f64) -> Empire {
        Empire {
            name: name.into(),
            latitude: lat,
            longitude: lon,
            radius_km,
            color: "#336699".into(),
            description: String::new(),
        }
    }

    fn event(title: &str, lon: f64, lat: f64) -> HistoricalEvent {
        HistoricalEvent {
            title: title.into(),
            description: String::new(),
            latitude: lat,
            longitude: lon,
            kind: EventKind::Political,
        }
    }

    fn snapshot(empires: Vec<Empire>, events: Vec<HistoricalEvent>) -> Snapshot {
        Snapshot {
            year: 100,
            era_summary: String::new(),
            empires,
            events,
        }
    }

    #[test]
    fn empty_snapshot_hits_nothing() {
        let snap = snapshot(vec![], vec![]);
        assert_eq!(pick(&snap, &projection(), 650.0, 400.0), None);
    }

    #[test]
    fn click_inside_circle_hits_empire() {
        let proj = projection();
        let snap = snapshot(vec![empire("Rome", 12.5, 42.0, 500.0)], vec![]);
        let (x, y) = proj.project(12.5, 42.0).unwrap();
        assert_eq!(pick(&snap, &proj, x, y), Some(OverlayHit::Empire(0)));
    }

    #[test]
    fn click_outside_circle_misses() {
        let proj = projection();
        let snap = snapshot(vec![empire("Rome", 12.5, 42.0, 500.0)], vec![]);
        let (x, y) = proj.project(40.0, 42.0).unwrap();
        assert_eq!(pick(&snap, &proj, x, y), None);
    }

    #[test]
    fn pin_wins_over_underlying_circle() {
        let proj = projection();
        let snap = snapshot(
            vec![empire("Rome", 12.5, 42.0, 1_000.0)],
            vec![event("Founding", 12.5, 42.0)],
        );
        let (x, y) = proj.project(12.5, 42.0).unwrap();
        assert_eq!(pick(&snap, &proj, x, y), Some(OverlayHit::Event(0)));
    }

    #[test]
    fn pin_hit_radius_is_wider_than_drawn_dot() {
        let proj = projection();
        let snap = snapshot(vec![], vec![event("Founding", 12.5, 42.0)]);
        let (x, y) = proj.project(12.5, 42.0).unwrap();
        assert_eq!(
            pick(&snap, &proj, x + PIN_HIT_RADIUS - 0.5, y),
            Some(OverlayHit::Event(0))
        );
        assert_eq!(pick(&snap, &proj, x + PIN_HIT_RADIUS + 0.5, y), None);
    }

    #[test]
    fn topmost_of_overlapping_circles_wins() {
        let proj = projection();
        let snap = snapshot(
            vec![
                empire("Below", 12.5, 42.0, 1_000.0),
                empire("Above", 13.0, 42.0, 1_000.0),
            ],
            vec![],
        );
        let (x, y) = proj.project(12.7, 42.0).unwrap();
        assert_eq!(pick(&snap, &proj, x, y), Some(OverlayHit::Empire(1)));
    }

    #[test]
    fn topmost_of_overlapping_pins_wins() {
        let proj = projection();
        let snap = snapshot(
            vec![],
            vec![event("First", 12.5, 42.0), event("Second", 12.6, 42.0)],
        );
        let (x, y) = proj.project(12.55, 42.0).unwrap();
        assert_eq!(pick(&snap, &proj, x, y), Some(OverlayHit::Event(1)));
    }
}
