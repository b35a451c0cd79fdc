/// Pan/zoom transform from base map coordinates (the projected pixel plane
/// at zoom 1) to screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

const MIN_SCALE: f64 = 1.0;
const MAX_SCALE: f64 = 8.0;
const ZOOM_SENSITIVITY: f64 = 0.001;

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Convert base map coordinates to screen coordinates.
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        (
            wx * self.scale + self.offset_x,
            wy * self.scale + self.offset_y,
        )
    }

    /// Convert screen coordinates to base map coordinates.
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    /// Zoom toward a focus point (screen coordinates). The point under the
    /// cursor stays fixed on screen.
    pub fn zoom_at(&mut self, delta: f64, screen_x: f64, screen_y: f64) {
        let factor = (-delta * ZOOM_SENSITIVITY).exp();
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;

        self.offset_x = screen_x - (screen_x - self.offset_x) * ratio;
        self.offset_y = screen_y - (screen_y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    /// Pan by screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Back to the full-world view.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_between_world_and_screen() {
        let mut vp = Viewport::default();
        vp.pan(40.0, -25.0);
        vp.zoom_at(-800.0, 100.0, 100.0);

        let (sx, sy) = vp.world_to_screen(320.0, 180.0);
        let (wx, wy) = vp.screen_to_world(sx, sy);
        assert!((wx - 320.0).abs() < 1e-9);
        assert!((wy - 180.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_keeps_focus_point_fixed() {
        let mut vp = Viewport::default();
        let focus = (250.0, 130.0);
        let (wx, wy) = vp.screen_to_world(focus.0, focus.1);

        vp.zoom_at(-500.0, focus.0, focus.1);
        let (sx, sy) = vp.world_to_screen(wx, wy);
        assert!((sx - focus.0).abs() < 1e-9);
        assert!((sy - focus.1).abs() < 1e-9);
    }

    #[test]
    fn scale_is_clamped_to_range() {
        let mut vp = Viewport::default();
        // Can't zoom out past the full-world view.
        vp.zoom_at(10_000.0, 0.0, 0.0);
        assert_eq!(vp.scale, 1.0);

        for _ in 0..100 {
            vp.zoom_at(-10_000.0, 0.0, 0.0);
        }
        assert_eq!(vp.scale, 8.0);
    }

    #[test]
    fn view_survives_a_year_change_and_new_snapshot() {
        use chronoatlas_shared::Snapshot;
        use chronoatlas_shared::coordinator::ViewerState;

        let vp = Viewport {
            offset_x: 50.0,
            offset_y: 20.0,
            scale: 3.0,
        };
        let before = vp.clone();

        let mut vs = ViewerState::new(100);
        let year = vs.jump(500);
        assert!(vs.accept(Snapshot::degraded(year, "quiet century")));

        // The year machinery never touches the pan/zoom transform.
        assert_eq!(vp, before);
        let (sx, sy) = vp.world_to_screen(320.0, 180.0);
        assert_eq!((sx, sy), (50.0 + 320.0 * 3.0, 20.0 + 180.0 * 3.0));
    }

    #[test]
    fn reset_restores_default_view() {
        let mut vp = Viewport::default();
        vp.pan(300.0, 200.0);
        vp.zoom_at(-2_000.0, 0.0, 0.0);
        vp.reset();
        assert_eq!(vp, Viewport::default());
    }
}
