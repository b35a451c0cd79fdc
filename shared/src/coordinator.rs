use crate::chronology::{MAX_YEAR, YEAR_STEP, clamp_year};
use crate::snapshot::{Empire, HistoricalEvent, Snapshot};

/// Scrub debounce window: a fetch is issued only after the slider has been
/// quiet this long.
pub const DEBOUNCE_MS: f64 = 600.0;

/// Playback tick interval. Generous so a fetched snapshot has time to be
/// read before the next advance.
pub const PLAYBACK_INTERVAL_MS: u32 = 4_000;

/// Lifecycle of the current target year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    PendingDebounce { deadline_ms: f64 },
    Fetching,
    Settled,
}

/// At most one overlay is selected, by index into the displayed snapshot —
/// so a non-`None` selection always references a present overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Empire(usize),
    Event(usize),
}

/// The single owned state record for the viewer: the year machinery, the
/// displayed snapshot, the selection, and the loading flag. Components
/// observe it through one signal; no ambient singletons.
///
/// The flow is: `scrub` (re)arms the debounce window; `poll` commits the
/// target year once the window elapses; `jump` commits immediately for
/// steps/presets/playback; `accept` applies a completed fetch only if its
/// year is still the committed year. Stale responses are discarded
/// silently — superseded in-flight fetches become moot via this guard,
/// never via cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    target_year: i32,
    committed_year: Option<i32>,
    phase: Phase,
    snapshot: Option<Snapshot>,
    selection: Selection,
    loading: bool,
}

impl ViewerState {
    pub fn new(initial_year: i32) -> Self {
        Self {
            target_year: clamp_year(initial_year),
            committed_year: None,
            phase: Phase::Idle,
            snapshot: None,
            selection: Selection::None,
            loading: false,
        }
    }

    /// The year the slider shows. Authoritative for what the user asked
    /// for; the committed year is authoritative for what may be displayed.
    pub fn target_year(&self) -> i32 {
        self.target_year
    }

    /// The year of the most recently issued fetch, if any.
    pub fn committed_year(&self) -> Option<i32> {
        self.committed_year
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a scrub is waiting out its debounce window. Timer
    /// callbacks use this to tell "superseded" apart from "not yet due".
    pub fn debounce_pending(&self) -> bool {
        matches!(self.phase, Phase::PendingDebounce { .. })
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Slider scrub: show the year immediately, defer the fetch. Every
    /// further scrub resets the debounce window, so a drag through many
    /// values fetches only the final one.
    pub fn scrub(&mut self, year: i32, now_ms: f64) {
        self.target_year = clamp_year(year);
        self.phase = Phase::PendingDebounce {
            deadline_ms: now_ms + DEBOUNCE_MS,
        };
    }

    /// Debounce elapse check. Returns the year to fetch once the window
    /// has passed; superseded timers that still fire see a moved deadline
    /// and return `None`.
    pub fn poll(&mut self, now_ms: f64) -> Option<i32> {
        match self.phase {
            Phase::PendingDebounce { deadline_ms } if now_ms >= deadline_ms => {
                Some(self.commit())
            }
            _ => None,
        }
    }

    /// Immediate commit, bypassing debounce — step buttons, presets, and
    /// playback advances. Returns the year to fetch.
    pub fn jump(&mut self, year: i32) -> i32 {
        self.target_year = clamp_year(year);
        self.commit()
    }

    /// Step the year by `delta` (typically ±100), clamped to the bounds.
    pub fn step(&mut self, delta: i32) -> i32 {
        self.jump(self.target_year + delta)
    }

    /// Playback tick: advance one step through the immediate-commit path.
    /// Returns `None` once the year cannot advance further — playback
    /// holds at the bound instead of wrapping, and stays enabled.
    pub fn advance_playback(&mut self) -> Option<i32> {
        if self.target_year >= MAX_YEAR {
            return None;
        }
        Some(self.jump(self.target_year + YEAR_STEP))
    }

    fn commit(&mut self) -> i32 {
        self.committed_year = Some(self.target_year);
        self.phase = Phase::Fetching;
        self.loading = true;
        self.selection = Selection::None;
        self.target_year
    }

    /// Apply a completed fetch. Accepted only if the snapshot's year
    /// matches the committed year *right now* — re-validated at completion
    /// time so rapid back-and-forth scrubbing cannot resurrect a stale
    /// response. Rejected responses cause no state change.
    pub fn accept(&mut self, snapshot: Snapshot) -> bool {
        if self.committed_year != Some(snapshot.year) {
            return false;
        }
        if self.target_year == snapshot.year && self.phase == Phase::Fetching {
            self.phase = Phase::Settled;
        }
        self.snapshot = Some(snapshot);
        self.selection = Selection::None;
        self.loading = false;
        true
    }

    /// Select an empire by index. Clears any event selection; ignored if
    /// the index is not present in the displayed snapshot.
    pub fn select_empire(&mut self, index: usize) {
        if self
            .snapshot
            .as_ref()
            .is_some_and(|s| index < s.empires.len())
        {
            self.selection = Selection::Empire(index);
        }
    }

    /// Select an event by index. Clears any empire selection.
    pub fn select_event(&mut self, index: usize) {
        if self
            .snapshot
            .as_ref()
            .is_some_and(|s| index < s.events.len())
        {
            self.selection = Selection::Event(index);
        }
    }

    /// Background click / escape / close button.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    pub fn selected_empire(&self) -> Option<&Empire> {
        match self.selection {
            Selection::Empire(i) => self.snapshot.as_ref()?.empires.get(i),
            _ => None,
        }
    }

    pub fn selected_event(&self) -> Option<&HistoricalEvent> {
        match self.selection {
            Selection::Event(i) => self.snapshot.as_ref()?.events.get(i),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::EventKind;

    fn snap(year: i32) -> Snapshot {
        Snapshot {
            year,
            era_summary: format!("summary for {year}"),
            empires: vec![
                Empire {
                    name: "Alpha".into(),
                    latitude: 10.0,
                    longitude: 10.0,
                    radius_km: 500.0,
                    color: "#112233".into(),
                    description: String::new(),
                },
                Empire {
                    name: "Beta".into(),
                    latitude: -20.0,
                    longitude: 40.0,
                    radius_km: 800.0,
                    color: "#445566".into(),
                    description: String::new(),
                },
            ],
            events: vec![HistoricalEvent {
                title: "A battle".into(),
                description: String::new(),
                latitude: 10.0,
                longitude: 10.0,
                kind: EventKind::War,
            }],
        }
    }

    #[test]
    fn rapid_scrubs_issue_exactly_one_fetch_for_last_year() {
        let mut vs = ViewerState::new(0);
        vs.scrub(-200, 0.0);
        vs.scrub(-100, 100.0);
        vs.scrub(0, 200.0);
        vs.scrub(100, 300.0);

        // Timers armed by the first three scrubs fire against a moved
        // deadline and must not commit anything.
        assert_eq!(vs.poll(600.0), None);
        assert_eq!(vs.poll(700.0), None);
        assert_eq!(vs.poll(899.9), None);

        // Final window elapses: one fetch, for the last requested year.
        assert_eq!(vs.poll(900.0), Some(100));
        assert_eq!(vs.committed_year(), Some(100));
        assert!(vs.loading());

        // Nothing further is due.
        assert_eq!(vs.poll(2000.0), None);
        assert!(!vs.debounce_pending());
    }

    #[test]
    fn backward_clock_step_leaves_scrub_recoverable() {
        let mut vs = ViewerState::new(100);
        vs.scrub(500, 10_000.0);

        // The wall clock stepped backward inside the window: the timer
        // fires, but the deadline has not elapsed by this clock reading.
        assert_eq!(vs.poll(9_000.0), None);
        assert!(vs.debounce_pending(), "scrub must stay pending, not drop");
        assert!(!vs.loading());

        // A re-poll once the deadline truly passes still commits.
        assert_eq!(vs.poll(10_600.0), Some(500));
        assert_eq!(vs.committed_year(), Some(500));
    }

    #[test]
    fn stale_response_is_discarded_silently() {
        let mut vs = ViewerState::new(0);
        let y1 = vs.jump(100);
        let y2 = vs.jump(200);
        assert_eq!((y1, y2), (100, 200));

        // Y1's response arrives after Y2 was committed.
        let before = vs.clone();
        assert!(!vs.accept(snap(100)));
        assert_eq!(vs, before, "discard must cause no state change");

        assert!(vs.accept(snap(200)));
        assert_eq!(vs.snapshot().unwrap().year, 200);
        assert!(!vs.loading());
        assert_eq!(vs.phase(), Phase::Settled);
    }

    #[test]
    fn response_for_committed_year_lands_while_newer_scrub_pends() {
        let mut vs = ViewerState::new(0);
        vs.jump(100);
        vs.scrub(500, 1_000.0);

        // 100 is still the most recently *committed* year, so its response
        // is displayed even though a scrub to 500 is pending debounce.
        assert!(vs.accept(snap(100)));
        assert_eq!(vs.snapshot().unwrap().year, 100);
        assert!(!vs.loading());

        // The pending scrub then commits normally.
        assert_eq!(vs.poll(1_600.0), Some(500));
        assert!(vs.loading());
    }

    #[test]
    fn committing_a_year_clears_selection() {
        let mut vs = ViewerState::new(0);
        vs.jump(100);
        vs.accept(snap(100));
        vs.select_empire(0);
        assert!(vs.selected_empire().is_some());

        vs.jump(200);
        assert_eq!(vs.selection(), Selection::None);
    }

    #[test]
    fn debounced_commit_also_clears_selection() {
        let mut vs = ViewerState::new(0);
        vs.jump(100);
        vs.accept(snap(100));
        vs.select_event(0);

        vs.scrub(300, 0.0);
        // Selection survives the debounce window (still displayed data)...
        assert!(vs.selected_event().is_some());
        // ...and is cleared at the moment the fetch is issued.
        vs.poll(DEBOUNCE_MS);
        assert_eq!(vs.selection(), Selection::None);
    }

    #[test]
    fn selections_are_mutually_exclusive() {
        let mut vs = ViewerState::new(0);
        vs.jump(100);
        vs.accept(snap(100));

        vs.select_empire(1);
        vs.select_event(0);
        assert_eq!(vs.selection(), Selection::Event(0));
        assert!(vs.selected_empire().is_none());
        assert_eq!(vs.selected_event().unwrap().title, "A battle");

        vs.select_empire(0);
        assert_eq!(vs.selection(), Selection::Empire(0));

        vs.clear_selection();
        assert_eq!(vs.selection(), Selection::None);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut vs = ViewerState::new(0);
        vs.select_empire(0); // no snapshot yet
        assert_eq!(vs.selection(), Selection::None);

        vs.jump(100);
        vs.accept(snap(100));
        vs.select_empire(99);
        assert_eq!(vs.selection(), Selection::None);
        vs.select_event(99);
        assert_eq!(vs.selection(), Selection::None);
    }

    #[test]
    fn new_snapshot_clears_selection_made_during_fetch() {
        let mut vs = ViewerState::new(0);
        vs.jump(100);
        vs.accept(snap(100));
        vs.jump(200);
        // The old overlays are still interactive while the fetch runs.
        vs.select_empire(0);
        assert_eq!(vs.selection(), Selection::None, "commit cleared it");

        vs.accept(snap(200));
        assert_eq!(vs.selection(), Selection::None);
    }

    #[test]
    fn playback_holds_at_upper_bound() {
        let mut vs = ViewerState::new(1950);
        assert_eq!(vs.advance_playback(), Some(2020));
        vs.accept(snap(2020));

        // Next tick must not advance past the bound, wrap, or error.
        assert_eq!(vs.advance_playback(), None);
        assert_eq!(vs.target_year(), 2020);
        assert_eq!(vs.committed_year(), Some(2020));
    }

    #[test]
    fn playback_steps_in_century_increments_below_bound() {
        let mut vs = ViewerState::new(1700);
        assert_eq!(vs.advance_playback(), Some(1800));
        assert_eq!(vs.advance_playback(), Some(1900));
        assert_eq!(vs.advance_playback(), Some(2000));
        assert_eq!(vs.advance_playback(), Some(2020));
        assert_eq!(vs.advance_playback(), None);
    }

    #[test]
    fn steps_clamp_at_bounds() {
        let mut vs = ViewerState::new(-3000);
        assert_eq!(vs.step(-100), -3000);
        assert_eq!(vs.step(100), -2900);

        let mut vs = ViewerState::new(2020);
        assert_eq!(vs.step(100), 2020);
    }

    #[test]
    fn scrub_clamps_out_of_range_years() {
        let mut vs = ViewerState::new(0);
        vs.scrub(9_999, 0.0);
        assert_eq!(vs.target_year(), 2020);
        vs.scrub(-9_999, 10.0);
        assert_eq!(vs.target_year(), -3000);
    }

    #[test]
    fn empty_snapshot_is_accepted_without_special_casing() {
        let mut vs = ViewerState::new(0);
        vs.jump(300);
        assert!(vs.accept(Snapshot::degraded(300, "")));
        let s = vs.snapshot().unwrap();
        assert!(s.is_empty());
        assert!(!vs.loading());
    }

    #[test]
    fn loading_tracks_commit_and_accept() {
        let mut vs = ViewerState::new(0);
        assert!(!vs.loading());
        vs.jump(100);
        assert!(vs.loading());
        vs.accept(snap(100));
        assert!(!vs.loading());
    }
}
