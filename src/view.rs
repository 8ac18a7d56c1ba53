//! Selection & view state (component C9): the current selected coordinate,
//! visible ranges, zoom, and crosshair toggles for one window context.

use crate::sequence::Range;

/// Observers are notified after the selection has updated, in registration
/// order; each must treat the call as idempotent (spec §5).
pub trait SelectionObserver {
    fn on_selection_changed(&mut self, q: i64, s: i64);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CrosshairFlags {
    pub crosshair_on: bool,
    pub crosshair_coords_on: bool,
    pub crosshair_fullscreen: bool,
    pub grid_on: bool,
}

/// Per-window context: one value per open plot, sharing the session's
/// sequences and matrix (spec §3 "Lifecycle").
pub struct ViewState {
    selected: (i64, i64),
    ref_range: Range,
    match_range: Range,
    zoom: f64,
    flags: CrosshairFlags,
    observers: Vec<Box<dyn SelectionObserver>>,
}

impl ViewState {
    pub fn new(ref_range: Range, match_range: Range, zoom: f64) -> Self {
        Self {
            selected: (ref_range.min, match_range.min),
            ref_range,
            match_range,
            zoom,
            flags: CrosshairFlags::default(),
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn SelectionObserver>) {
        self.observers.push(observer);
    }

    pub fn selection(&self) -> (i64, i64) {
        self.selected
    }

    pub fn ref_range(&self) -> Range {
        self.ref_range
    }

    pub fn match_range(&self) -> Range {
        self.match_range
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn flags(&self) -> CrosshairFlags {
        self.flags
    }

    pub fn flags_mut(&mut self) -> &mut CrosshairFlags {
        &mut self.flags
    }

    /// Clamp `(q, s)` into the visible ranges, update the selection, and
    /// notify observers in registration order. Idempotent: calling this
    /// with the already-current selection still notifies, but observers
    /// must tolerate the repeat.
    pub fn set_selection(&mut self, q: i64, s: i64) {
        self.selected = (self.ref_range.clamp(q), self.match_range.clamp(s));
        for observer in &mut self.observers {
            observer.on_selection_changed(self.selected.0, self.selected.1);
        }
    }

    /// Change the visible sub-ranges. Returns `true` if the ranges
    /// actually changed, meaning the caller must re-run the engine (or
    /// open a new window context) before the pixmap is valid again.
    pub fn set_visible_range(&mut self, ref_range: Range, match_range: Range) -> bool {
        let changed = ref_range != self.ref_range || match_range != self.match_range;
        if changed {
            self.ref_range = ref_range;
            self.match_range = match_range;
            self.selected = (
                ref_range.clamp(self.selected.0),
                match_range.clamp(self.selected.1),
            );
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder(std::rc::Rc<std::cell::RefCell<Vec<(i64, i64)>>>);
    impl SelectionObserver for Recorder {
        fn on_selection_changed(&mut self, q: i64, s: i64) {
            self.0.borrow_mut().push((q, s));
        }
    }

    #[test]
    fn selection_clamps_into_visible_ranges() {
        let mut view = ViewState::new(Range::new(10, 20), Range::new(10, 20), 1.0);
        view.set_selection(5, 100);
        assert_eq!(view.selection(), (10, 20));
    }

    #[test]
    fn observers_fire_in_registration_order() {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut view = ViewState::new(Range::new(1, 100), Range::new(1, 100), 1.0);
        view.subscribe(Box::new(Recorder(log.clone())));
        view.subscribe(Box::new(Recorder(log.clone())));
        view.set_selection(15, 15);
        assert_eq!(log.borrow().as_slice(), &[(15, 15), (15, 15)]);
    }

    #[test]
    fn visible_range_change_is_reported_and_reclamps_selection() {
        let mut view = ViewState::new(Range::new(1, 100), Range::new(1, 100), 1.0);
        view.set_selection(90, 90);
        let changed = view.set_visible_range(Range::new(1, 50), Range::new(1, 50));
        assert!(changed);
        assert_eq!(view.selection(), (50, 50));
    }

    #[test]
    fn unchanged_range_reports_false() {
        let mut view = ViewState::new(Range::new(1, 100), Range::new(1, 100), 1.0);
        let changed = view.set_visible_range(Range::new(1, 100), Range::new(1, 100));
        assert!(!changed);
    }
}
