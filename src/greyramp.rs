//! Greyramp transfer function (component C6): maps raw pixel intensities
//! [0..255] to displayable grey levels via a 256-entry lookup table derived
//! from two user-chosen thresholds.

/// Build the 256-entry transfer table for thresholds `(lo, hi)`.
/// `lo > hi` is an inverted ramp (display swaps high and low); either order
/// is accepted, the table is built from `a = min(lo,hi)`, `b = max(lo,hi)`
/// and then flipped if `lo > hi`.
pub fn build_table(lo: u8, hi: u8) -> [u8; 256] {
    let inverted = lo > hi;
    let a = lo.min(hi) as i32;
    let b = lo.max(hi) as i32;

    let mut table = [0u8; 256];
    for (v, slot) in table.iter_mut().enumerate() {
        let v = v as i32;
        let mapped = if v <= a {
            0
        } else if v >= b {
            255
        } else {
            (((v - a) as i64 * 255) / (b - a) as i64) as i32
        };
        *slot = if inverted { 255 - mapped } else { mapped } as u8;
    }
    table
}

/// Apply a greyramp table to a raw pixmap, producing an independent display
/// image buffer of the same length. Pure, side-effect-free per spec §4.6.
pub fn apply(table: &[u8; 256], pixmap: &[u8]) -> Vec<u8> {
    pixmap.iter().map(|&v| table[v as usize]).collect()
}

/// Observer hook fired whenever the greyramp table changes, so that window
/// contexts can recompute their displayed image from the active pixmap.
pub trait GreyrampObserver {
    fn on_greyramp_changed(&mut self, table: &[u8; 256]);
}

/// Owns the active greyramp table and the list of subscribers notified on
/// change (spec §9: explicit subscription list, not a global pointer).
pub struct Greyramp {
    lo: u8,
    hi: u8,
    table: [u8; 256],
    observers: Vec<Box<dyn GreyrampObserver>>,
}

impl Greyramp {
    pub fn new(lo: u8, hi: u8) -> Self {
        Self {
            lo,
            hi,
            table: build_table(lo, hi),
            observers: Vec::new(),
        }
    }

    pub fn table(&self) -> &[u8; 256] {
        &self.table
    }

    pub fn subscribe(&mut self, observer: Box<dyn GreyrampObserver>) {
        self.observers.push(observer);
    }

    pub fn set_thresholds(&mut self, lo: u8, hi: u8) {
        self.lo = lo;
        self.hi = hi;
        self.table = build_table(lo, hi);
        for observer in &mut self.observers {
            observer.on_greyramp_changed(&self.table);
        }
    }

    pub fn thresholds(&self) -> (u8, u8) {
        (self.lo, self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotone_for_normal_ramp() {
        let table = build_table(50, 200);
        for v in 0..255 {
            assert!(table[v] <= table[v + 1]);
        }
    }

    #[test]
    fn clamps_below_and_above_thresholds() {
        let table = build_table(50, 200);
        assert_eq!(table[0], 0);
        assert_eq!(table[50], 0);
        assert_eq!(table[200], 255);
        assert_eq!(table[255], 255);
    }

    #[test]
    fn inverted_ramp_flips_direction() {
        let table = build_table(200, 50);
        assert_eq!(table[0], 255);
        assert_eq!(table[255], 0);
        for v in 0..255 {
            assert!(table[v] >= table[v + 1]);
        }
    }

    #[test]
    fn notifies_observers_on_change() {
        struct Counter(std::rc::Rc<std::cell::Cell<u32>>);
        impl GreyrampObserver for Counter {
            fn on_greyramp_changed(&mut self, _table: &[u8; 256]) {
                self.0.set(self.0.get() + 1);
            }
        }
        let count = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut ramp = Greyramp::new(0, 255);
        ramp.subscribe(Box::new(Counter(count.clone())));
        ramp.set_thresholds(10, 200);
        assert_eq!(count.get(), 1);
    }
}
