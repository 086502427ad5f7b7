use crate::domain::models::Measurement;
use std::collections::HashMap;
use tracing::debug;

/// Ordered set of (angle, power) readings keyed by angle.
///
/// Insertion order is preserved for display; re-adding an angle overwrites
/// its power in place (last write wins) without reordering.
#[derive(Debug, Default)]
pub struct MeasurementStore {
    entries: Vec<Measurement>,
    by_angle: HashMap<u16, usize>,
}

impl MeasurementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, angle_deg: u16, power_dbm: f64) {
        match self.by_angle.get(&angle_deg) {
            Some(&index) => {
                self.entries[index].power_dbm = power_dbm;
                debug!(angle_deg, power_dbm, "measurement updated");
            }
            None => {
                self.by_angle.insert(angle_deg, self.entries.len());
                self.entries.push(Measurement {
                    angle_deg,
                    power_dbm,
                });
                debug!(angle_deg, power_dbm, "measurement added");
            }
        }
    }

    /// Immutable copy for readers that outlive the next mutation.
    pub fn snapshot(&self) -> Vec<Measurement> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_angle.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_appends_in_insertion_order() {
        let mut store = MeasurementStore::new();
        store.upsert(90, -3.0);
        store.upsert(0, 10.0);
        store.upsert(45, 2.5);

        let angles: Vec<u16> = store.snapshot().iter().map(|m| m.angle_deg).collect();
        assert_eq!(angles, vec![90, 0, 45]);
    }

    #[test]
    fn upsert_overwrites_existing_angle_without_reordering() {
        let mut store = MeasurementStore::new();
        store.upsert(0, 10.0);
        store.upsert(90, -3.0);
        store.upsert(0, 7.5);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].angle_deg, 0);
        assert_eq!(snapshot[0].power_dbm, 7.5);
        assert_eq!(snapshot[1].angle_deg, 90);
    }

    #[test]
    fn upsert_is_idempotent_for_identical_pairs() {
        let mut store = MeasurementStore::new();
        store.upsert(10, 1.0);
        store.upsert(10, 1.0);

        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].power_dbm, 1.0);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = MeasurementStore::new();
        store.upsert(10, 1.0);
        store.clear();

        assert!(store.is_empty());
        store.upsert(10, 2.0);
        assert_eq!(store.snapshot()[0].power_dbm, 2.0);
    }
}
