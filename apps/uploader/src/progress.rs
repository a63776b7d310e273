use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::storage::ProgressFn;

/// Per-file upload progress, keyed by the file's local id.
///
/// Values are percentages in `[0, 100]` and never decrease; a file reads
/// exactly 100 only once its upload has completed successfully. Cloning is
/// cheap and shares the underlying map, so the UI can observe a submission
/// while the orchestrator drives it.
#[derive(Debug, Clone, Default)]
pub struct ProgressMap {
    inner: Arc<Mutex<HashMap<Uuid, f64>>>,
}

impl ProgressMap {
    pub fn report(&self, id: Uuid, percent: f64) {
        let clamped = percent.clamp(0.0, 100.0);
        let mut map = self.inner.lock().expect("progress map lock poisoned");
        let entry = map.entry(id).or_insert(0.0);
        if clamped > *entry {
            *entry = clamped;
        }
    }

    pub fn get(&self, id: Uuid) -> Option<f64> {
        self.inner
            .lock()
            .expect("progress map lock poisoned")
            .get(&id)
            .copied()
    }

    /// True while any tracked upload is strictly below 100%.
    pub fn any_incomplete(&self) -> bool {
        self.inner
            .lock()
            .expect("progress map lock poisoned")
            .values()
            .any(|p| *p < 100.0)
    }

    pub fn snapshot(&self) -> Vec<(Uuid, f64)> {
        self.inner
            .lock()
            .expect("progress map lock poisoned")
            .iter()
            .map(|(id, p)| (*id, *p))
            .collect()
    }

    pub fn clear(&self) {
        self.inner
            .lock()
            .expect("progress map lock poisoned")
            .clear();
    }

    /// Progress callback bound to one file, handed to the object store.
    pub fn handle(&self, id: Uuid) -> ProgressFn {
        let map = self.clone();
        Box::new(move |percent| map.report(id, percent))
    }
}
