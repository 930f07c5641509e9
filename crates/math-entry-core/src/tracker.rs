//! Active-Field Tracker.
//!
//! Remembers which inner field of a composite field last received a click or
//! key event, so toolbar insertions land where the user is working.

/// Last-activated inner field of the current composite field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveFieldTracker {
    active: Option<usize>,
    field_count: usize,
}

impl ActiveFieldTracker {
    /// Start tracking a freshly built composite field.
    pub fn reset(&mut self, field_count: usize) {
        self.active = None;
        self.field_count = field_count;
    }

    /// Stop tracking; used whenever no composite field is live.
    pub fn clear(&mut self) {
        self.reset(0);
    }

    /// Record that the inner field at `index` was activated.
    pub fn record(&mut self, index: usize) {
        if index < self.field_count {
            tracing::trace!(index, "inner field activated");
            self.active = Some(index);
        } else {
            tracing::warn!(
                index,
                field_count = self.field_count,
                "ignoring activation of unknown inner field"
            );
        }
    }

    /// Index toolbar insertions should target.
    ///
    /// Falls back to the first inner field when none has been activated yet.
    pub fn active_index(&self) -> Option<usize> {
        if self.field_count == 0 {
            None
        } else {
            Some(self.active.unwrap_or(0))
        }
    }
}
