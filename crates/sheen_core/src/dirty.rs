//! Per-frame dirty tracking

/// Marks that camera/material state changed since the last render sync.
///
/// Any number of writes within a frame coalesce into a single pending sync;
/// [`DirtyFlag::take`] consumes it exactly once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyFlag(bool);

impl DirtyFlag {
    pub fn mark(&mut self) {
        self.0 = true;
    }

    pub fn is_set(&self) -> bool {
        self.0
    }

    /// Consume the flag, returning whether a sync is due
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.0)
    }
}
