//! Animation-frame request queue.
//!
//! Work that should happen "on the next frame" is registered here and gets
//! a [`FrameId`] back.  Holding the id allows the owner to cancel and
//! reschedule, which is how scroll updates are coalesced to one per frame
//! and how at most one programmatic scroll runs at a time.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a pending frame request.  Becomes stale once the request
    /// runs or is cancelled.
    pub struct FrameId;
}

/// Pending frame requests, run in insertion order.
#[derive(Debug)]
pub struct FrameLoop<T> {
    pending: SlotMap<FrameId, (u64, T)>,
    seq: u64,
}

impl<T> FrameLoop<T> {
    pub fn new() -> Self {
        Self {
            pending: SlotMap::with_key(),
            seq: 0,
        }
    }

    /// Schedule `task` for the next frame.
    pub fn request(&mut self, task: T) -> FrameId {
        self.seq = self.seq.wrapping_add(1);
        self.pending.insert((self.seq, task))
    }

    /// Cancel a pending request.  Stale ids are ignored.
    pub fn cancel(&mut self, id: FrameId) -> Option<T> {
        self.pending.remove(id).map(|(_, task)| task)
    }

    #[cfg(test)]
    pub fn is_pending(&self, id: FrameId) -> bool {
        self.pending.contains_key(id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every request due this frame.  Anything requested while the
    /// returned tasks are processed runs on the following frame.
    pub fn take_frame(&mut self) -> Vec<T> {
        let mut due: Vec<(u64, T)> = self.pending.drain().map(|(_, entry)| entry).collect();
        due.sort_by_key(|(seq, _)| *seq);
        due.into_iter().map(|(_, task)| task).collect()
    }

    /// Drop all pending requests.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T> Default for FrameLoop<T> {
    fn default() -> Self {
        Self::new()
    }
}
