/// A single-slot pending task for the next display frame.
///
/// Scheduling while already scheduled keeps the one pending run, so any number of
/// stimuli within a frame produce exactly one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FrameSlot {
    pending: bool,
}

impl FrameSlot {
    pub(crate) fn schedule(&mut self) {
        self.pending = true;
    }

    pub(crate) fn cancel(&mut self) {
        self.pending = false;
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consumes the pending run, if any.
    pub(crate) fn take(&mut self) -> bool {
        core::mem::replace(&mut self.pending, false)
    }
}
