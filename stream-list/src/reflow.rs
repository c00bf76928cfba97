use crate::slot::FrameSlot;

/// Coalesces scroll/resize notifications down to one sync request per frame.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ReflowListener {
    attached: bool,
    slot: FrameSlot,
}

impl ReflowListener {
    pub(crate) fn attach(&mut self) {
        self.attached = true;
    }

    /// Stops listening and drops any queued notification.
    pub(crate) fn detach(&mut self) {
        self.attached = false;
        self.slot.cancel();
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.attached
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.slot.is_pending()
    }

    /// Returns whether the notification was accepted.
    pub(crate) fn notify(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.slot.schedule();
        true
    }

    /// Called once per frame; `true` means a sync pass should be requested.
    pub(crate) fn on_frame(&mut self) -> bool {
        self.slot.take()
    }
}
