use stream_list::{Adapter, LoadFuture, OptionError, StreamList, StreamListOptions, SyncState};

use crate::VecContainer;

/// A framework-neutral driver that owns a [`StreamList`] and feeds it time and frames.
///
/// Adapters drive it by calling:
/// - `on_scroll` / `on_resize` when UI events occur
/// - `tick(now_ms)` once per display frame (fires retry delays, observes fetch results,
///   and runs the frame's sync pass)
pub struct Controller<A: Adapter> {
    list: StreamList<A>,
    now_ms: u64,
    frames: u64,
}

impl<A: Adapter> Controller<A> {
    pub fn new(
        container: A::Container,
        adapter: A,
        options: StreamListOptions,
    ) -> Result<Self, OptionError> {
        Ok(Self::from_list(StreamList::new(container, adapter, options)?))
    }

    pub fn from_list(list: StreamList<A>) -> Self {
        let now_ms = list.now_ms();
        Self {
            list,
            now_ms,
            frames: 0,
        }
    }

    pub fn list(&self) -> &StreamList<A> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut StreamList<A> {
        &mut self.list
    }

    pub fn into_list(self) -> StreamList<A> {
        self.list
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Frames driven so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn load(&mut self, context: A::Context) -> LoadFuture<A::Result> {
        self.list.load(context)
    }

    pub fn abort(&mut self) {
        self.list.abort();
    }

    pub fn render_all(&mut self) {
        self.list.render_all();
    }

    /// Call this when the UI reports a scroll offset change.
    pub fn on_scroll(&mut self) {
        self.list.notify_reflow();
    }

    /// Call this when the viewport or container is resized.
    pub fn on_resize(&mut self) {
        self.list.notify_reflow();
    }

    /// Advances the list to `now_ms` and runs one display frame.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        self.list.advance(self.now_ms);
        self.list.frame();
        self.frames += 1;
    }

    /// Runs `count` frames spaced `frame_ms` apart, starting after the current time.
    pub fn run_frames(&mut self, count: usize, frame_ms: u64) {
        for _ in 0..count {
            let next = self.now_ms.saturating_add(frame_ms);
            self.tick(next);
        }
    }

    /// Ticks at the current time until no sync pass is queued and no fetch is in flight,
    /// or `max_frames` have run. Returns the frames used.
    ///
    /// A fetch waiting on a retry delay does not keep this running.
    pub fn settle(&mut self, max_frames: usize) -> usize {
        for used in 0..max_frames {
            let idle = self.list.sync_state() == SyncState::Idle
                && !self.list.is_reflow_pending()
                && !self.list.is_fetch_in_flight()
                && self
                    .list
                    .next_retry_at_ms()
                    .is_none_or(|due| due > self.now_ms);
            if idle {
                atrace!(frames = used, "Controller::settle: idle");
                return used;
            }
            self.tick(self.now_ms);
        }
        max_frames
    }
}

impl<A, E> Controller<A>
where
    A: Adapter<Container = VecContainer<E>>,
    E: Clone,
{
    pub fn container(&self) -> &VecContainer<E> {
        self.list.container()
    }

    /// Moves the scroll offset and reports the scroll.
    pub fn scroll_to(&mut self, offset: u64) {
        self.list.container_mut().set_scroll_offset(offset);
        self.on_scroll();
    }

    pub fn scroll_by(&mut self, delta: i64) {
        self.list.container_mut().scroll_by(delta);
        self.on_scroll();
    }

    pub fn scroll_to_end(&mut self) {
        self.list.container_mut().scroll_to_end();
        self.on_scroll();
    }

    pub fn resize(&mut self, viewport_size: u32) {
        self.list.container_mut().set_viewport_size(viewport_size);
        self.on_resize();
    }
}

impl<A: Adapter> core::fmt::Debug for Controller<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("list", &self.list)
            .field("now_ms", &self.now_ms)
            .field("frames", &self.frames)
            .finish()
    }
}
