use core::task::Context;

use crate::adapter::ElementOf;
use crate::binder::{self, BindOutcome};
use crate::deferred::{Deferred, LoadFuture};
use crate::logger::{Logger, Severity};
use crate::pipeline::{FetchRequest, LoadPipeline};
use crate::reflow::ReflowListener;
use crate::slot::FrameSlot;
use crate::store::ItemStore;
use crate::view;
use crate::{
    Adapter, Container, FetchError, Item, LoadError, OptionError, Page, RenderChunk,
    SessionState, Settings, StreamListOptions, SyncState,
};

/// A headless incremental list.
///
/// The engine loads pages through an [`Adapter`], accumulates and deduplicates them, and
/// appends rendered items to a [`Container`] in chunks as the viewer nears the end of
/// what is already rendered. It owns no timers or event loop; the host drives it:
/// - [`StreamList::advance`] with the current time, to fire retry delays and observe
///   fetch completions
/// - [`StreamList::frame`] once per display frame, to run queued sync passes
/// - [`StreamList::notify_reflow`] on scroll/resize
///
/// For a ready-made driver, see the `stream-list-adapter` crate.
pub struct StreamList<A: Adapter> {
    adapter: A,
    container: A::Container,
    options: StreamListOptions,
    preload_threshold: usize,

    store: ItemStore<A::Key, A::Result, ElementOf<A>>,
    pipeline: LoadPipeline<A::Context, A::Result>,

    sync: FrameSlot,
    stepping: bool,
    reflow: ReflowListener,
    render_all: bool,
    now_ms: u64,
}

impl<A: Adapter> StreamList<A> {
    pub fn new(
        container: A::Container,
        adapter: A,
        options: StreamListOptions,
    ) -> Result<Self, OptionError> {
        options.settings.validate()?;
        let preload_threshold = options.settings.effective_preload_threshold();
        sdebug!(
            view_chunk_size = options.settings.view_chunk_size,
            display_threshold = options.settings.display_threshold,
            preload_threshold,
            "StreamList::new"
        );
        Ok(Self {
            adapter,
            container,
            options,
            preload_threshold,
            store: ItemStore::new(),
            pipeline: LoadPipeline::new(),
            sync: FrameSlot::default(),
            stepping: false,
            reflow: ReflowListener::default(),
            render_all: false,
            now_ms: 0,
        })
    }

    /// Starts a new session, replacing whatever was loaded before.
    ///
    /// Any outstanding load is aborted first (its future resolves to an aborted error).
    /// The returned future resolves with the first page once it is bound, or fails when
    /// every retry for it is exhausted or the session is aborted before then.
    pub fn load(&mut self, context: A::Context) -> LoadFuture<A::Result> {
        self.abort();

        let (waiter, future) = Deferred::new();
        self.pipeline.begin_session(waiter);
        self.render_all = false;
        self.reflow.detach();
        self.reflow.attach();

        self.fetch_page(context, 0, 0);
        future
    }

    /// Cancels any pending or in-flight fetch.
    ///
    /// If the first page of a session is still outstanding, its future resolves to an
    /// aborted [`LoadError`]. Calling this with nothing outstanding does nothing.
    pub fn abort(&mut self) {
        let outstanding = self.pipeline.cancel();
        if outstanding {
            strace!(generation = self.pipeline.generation(), "abort: fetch cancelled");
        }
        if let Some(waiter) = self.pipeline.take_waiter() {
            self.log(Severity::Notice, || "Loading aborted.".to_owned());
            waiter.reject(LoadError::aborted());
        }
    }

    /// Renders every loaded item regardless of the display threshold, and keeps fetching
    /// until the data is exhausted. Cleared by the next `load`.
    pub fn render_all(&mut self) {
        self.render_all = true;
        self.schedule_sync();
    }

    /// Scroll/resize notification. Coalesced to one sync request per frame and ignored
    /// once the list is exhausted.
    pub fn notify_reflow(&mut self) {
        if !self.reflow.notify() {
            strace!("notify_reflow: listener detached");
        }
    }

    /// Task-queue turn: starts a fetch whose retry delay has elapsed, then polls the
    /// in-flight fetch once and handles its result.
    pub fn advance(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        self.start_due_fetch();

        let waker = futures_task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        if let Some((request, outcome)) = self.pipeline.poll(&mut cx) {
            self.complete_fetch(request, outcome);
        }
    }

    /// Display-frame turn: runs the sync pass queued for this frame, and turns a reflow
    /// seen since the last frame into a sync pass for the next one.
    pub fn frame(&mut self) {
        let run_sync = self.sync.take();
        if self.reflow.on_frame() {
            self.schedule_sync();
        }
        if run_sync {
            self.sync_pass();
        }
    }

    fn schedule_sync(&mut self) {
        self.sync.schedule();
    }

    fn fetch_page(&mut self, context: A::Context, offset: usize, delay_ms: u64) {
        self.pipeline
            .schedule(FetchRequest { context, offset }, self.now_ms, delay_ms);
        if delay_ms == 0 {
            self.start_due_fetch();
        }
    }

    fn start_due_fetch(&mut self) {
        let Some(request) = self.pipeline.take_due(self.now_ms) else {
            return;
        };
        if !(self.pipeline.has_more() || request.replace()) {
            strace!(offset = request.offset, "fetch skipped: no more data");
            return;
        }

        self.log(Severity::Notice, || {
            format!("Loading data from offset {}.", request.offset)
        });
        let future = self.adapter.load_items(&request.context, request.offset);
        self.pipeline.start(request, future);
    }

    fn complete_fetch(
        &mut self,
        request: FetchRequest<A::Context>,
        outcome: Result<Page<A::Result>, FetchError>,
    ) {
        match outcome {
            Ok(page) if !page.is_malformed() => self.accept_page(request, page),
            Ok(page) => self.fail_fetch(request, FetchError::MalformedPage, Some(page)),
            Err(err) => self.fail_fetch(request, err, None),
        }
    }

    fn accept_page(&mut self, request: FetchRequest<A::Context>, page: Page<A::Result>) {
        let replace = request.replace();
        let results = page.items.as_deref().unwrap_or_default();
        let adapter = &self.adapter;
        let outcome = binder::bind(
            &mut self.store,
            results,
            replace,
            self.options.settings.reuse_results,
            |result| adapter.item_key(result),
        );
        self.log_bind(outcome);

        self.pipeline.set_has_more(outcome.added_any());
        if !outcome.added_any() {
            self.log(Severity::Notice, || "Reached end of data.".to_owned());
        }
        self.pipeline.reset_retries();

        let waiter = if replace {
            self.pipeline.commit_context(request.context);
            self.pipeline.take_waiter()
        } else {
            None
        };

        self.schedule_sync();
        if let Some(waiter) = waiter {
            waiter.resolve(page);
        }
    }

    fn fail_fetch(
        &mut self,
        request: FetchRequest<A::Context>,
        err: FetchError,
        result: Option<Page<A::Result>>,
    ) {
        let settings = self.options.settings;
        if self.pipeline.try_retry(settings.load_retry_count) {
            let delay_ms = settings.load_retry_delay_ms;
            self.log(Severity::Error, || {
                format!("Loading data failed. Retrying in {delay_ms}ms. ({err})")
            });
            self.fetch_page(request.context, request.offset, delay_ms);
            return;
        }

        self.log(Severity::Error, || {
            format!("Loading data failed. Will not retry. ({err})")
        });
        if let Some(waiter) = self.pipeline.take_waiter() {
            waiter.reject(LoadError::failed(err, result));
        }
    }

    fn log_bind(&self, outcome: BindOutcome) {
        self.log(Severity::Notice, || {
            let mut msg = format!("Added {} items.", outcome.added);
            if outcome.discarded > 0 {
                msg.push_str(&format!(" Discarded {} duplicates.", outcome.discarded));
            }
            msg
        });
    }

    fn sync_pass(&mut self) {
        self.stepping = true;

        if self.store.cursor() == 0 {
            self.container.clear();
        }

        let settings = self.options.settings;
        let metrics = self.container.metrics();
        let near_end = metrics.distance_to_end() <= i64::from(settings.display_threshold);
        strace!(
            cursor = self.store.cursor(),
            len = self.store.len(),
            distance = metrics.distance_to_end(),
            render_all = self.render_all,
            state = ?self.sync_state(),
            "sync pass"
        );

        if self.render_all || near_end {
            let adapter = &mut self.adapter;
            let chunk = view::render_chunk(
                &mut self.store,
                &mut self.container,
                settings.view_chunk_size,
                |result, container| adapter.render_item(result, container),
            );
            if chunk.count > 0 {
                self.emit_render_chunk(&chunk);
            }

            if chunk.remaining > 0 {
                self.schedule_sync();
            } else if !self.pipeline.has_more() {
                sdebug!(len = self.store.len(), "list exhausted; detaching reflow listener");
                self.reflow.detach();
            }

            if self.pipeline.has_more()
                && !self.pipeline.is_busy()
                && chunk.remaining < self.preload_threshold
            {
                if let Some(context) = self.pipeline.context().cloned() {
                    let offset = self.store.len();
                    self.fetch_page(context, offset, 0);
                }
            }
        }

        self.stepping = false;
    }

    fn emit_render_chunk(&self, chunk: &RenderChunk) {
        if let Some(cb) = &self.options.on_render_chunk {
            cb(chunk);
        }
    }

    fn log(&self, severity: Severity, message: impl FnOnce() -> String) {
        if severity.enabled_at(self.options.settings.log_level) {
            self.options.logger.log(severity, &message());
        }
    }

    pub fn options(&self) -> &StreamListOptions {
        &self.options
    }

    pub fn settings(&self) -> &Settings {
        &self.options.settings
    }

    pub fn preload_threshold(&self) -> usize {
        self.preload_threshold
    }

    pub fn set_view_chunk_size(&mut self, view_chunk_size: usize) -> Result<(), OptionError> {
        if view_chunk_size == 0 {
            return Err(OptionError::new("view_chunk_size", view_chunk_size));
        }
        self.options.settings.view_chunk_size = view_chunk_size;
        Ok(())
    }

    pub fn set_display_threshold(&mut self, display_threshold: u32) {
        self.options.settings.display_threshold = display_threshold;
    }

    pub fn set_preload_threshold(&mut self, preload_threshold: usize) {
        self.options.settings.preload_threshold = Some(preload_threshold);
        self.preload_threshold = preload_threshold;
    }

    pub fn set_load_retry_count(&mut self, load_retry_count: u32) {
        self.options.settings.load_retry_count = load_retry_count;
    }

    pub fn set_load_retry_delay_ms(&mut self, delay_ms: u64) {
        self.options.settings.load_retry_delay_ms = delay_ms;
    }

    pub fn set_reuse_results(&mut self, reuse_results: bool) {
        self.options.settings.reuse_results = reuse_results;
    }

    pub fn set_log_level(&mut self, log_level: u8) {
        self.options.settings.log_level = log_level;
    }

    pub fn set_logger(&mut self, logger: impl Logger + Send + Sync + 'static) {
        self.options.logger = std::sync::Arc::new(logger);
    }

    pub fn set_on_render_chunk(
        &mut self,
        on_render_chunk: Option<impl Fn(&RenderChunk) + Send + Sync + 'static>,
    ) {
        self.options.on_render_chunk = on_render_chunk.map(|f| std::sync::Arc::new(f) as _);
    }

    /// Assigns a setting from its textual form; see [`Settings::set`].
    pub fn set_option(&mut self, name: &str, raw: &str) -> Result<(), OptionError> {
        let mut next = self.options.settings;
        next.set(name, raw)?;
        next.validate()?;
        if name == "preload_threshold" {
            self.preload_threshold = next.effective_preload_threshold();
        }
        self.options.settings = next;
        Ok(())
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn container(&self) -> &A::Container {
        &self.container
    }

    /// Mutable access for the host (e.g. to update scroll geometry). Children must only
    /// be changed by the engine.
    pub fn container_mut(&mut self) -> &mut A::Container {
        &mut self.container
    }

    pub fn items(&self) -> &[Item<A::Key, A::Result, ElementOf<A>>] {
        self.store.items()
    }

    pub fn item(&self, key: &A::Key) -> Option<&Item<A::Key, A::Result, ElementOf<A>>> {
        self.store.get(key)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn rendered_len(&self) -> usize {
        self.store.cursor()
    }

    pub fn backlog(&self) -> usize {
        self.store.backlog()
    }

    pub fn has_more_data(&self) -> bool {
        self.pipeline.has_more()
    }

    /// A fetch is waiting on a retry delay or in flight.
    pub fn is_loading(&self) -> bool {
        self.pipeline.is_busy()
    }

    pub fn is_fetch_in_flight(&self) -> bool {
        self.pipeline.is_in_flight()
    }

    /// When the pending retry (if any) becomes due.
    pub fn next_retry_at_ms(&self) -> Option<u64> {
        self.pipeline.due_ms()
    }

    pub fn retry_index(&self) -> u32 {
        self.pipeline.retry_index()
    }

    /// The context of the current session, once its first page has been bound.
    pub fn context(&self) -> Option<&A::Context> {
        self.pipeline.context()
    }

    pub fn is_listening(&self) -> bool {
        self.reflow.is_attached()
    }

    /// A scroll/resize notification is waiting for the next frame.
    pub fn is_reflow_pending(&self) -> bool {
        self.reflow.is_pending()
    }

    pub fn is_render_all(&self) -> bool {
        self.render_all
    }

    /// `Idle` or `Scheduled` from the host's side; `Stepping` is only visible to the
    /// engine's own diagnostics during a pass.
    pub fn sync_state(&self) -> SyncState {
        if self.stepping {
            SyncState::Stepping
        } else if self.sync.is_pending() {
            SyncState::Scheduled
        } else {
            SyncState::Idle
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Returns a lightweight snapshot of the session state.
    pub fn state(&self) -> SessionState {
        SessionState {
            items: self.store.len(),
            rendered: self.store.cursor(),
            has_more_data: self.pipeline.has_more(),
            loading: self.pipeline.is_busy(),
            retry_index: self.pipeline.retry_index(),
            render_all: self.render_all,
            listening: self.reflow.is_attached(),
            sync: self.sync_state(),
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &ItemStore<A::Key, A::Result, ElementOf<A>> {
        &self.store
    }
}

impl<A: Adapter> core::fmt::Debug for StreamList<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StreamList")
            .field("options", &self.options)
            .field("preload_threshold", &self.preload_threshold)
            .field("state", &self.state())
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}
