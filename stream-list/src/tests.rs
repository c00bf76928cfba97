use crate::*;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Row {
    id: u32,
    rev: u32,
}

fn row(id: u32) -> Row {
    Row { id, rev: 0 }
}

fn rows(ids: &[u32]) -> Vec<Row> {
    ids.iter().copied().map(row).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Node {
    id: u32,
    serial: u32,
}

#[derive(Debug)]
struct TestContainer {
    children: Vec<Node>,
    clears: usize,
    appends: usize,
    scroll_offset: u64,
    viewport_size: u32,
    content_start: u64,
    row_extent: u64,
}

impl Default for TestContainer {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            clears: 0,
            appends: 0,
            scroll_offset: 0,
            viewport_size: 100,
            content_start: 0,
            row_extent: 10,
        }
    }
}

impl TestContainer {
    fn ids(&self) -> Vec<u32> {
        self.children.iter().map(|n| n.id).collect()
    }
}

impl Container for TestContainer {
    type Element = Node;

    fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics {
            scroll_offset: self.scroll_offset,
            viewport_size: self.viewport_size,
            content_start: self.content_start,
            content_size: self.children.len() as u64 * self.row_extent,
        }
    }

    fn clear(&mut self) {
        self.children.clear();
        self.clears += 1;
    }

    fn append(&mut self, elements: Vec<Node>) {
        self.appends += 1;
        self.children.extend(elements);
    }
}

#[derive(Debug)]
enum Response {
    Page(Vec<Row>),
    Malformed,
    Fail(&'static str),
    Hang,
}

/// Serves scripted responses in order; an empty script means end of data.
#[derive(Debug, Default)]
struct ScriptedAdapter {
    script: VecDeque<Response>,
    calls: Vec<(&'static str, usize)>,
    renders: Vec<u32>,
}

impl ScriptedAdapter {
    fn new(script: impl IntoIterator<Item = Response>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    fn offsets(&self) -> Vec<usize> {
        self.calls.iter().map(|&(_, offset)| offset).collect()
    }
}

impl Adapter for ScriptedAdapter {
    type Context = &'static str;
    type Result = Row;
    type Key = u32;
    type Container = TestContainer;

    fn load_items(&mut self, context: &&'static str, offset: usize) -> FetchFuture<Row> {
        self.calls.push((*context, offset));
        let outcome = match self.script.pop_front().unwrap_or(Response::Page(Vec::new())) {
            Response::Page(items) => Ok(Page::new(items)),
            Response::Malformed => Ok(Page::malformed()),
            Response::Fail(msg) => Err(FetchError::message(msg)),
            Response::Hang => {
                return Box::pin(core::future::pending::<Result<Page<Row>, FetchError>>());
            }
        };
        Box::pin(core::future::ready(outcome))
    }

    fn item_key(&self, result: &Row) -> u32 {
        result.id
    }

    fn render_item(&mut self, result: &Row, _container: &TestContainer) -> Node {
        self.renders.push(result.id);
        Node {
            id: result.id,
            serial: self.renders.len() as u32,
        }
    }
}

#[derive(Clone, Default)]
struct RecordingLogger {
    lines: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl RecordingLogger {
    fn push(&self, severity: Severity, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((severity, message.to_owned()));
    }

    fn messages(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn count_containing(&self, needle: &str) -> usize {
        self.messages().iter().filter(|m| m.contains(needle)).count()
    }
}

impl Logger for RecordingLogger {
    fn error(&self, message: &str) {
        self.push(Severity::Error, message);
    }

    fn warn(&self, message: &str) {
        self.push(Severity::Warning, message);
    }

    fn info(&self, message: &str) {
        self.push(Severity::Informational, message);
    }

    fn debug(&self, message: &str) {
        self.push(Severity::Debug, message);
    }
}

type TestList = StreamList<ScriptedAdapter>;

fn new_list(script: impl IntoIterator<Item = Response>, options: StreamListOptions) -> TestList {
    StreamList::new(TestContainer::default(), ScriptedAdapter::new(script), options).unwrap()
}

/// Runs `n` task-queue turns and frames at `now_ms`.
fn pump(list: &mut TestList, now_ms: u64, n: usize) {
    for _ in 0..n {
        list.advance(now_ms);
        list.frame();
    }
}

type TestStore = ItemStore<u32, Row, Node>;

fn bind_rows(store: &mut TestStore, results: &[Row], replace: bool, reuse: bool) -> BindOutcome {
    crate::binder::bind(store, results, replace, reuse, |r| r.id)
}

fn store_ids(store: &TestStore) -> Vec<u32> {
    store.iter().map(|item| item.key).collect()
}

#[test]
fn bind_discards_duplicates_within_and_across_pages() {
    let mut store = TestStore::new();

    let out = bind_rows(&mut store, &rows(&[1, 2, 2, 1]), true, false);
    assert_eq!(out, BindOutcome { added: 2, discarded: 2 });
    assert!(out.added_any());

    let out = bind_rows(&mut store, &rows(&[2, 3, 3]), false, false);
    assert_eq!(out, BindOutcome { added: 1, discarded: 2 });

    assert_eq!(store_ids(&store), [1, 2, 3]);
    store.assert_consistent();
}

#[test]
fn append_never_overwrites_existing_key() {
    let mut store = TestStore::new();
    bind_rows(&mut store, &rows(&[1]), true, false);

    let out = bind_rows(&mut store, &[Row { id: 1, rev: 9 }], false, true);
    assert!(!out.added_any());
    assert_eq!(store.get(&1).unwrap().result.rev, 0);
    assert_eq!(store.len(), 1);
}

#[test]
fn replace_without_reuse_builds_fresh_items() {
    let mut store = TestStore::new();
    bind_rows(&mut store, &rows(&[1, 2]), true, false);
    let mut container = TestContainer::default();
    crate::view::render_chunk(&mut store, &mut container, 10, |r, _| Node { id: r.id, serial: 1 });
    assert!(store.get(&1).unwrap().is_rendered());

    let out = bind_rows(&mut store, &[Row { id: 1, rev: 7 }], true, false);
    assert_eq!(out.added, 1);

    let item = store.get(&1).unwrap();
    assert_eq!(item.result.rev, 7);
    assert!(item.element.is_none());
    assert!(!store.contains_key(&2));
    assert_eq!(store.cursor(), 0);
    store.assert_consistent();
}

#[test]
fn replace_with_reuse_keeps_item_and_element() {
    let mut store = TestStore::new();
    bind_rows(&mut store, &rows(&[1, 2]), true, true);
    let mut container = TestContainer::default();
    crate::view::render_chunk(&mut store, &mut container, 10, |r, _| Node { id: r.id, serial: 42 });

    bind_rows(&mut store, &[Row { id: 3, rev: 0 }, Row { id: 1, rev: 7 }], true, true);

    assert_eq!(store_ids(&store), [3, 1]);
    let item = store.get(&1).unwrap();
    assert_eq!(item.result.rev, 0);
    assert_eq!(item.element, Some(Node { id: 1, serial: 42 }));
    assert!(store.get(&3).unwrap().element.is_none());
    assert_eq!(store.cursor(), 0);
    store.assert_consistent();
}

#[test]
fn replace_with_empty_page_empties_store() {
    let mut store = TestStore::new();
    bind_rows(&mut store, &rows(&[1, 2]), true, false);
    let out = bind_rows(&mut store, &[], true, false);
    assert!(!out.added_any());
    assert!(store.is_empty());
    store.assert_consistent();
}

#[test]
fn render_chunk_advances_cursor_by_chunk_size() {
    let mut store = TestStore::new();
    bind_rows(&mut store, &rows(&[0, 1, 2, 3, 4]), true, false);
    let mut container = TestContainer::default();
    let mut render = |r: &Row, _: &TestContainer| Node { id: r.id, serial: 0 };

    let chunk = crate::view::render_chunk(&mut store, &mut container, 2, &mut render);
    assert_eq!(chunk, RenderChunk { start: 0, count: 2, remaining: 3 });
    assert_eq!(container.ids(), [0, 1]);

    let chunk = crate::view::render_chunk(&mut store, &mut container, 2, &mut render);
    assert_eq!(chunk, RenderChunk { start: 2, count: 2, remaining: 1 });
    assert_eq!(container.ids(), [0, 1, 2, 3]);

    let chunk = crate::view::render_chunk(&mut store, &mut container, 2, &mut render);
    assert_eq!(chunk, RenderChunk { start: 4, count: 1, remaining: 0 });
    assert_eq!(chunk.end(), 5);
    assert_eq!(container.ids(), [0, 1, 2, 3, 4]);
    assert_eq!(store.backlog(), chunk.remaining);

    let chunk = crate::view::render_chunk(&mut store, &mut container, 2, &mut render);
    assert_eq!(chunk.count, 0);
    assert_eq!(container.appends, 3);
}

#[test]
fn render_chunk_reuses_existing_elements() {
    let mut store = TestStore::new();
    bind_rows(&mut store, &rows(&[1, 2]), true, true);
    let mut container = TestContainer::default();
    let mut calls = 0;
    crate::view::render_chunk(&mut store, &mut container, 10, |r, _| {
        calls += 1;
        Node { id: r.id, serial: calls }
    });

    bind_rows(&mut store, &rows(&[2, 1]), true, true);
    container.clear();
    crate::view::render_chunk(&mut store, &mut container, 10, |r, _| {
        calls += 1;
        Node { id: r.id, serial: calls }
    });

    assert_eq!(calls, 2);
    assert_eq!(
        container.children,
        [Node { id: 2, serial: 2 }, Node { id: 1, serial: 1 }]
    );
}

#[test]
fn paginated_pages_render_in_order_without_duplicates() {
    let mut list = new_list(
        [
            Response::Page(rows(&[1, 2])),
            Response::Page(rows(&[2, 3])),
            Response::Page(Vec::new()),
        ],
        StreamListOptions::new(),
    );

    let mut first = list.load("q");
    assert_eq!(list.adapter().offsets(), [0]);
    assert!(list.is_listening());

    pump(&mut list, 0, 10);

    assert_eq!(list.container().ids(), [1, 2, 3]);
    assert_eq!(list.adapter().renders, [1, 2, 3]);
    assert_eq!(list.adapter().offsets(), [0, 2, 3]);
    assert!(!list.has_more_data());
    assert!(!list.is_listening());
    assert!(list.state().is_exhausted());
    assert_eq!(list.context(), Some(&"q"));
    list.store().assert_consistent();

    let page = first.try_take().unwrap().unwrap();
    assert_eq!(page.items, Some(rows(&[1, 2])));
}

#[test]
fn load_future_resolves_only_after_advance() {
    let mut list = new_list([Response::Page(rows(&[1]))], StreamListOptions::new());
    let fut = list.load("q");
    assert!(!fut.is_settled());
    assert!(list.is_fetch_in_flight());

    list.advance(0);
    assert!(fut.is_settled());
    assert_eq!(list.sync_state(), SyncState::Scheduled);
    assert_eq!(fut.now_or_never().unwrap().unwrap().len(), 1);
}

#[test]
fn retries_then_resolves_with_successful_page() {
    let mut list = new_list(
        [
            Response::Fail("boom"),
            Response::Fail("boom"),
            Response::Page(rows(&[1, 2])),
        ],
        StreamListOptions::new()
            .with_load_retry_count(3)
            .with_load_retry_delay_ms(100),
    );
    let fut = list.load("q");

    list.advance(0);
    assert_eq!(list.retry_index(), 1);
    assert_eq!(list.next_retry_at_ms(), Some(100));
    assert!(list.is_loading());
    assert!(!list.is_fetch_in_flight());

    list.advance(50);
    assert_eq!(list.adapter().calls.len(), 1);

    list.advance(100);
    assert_eq!(list.adapter().calls.len(), 2);
    assert_eq!(list.next_retry_at_ms(), Some(200));

    list.advance(200);
    assert_eq!(list.adapter().calls.len(), 3);
    assert_eq!(list.retry_index(), 0);

    let page = fut.now_or_never().unwrap().unwrap();
    assert_eq!(page.items, Some(rows(&[1, 2])));
    assert_eq!(list.len(), 2);
}

#[test]
fn permanent_failure_stops_after_retry_limit() {
    let mut list = new_list(
        (0..10).map(|_| Response::Fail("down")),
        StreamListOptions::new()
            .with_load_retry_count(2)
            .with_load_retry_delay_ms(0),
    );
    let fut = list.load("q");

    for _ in 0..10 {
        list.advance(0);
    }

    assert_eq!(list.adapter().calls.len(), 3);
    assert!(!list.is_loading());
    assert!(list.has_more_data());

    let err = fut.now_or_never().unwrap().unwrap_err();
    assert!(!err.is_aborted());
    assert!(err.result().is_none());
    assert_eq!(err.cause().unwrap().to_string(), "down");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn malformed_page_is_a_failure() {
    let mut list = new_list(
        [Response::Malformed],
        StreamListOptions::new().with_load_retry_count(0),
    );
    let fut = list.load("q");
    list.advance(0);

    let err = fut.now_or_never().unwrap().unwrap_err();
    assert!(matches!(err.cause(), Some(FetchError::MalformedPage)));
    assert!(err.result().unwrap().is_malformed());
    assert!(list.is_empty());
}

#[test]
fn abort_rejects_pending_load_without_retry() {
    let logger = RecordingLogger::default();
    let mut list = new_list(
        [Response::Hang],
        StreamListOptions::new()
            .with_logger(logger.clone())
            .with_log_level(7),
    );
    let fut = list.load("q");
    list.advance(0);
    assert!(list.is_fetch_in_flight());

    list.abort();
    assert!(!list.is_loading());
    assert_eq!(list.next_retry_at_ms(), None);

    let err = fut.now_or_never().unwrap().unwrap_err();
    assert!(err.is_aborted());
    assert!(err.cause().is_none());

    list.abort();
    assert_eq!(logger.count_containing("aborted"), 1);

    pump(&mut list, 10_000, 5);
    assert_eq!(list.adapter().calls.len(), 1);
}

#[test]
fn abort_cancels_pending_retry() {
    let mut list = new_list(
        [Response::Fail("x"), Response::Page(rows(&[1]))],
        StreamListOptions::new().with_load_retry_delay_ms(500),
    );
    let fut = list.load("q");
    list.advance(0);
    assert_eq!(list.next_retry_at_ms(), Some(500));

    list.abort();
    list.advance(1000);

    assert_eq!(list.adapter().calls.len(), 1);
    assert!(fut.now_or_never().unwrap().unwrap_err().is_aborted());
}

#[test]
fn new_load_supersedes_previous_session() {
    let mut list = new_list(
        [Response::Page(rows(&[1, 2])), Response::Page(rows(&[7]))],
        StreamListOptions::new(),
    );
    let first = list.load("a");
    let second = list.load("b");
    assert_eq!(list.adapter().calls, [("a", 0), ("b", 0)]);
    assert!(first.now_or_never().unwrap().unwrap_err().is_aborted());

    pump(&mut list, 0, 5);

    assert_eq!(list.items().iter().map(|i| i.key).collect::<Vec<_>>(), [7]);
    assert_eq!(list.context(), Some(&"b"));
    assert_eq!(second.now_or_never().unwrap().unwrap().items, Some(rows(&[7])));
}

#[test]
fn fresh_load_clears_container_before_rendering() {
    let mut list = new_list(
        [
            Response::Page(rows(&[1, 2, 3])),
            Response::Page(Vec::new()),
            Response::Page(rows(&[9])),
        ],
        StreamListOptions::new(),
    );
    let _ = list.load("a");
    pump(&mut list, 0, 10);
    assert_eq!(list.container().ids(), [1, 2, 3]);
    let clears = list.container().clears;

    let _ = list.load("b");
    assert!(list.is_listening());
    list.advance(0);
    assert_eq!(list.rendered_len(), 0);
    list.frame();

    assert!(list.container().clears > clears);
    assert_eq!(list.container().ids(), [9]);
}

#[test]
fn reload_with_reuse_keeps_rendered_elements() {
    let mut list = new_list(
        [
            Response::Page(rows(&[1, 2])),
            Response::Page(Vec::new()),
            Response::Page(vec![Row { id: 2, rev: 5 }, row(3)]),
        ],
        StreamListOptions::new().with_reuse_results(true),
    );
    let _ = list.load("a");
    pump(&mut list, 0, 10);
    let before = list.item(&2).unwrap().element.clone();

    let _ = list.load("a");
    pump(&mut list, 0, 10);

    assert_eq!(list.container().ids(), [2, 3]);
    assert_eq!(list.item(&2).unwrap().element, before);
    assert_eq!(list.item(&2).unwrap().result.rev, 0);
    assert_eq!(list.adapter().renders, [1, 2, 3]);
}

#[test]
fn reload_without_reuse_rerenders_recurring_keys() {
    let mut list = new_list(
        [
            Response::Page(rows(&[1, 2])),
            Response::Page(Vec::new()),
            Response::Page(vec![Row { id: 2, rev: 5 }]),
        ],
        StreamListOptions::new(),
    );
    let _ = list.load("a");
    pump(&mut list, 0, 10);
    let _ = list.load("a");
    pump(&mut list, 0, 10);

    assert_eq!(list.item(&2).unwrap().result.rev, 5);
    assert_eq!(list.adapter().renders, [1, 2, 2]);
}

#[test]
fn far_from_end_waits_for_reflow() {
    let mut list = new_list(
        [Response::Page(rows(&[1, 2, 3, 4, 5, 6]))],
        StreamListOptions::new().with_view_chunk_size(2),
    );
    list.container_mut().content_start = 1000;

    let _ = list.load("q");
    pump(&mut list, 0, 5);
    assert_eq!(list.rendered_len(), 0);
    assert_eq!(list.len(), 6);
    assert_eq!(list.adapter().calls.len(), 1);

    list.container_mut().scroll_offset = 900;
    for _ in 0..5 {
        list.notify_reflow();
    }
    list.frame();
    assert_eq!(list.sync_state(), SyncState::Scheduled);
    list.frame();
    assert_eq!(list.rendered_len(), 2);
}

#[test]
fn render_all_ignores_display_threshold() {
    let mut list = new_list(
        [
            Response::Page(rows(&[1, 2, 3])),
            Response::Page(rows(&[4, 5])),
        ],
        StreamListOptions::new().with_view_chunk_size(2),
    );
    list.container_mut().content_start = 10_000;
    let _ = list.load("q");
    pump(&mut list, 0, 3);
    assert_eq!(list.rendered_len(), 0);

    list.render_all();
    assert!(list.is_render_all());
    pump(&mut list, 0, 20);

    assert_eq!(list.container().ids(), [1, 2, 3, 4, 5]);
    assert!(list.state().is_exhausted());

    let _ = list.load("q");
    assert!(!list.is_render_all());
}

#[test]
fn render_chunk_listener_sees_each_batch() {
    let fired = Arc::new(AtomicUsize::new(0));
    let chunks = Arc::new(Mutex::new(Vec::new()));
    let options = StreamListOptions::new()
        .with_view_chunk_size(2)
        .with_preload_threshold(0)
        .with_on_render_chunk(Some({
            let fired = Arc::clone(&fired);
            let chunks = Arc::clone(&chunks);
            move |chunk: &RenderChunk| {
                fired.fetch_add(1, Ordering::Relaxed);
                chunks.lock().unwrap().push(*chunk);
            }
        }));
    let mut list = new_list([Response::Page(rows(&[1, 2, 3, 4, 5]))], options);
    let _ = list.load("q");

    list.advance(0);
    for _ in 0..3 {
        list.frame();
        assert_eq!(
            list.len() - list.rendered_len(),
            chunks.lock().unwrap().last().unwrap().remaining
        );
    }
    list.frame();

    assert_eq!(fired.load(Ordering::Relaxed), 3);
    assert_eq!(
        *chunks.lock().unwrap(),
        [
            RenderChunk { start: 0, count: 2, remaining: 3 },
            RenderChunk { start: 2, count: 2, remaining: 1 },
            RenderChunk { start: 4, count: 1, remaining: 0 },
        ]
    );
}

#[test]
fn preload_waits_for_backlog_to_drop() {
    let mut list = new_list(
        [Response::Page(rows(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]))],
        StreamListOptions::new()
            .with_view_chunk_size(2)
            .with_preload_threshold(3),
    );
    let _ = list.load("q");
    list.advance(0);

    list.frame();
    list.frame();
    list.frame();
    assert_eq!(list.backlog(), 4);
    assert_eq!(list.adapter().calls.len(), 1);

    list.frame();
    assert_eq!(list.backlog(), 2);
    assert_eq!(list.adapter().offsets(), [0, 10]);
}

#[test]
fn pagination_failure_is_logged_not_surfaced() {
    let logger = RecordingLogger::default();
    let mut list = new_list(
        [Response::Page(rows(&[1, 2])), Response::Fail("lost")],
        StreamListOptions::new()
            .with_logger(logger.clone())
            .with_load_retry_count(0),
    );
    let fut = list.load("q");
    pump(&mut list, 0, 3);

    assert!(fut.now_or_never().unwrap().is_ok());
    assert_eq!(list.container().ids(), [1, 2]);
    assert!(list.has_more_data());
    assert!(!list.is_loading());
    assert_eq!(logger.count_containing("Will not retry."), 1);
}

#[test]
fn log_level_gates_notices() {
    let logger = RecordingLogger::default();
    let mut list = new_list(
        [Response::Fail("x"), Response::Page(rows(&[1]))],
        StreamListOptions::new()
            .with_logger(logger.clone())
            .with_load_retry_delay_ms(0),
    );
    let _ = list.load("q");
    pump(&mut list, 0, 3);

    assert_eq!(
        logger.messages(),
        ["Loading data failed. Retrying in 0ms. (x)".to_owned()]
    );

    list.set_log_level(5);
    let _ = list.load("q");
    list.advance(0);
    assert!(logger.count_containing("Loading data from offset 0.") == 1);
    assert!(logger.count_containing("Added 0 items.") == 1);
    assert!(logger.count_containing("Reached end of data.") == 1);
}

#[test]
fn bind_log_reports_discarded_duplicates() {
    let logger = RecordingLogger::default();
    let mut list = new_list(
        [Response::Page(rows(&[1, 1, 2]))],
        StreamListOptions::new()
            .with_logger(logger.clone())
            .with_log_level(5),
    );
    let _ = list.load("q");
    list.advance(0);
    assert_eq!(logger.count_containing("Added 2 items. Discarded 1 duplicates."), 1);
}

#[test]
fn dropping_the_list_aborts_outstanding_load() {
    let mut list = new_list([Response::Hang], StreamListOptions::new());
    let fut = list.load("q");
    drop(list);
    assert!(fut.now_or_never().unwrap().unwrap_err().is_aborted());
}

#[test]
fn exhausted_list_ignores_reflow() {
    let mut list = new_list([Response::Page(rows(&[1]))], StreamListOptions::new());
    let _ = list.load("q");
    pump(&mut list, 0, 10);
    assert!(!list.is_listening());

    list.notify_reflow();
    list.frame();
    assert_eq!(list.sync_state(), SyncState::Idle);
    assert_eq!(list.adapter().offsets(), [0, 1]);
}

#[test]
fn settings_defaults_and_validation() {
    let s = Settings::default();
    assert_eq!(s.view_chunk_size, 4);
    assert_eq!(s.display_threshold, 200);
    assert_eq!(s.effective_preload_threshold(), 8);
    assert_eq!(s.load_retry_count, 9);
    assert_eq!(s.load_retry_delay_ms, 3000);
    assert!(!s.reuse_results);
    assert_eq!(s.log_level, 3);

    let mut s = Settings::default();
    s.set("display_threshold", "12").unwrap();
    s.set("load_retry_count", "3.9").unwrap();
    s.set("reuse_results", "true").unwrap();
    assert_eq!(s.display_threshold, 12);
    assert_eq!(s.load_retry_count, 3);
    assert!(s.reuse_results);

    let err = s.set("view_chunk_size", "0").unwrap_err();
    assert_eq!(err.to_string(), "Invalid view_chunk_size '0'.");
    assert!(s.set("load_retry_delay_ms", "-1").is_err());
    assert!(s.set("log_level", "loud").is_err());
    assert!(s.set("log_level", "300").is_err());
    assert!(s.set("bogus", "1").is_err());
    assert_eq!(s.view_chunk_size, 4);

    assert_eq!(coerce_integer("x", " +42 "), Ok(42));
}

#[test]
fn textual_options_must_be_whole_numbers() {
    let mut s = Settings::default();

    let err = s.set("display_threshold", "12px").unwrap_err();
    assert_eq!(err.to_string(), "Invalid display_threshold '12px'.");
    assert!(s.set("view_chunk_size", "7 items").is_err());
    assert!(s.set("view_chunk_size", "").is_err());
    assert!(s.set("load_retry_delay_ms", "inf").is_err());
    assert!(s.set("load_retry_delay_ms", "NaN").is_err());
    assert!(s.set("load_retry_count", "-0.5").is_err());
    assert_eq!(s, Settings::default());

    s.set("view_chunk_size", " 7.9 ").unwrap();
    s.set("load_retry_delay_ms", "1e3").unwrap();
    s.set("load_retry_count", "-0").unwrap();
    assert_eq!(s.view_chunk_size, 7);
    assert_eq!(s.load_retry_delay_ms, 1000);
    assert_eq!(s.load_retry_count, 0);

    assert!(s.set("view_chunk_size", "0.5").is_err());
    assert_eq!(coerce_integer("x", "18446744073709551615"), Ok(u64::MAX));
}

#[test]
fn result_of_aborted_fetch_is_discarded() {
    let logger = RecordingLogger::default();
    let mut list = new_list(
        [Response::Page(rows(&[1, 2]))],
        StreamListOptions::new()
            .with_logger(logger.clone())
            .with_log_level(7),
    );
    let fut = list.load("q");
    list.abort();
    assert!(!list.is_fetch_in_flight());
    assert!(!list.is_loading());

    pump(&mut list, 0, 3);

    assert!(list.is_empty());
    assert_eq!(list.container().clears, 0);
    assert_eq!(logger.count_containing("Added"), 0);
    assert!(fut.now_or_never().unwrap().unwrap_err().is_aborted());

    let _next = list.load("q");
    assert_eq!(list.adapter().calls.len(), 2);
}

#[test]
fn sync_state_is_idle_or_scheduled_between_frames() {
    let mut list = new_list([Response::Page(rows(&[1, 2, 3, 4, 5, 6]))], StreamListOptions::new());
    let _fut = list.load("q");
    for _ in 0..6 {
        list.advance(0);
        assert_ne!(list.sync_state(), SyncState::Stepping);
        list.frame();
        assert_ne!(list.sync_state(), SyncState::Stepping);
    }
    assert_eq!(list.rendered_len(), 6);
}

#[test]
fn session_backlog_saturates_on_inconsistent_snapshot() {
    let state = SessionState {
        items: 2,
        rendered: 5,
        ..SessionState::default()
    };
    assert_eq!(state.backlog(), 0);
    assert!(state.is_exhausted());
}

#[test]
fn taken_outcome_leaves_future_settled() {
    let mut list = new_list([Response::Page(rows(&[1]))], StreamListOptions::new());
    let mut fut = list.load("q");
    list.advance(0);
    assert!(fut.try_take().unwrap().is_ok());
    assert!(fut.is_settled());
    assert!(fut.try_take().is_none());
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "polled after its outcome was taken")]
fn polling_after_take_is_caught_in_debug() {
    let mut list = new_list([Response::Page(rows(&[1]))], StreamListOptions::new());
    let mut fut = list.load("q");
    list.advance(0);
    let _ = fut.try_take();
    let _ = fut.now_or_never();
}

#[test]
fn construction_and_setters_validate() {
    let err = StreamList::new(
        TestContainer::default(),
        ScriptedAdapter::default(),
        StreamListOptions::new().with_view_chunk_size(0),
    )
    .unwrap_err();
    assert_eq!(err.option, "view_chunk_size");

    let mut list = new_list([], StreamListOptions::new().with_view_chunk_size(3));
    assert_eq!(list.preload_threshold(), 6);
    assert!(list.set_view_chunk_size(0).is_err());
    assert_eq!(list.settings().view_chunk_size, 3);

    list.set_option("preload_threshold", "5").unwrap();
    assert_eq!(list.preload_threshold(), 5);
    assert!(list.set_option("view_chunk_size", "none").is_err());
}
