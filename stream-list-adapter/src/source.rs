use std::sync::Arc;

use stream_list::{Adapter, FetchError, FetchFuture, Page, StoreKey};

use crate::VecContainer;

/// The load context of a [`SliceSource`]: which rows take part in the session.
pub struct SourceQuery<T> {
    filter: Option<Arc<dyn Fn(&T) -> bool + Send + Sync>>,
}

impl<T> SourceQuery<T> {
    pub fn all() -> Self {
        Self { filter: None }
    }

    pub fn filter(filter: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            filter: Some(Arc::new(filter)),
        }
    }

    pub fn matches(&self, row: &T) -> bool {
        self.filter.as_ref().is_none_or(|f| f(row))
    }
}

impl<T> Clone for SourceQuery<T> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
        }
    }
}

impl<T> Default for SourceQuery<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T> core::fmt::Debug for SourceQuery<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SourceQuery")
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

/// Serves an in-memory dataset in fixed-size pages.
///
/// Every fetch resolves immediately. `fail_next` makes the following fetches fail, to
/// exercise the engine's retry path.
pub struct SliceSource<T, K, E> {
    rows: Arc<[T]>,
    page_size: usize,
    key: Arc<dyn Fn(&T) -> K + Send + Sync>,
    render: Arc<dyn Fn(&T) -> E + Send + Sync>,
    failures: usize,
    requests: Vec<usize>,
}

impl<T, K, E> SliceSource<T, K, E> {
    pub fn new(
        rows: impl Into<Arc<[T]>>,
        page_size: usize,
        key: impl Fn(&T) -> K + Send + Sync + 'static,
        render: impl Fn(&T) -> E + Send + Sync + 'static,
    ) -> Self {
        Self {
            rows: rows.into(),
            page_size: page_size.max(1),
            key: Arc::new(key),
            render: Arc::new(render),
            failures: 0,
            requests: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Offsets requested so far, in order.
    pub fn requests(&self) -> &[usize] {
        &self.requests
    }

    pub fn fail_next(&mut self, count: usize) {
        self.failures = count;
    }
}

impl<T, K, E> Adapter for SliceSource<T, K, E>
where
    T: Clone + 'static,
    K: StoreKey,
    E: Clone,
{
    type Context = SourceQuery<T>;
    type Result = T;
    type Key = K;
    type Container = VecContainer<E>;

    fn load_items(&mut self, context: &SourceQuery<T>, offset: usize) -> FetchFuture<T> {
        self.requests.push(offset);
        if self.failures > 0 {
            self.failures -= 1;
            atrace!(offset, remaining = self.failures, "SliceSource: simulated failure");
            let err = FetchError::message("simulated fetch failure");
            return Box::pin(core::future::ready(Err::<Page<T>, _>(err)));
        }

        let page: Vec<T> = self
            .rows
            .iter()
            .filter(|row| context.matches(row))
            .skip(offset)
            .take(self.page_size)
            .cloned()
            .collect();
        Box::pin(core::future::ready(Ok::<_, FetchError>(Page::new(page))))
    }

    fn item_key(&self, result: &T) -> K {
        (self.key)(result)
    }

    fn render_item(&mut self, result: &T, _container: &VecContainer<E>) -> E {
        (self.render)(result)
    }
}

impl<T, K, E> core::fmt::Debug for SliceSource<T, K, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SliceSource")
            .field("rows", &self.rows.len())
            .field("page_size", &self.page_size)
            .field("failures", &self.failures)
            .field("requests", &self.requests)
            .finish()
    }
}
