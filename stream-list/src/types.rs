/// One page of raw results as delivered by [`crate::Adapter::load_items`].
///
/// `items: None` is the malformed shape (a response without an item list); the engine
/// treats it as a failed fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page<R> {
    pub items: Option<Vec<R>>,
}

impl<R> Page<R> {
    pub fn new(items: Vec<R>) -> Self {
        Self { items: Some(items) }
    }

    /// A page without an item list.
    pub fn malformed() -> Self {
        Self { items: None }
    }

    pub fn is_malformed(&self) -> bool {
        self.items.is_none()
    }

    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R> From<Vec<R>> for Page<R> {
    fn from(items: Vec<R>) -> Self {
        Self::new(items)
    }
}

/// An accumulated result plus its lazily created visual element.
#[derive(Clone, Debug)]
pub struct Item<K, R, E> {
    pub key: K,
    pub result: R,
    /// Created the first time the item is rendered and reused afterwards.
    pub element: Option<E>,
}

impl<K, R, E> Item<K, R, E> {
    pub fn new(key: K, result: R) -> Self {
        Self {
            key,
            result,
            element: None,
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.element.is_some()
    }
}

/// Scroll geometry reported by the container, in the scroll axis.
///
/// `scroll_offset + viewport_size` is the end of what the viewer sees;
/// `content_start + content_size` is the end of what has been rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportMetrics {
    pub scroll_offset: u64,
    pub viewport_size: u32,
    /// Where the container starts inside the scrolled area.
    pub content_start: u64,
    pub content_size: u64,
}

impl ViewportMetrics {
    pub fn viewport_end(&self) -> u64 {
        self.scroll_offset.saturating_add(self.viewport_size as u64)
    }

    pub fn content_end(&self) -> u64 {
        self.content_start.saturating_add(self.content_size)
    }

    /// Distance from the bottom of the viewport to the end of the rendered content.
    ///
    /// Negative when the viewer has scrolled past the end of the content.
    pub fn distance_to_end(&self) -> i64 {
        let content_end = i64::try_from(self.content_end()).unwrap_or(i64::MAX);
        let viewport_end = i64::try_from(self.viewport_end()).unwrap_or(i64::MAX);
        content_end.saturating_sub(viewport_end)
    }
}

/// Payload of the render-chunk notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderChunk {
    /// Store index of the first appended item.
    pub start: usize,
    /// Number of elements appended in this batch.
    pub count: usize,
    /// Items loaded but still not rendered.
    pub remaining: usize,
}

impl RenderChunk {
    pub fn end(&self) -> usize {
        self.start + self.count
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyncState {
    #[default]
    Idle,
    /// A sync pass is queued for the next frame.
    Scheduled,
    /// Inside a sync pass. The engine is mutably borrowed for the whole pass, so hosts
    /// never observe this through [`crate::StreamList::sync_state`]; it shows up only in
    /// diagnostics taken from within the pass.
    Stepping,
}

/// A lightweight snapshot of the engine's session state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionState {
    pub items: usize,
    pub rendered: usize,
    pub has_more_data: bool,
    pub loading: bool,
    pub retry_index: u32,
    pub render_all: bool,
    pub listening: bool,
    pub sync: SyncState,
}

impl SessionState {
    pub fn backlog(&self) -> usize {
        self.items.saturating_sub(self.rendered)
    }

    /// No data left to fetch and everything fetched is rendered.
    pub fn is_exhausted(&self) -> bool {
        !self.has_more_data && !self.loading && self.backlog() == 0
    }
}
