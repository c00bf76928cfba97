use stream_list::{Container, ViewportMetrics};

/// Fixed geometry for a [`VecContainer`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub viewport_size: u32,
    /// Where the list starts inside the scrolled area (e.g. below a header).
    pub content_start: u64,
    /// Size of every child in the scroll axis.
    pub item_extent: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            viewport_size: 100,
            content_start: 0,
            item_extent: 10,
        }
    }
}

/// An in-memory container whose children all share one extent.
///
/// Useful for TUIs, tests and simulations: the content size follows the child count and
/// the host moves the scroll offset.
#[derive(Clone, Debug)]
pub struct VecContainer<E> {
    children: Vec<E>,
    geometry: Geometry,
    scroll_offset: u64,
    clears: usize,
}

impl<E> Default for VecContainer<E> {
    fn default() -> Self {
        Self::new(Geometry::default())
    }
}

impl<E> VecContainer<E> {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            children: Vec::new(),
            geometry,
            scroll_offset: 0,
            clears: 0,
        }
    }

    pub fn children(&self) -> &[E] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// How many times the engine has cleared this container.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn content_size(&self) -> u64 {
        self.children.len() as u64 * self.geometry.item_extent as u64
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// The largest offset that still keeps the viewport inside the content.
    pub fn max_scroll_offset(&self) -> u64 {
        let end = self.geometry.content_start.saturating_add(self.content_size());
        end.saturating_sub(self.geometry.viewport_size as u64)
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        self.scroll_offset = offset.min(self.max_scroll_offset());
    }

    pub fn scroll_by(&mut self, delta: i64) {
        let next = if delta >= 0 {
            self.scroll_offset.saturating_add(delta as u64)
        } else {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        };
        self.set_scroll_offset(next);
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_offset = self.max_scroll_offset();
    }

    pub fn set_viewport_size(&mut self, viewport_size: u32) {
        self.geometry.viewport_size = viewport_size;
        self.set_scroll_offset(self.scroll_offset);
    }
}

impl<E: Clone> Container for VecContainer<E> {
    type Element = E;

    fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics {
            scroll_offset: self.scroll_offset,
            viewport_size: self.geometry.viewport_size,
            content_start: self.geometry.content_start,
            content_size: self.content_size(),
        }
    }

    fn clear(&mut self) {
        self.children.clear();
        self.scroll_offset = 0;
        self.clears += 1;
    }

    fn append(&mut self, elements: Vec<E>) {
        self.children.extend(elements);
    }
}
