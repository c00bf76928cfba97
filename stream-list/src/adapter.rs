use core::future::Future;
use core::pin::Pin;

use crate::key::StoreKey;
use crate::{FetchError, Page, ViewportMetrics};

/// The in-flight fetch of one page.
pub type FetchFuture<R> = Pin<Box<dyn Future<Output = Result<Page<R>, FetchError>>>>;

/// The scrollable surface items are appended to.
///
/// The engine never removes single children: it only appends batches in store order and
/// clears everything when a fresh session starts rendering.
pub trait Container {
    /// An opaque, reusable visual handle (a node id, an `Rc` to a widget, ...).
    type Element: Clone;

    fn metrics(&self) -> ViewportMetrics;

    /// Removes every child.
    fn clear(&mut self);

    /// Appends `elements` after the existing children, in order.
    fn append(&mut self, elements: Vec<Self::Element>);
}

/// Supplies pages of results, their identity, and their visual form.
pub trait Adapter {
    /// Whatever the caller passes to `load` (a query, filters, ...). Threaded through
    /// every page fetch of the session.
    type Context: Clone;
    type Result: Clone;
    type Key: StoreKey;
    type Container: Container;

    /// Starts fetching results from `offset`, the number of items accumulated so far.
    fn load_items(&mut self, context: &Self::Context, offset: usize) -> FetchFuture<Self::Result>;

    /// Must return equal keys for logically identical results.
    fn item_key(&self, result: &Self::Result) -> Self::Key;

    /// Builds a detached element for `result`. The engine appends it; this must not
    /// modify `container`.
    fn render_item(
        &mut self,
        result: &Self::Result,
        container: &Self::Container,
    ) -> <Self::Container as Container>::Element;
}

pub(crate) type ElementOf<A> = <<A as Adapter>::Container as Container>::Element;
