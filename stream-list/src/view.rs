use crate::key::StoreKey;
use crate::store::ItemStore;
use crate::{Container, RenderChunk};

/// Renders up to `max` items past the cursor and appends them to `container` in one batch.
///
/// Items that already carry an element (kept across a reload) are appended again without
/// calling `render`. The returned chunk's `remaining` is the backlog after the cursor moves.
pub(crate) fn render_chunk<K, R, C>(
    store: &mut ItemStore<K, R, C::Element>,
    container: &mut C,
    max: usize,
    mut render: impl FnMut(&R, &C) -> C::Element,
) -> RenderChunk
where
    K: StoreKey,
    C: Container,
{
    let start = store.cursor();
    let mut batch = Vec::with_capacity(max.min(store.backlog()));

    for item in store.pending_mut(max) {
        let element = match item.element.take() {
            Some(element) => element,
            None => render(&item.result, &*container),
        };
        batch.push(element.clone());
        item.element = Some(element);
    }

    let count = batch.len();
    if count > 0 {
        container.append(batch);
    }
    store.advance_cursor(count);

    RenderChunk {
        start,
        count,
        remaining: store.backlog(),
    }
}
