//! A headless incremental list engine.
//!
//! For host-side utilities (an in-memory container, a paged source, a clock-driven
//! controller), see the `stream-list-adapter` crate.
//!
//! The engine loads pages of results from an external source, deduplicates and
//! accumulates them in memory, and progressively renders them into a scrollable container
//! as the viewer approaches the end of what is already rendered. It never un-renders
//! anything: the container only grows until the next `load` starts a fresh session.
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - an [`Adapter`]: page fetching, item identity, item rendering
//! - a [`Container`]: scroll geometry plus append/clear of visual elements
//! - time and frames: [`StreamList::advance`] and [`StreamList::frame`]
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod adapter;
mod binder;
mod deferred;
mod error;
mod key;
mod logger;
mod options;
mod pipeline;
mod reflow;
mod slot;
mod store;
mod stream_list;
mod types;
mod view;

#[cfg(test)]
mod tests;

pub use adapter::{Adapter, Container, FetchFuture};
pub use binder::BindOutcome;
pub use deferred::{LoadFuture, LoadOutcome};
pub use error::{FetchError, LoadError, OptionError};
pub use key::StoreKey;
pub use logger::{Logger, Severity, SharedLogger, TracingLogger};
pub use options::{
    DEFAULT_DISPLAY_THRESHOLD, DEFAULT_LOAD_RETRY_COUNT, DEFAULT_LOAD_RETRY_DELAY_MS,
    DEFAULT_LOG_LEVEL, DEFAULT_VIEW_CHUNK_SIZE, OnRenderChunkCallback, Settings,
    StreamListOptions, coerce_integer,
};
pub use store::ItemStore;
pub use stream_list::StreamList;
pub use types::{Item, Page, RenderChunk, SessionState, SyncState, ViewportMetrics};
