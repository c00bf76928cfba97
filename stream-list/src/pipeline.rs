use core::task::{Context, Poll};

use crate::deferred::Deferred;
use crate::{FetchError, FetchFuture, Page};

/// A page fetch: which session context, from which offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FetchRequest<C> {
    pub(crate) context: C,
    pub(crate) offset: usize,
}

impl<C> FetchRequest<C> {
    /// Offset 0 starts a fresh session and replaces the store.
    pub(crate) fn replace(&self) -> bool {
        self.offset == 0
    }
}

struct Scheduled<C> {
    request: FetchRequest<C>,
    due_ms: u64,
}

struct InFlight<C, R> {
    generation: u64,
    request: FetchRequest<C>,
    future: FetchFuture<R>,
}

/// Fetch bookkeeping: at most one fetch is current, either waiting on its delay or in
/// flight. Every supersession bumps `generation`; a completion is only accepted when it
/// carries the current one.
pub(crate) struct LoadPipeline<C, R> {
    generation: u64,
    scheduled: Option<Scheduled<C>>,
    in_flight: Option<InFlight<C, R>>,
    retry_index: u32,
    has_more: bool,
    /// Context of the last successful replace.
    context: Option<C>,
    /// Settles the caller's `LoadFuture`; present until the first page of a session
    /// succeeds or fails for good.
    waiter: Option<Deferred<R>>,
}

impl<C: Clone, R> LoadPipeline<C, R> {
    pub(crate) fn new() -> Self {
        Self {
            generation: 0,
            scheduled: None,
            in_flight: None,
            retry_index: 0,
            has_more: false,
            context: None,
            waiter: None,
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn retry_index(&self) -> u32 {
        self.retry_index
    }

    pub(crate) fn has_more(&self) -> bool {
        self.has_more
    }

    pub(crate) fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    pub(crate) fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    pub(crate) fn commit_context(&mut self, context: C) {
        self.context = Some(context);
    }

    /// A fetch is waiting on its delay or in flight under the current generation.
    pub(crate) fn is_busy(&self) -> bool {
        self.scheduled.is_some() || self.is_in_flight()
    }

    /// A superseded fetch that has not completed yet does not count.
    pub(crate) fn is_in_flight(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|f| f.generation == self.generation)
    }

    /// Resets per-session state for a fresh `load`.
    pub(crate) fn begin_session(&mut self, waiter: Deferred<R>) {
        self.retry_index = 0;
        self.has_more = true;
        self.context = None;
        self.waiter = Some(waiter);
    }

    pub(crate) fn take_waiter(&mut self) -> Option<Deferred<R>> {
        self.waiter.take()
    }

    /// Supersedes any pending or in-flight fetch. Returns whether one was outstanding.
    ///
    /// A pending fetch is dropped. An in-flight one stays polled until it completes or a
    /// newer fetch starts; its result then fails the generation check in `poll`.
    pub(crate) fn cancel(&mut self) -> bool {
        let outstanding = self.is_busy();
        self.scheduled = None;
        self.generation = self.generation.wrapping_add(1);
        outstanding
    }

    /// Supersedes any current fetch with `request`, due at `now_ms + delay_ms`.
    pub(crate) fn schedule(&mut self, request: FetchRequest<C>, now_ms: u64, delay_ms: u64) {
        self.cancel();
        self.scheduled = Some(Scheduled {
            request,
            due_ms: now_ms.saturating_add(delay_ms),
        });
    }

    pub(crate) fn due_ms(&self) -> Option<u64> {
        self.scheduled.as_ref().map(|s| s.due_ms)
    }

    /// Takes the scheduled fetch if its delay has elapsed.
    pub(crate) fn take_due(&mut self, now_ms: u64) -> Option<FetchRequest<C>> {
        if self.scheduled.as_ref()?.due_ms > now_ms {
            return None;
        }
        self.scheduled.take().map(|s| s.request)
    }

    /// Records a started fetch under the current generation. A superseded fetch still
    /// in flight is dropped.
    pub(crate) fn start(&mut self, request: FetchRequest<C>, future: FetchFuture<R>) {
        self.in_flight = Some(InFlight {
            generation: self.generation,
            request,
            future,
        });
    }

    /// Polls the in-flight fetch once.
    ///
    /// Yields the request with its outcome when the fetch completed under the current
    /// generation; a superseded completion is dropped.
    pub(crate) fn poll(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Option<(FetchRequest<C>, Result<Page<R>, FetchError>)> {
        let in_flight = self.in_flight.as_mut()?;
        let outcome = match in_flight.future.as_mut().poll(cx) {
            Poll::Ready(outcome) => outcome,
            Poll::Pending => return None,
        };
        let in_flight = self.in_flight.take()?;
        if in_flight.generation != self.generation {
            sdebug!(
                offset = in_flight.request.offset,
                generation = in_flight.generation,
                current = self.generation,
                "discarding superseded fetch result"
            );
            return None;
        }
        Some((in_flight.request, outcome))
    }

    /// Counts one more retry if the limit allows it.
    pub(crate) fn try_retry(&mut self, limit: u32) -> bool {
        if self.retry_index < limit {
            self.retry_index += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn reset_retries(&mut self) {
        self.retry_index = 0;
    }
}
