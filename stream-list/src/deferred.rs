use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};
use std::cell::RefCell;
use std::rc::Rc;

use crate::{LoadError, Page};

pub type LoadOutcome<R> = Result<Page<R>, LoadError<R>>;

struct Shared<R> {
    outcome: Option<LoadOutcome<R>>,
    settled: bool,
    waker: Option<Waker>,
}

/// Resolves with the first page of a session, or the reason it never arrived.
///
/// Returned by [`crate::StreamList::load`]. The engine is single-threaded, so this future
/// is `!Send`; it completes during a later `advance` or on `abort`.
#[must_use = "the load outcome is only observable through this future"]
pub struct LoadFuture<R> {
    shared: Rc<RefCell<Shared<R>>>,
}

impl<R> LoadFuture<R> {
    pub fn is_settled(&self) -> bool {
        self.shared.borrow().settled
    }

    /// Takes the outcome without polling, if the load has settled.
    ///
    /// Once the outcome is taken (here or by a completed poll) the future must not be
    /// polled again.
    pub fn try_take(&mut self) -> Option<LoadOutcome<R>> {
        self.shared.borrow_mut().outcome.take()
    }
}

impl<R> Future for LoadFuture<R> {
    type Output = LoadOutcome<R>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut shared = self.shared.borrow_mut();
        if let Some(outcome) = shared.outcome.take() {
            return Poll::Ready(outcome);
        }
        debug_assert!(
            !shared.settled,
            "LoadFuture polled after its outcome was taken"
        );
        if shared.settled {
            return Poll::Pending;
        }
        shared.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl<R> core::fmt::Debug for LoadFuture<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoadFuture")
            .field("settled", &self.is_settled())
            .finish_non_exhaustive()
    }
}

/// The engine's half of a [`LoadFuture`]. Dropping it unsettled aborts the load.
pub(crate) struct Deferred<R> {
    shared: Option<Rc<RefCell<Shared<R>>>>,
}

impl<R> Deferred<R> {
    pub(crate) fn new() -> (Self, LoadFuture<R>) {
        let shared = Rc::new(RefCell::new(Shared {
            outcome: None,
            settled: false,
            waker: None,
        }));
        (
            Self {
                shared: Some(Rc::clone(&shared)),
            },
            LoadFuture { shared },
        )
    }

    pub(crate) fn resolve(mut self, page: Page<R>) {
        self.settle(Ok(page));
    }

    pub(crate) fn reject(mut self, err: LoadError<R>) {
        self.settle(Err(err));
    }

    fn settle(&mut self, outcome: LoadOutcome<R>) {
        let Some(shared) = self.shared.take() else {
            return;
        };
        let waker = {
            let mut shared = shared.borrow_mut();
            shared.outcome = Some(outcome);
            shared.settled = true;
            shared.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<R> Drop for Deferred<R> {
    fn drop(&mut self) {
        self.settle(Err(LoadError::aborted()));
    }
}
