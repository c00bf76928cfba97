#[cfg(feature = "tracing")]
macro_rules! strace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "stream_list", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! strace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! sdebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "stream_list", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sdebug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! sinfo {
    ($($tt:tt)*) => {
        tracing::info!(target: "stream_list", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sinfo {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! swarn {
    ($($tt:tt)*) => {
        tracing::warn!(target: "stream_list", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! swarn {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! serror {
    ($($tt:tt)*) => {
        tracing::error!(target: "stream_list", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! serror {
    ($($tt:tt)*) => {};
}
