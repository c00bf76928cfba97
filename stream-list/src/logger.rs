use std::sync::Arc;

/// RFC 5424 severity levels.
///
/// The engine's `log_level` is a threshold: a message is emitted when its severity value
/// is less than or equal to the threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Informational = 6,
    Debug = 7,
}

impl Severity {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn enabled_at(self, log_level: u8) -> bool {
        self.value() <= log_level
    }
}

/// The sink for the engine's leveled messages.
pub trait Logger {
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn debug(&self, message: &str);

    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Emergency | Severity::Alert | Severity::Critical | Severity::Error => {
                self.error(message)
            }
            Severity::Warning => self.warn(message),
            Severity::Notice | Severity::Informational => self.info(message),
            Severity::Debug => self.debug(message),
        }
    }
}

pub type SharedLogger = Arc<dyn Logger + Send + Sync>;

/// Forwards messages to `tracing` under the `stream_list` target.
///
/// Without `feature = "tracing"` every message is dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
impl Logger for TracingLogger {
    fn error(&self, message: &str) {
        serror!("{message}");
    }

    fn warn(&self, message: &str) {
        swarn!("{message}");
    }

    fn info(&self, message: &str) {
        sinfo!("{message}");
    }

    fn debug(&self, message: &str) {
        sdebug!("{message}");
    }
}
