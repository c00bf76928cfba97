use std::sync::Arc;

use crate::logger::{Logger, SharedLogger, TracingLogger};
use crate::{OptionError, RenderChunk};

/// A callback fired after each non-empty render batch is appended to the container.
pub type OnRenderChunkCallback = Arc<dyn Fn(&RenderChunk) + Send + Sync>;

pub const DEFAULT_VIEW_CHUNK_SIZE: usize = 4;
pub const DEFAULT_DISPLAY_THRESHOLD: u32 = 200;
pub const DEFAULT_LOAD_RETRY_COUNT: u32 = 9;
pub const DEFAULT_LOAD_RETRY_DELAY_MS: u64 = 3000;
pub const DEFAULT_LOG_LEVEL: u8 = 3;

/// The scalar settings of a [`crate::StreamList`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`; missing fields
/// take their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Items appended to the container per render pass. Must be greater than zero.
    pub view_chunk_size: usize,
    /// Distance (in container units, e.g. pixels) from the end of the rendered content
    /// within which a render pass proceeds.
    pub display_threshold: u32,
    /// Backlog size below which the next page is fetched.
    ///
    /// `None` resolves to `2 * view_chunk_size`.
    pub preload_threshold: Option<usize>,
    /// Retries after the first failed attempt for a given offset.
    pub load_retry_count: u32,
    pub load_retry_delay_ms: u64,
    /// Keep existing items (and their rendered elements) when a fresh load returns the
    /// same key again. When `false`, a fresh item is built from the new result.
    pub reuse_results: bool,
    /// RFC 5424 severity threshold.
    pub log_level: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            view_chunk_size: DEFAULT_VIEW_CHUNK_SIZE,
            display_threshold: DEFAULT_DISPLAY_THRESHOLD,
            preload_threshold: None,
            load_retry_count: DEFAULT_LOAD_RETRY_COUNT,
            load_retry_delay_ms: DEFAULT_LOAD_RETRY_DELAY_MS,
            reuse_results: false,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), OptionError> {
        if self.view_chunk_size == 0 {
            return Err(OptionError::new("view_chunk_size", self.view_chunk_size));
        }
        Ok(())
    }

    pub fn effective_preload_threshold(&self) -> usize {
        self.preload_threshold
            .unwrap_or_else(|| self.view_chunk_size.saturating_mul(2))
    }

    /// Assigns a setting from its textual form.
    ///
    /// Numeric values are truncated to integers (`"3.9"` is 3). Unknown names, text that
    /// is not a complete number (`"12px"`), negative numbers and a zero `view_chunk_size`
    /// are rejected and leave the settings untouched.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), OptionError> {
        match name {
            "view_chunk_size" => {
                let v = coerce_integer("view_chunk_size", raw)?;
                if v == 0 {
                    return Err(OptionError::new("view_chunk_size", raw));
                }
                self.view_chunk_size = v as usize;
            }
            "display_threshold" => {
                self.display_threshold = narrow("display_threshold", raw)?;
            }
            "preload_threshold" => {
                self.preload_threshold = Some(narrow("preload_threshold", raw)?);
            }
            "load_retry_count" => {
                self.load_retry_count = narrow("load_retry_count", raw)?;
            }
            "load_retry_delay_ms" => {
                self.load_retry_delay_ms = coerce_integer("load_retry_delay_ms", raw)?;
            }
            "log_level" => {
                self.log_level = narrow("log_level", raw)?;
            }
            "reuse_results" => {
                self.reuse_results = match raw.trim() {
                    "true" | "1" => true,
                    "false" | "0" => false,
                    _ => return Err(OptionError::new("reuse_results", raw)),
                };
            }
            _ => return Err(OptionError::new("option", name)),
        }
        Ok(())
    }
}

fn narrow<T: TryFrom<u64>>(option: &'static str, raw: &str) -> Result<T, OptionError> {
    let v = coerce_integer(option, raw)?;
    T::try_from(v).map_err(|_| OptionError::new(option, raw))
}

/// Parses `raw` as a non-negative number and truncates it toward zero.
///
/// The whole trimmed text must be one numeric literal (`"42"`, `"+3.9"`, `"1e3"`);
/// trailing text such as `"12px"`, negative values and non-finite values are rejected.
pub fn coerce_integer(option: &'static str, raw: &str) -> Result<u64, OptionError> {
    let s = raw.trim();
    let unsigned = s.strip_prefix('+').unwrap_or(s);
    if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return unsigned
            .parse::<u64>()
            .map_err(|_| OptionError::new(option, raw));
    }

    match s.parse::<f64>() {
        Ok(v) if v >= 0.0 && v < u64::MAX as f64 => Ok(v.trunc() as u64),
        _ => Err(OptionError::new(option, raw)),
    }
}

/// Configuration for [`crate::StreamList`].
///
/// Cheap to clone: the logger and callback are stored in `Arc`s.
#[derive(Clone)]
pub struct StreamListOptions {
    pub settings: Settings,
    pub logger: SharedLogger,
    /// Optional render-chunk listener.
    pub on_render_chunk: Option<OnRenderChunkCallback>,
}

impl Default for StreamListOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamListOptions {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            logger: Arc::new(TracingLogger),
            on_render_chunk: None,
        }
    }

    pub fn from_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::new()
        }
    }

    pub fn with_view_chunk_size(mut self, view_chunk_size: usize) -> Self {
        self.settings.view_chunk_size = view_chunk_size;
        self
    }

    pub fn with_display_threshold(mut self, display_threshold: u32) -> Self {
        self.settings.display_threshold = display_threshold;
        self
    }

    pub fn with_preload_threshold(mut self, preload_threshold: usize) -> Self {
        self.settings.preload_threshold = Some(preload_threshold);
        self
    }

    pub fn with_load_retry_count(mut self, load_retry_count: u32) -> Self {
        self.settings.load_retry_count = load_retry_count;
        self
    }

    pub fn with_load_retry_delay_ms(mut self, delay_ms: u64) -> Self {
        self.settings.load_retry_delay_ms = delay_ms;
        self
    }

    pub fn with_reuse_results(mut self, reuse_results: bool) -> Self {
        self.settings.reuse_results = reuse_results;
        self
    }

    pub fn with_log_level(mut self, log_level: u8) -> Self {
        self.settings.log_level = log_level;
        self
    }

    pub fn with_logger(mut self, logger: impl Logger + Send + Sync + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    pub fn with_on_render_chunk(
        mut self,
        on_render_chunk: Option<impl Fn(&RenderChunk) + Send + Sync + 'static>,
    ) -> Self {
        self.on_render_chunk = on_render_chunk.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for StreamListOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StreamListOptions")
            .field("settings", &self.settings)
            .field("on_render_chunk", &self.on_render_chunk.is_some())
            .finish_non_exhaustive()
    }
}
