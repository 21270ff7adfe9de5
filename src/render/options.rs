//! Rendering options and configuration.

/// How the renderer reacts to a segment it cannot decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Skip the segment, log it and record it in the result
    #[default]
    Lenient,

    /// Fail the whole render with the first error
    Strict,
}

/// Options for rendering structured content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// What to do with malformed segments
    pub error_mode: ErrorMode,

    /// Convert newlines in paragraph-like text to `<br>`
    pub line_breaks: bool,

    /// Collect statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Shorthand for [`ErrorMode::Strict`].
    pub fn strict(self) -> Self {
        self.with_error_mode(ErrorMode::Strict)
    }

    /// Enable or disable newline conversion.
    pub fn with_line_breaks(mut self, convert: bool) -> Self {
        self.line_breaks = convert;
        self
    }

    /// Enable or disable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }

    /// Check if malformed segments abort rendering.
    pub fn is_strict(&self) -> bool {
        self.error_mode == ErrorMode::Strict
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            line_breaks: true,
            collect_stats: false,
        }
    }
}
