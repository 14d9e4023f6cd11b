//! Error message formatting with actionable suggestions.

use std::error::Error;

use uplink_core::error::UplinkError;

use super::ColorSupport;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a new error formatter
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(),
        }
    }

    pub fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with its kind, suggestion and source chain
    pub fn format_error(&self, error: &UplinkError) -> String {
        let mut output = format!(
            "{} [{}]: {}\n",
            self.colors.red("error"),
            error.kind(),
            error
        );

        if let Some(suggestion) = error.suggestion() {
            output.push_str(&format!("{}: {}\n", self.colors.dim("help"), suggestion));
        }

        // Wrapped errors often reuse their source's text; print each line once
        let mut previous = error.to_string();
        let mut source = error.source();
        while let Some(err) = source {
            let text = err.to_string();
            if text != previous {
                output.push_str(&format!("{}: {}\n", self.colors.dim("caused by"), text));
            }
            previous = text;
            source = err.source();
        }

        output
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}
