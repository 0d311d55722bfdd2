// ABOUTME: Error types for docmark including ErrorCode, ExtractError and TraversalError.
// ABOUTME: ExtractError is the typed failure surfaced by the pipeline; TraversalError stays inside the locator.

use std::fmt;

/// Error codes representing different categories of extraction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Input,
    Config,
    Resolve,
    Render,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Input => "input error",
            ErrorCode::Config => "configuration error",
            ErrorCode::Resolve => "reference resolution error",
            ErrorCode::Render => "render error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub struct ExtractError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "docmark: {}", self.op)?;
        if !self.url.is_empty() {
            write!(f, " {}", self.url)?;
        }
        write!(f, ": {}", self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ExtractError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an Input error.
    pub fn input(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Input, url, op, source)
    }

    /// Create a Config error.
    pub fn config(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(ErrorCode::Config, "", op, source)
    }

    /// Create a Resolve error.
    pub fn resolve(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Resolve, url, op, source)
    }

    /// Create a Render error.
    pub fn render(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Render, url, op, source)
    }

    /// Returns true if this is an Input error.
    pub fn is_input(&self) -> bool {
        self.code == ErrorCode::Input
    }

    /// Returns true if this is a Config error.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }

    /// Returns true if this is a Resolve error.
    pub fn is_resolve(&self) -> bool {
        self.code == ErrorCode::Resolve
    }

    /// Returns true if this is a Render error.
    pub fn is_render(&self) -> bool {
        self.code == ErrorCode::Render
    }
}

/// Failures raised while walking the document tree.
///
/// These never leave the locator: each tier catches them, logs them and
/// falls through to the next tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraversalError {
    /// The host's attached sub-tree was declared closed and cannot be inspected.
    #[error("boundary attached to <{host}> is closed")]
    ClosedBoundary { host: String },
}
