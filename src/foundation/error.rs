/// Convenience result type used across framewarp.
pub type WarpResult<T> = Result<T, WarpError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum WarpError {
    /// Invalid buffer geometry or mismatched frame layouts.
    #[error("layout error: {0}")]
    Layout(String),

    /// Pixel layouts the engine does not dispatch for.
    #[error("unsupported layout: {0}")]
    Unsupported(String),

    /// Invalid transform parameters (singular matrices, empty fields).
    #[error("transform error: {0}")]
    Transform(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WarpError {
    /// Build a [`WarpError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`WarpError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`WarpError::Transform`] value.
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::Transform(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
