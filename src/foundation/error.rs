/// Convenience result type used across hookreel.
pub type HookreelResult<T> = Result<T, HookreelError>;

/// Top-level error taxonomy for caption rendering and batch generation.
#[derive(thiserror::Error, Debug)]
pub enum HookreelError {
    /// The font resource is missing, unreadable, or not a usable font.
    ///
    /// Fatal for a whole batch: no fallback font is tried.
    #[error("font load error: {0}")]
    FontLoad(String),

    /// Nothing usable was left to render after trimming.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The video collaborator (probe/composite/encode) failed.
    #[error("compositor error: {0}")]
    Compositor(String),

    /// Invalid configuration or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookreelError {
    /// Build a [`HookreelError::FontLoad`] value.
    pub fn font_load(msg: impl Into<String>) -> Self {
        Self::FontLoad(msg.into())
    }

    /// Build a [`HookreelError::EmptyInput`] value.
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Build a [`HookreelError::Compositor`] value.
    pub fn compositor(msg: impl Into<String>) -> Self {
        Self::Compositor(msg.into())
    }

    /// Build a [`HookreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Attribute this error to batch item `index` (zero-based), keeping its kind.
    pub fn with_item(self, index: usize) -> Self {
        let prefix = format!("hook #{index}");
        match self {
            Self::FontLoad(m) => Self::FontLoad(format!("{prefix}: {m}")),
            Self::EmptyInput(m) => Self::EmptyInput(format!("{prefix}: {m}")),
            Self::Compositor(m) => Self::Compositor(format!("{prefix}: {m}")),
            Self::Validation(m) => Self::Validation(format!("{prefix}: {m}")),
            Self::Other(e) => Self::Other(e.context(prefix)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
