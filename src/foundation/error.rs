/// Convenience result type used across logofit.
pub type LogofitResult<T> = Result<T, LogofitError>;

/// Error taxonomy returned by the geometry and composition engine.
///
/// Every variant is terminal for a single (logo, preset) unit of work. Heuristic
/// failures that have a safe fallback never surface here; they are logged instead.
#[derive(thiserror::Error, Debug)]
pub enum LogofitError {
    /// Vector markup could not be parsed into a node tree.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A raster is missing dimensions or has a zero-sized side.
    #[error("invalid image dimensions: {0}")]
    InvalidImageDimensions(String),

    /// The source media type is neither vector markup nor a supported raster format.
    #[error("unsupported mime type: {0}")]
    UnsupportedMimeType(String),

    /// Requested target canvas has a zero-sized side.
    #[error("invalid target size: {width}x{height}")]
    InvalidTargetSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A prepared raster does not have the size its layout declared.
    #[error("composite dimension mismatch: expected {expected:?}, got {actual:?}")]
    CompositeDimensionMismatch {
        /// `(width, height)` declared by the layout.
        expected: (u32, u32),
        /// `(width, height)` of the supplied raster.
        actual: (u32, u32),
    },

    /// The unit of work was skipped because its batch was cancelled.
    #[error("cancelled")]
    Cancelled,

    /// Wrapped lower-level error from decoders, encoders or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LogofitError {
    /// Build a [`LogofitError::MalformedDocument`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    /// Build a [`LogofitError::InvalidImageDimensions`] value.
    pub fn dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidImageDimensions(msg.into())
    }

    /// Build a [`LogofitError::UnsupportedMimeType`] value.
    pub fn unsupported_mime(mime: impl Into<String>) -> Self {
        Self::UnsupportedMimeType(mime.into())
    }

    /// Build a [`LogofitError::CompositeDimensionMismatch`] value.
    pub fn mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::CompositeDimensionMismatch { expected, actual }
    }

    /// Validate a target canvas size, failing with [`LogofitError::InvalidTargetSize`].
    pub fn check_target(width: u32, height: u32) -> LogofitResult<()> {
        if width == 0 || height == 0 {
            return Err(Self::InvalidTargetSize { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
