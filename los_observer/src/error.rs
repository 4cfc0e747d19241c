//! Error type shared by every module of the crate.

/// Errors raised by observer capture, surface lookup and offset conversion.
#[derive(thiserror::Error, Debug)]
pub enum LosError {
    /// A required value was cleared or is not a finite number.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Offsets cannot be scaled by a zero, negative or non-finite Z factor.
    #[error("invalid scale factor {0}: the Z factor must be positive")]
    InvalidZFactor(f64),

    #[error("no eligible surface named '{0}'")]
    UnknownSurface(String),

    #[error("layer {index} is not accessible: {reason}")]
    LayerAccess { index: usize, reason: String },

    /// A raster layer could not be wrapped as an elevation surface.
    #[error("raster layer '{name}' cannot be used as a surface: {reason}")]
    RasterWrap { name: String, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LosError>;
