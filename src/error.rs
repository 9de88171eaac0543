//! Driver-level error taxonomy.

/// Errors surfaced across the host-facing driver boundary.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Device open or configure failed; the device is not registered.
    #[error("failed to initialize device: {0}")]
    Init(String),

    /// A rejected call; prior state is left untouched.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not provided by this driver class.
    #[error("operation not supported")]
    Unsupported,

    /// Configuration file did not parse.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
