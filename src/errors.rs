use thiserror::Error;

/// Errors that can arise while interacting with a [`RecordStore`](crate::storage::RecordStore).
///
/// The player registry absorbs these (a store that cannot be read is treated
/// as empty, a failed write-through is logged); they surface only to callers
/// using a store directly.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned from command registration.
///
/// Registration failures indicate caller misuse and propagate to the
/// immediate caller; everything else in the router (unknown commands, failed
/// unregistration) is an expected outcome reported as `false`, never an error.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The normalized or full command name is already taken, either in this
    /// router or in one of the adapter's external command namespaces.
    #[error("command already exists: {0}")]
    AlreadyExists(String),

    /// The raw name was empty after trimming.
    #[error("invalid command name: {0:?}")]
    InvalidName(String),
}
