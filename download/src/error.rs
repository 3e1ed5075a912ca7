use std::path::PathBuf;

/// Everything that can go wrong while fetching an archive.  None of these are retried: each
/// one ends the operation.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Neither explicit keys nor environment credentials were available.
    #[error("no object store credentials available")]
    Credential(#[source] anyhow::Error),

    /// The object store client could not be configured.
    #[error("invalid object store configuration")]
    Client(#[source] anyhow::Error),

    /// The store answered that the object does not exist.
    #[error("object {key} not found in bucket {bucket}")]
    ObjectNotFound { bucket: String, key: String },

    /// The pointer object exists but its content is not UTF-8.
    #[error("pointer {key} in bucket {bucket} does not contain a UTF-8 revision")]
    InvalidPointer {
        bucket: String,
        key: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The GET failed for any other reason: network failure, rejected credentials, server error.
    #[error("failed to fetch {key} from bucket {bucket}")]
    Transport {
        bucket: String,
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to create {}", .path.display())]
    FileCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to set permissions on {}", .path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
