use crate::FetchError;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Mode bits given to a downloaded archive: owner read+execute, group read+execute.  Note that
/// this leaves the owner without write permission.
pub const ARTIFACT_MODE: u32 = 0o544;

/// An ArtifactWriter persists downloaded archive bytes.  The resolver calls it exactly once, after
/// both store lookups have succeeded.
#[async_trait]
pub trait ArtifactWriter {
    /// Write `data` to `destination`, replacing any existing content.
    async fn write_artifact(&mut self, destination: &Path, data: &[u8]) -> Result<(), FetchError>;
}

/// A FileWriter creates (or truncates) the destination file, writes the archive to it, and then
/// sets its mode to [`ARTIFACT_MODE`].  A failure part-way leaves whatever was written in place.
#[derive(Debug, Clone, Default)]
pub struct FileWriter;

impl FileWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArtifactWriter for FileWriter {
    async fn write_artifact(&mut self, destination: &Path, data: &[u8]) -> Result<(), FetchError> {
        let mut file = File::create(destination)
            .await
            .map_err(|source| FetchError::FileCreate {
                path: destination.to_owned(),
                source,
            })?;

        let write_err = |source: std::io::Error| FetchError::Write {
            path: destination.to_owned(),
            source,
        };
        file.write_all(data).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;

        set_mode(&file, ARTIFACT_MODE)
            .await
            .map_err(|source| FetchError::Permission {
                path: destination.to_owned(),
                source,
            })
    }
}

#[cfg(unix)]
async fn set_mode(file: &File, mode: u32) -> std::io::Result<()> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(Permissions::from_mode(mode)).await
}

// without Unix mode bits, the closest equivalent of a mode lacking owner write is read-only
#[cfg(not(unix))]
async fn set_mode(file: &File, mode: u32) -> std::io::Result<()> {
    let mut perms = file.metadata().await?.permissions();
    perms.set_readonly(mode & 0o200 == 0);
    file.set_permissions(perms).await
}
