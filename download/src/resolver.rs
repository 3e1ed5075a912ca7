use crate::service::ObjectStore;
use crate::writer::{ArtifactWriter, FileWriter};
use crate::{Coordinates, FetchError, Revision};
use archive_client::{Bucket, ClientBuilder};
use std::path::Path;

/// Open the bucket that holds builds for the given coordinates, `wercker-{environment}`.
pub fn open_bucket<CB: Into<ClientBuilder>>(
    coordinates: &Coordinates,
    client_builder: CB,
) -> Result<Bucket, FetchError> {
    Bucket::new(coordinates.bucket_name(), client_builder).map_err(FetchError::Client)
}

/// Read the branch's pointer object and return the revision it names.
pub async fn resolve_head(
    coordinates: &Coordinates,
    bucket: &Bucket,
) -> Result<Revision, FetchError> {
    resolve_head_impl(coordinates, bucket).await
}

/// Download the archive for the branch's current head into the file at `destination`, which is
/// created or truncated and then given mode [`ARTIFACT_MODE`](crate::ARTIFACT_MODE).
pub async fn fetch_latest(
    coordinates: &Coordinates,
    destination: &Path,
    bucket: &Bucket,
) -> Result<(), FetchError> {
    let mut writer = FileWriter::new();
    fetch_latest_impl(coordinates, destination, bucket, &mut writer).await
}

/// Download the archive for the branch's current head using an [`ArtifactWriter`].  This is
/// useful when the archive should go somewhere other than a plain file.
pub async fn fetch_latest_with_writer<W: ArtifactWriter>(
    coordinates: &Coordinates,
    destination: &Path,
    bucket: &Bucket,
    writer: &mut W,
) -> Result<(), FetchError> {
    fetch_latest_impl(coordinates, destination, bucket, writer).await
}

/// Internal implementation of head resolution, using the ObjectStore trait to allow injecting a
/// fake dependency.
pub(crate) async fn resolve_head_impl<S: ObjectStore>(
    coordinates: &Coordinates,
    store: &S,
) -> Result<Revision, FetchError> {
    let path = coordinates.pointer_path();
    log::info!("getting HEAD from {}", path);
    let content = store.get(&path).await?;
    let revision =
        Revision::from_pointer(&content).map_err(|source| FetchError::InvalidPointer {
            bucket: store.bucket_name().to_owned(),
            key: path.clone(),
            source,
        })?;
    log::debug!("HEAD of {} is {}", path, revision);
    Ok(revision)
}

/// Internal implementation of the download.  The revision is read fresh on every call, and
/// nothing is written until both objects have been fetched.
pub(crate) async fn fetch_latest_impl<S: ObjectStore, W: ArtifactWriter>(
    coordinates: &Coordinates,
    destination: &Path,
    store: &S,
    writer: &mut W,
) -> Result<(), FetchError> {
    let revision = resolve_head_impl(coordinates, store).await?;

    let path = coordinates.artifact_path(&revision);
    log::info!("fetching {}", path);
    let data = store.get(&path).await?;

    writer.write_artifact(destination, &data).await?;
    log::info!("wrote {} bytes to {}", data.len(), destination.display());
    Ok(())
}
