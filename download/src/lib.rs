/*! Resolve the latest build of a project branch and download it.

Builds are laid out in the object store like this:

* bucket `wercker-{environment}`;
* `/{project}/{branch}/HEAD`, a pointer object whose content is the short revision of the
  branch's latest build (surrounding whitespace is ignored);
* `/{project}/{branch}/{project}.{revision}.tgz`, the build archive for that revision.

[`fetch_latest`] reads the pointer, derives the archive key from it, downloads the archive and
writes it to a local file with mode [`ARTIFACT_MODE`].  The two GETs happen strictly in order, and
the file is only created once both have succeeded.  Nothing is retried: every failure is returned
as a [`FetchError`].

```no_run
# use anyhow::Result;
# #[tokio::main]
# async fn main() -> Result<()> {
use archive_client::{ClientBuilder, Credentials};
use archive_download::{fetch_latest, open_bucket, Coordinates};
use std::path::Path;

let coordinates = Coordinates::new("kiddie-pool", "development", "master");
let bucket = open_bucket(
    &coordinates,
    ClientBuilder::new("https://s3.amazonaws.com").credentials(Credentials::from_env()?),
)?;
fetch_latest(&coordinates, Path::new("kiddie-pool"), &bucket).await?;
# Ok(())
# }
```

## Writers

The archive is handed to an [`ArtifactWriter`]; [`fetch_latest`] uses a [`FileWriter`].  Callers
wanting something else can implement the trait and use [`fetch_latest_with_writer`].
*/
mod coordinates;
mod error;
mod resolver;
mod service;
mod writer;

#[cfg(test)]
mod test_helpers;

pub use coordinates::{Coordinates, Revision, STORE_PREFIX};
pub use error::FetchError;
pub use resolver::{fetch_latest, fetch_latest_with_writer, open_bucket, resolve_head};
pub use writer::{ArtifactWriter, FileWriter, ARTIFACT_MODE};
