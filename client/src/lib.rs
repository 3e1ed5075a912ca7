/*!
# Object store client

A small client for fetching objects from an S3-compatible object store.  It is a convenience
wrapper around `reqwest` that addresses objects path-style (`{endpoint}/{bucket}{key}`) and
signs requests with AWS Signature Version 4 using `aws-sigv4`.

This is not a general-purpose S3 client: it supports exactly the signed `GET` that
`get-archive` needs, and never retries.

# Usage

Build a client with [`ClientBuilder`](crate::ClientBuilder), supplying at least the endpoint
URL, and wrap it in a [`Bucket`](crate::Bucket) to address a single bucket:

```
# use httptest::{matchers::*, responders::*, Expectation, Server};
# use anyhow::Result;
# #[tokio::main]
# async fn main() -> Result<()> {
# let server = Server::run();
# server.expect(
#    Expectation::matching(request::method_path("GET", "/wercker-development/kiddie-pool/master/HEAD"))
#   .respond_with(status_code(200).body("7d3bb37\n"))
# );
# let endpoint = format!("http://{}", server.addr());
use archive_client::{Bucket, ClientBuilder, Credentials};
let creds = Credentials::new("an-access-key", "a-secret");
let bucket = Bucket::new(
    "wercker-development",
    ClientBuilder::new(&endpoint).credentials(creds),
)?;
let head = bucket.get("/kiddie-pool/master/HEAD").await?;
assert_eq!(head, b"7d3bb37\n");
# Ok(())
# }
```

Credentials can also be read from the standard AWS environment variables with
[`Credentials::from_env`](crate::Credentials::from_env).

Failed requests return an [`anyhow::Error`]; use [`err_status_code`](crate::err_status_code) to
recover the HTTP status, for example to distinguish a missing object (404) from other failures.
*/

mod bucket;
mod client;
mod credentials;
mod util;

pub use bucket::Bucket;
pub use client::{Client, ClientBuilder, DEFAULT_REGION};
pub use credentials::Credentials;
pub use reqwest::StatusCode;
pub use util::err_status_code;
