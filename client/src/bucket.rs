use crate::{Client, ClientBuilder};
use anyhow::{Error, Result};

/// A handle on a single bucket.  All keys passed to its methods are relative to the bucket and
/// begin with `/`.
pub struct Bucket {
    pub client: Client,
    name: String,
}

impl Bucket {
    /// Create a new Bucket instance, based on the given client builder
    pub fn new<S: Into<String>, CB: Into<ClientBuilder>>(
        name: S,
        client_builder: CB,
    ) -> Result<Self, Error> {
        Ok(Self {
            client: client_builder.into().build()?,
            name: name.into(),
        })
    }

    /// The name of this bucket
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Get the content of the object at `key`
    pub async fn get(&self, key: &str) -> Result<Vec<u8>, Error> {
        self.client.get_object(&self.name, key).await
    }
}
