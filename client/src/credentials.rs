use anyhow::{anyhow, Error};
use std::env;
use std::fmt;

/// Credentials represents the key pair (and optional session token) used to sign requests to
/// the object store.
#[derive(PartialEq, Clone)]
pub struct Credentials {
    /// Access key ID
    pub access_key_id: String,

    /// Secret access key
    pub secret_access_key: String,

    /// Session token for temporary credentials
    pub session_token: Option<String>,
}

/// Read the first of the given environment variables that is set to a non-empty value.
fn first_var(names: &[&str]) -> Result<Option<String>, Error> {
    for name in names {
        match env::var(name) {
            Ok(v) if v.is_empty() => continue,
            Ok(v) => return Ok(Some(v)),
            Err(env::VarError::NotPresent) => continue,
            Err(err) => {
                return Err(anyhow!(
                    "Cannot read environment variable '{}': {}",
                    name,
                    err
                ))
            }
        }
    }
    Ok(None)
}

impl Credentials {
    /// Create a new Credentials object from environment variables:
    ///
    /// * `AWS_ACCESS_KEY_ID` (or `AWS_ACCESS_KEY`)
    /// * `AWS_SECRET_ACCESS_KEY` (or `AWS_SECRET_KEY`)
    /// * `AWS_SESSION_TOKEN` (optional)
    ///
    /// Variables set to the empty string are treated as missing.
    pub fn from_env() -> Result<Credentials, Error> {
        let access_key_id = first_var(&["AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY"])?
            .ok_or_else(|| anyhow!("AWS_ACCESS_KEY_ID or AWS_ACCESS_KEY not found in environment"))?;
        let secret_access_key = first_var(&["AWS_SECRET_ACCESS_KEY", "AWS_SECRET_KEY"])?
            .ok_or_else(|| {
                anyhow!("AWS_SECRET_ACCESS_KEY or AWS_SECRET_KEY not found in environment")
            })?;
        let session_token = first_var(&["AWS_SESSION_TOKEN"])?;

        Ok(Credentials {
            access_key_id,
            secret_access_key,
            session_token,
        })
    }

    /// Create a new Credentials object with an access key ID and secret access key
    ///
    /// Examples:
    ///
    /// ```
    /// # use archive_client::Credentials;
    /// let _ = Credentials::new("my_access_key", "my_secret_key");
    /// ```
    pub fn new<S1: Into<String>, S2: Into<String>>(
        access_key_id: S1,
        secret_access_key: S2,
    ) -> Credentials {
        Credentials {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Create a new Credentials object carrying a session token, as issued for temporary
    /// credentials.
    pub fn new_with_session_token<S1, S2, S3>(
        access_key_id: S1,
        secret_access_key: S2,
        session_token: S3,
    ) -> Credentials
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Credentials {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: Some(session_token.into()),
        }
    }
}

// the secret never appears in debug output, since credentials end up in log lines
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}
