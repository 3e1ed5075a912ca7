use crate::util::{encode_path, urlencode};
use crate::Credentials;
use anyhow::{bail, Context, Error, Result};
use aws_sigv4::http_request::{
    sign, PayloadChecksumKind, PercentEncodingMode, SignableBody, SignableRequest,
    SigningParams, SigningSettings, UriPathNormalizationMode,
};
use aws_sigv4::sign::v4;
use reqwest::header::{HeaderName, HeaderValue};
use std::time::{Duration, SystemTime};

/// The signing region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// The service name that enters SigV4 credential scopes.
const SERVICE: &str = "s3";

/// ClientBuilder implements the builder pattern for building a Client, allowing
/// optional configuration of credentials, region and timeout.
#[derive(Default, Debug, Clone)]
pub struct ClientBuilder {
    endpoint: String,
    credentials: Option<Credentials>,
    region: Option<String>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new ClientBuilder.  The endpoint URL of the object store (for example
    /// `https://s3.amazonaws.com`) is required and so must always be specified.
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Add credentials to the client
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the region used in request signatures.  The default is `us-east-1`.
    pub fn region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the timeout for each HTTP request made by the client.  By default there is no
    /// timeout, and a stalled request blocks indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the resulting client, consuming the builder
    pub fn build(self) -> Result<Client> {
        Client::new(self)
    }
}

impl From<String> for ClientBuilder {
    fn from(endpoint: String) -> Self {
        Self::new(endpoint)
    }
}

impl From<&str> for ClientBuilder {
    fn from(endpoint: &str) -> Self {
        Self::new(endpoint)
    }
}

/// Client makes path-style requests against an object-store endpoint, signing them with the
/// configured credentials.
pub struct Client {
    /// The credentials used to sign requests.  If None, then unauthenticated requests are made.
    credentials: Option<Credentials>,

    /// Signing region
    region: String,

    /// The parsed endpoint URL
    base_url: reqwest::Url,

    /// Reqwest client
    client: reqwest::Client,
}

impl Client {
    /// Create a new client (public interface is via
    /// [`ClientBuilder::build`](crate::ClientBuilder::build))
    fn new(b: ClientBuilder) -> Result<Client> {
        let base_url = reqwest::Url::parse(b.endpoint.as_ref())
            .context(format!("while parsing {}", b.endpoint))?;
        if base_url.host_str().is_none() {
            bail!("The endpoint {} doesn't contain a host", b.endpoint);
        }

        let mut client = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = b.timeout {
            client = client.timeout(timeout);
        }
        let client = client.build()?;

        Ok(Client {
            credentials: b.credentials,
            region: b.region.unwrap_or_else(|| DEFAULT_REGION.to_owned()),
            base_url,
            client,
        })
    }

    /// Get the signing region of this client
    pub fn region(&self) -> &str {
        self.region.as_ref()
    }

    /// Fetch the object stored under `key` in `bucket` and return its content.  The key must
    /// begin with `/`.
    ///
    /// Any response other than a success is returned as an error wrapping the
    /// [`reqwest::Error`], so that the status can be recovered with
    /// [`err_status_code`](crate::err_status_code).  Nothing is retried.
    pub async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, Error> {
        let req = self.build_request("GET", bucket, key)?;
        let url = req.url().to_string();

        let resp = self
            .client
            .execute(req)
            .await
            .context(format!("while requesting {}", url))?;

        let status = resp.status();
        if status.is_success() {
            let body = resp
                .bytes()
                .await
                .context(format!("while reading body of {}", url))?;
            return Ok(body.to_vec());
        }

        match resp.error_for_status() {
            Err(err) => Err(err.into()),
            // redirects are not followed, and are not useful to the caller
            Ok(_) => bail!("unexpected response status {} for {}", status, url),
        }
    }

    /// Build the URL for an object.
    fn object_url(&self, bucket: &str, key: &str) -> Result<reqwest::Url, Error> {
        if !key.starts_with('/') {
            bail!("Object key must begin with `/`");
        }
        if bucket.is_empty() {
            bail!("Bucket name must not be empty");
        }

        let path = format!(
            "{}/{}{}",
            self.base_url.path().trim_end_matches('/'),
            urlencode(bucket),
            encode_path(key)
        );
        let mut url = self.base_url.clone();
        url.set_path(&path);
        Ok(url)
    }

    fn build_request(
        &self,
        method: &str,
        bucket: &str,
        key: &str,
    ) -> Result<reqwest::Request, Error> {
        let url = self.object_url(bucket, key)?;
        let meth = reqwest::Method::from_bytes(method.as_bytes())?;
        let req = self.client.request(meth, url).build()?;

        match self.credentials {
            Some(ref creds) => self.sign_request(creds, req),
            None => Ok(req),
        }
    }

    fn sign_request(
        &self,
        creds: &Credentials,
        mut req: reqwest::Request,
    ) -> Result<reqwest::Request, Error> {
        let headers = signing_headers(
            creds,
            &self.region,
            req.method().as_str(),
            req.url().as_str(),
            &[],
            SystemTime::now(),
        )?;

        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            let mut value =
                HeaderValue::from_str(&value).context(format!("header {}", name.as_str()))?;
            if name == reqwest::header::AUTHORIZATION {
                value.set_sensitive(true);
            }
            req.headers_mut().insert(name, value);
        }
        Ok(req)
    }
}

/// Compute the SigV4 headers (`authorization`, `x-amz-date`, `x-amz-content-sha256` and, with a
/// session token, `x-amz-security-token`) for a body-less request to `url`.  Any `headers`
/// given are signed as well; the host is always taken from the URL.
fn signing_headers(
    creds: &Credentials,
    region: &str,
    method: &str,
    url: &str,
    headers: &[(&str, &str)],
    time: SystemTime,
) -> Result<Vec<(String, String)>, Error> {
    let identity = aws_credential_types::Credentials::new(
        &creds.access_key_id,
        &creds.secret_access_key,
        creds.session_token.clone(),
        None,
        "archive-client",
    )
    .into();

    // object keys are already percent-encoded once, and S3 does not normalize paths
    let mut settings = SigningSettings::default();
    settings.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;
    settings.percent_encoding_mode = PercentEncodingMode::Single;
    settings.uri_path_normalization_mode = UriPathNormalizationMode::Disabled;

    let params: SigningParams<'_> = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name(SERVICE)
        .time(time)
        .settings(settings)
        .build()
        .context("while building signing parameters")?
        .into();

    let signable = SignableRequest::new(
        method,
        url,
        headers.iter().copied(),
        SignableBody::Bytes(&[]),
    )
    .context(format!("while preparing {} for signing", url))?;
    let (instructions, _signature) = sign(signable, &params)
        .context(format!("while signing {}", url))?
        .into_parts();

    Ok(instructions
        .headers()
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect())
}
