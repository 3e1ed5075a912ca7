//! Fetch the latest build archive of a project branch from the object store.
//!
//! The binary parses [`Args`] once, turns them into an immutable [`Config`], and hands that to
//! [`run`].  Any error ends the process with a non-zero status after it has been logged.

use archive_client::{ClientBuilder, Credentials, DEFAULT_REGION};
use archive_download::{fetch_latest, open_bucket, Coordinates, FetchError};
use clap::Parser;
use std::error::Error;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Long flag names that may also be written with a single dash, as in `-project proj` or
/// `-destination=out`.
const LONG_FLAGS: &[&str] = &[
    "environment",
    "branch",
    "project",
    "destination",
    "access-key",
    "secret-key",
    "endpoint",
    "region",
];

/// Command-line flags.  Empty strings mean "not given", so that the defaults can be decided
/// in one place ([`Config::from`]).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "get-archive",
    about = "Download the latest build archive of a project branch"
)]
pub struct Args {
    /// Environment whose bucket holds the build, e.g. development or production.
    #[arg(long, default_value = "development")]
    pub environment: String,

    /// Branch whose latest build is fetched.
    #[arg(long, default_value = "master")]
    pub branch: String,

    /// Project to fetch; also the default output file name.
    #[arg(long, default_value = "kiddie-pool")]
    pub project: String,

    /// Output file.  Defaults to the project name in the working directory.
    #[arg(long, default_value = "")]
    pub destination: String,

    /// Access key ID.  Read from the environment unless both keys are given.
    #[arg(long = "access-key", default_value = "")]
    pub access_key: String,

    /// Secret access key.  Read from the environment unless both keys are given.
    #[arg(long = "secret-key", default_value = "")]
    pub secret_key: String,

    /// Object store endpoint.
    #[arg(long, default_value = "https://s3.amazonaws.com")]
    pub endpoint: String,

    /// Region used to sign requests.
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,
}

/// Where the store credentials come from.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
    /// Both keys were given on the command line
    Explicit(Credentials),
    /// Read the standard environment variables at run time
    Environment,
}

impl CredentialSource {
    /// Explicit keys win whenever both are non-empty; anything less falls back to the
    /// environment.
    pub fn select(access_key: &str, secret_key: &str) -> Self {
        if !access_key.is_empty() && !secret_key.is_empty() {
            CredentialSource::Explicit(Credentials::new(access_key, secret_key))
        } else {
            CredentialSource::Environment
        }
    }

    pub fn credentials(&self) -> Result<Credentials, FetchError> {
        match self {
            CredentialSource::Explicit(creds) => {
                log::info!("using provided aws keys {}", creds.access_key_id);
                Ok(creds.clone())
            }
            CredentialSource::Environment => {
                log::info!("using aws keys from environment");
                Credentials::from_env().map_err(FetchError::Credential)
            }
        }
    }
}

/// Everything a run needs, fixed at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub coordinates: Coordinates,
    pub destination: PathBuf,
    pub credentials: CredentialSource,
    pub endpoint: String,
    pub region: String,
}

impl Args {
    /// Parse the given command line, accepting `-name` as well as `--name` for the long flags.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(double_dash_flags(args))
    }
}

/// Rewrite single-dash long flags to their double-dash form.  Everything after a bare `--`, and
/// anything that is not one of [`LONG_FLAGS`], is passed through untouched.
pub fn double_dash_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut rest_is_positional = false;
    args.into_iter()
        .map(|arg| {
            let arg = arg.into();
            if rest_is_positional {
                return arg;
            }
            let rewritten = match arg.to_str() {
                Some("--") => {
                    rest_is_positional = true;
                    None
                }
                Some(s) if is_single_dash_long_flag(s) => Some(format!("-{}", s)),
                _ => None,
            };
            rewritten.map(OsString::from).unwrap_or(arg)
        })
        .collect()
}

fn is_single_dash_long_flag(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(flag) if !flag.starts_with('-') => {
            let name = flag.split('=').next().unwrap_or(flag);
            LONG_FLAGS.contains(&name)
        }
        _ => false,
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let destination = if args.destination.is_empty() {
            PathBuf::from(&args.project)
        } else {
            PathBuf::from(&args.destination)
        };
        Config {
            credentials: CredentialSource::select(&args.access_key, &args.secret_key),
            coordinates: Coordinates::new(args.project, args.environment, args.branch),
            destination,
            endpoint: args.endpoint,
            region: args.region,
        }
    }
}

impl Config {
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// Resolve credentials, open the bucket and fetch the latest archive to the configured
/// destination.
pub async fn run(config: &Config) -> Result<(), FetchError> {
    let credentials = config.credentials.credentials()?;
    let client_builder = ClientBuilder::new(&config.endpoint)
        .region(&config.region)
        .credentials(credentials);
    let bucket = open_bucket(&config.coordinates, client_builder)?;
    fetch_latest(&config.coordinates, config.destination(), &bucket).await
}

/// Render an error with all of its causes, outermost first.
pub fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use std::env;
    use std::sync::{LockResult, Mutex, MutexGuard};

    // environment is global to the process, so we need to ensure that only one test uses
    // it at a time.
    lazy_static! {
        static ref ENV_LOCK: Mutex<()> = Mutex::new(());
    }

    fn clear_env() -> LockResult<MutexGuard<'static, ()>> {
        let guard = ENV_LOCK.lock();
        for (key, _) in env::vars() {
            if key.starts_with("AWS_") {
                env::remove_var(key);
            }
        }
        guard
    }

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["get-archive"];
        argv.extend_from_slice(args);
        Config::from(Args::try_parse_args(argv).unwrap())
    }

    #[test]
    fn defaults() {
        let config = parse(&[]);
        assert_eq!(
            config.coordinates,
            Coordinates::new("kiddie-pool", "development", "master")
        );
        assert_eq!(config.coordinates.bucket_name(), "wercker-development");
        assert_eq!(config.destination(), Path::new("kiddie-pool"));
        assert_eq!(config.credentials, CredentialSource::Environment);
        assert_eq!(config.endpoint, "https://s3.amazonaws.com");
        assert_eq!(config.region, "us-east-1");
    }

    #[test]
    fn flags() {
        let config = parse(&[
            "--environment",
            "production",
            "--branch",
            "docker",
            "--project",
            "sentcli",
            "--destination",
            "/tmp/out",
            "--endpoint",
            "http://localhost:9000",
            "--region",
            "eu-west-1",
        ]);
        assert_eq!(
            config.coordinates,
            Coordinates::new("sentcli", "production", "docker")
        );
        assert_eq!(config.destination(), Path::new("/tmp/out"));
        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.region, "eu-west-1");
    }

    #[test]
    fn single_dash_flags() {
        let config = parse(&[
            "-project",
            "proj",
            "-branch",
            "main",
            "-environment=production",
            "-destination=out",
            "-access-key",
            "k",
            "-secret-key=s",
        ]);
        assert_eq!(
            config.coordinates,
            Coordinates::new("proj", "production", "main")
        );
        assert_eq!(config.destination(), Path::new("out"));
        assert_eq!(
            config.credentials,
            CredentialSource::Explicit(Credentials::new("k", "s"))
        );
    }

    #[test]
    fn double_dash_flags_rewrites_only_known_flags() {
        let rewritten = double_dash_flags(vec![
            "get-archive",
            "-project",
            "-x",
            "--branch",
            "-region=eu-west-1",
            "-h",
            "--",
            "-project",
        ]);
        assert_eq!(
            rewritten,
            vec![
                "get-archive",
                "--project",
                "-x",
                "--branch",
                "--region=eu-west-1",
                "-h",
                "--",
                "-project",
            ]
        );
    }

    #[test]
    fn unknown_single_dash_flag_is_rejected() {
        assert!(Args::try_parse_args(vec!["get-archive", "-bogus", "x"]).is_err());
    }

    #[test]
    fn empty_destination_is_project_name() {
        let config = parse(&["--project", "my-proj", "--destination", ""]);
        assert_eq!(config.destination(), Path::new("my-proj"));
    }

    #[test]
    fn explicit_keys_need_both() {
        assert_eq!(
            CredentialSource::select("key", "secret"),
            CredentialSource::Explicit(Credentials::new("key", "secret"))
        );
        assert_eq!(
            CredentialSource::select("key", ""),
            CredentialSource::Environment
        );
        assert_eq!(
            CredentialSource::select("", "secret"),
            CredentialSource::Environment
        );
    }

    #[test]
    fn explicit_keys_take_precedence_over_environment() {
        let _guard = clear_env();
        env::set_var("AWS_ACCESS_KEY_ID", "env-key");
        env::set_var("AWS_SECRET_ACCESS_KEY", "env-secret");

        let config = parse(&["--access-key", "flag-key", "--secret-key", "flag-secret"]);
        let creds = config.credentials.credentials().unwrap();
        assert_eq!(creds, Credentials::new("flag-key", "flag-secret"));
    }

    #[test]
    fn environment_credentials() {
        let _guard = clear_env();
        env::set_var("AWS_ACCESS_KEY_ID", "env-key");
        env::set_var("AWS_SECRET_ACCESS_KEY", "env-secret");

        let creds = CredentialSource::Environment.credentials().unwrap();
        assert_eq!(creds, Credentials::new("env-key", "env-secret"));
    }

    #[test]
    fn missing_environment_credentials() {
        let _guard = clear_env();
        let err = CredentialSource::Environment.credentials().unwrap_err();
        assert!(matches!(err, FetchError::Credential(_)));
        assert!(error_chain(&err).contains("AWS_ACCESS_KEY_ID"));
    }

    #[tokio::test]
    async fn run_without_credentials_fails_before_any_request() {
        let _guard = clear_env();
        // nothing listens here; reaching the network would be a different error
        let config = parse(&["--endpoint", "http://127.0.0.1:9"]);
        let err = run(&config).await.unwrap_err();
        assert!(matches!(err, FetchError::Credential(_)));
    }

    #[tokio::test]
    async fn run_with_bad_endpoint() {
        let config = parse(&[
            "--endpoint",
            "not a url",
            "--access-key",
            "k",
            "--secret-key",
            "s",
        ]);
        let err = run(&config).await.unwrap_err();
        assert!(matches!(err, FetchError::Client(_)));
    }

    #[test]
    fn error_chain_includes_causes() {
        let err = FetchError::Write {
            path: PathBuf::from("out"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(error_chain(&err), "failed to write out: disk full");
    }
}
