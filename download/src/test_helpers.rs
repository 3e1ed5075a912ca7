//! Utilities for testing the resolver
use crate::service::ObjectStore;
use crate::writer::ArtifactWriter;
use crate::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Event logger, used to log events from various places and then assert on them.
#[derive(Default, Clone)]
pub(crate) struct Logger {
    logged: Arc<Mutex<Vec<String>>>,
}

impl Logger {
    pub(crate) fn log<S: Into<String>>(&self, message: S) {
        self.logged.lock().unwrap().push(message.into())
    }

    pub(crate) fn assert(&self, expected: Vec<String>) {
        assert_eq!(*self.logged.lock().unwrap(), expected);
    }
}

/// What the fake store answers for a key.
pub(crate) enum FakeObject {
    Data(Vec<u8>),
    /// fail with a transport error carrying this message
    Fail(&'static str),
}

/// Fake implementation of the object store.  Keys without a configured object are not found.
pub(crate) struct FakeObjectStore {
    pub(crate) logger: Logger,
    pub(crate) objects: HashMap<String, FakeObject>,
}

impl FakeObjectStore {
    pub(crate) fn new(logger: Logger) -> Self {
        Self {
            logger,
            objects: HashMap::new(),
        }
    }

    pub(crate) fn with_object<K: Into<String>, D: Into<Vec<u8>>>(
        mut self,
        key: K,
        data: D,
    ) -> Self {
        self.objects.insert(key.into(), FakeObject::Data(data.into()));
        self
    }

    pub(crate) fn with_failure<K: Into<String>>(mut self, key: K, message: &'static str) -> Self {
        self.objects.insert(key.into(), FakeObject::Fail(message));
        self
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    fn bucket_name(&self) -> &str {
        "fake-bucket"
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, FetchError> {
        self.logger.log(format!("get {}", key));
        match self.objects.get(key) {
            Some(FakeObject::Data(data)) => Ok(data.clone()),
            Some(FakeObject::Fail(message)) => Err(FetchError::Transport {
                bucket: self.bucket_name().to_owned(),
                key: key.to_owned(),
                source: anyhow::anyhow!(*message),
            }),
            None => Err(FetchError::ObjectNotFound {
                bucket: self.bucket_name().to_owned(),
                key: key.to_owned(),
            }),
        }
    }
}

/// Fake writer that records what it was asked to write.  When `fail` is set it reports a write
/// error instead.
pub(crate) struct FakeWriter {
    pub(crate) logger: Logger,
    pub(crate) written: Option<Vec<u8>>,
    pub(crate) fail: bool,
}

impl FakeWriter {
    pub(crate) fn new(logger: Logger) -> Self {
        Self {
            logger,
            written: None,
            fail: false,
        }
    }
}

#[async_trait]
impl ArtifactWriter for FakeWriter {
    async fn write_artifact(&mut self, destination: &Path, data: &[u8]) -> Result<(), FetchError> {
        self.logger
            .log(format!("write {} {}", destination.display(), data.len()));
        if self.fail {
            return Err(FetchError::Write {
                path: destination.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.written = Some(data.to_vec());
        Ok(())
    }
}
