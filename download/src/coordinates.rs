use std::fmt;

/// Every bucket name is this prefix, a dash, and the environment.
pub const STORE_PREFIX: &str = "wercker";

/// The (project, environment, branch) triple that determines which bucket and which object keys
/// are used.  Coordinates are fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    project: String,
    environment: String,
    branch: String,
}

impl Coordinates {
    pub fn new<P, E, B>(project: P, environment: E, branch: B) -> Self
    where
        P: Into<String>,
        E: Into<String>,
        B: Into<String>,
    {
        Self {
            project: project.into(),
            environment: environment.into(),
            branch: branch.into(),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// The bucket holding this environment's builds, `wercker-{environment}`.
    pub fn bucket_name(&self) -> String {
        format!("{}-{}", STORE_PREFIX, self.environment)
    }

    /// Key of the pointer object naming the branch's latest revision,
    /// `/{project}/{branch}/HEAD`.
    pub fn pointer_path(&self) -> String {
        format!("/{}/{}/HEAD", self.project, self.branch)
    }

    /// Key of the build archive for a revision, `/{project}/{branch}/{project}.{revision}.tgz`.
    pub fn artifact_path(&self, revision: &Revision) -> String {
        format!(
            "/{}/{}/{}.{}.tgz",
            self.project, self.branch, self.project, revision
        )
    }
}

/// A revision identifier (typically an abbreviated commit hash) as read from a pointer object.
/// Surrounding whitespace is always stripped; beyond being UTF-8 the content is not validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    pub fn new<S: AsRef<str>>(revision: S) -> Self {
        Self(revision.as_ref().trim().to_owned())
    }

    /// Decode the content of a pointer object.  Content that is not UTF-8 cannot name an object
    /// key and is rejected.
    pub fn from_pointer(content: &[u8]) -> Result<Self, std::str::Utf8Error> {
        std::str::from_utf8(content).map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
