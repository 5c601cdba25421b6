//! Project-relative filesystem layout.
//!
//! All locations derive deterministically from one root directory. No
//! directory is created here; callers create what they need.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::DbInfraError;

const ROOT_ENV: &str = "CIVIC_REGISTRY_ROOT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the project root from `CIVIC_REGISTRY_ROOT` if set, falling
    /// back to the process working directory.
    pub fn discover() -> Result<Self, DbInfraError> {
        if let Ok(root) = env::var(ROOT_ENV) {
            return Ok(Self::from_root(root));
        }
        let cwd = env::current_dir().map_err(|e| DbInfraError::Config {
            message: format!("cannot resolve project root: {e}"),
        })?;
        Ok(Self::from_root(cwd))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn migrations(&self) -> PathBuf {
        self.root.join("migrations")
    }

    pub fn storage(&self) -> PathBuf {
        self.root.join("storage")
    }

    pub fn temp(&self) -> PathBuf {
        self.storage().join("temp")
    }

    pub fn logs(&self) -> PathBuf {
        self.storage().join("logs")
    }

    pub fn documents(&self) -> PathBuf {
        self.storage().join("documents")
    }

    pub fn build(&self) -> PathBuf {
        self.root.join("dist")
    }

    pub fn public(&self) -> PathBuf {
        self.build().join("public")
    }

    pub fn assets(&self) -> PathBuf {
        self.public().join("assets")
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn all_paths_stay_under_the_root() {
        let paths = ProjectPaths::from_root("/srv/civic-registry");
        assert_eq!(paths.migrations(), Path::new("/srv/civic-registry/migrations"));
        assert_eq!(paths.storage(), Path::new("/srv/civic-registry/storage"));
        assert_eq!(paths.temp(), Path::new("/srv/civic-registry/storage/temp"));
        assert_eq!(paths.logs(), Path::new("/srv/civic-registry/storage/logs"));
        assert_eq!(
            paths.documents(),
            Path::new("/srv/civic-registry/storage/documents")
        );
        assert_eq!(paths.build(), Path::new("/srv/civic-registry/dist"));
        assert_eq!(paths.public(), Path::new("/srv/civic-registry/dist/public"));
        assert_eq!(
            paths.assets(),
            Path::new("/srv/civic-registry/dist/public/assets")
        );
    }

    #[test]
    #[serial]
    fn env_override_wins_over_working_directory() {
        env::set_var(ROOT_ENV, "/opt/registry");
        let paths = ProjectPaths::discover().unwrap();
        assert_eq!(paths.root(), Path::new("/opt/registry"));
        env::remove_var(ROOT_ENV);

        let fallback = ProjectPaths::discover().unwrap();
        assert_eq!(fallback.root(), env::current_dir().unwrap().as_path());
    }
}
