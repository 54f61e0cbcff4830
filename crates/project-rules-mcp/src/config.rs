use std::io;
use std::path::{Path, PathBuf};

/// Name, version and blurb reported in the `initialize` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerIdentity {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            name: "project-rules",
            version: env!("CARGO_PKG_VERSION"),
            description: "Vue 3 + Vuetify project rules and code validation",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rules_path: PathBuf,
    pub identity: ServerIdentity,
}

impl ServerConfig {
    /// Configuration for a server rooted at `root`.
    pub fn for_root(root: &Path) -> Self {
        Self {
            rules_path: project_rules_core::rules_path(root),
            identity: ServerIdentity::default(),
        }
    }

    /// Configuration for the process's working directory.
    pub fn from_current_dir() -> io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::for_root(&cwd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_path_under_vscode() {
        let config = ServerConfig::for_root(Path::new("/work/app"));
        assert_eq!(
            config.rules_path,
            PathBuf::from("/work/app/.vscode/rules.json")
        );
    }

    #[test]
    fn test_identity_tracks_crate_version() {
        let identity = ServerIdentity::default();
        assert_eq!(identity.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(identity.name, "project-rules");
    }
}
