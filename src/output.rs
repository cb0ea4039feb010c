use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::schedule::Scope;

/// Persists rendered documents under an output root: the combined scope at
/// the root, each team under its slug.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scope_dir(&self, scope: &Scope) -> PathBuf {
        match scope {
            Scope::Combined => self.root.clone(),
            Scope::Team(t) => self.root.join(&t.slug),
        }
    }

    /// Write via a temporary sibling and rename, so readers never see a
    /// partial file.
    pub fn write(&self, scope: &Scope, file_name: &str, contents: &str) -> Result<PathBuf> {
        let dir = self.scope_dir(scope);
        fs::create_dir_all(&dir)?;
        let target = dir.join(file_name);
        let temp = dir.join(format!(".{}.tmp", file_name));

        let result = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&temp)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp, &target)
        })();
        if let Err(e) = result {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        info!(path = %target.display(), bytes = contents.len(), "Wrote output");
        Ok(target)
    }
}
