use super::StackLocator;
use std::path::{Path, PathBuf};

/// Resolves stack locations as file paths relative to a base directory
#[derive(Debug, Clone)]
pub struct FsStackLocator {
    base_dir: PathBuf,
}

impl FsStackLocator {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl Default for FsStackLocator {
    fn default() -> Self {
        Self::new(".")
    }
}

impl StackLocator for FsStackLocator {
    fn exists(&self, location: &str) -> bool {
        self.resolve(location).is_file()
    }
}
