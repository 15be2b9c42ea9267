//! Filesystem accessor backed by `std::fs`.

use std::path::Path;

use crate::access::FileSystem;
use crate::error::{Reading, Unavailable};

/// Reads the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_to_string(&self, path: &Path) -> Reading<String> {
        std::fs::read_to_string(path).map_err(|e| Unavailable::from_io(path.display(), &e))
    }

    fn list_dir(&self, path: &Path) -> Reading<Vec<String>> {
        let entries =
            std::fs::read_dir(path).map_err(|e| Unavailable::from_io(path.display(), &e))?;
        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }
}
