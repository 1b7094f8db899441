//! Working directory holding sort temporary files.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::mem;
use std::path::{Path, PathBuf};

/// Suffix shared by every temporary file name.
pub const TEMP_FILE_SUFFIX: &str = "tempfile";

const ACCUMULATOR_NAME: &str = "accumulator.tempfile";
const MERGE_NAME: &str = "merge.tempfile";

/// Working directory. Hands out temporary file paths and remembers them so that only files it named
/// are removed by [`WorkDir::cleanup`]; other files in the directory are left alone.
pub struct WorkDir {
    path: PathBuf,
    tracked: BTreeSet<PathBuf>,
    // removes the directory itself on drop when it was created by `WorkDir::temporary`
    _tmp_dir: Option<tempfile::TempDir>,
}

impl WorkDir {
    /// Opens a working directory creating it (and its parents) if it doesn't exist.
    /// The directory is never removed by the sorter.
    pub fn open(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            log::info!("creating working directory {}", path.display());
        }
        fs::create_dir_all(path)?;

        log::info!("using {} as a working directory", path.display());

        return Ok(WorkDir {
            path: path.to_path_buf(),
            tracked: BTreeSet::new(),
            _tmp_dir: None,
        });
    }

    /// Creates a fresh uniquely named directory that is removed when the working directory is dropped.
    ///
    /// # Arguments
    /// * `parent` - Directory to create it in. If the parameter is [`None`] default OS temporary
    ///   directory will be used.
    pub fn temporary(parent: Option<&Path>) -> io::Result<Self> {
        let tmp_dir = if let Some(parent) = parent {
            tempfile::tempdir_in(parent)
        } else {
            tempfile::tempdir()
        }?;

        log::info!("using {} as a temporary working directory", tmp_dir.path().display());

        return Ok(WorkDir {
            path: tmp_dir.path().to_path_buf(),
            tracked: BTreeSet::new(),
            _tmp_dir: Some(tmp_dir),
        });
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the chunk file with the given creation ordinal: `<ordinal>.tempfile`.
    pub fn chunk_path(&mut self, ordinal: usize) -> PathBuf {
        self.track(format!("{}.{}", ordinal, TEMP_FILE_SUFFIX))
    }

    /// Path of the merge accumulator.
    pub fn accumulator_path(&mut self) -> PathBuf {
        self.track(ACCUMULATOR_NAME.to_string())
    }

    /// Path of the intermediate file a single merge step writes to.
    pub fn merge_path(&mut self) -> PathBuf {
        self.track(MERGE_NAME.to_string())
    }

    fn track(&mut self, name: String) -> PathBuf {
        let path = self.path.join(name);
        self.tracked.insert(path.clone());
        path
    }

    /// Temporary files handed out since the last cleanup.
    pub fn tracked(&self) -> &BTreeSet<PathBuf> {
        &self.tracked
    }

    /// Checks if `path` names one of the temporary files this directory may hand out,
    /// whether or not it has been handed out yet.
    pub fn owns(&self, path: &Path) -> bool {
        let name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name,
            None => return false,
        };
        if name != ACCUMULATOR_NAME && name != MERGE_NAME && !is_chunk_name(name) {
            return false;
        }

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        return match (parent.canonicalize(), self.path.canonicalize()) {
            (Ok(parent), Ok(own)) => parent == own,
            _ => false,
        };
    }

    /// Removes every tracked temporary file. Files already gone are skipped.
    /// Returns the number of files removed.
    pub fn cleanup(&mut self) -> io::Result<usize> {
        let mut removed = 0;
        for path in mem::take(&mut self.tracked) {
            match fs::remove_file(&path) {
                Ok(()) => {
                    log::trace!("removed {}", path.display());
                    removed += 1;
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }

        log::debug!("{} temporary files removed from {}", removed, self.path.display());

        return Ok(removed);
    }
}

fn is_chunk_name(name: &str) -> bool {
    match name.strip_suffix(TEMP_FILE_SUFFIX).and_then(|stem| stem.strip_suffix('.')) {
        Some(ordinal) => !ordinal.is_empty() && ordinal.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
