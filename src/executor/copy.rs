//! Staged, no-clobber file copy
//!
//! A file is first written to a temporary file inside the destination
//! directory, with the source's permissions and timestamps applied, and only
//! then moved to its final name with a rename that refuses to replace an
//! existing entry. Nothing already in the destination is ever truncated.

use filetime::FileTime;
use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::Path;
use tempfile::NamedTempFile;

/// A fully written copy waiting for its final name
#[derive(Debug)]
pub struct StagedCopy {
    temp: NamedTempFile,
    bytes: u64,
}

/// Result of trying to commit a staged copy under a name
#[derive(Debug)]
pub enum Commit {
    /// Copy is in place under the requested name
    Done(u64),

    /// Name was taken; the staged copy is handed back untouched
    Taken(StagedCopy),
}

/// Write `src` into a temporary file in `dest_dir`
///
/// 1. Stream the contents into a temp file in the destination directory
/// 2. Flush to disk
/// 3. Preserve permissions, access and modification time
///
/// The temp file is removed on drop unless [`StagedCopy::commit`] succeeds.
pub fn stage_copy(src: &Path, dest_dir: &Path) -> io::Result<StagedCopy> {
    let src_metadata = fs::metadata(src)?;
    let mut src_file = File::open(src)?;
    let mut temp = NamedTempFile::new_in(dest_dir)?;

    let bytes = io::copy(&mut src_file, temp.as_file_mut())?;
    temp.as_file().sync_all()?;

    fs::set_permissions(temp.path(), src_metadata.permissions())?;

    let atime = FileTime::from_last_access_time(&src_metadata);
    let mtime = FileTime::from_last_modification_time(&src_metadata);
    filetime::set_file_times(temp.path(), atime, mtime)?;

    Ok(StagedCopy { temp, bytes })
}

impl StagedCopy {
    /// Bytes written to the staged file
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Move the staged file to `target` unless something already lives there
    pub fn commit(self, target: &Path) -> io::Result<Commit> {
        let bytes = self.bytes;
        match self.temp.persist_noclobber(target) {
            Ok(_) => Ok(Commit::Done(bytes)),
            Err(err) if err.error.kind() == ErrorKind::AlreadyExists => {
                Ok(Commit::Taken(StagedCopy {
                    temp: err.file,
                    bytes,
                }))
            }
            Err(err) => Err(err.error),
        }
    }
}

/// Copy `src` to `dest` without ever replacing an existing `dest`
///
/// Returns `Ok(None)` when `dest` is taken.
pub fn copy_file_noclobber(src: &Path, dest: &Path) -> io::Result<Option<u64>> {
    let dest_dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    match stage_copy(src, dest_dir)?.commit(dest)? {
        Commit::Done(bytes) => Ok(Some(bytes)),
        Commit::Taken(_) => Ok(None),
    }
}
