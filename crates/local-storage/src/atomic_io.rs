//! Atomic replacement of the storage document.
//!
//! The document is written to a hidden temporary file next to the target and
//! renamed over it, so a crash mid-write leaves either the old or the new
//! document on disk, never a truncated one.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::error::LocalStorageError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `path` inside `dir` with `contents`.
///
/// `path` must name a single file directly inside `dir`.
///
/// # Errors
///
/// Returns [`LocalStorageError::Write`] if the temporary file cannot be
/// written or renamed into place.
pub(crate) fn write_atomic(
    dir: &Dir,
    path: &Utf8Path,
    contents: &str,
) -> Result<(), LocalStorageError> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(LocalStorageError::Write {
            path: path.to_path_buf(),
            message: "storage document path must be a plain file name".to_owned(),
        });
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{}.tmp.{}.{}.{}",
        file_name,
        std::process::id(),
        suffix,
        counter
    );

    write_temp(dir, &tmp_name, path, contents)?;
    replace_target(dir, &tmp_name, file_name, path)?;
    sync_directory(dir);

    Ok(())
}

fn write_temp(
    dir: &Dir,
    tmp_name: &str,
    target_path: &Utf8Path,
    contents: &str,
) -> Result<(), LocalStorageError> {
    let tmp_path = target_path.with_file_name(tmp_name);
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir
        .open_with(tmp_name, &options)
        .map_err(|err| LocalStorageError::Write {
            path: tmp_path.clone(),
            message: err.to_string(),
        })?;

    let written = file
        .write_all(contents.as_bytes())
        .and_then(|()| file.sync_all());
    if let Err(err) = written {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(LocalStorageError::Write {
            path: tmp_path,
            message: err.to_string(),
        });
    }

    Ok(())
}

fn replace_target(
    dir: &Dir,
    tmp_name: &str,
    target_name: &str,
    target_path: &Utf8Path,
) -> Result<(), LocalStorageError> {
    if let Err(err) = rename_over(dir, tmp_name, target_name) {
        drop(dir.remove_file(tmp_name));
        return Err(LocalStorageError::Write {
            path: target_path.to_path_buf(),
            message: err.to_string(),
        });
    }
    Ok(())
}

#[cfg(windows)]
fn rename_over(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename refuses to overwrite an existing target.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_over(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best effort; a failed directory fsync does not invalidate the rename.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
}

#[cfg(test)]
mod tests {
    //! Regression coverage for atomic document replacement.

    use super::*;
    use cap_std::ambient_authority;
    use tempfile::TempDir;

    fn temp_dir() -> (TempDir, Dir) {
        let tmp = TempDir::new().expect("temp dir");
        let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).expect("open temp dir");
        (tmp, dir)
    }

    #[test]
    fn replaces_existing_document() {
        let (_tmp, dir) = temp_dir();
        let path = Utf8Path::new("storage.json");

        write_atomic(&dir, path, "{\"a\":\"1\"}").expect("first write");
        write_atomic(&dir, path, "{\"a\":\"2\"}").expect("second write");

        assert_eq!(
            dir.read_to_string(path).expect("read back"),
            "{\"a\":\"2\"}"
        );
    }

    #[test]
    fn leaves_no_temporary_files_behind() {
        let (_tmp, dir) = temp_dir();
        write_atomic(&dir, Utf8Path::new("storage.json"), "{}").expect("write");

        let names = dir
            .entries()
            .expect("list entries")
            .map(|entry| {
                entry
                    .expect("entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["storage.json".to_owned()]);
    }

    #[test]
    fn rejects_nested_paths() {
        let (_tmp, dir) = temp_dir();
        let err = write_atomic(&dir, Utf8Path::new("nested/storage.json"), "{}")
            .expect_err("nested path must be rejected");
        assert!(matches!(err, LocalStorageError::Write { .. }));
    }
}
