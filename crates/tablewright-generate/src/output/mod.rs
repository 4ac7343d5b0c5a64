//! Artifact serialisation and atomic file writes.

pub mod csv;
pub mod json;

use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Replace `path` with `data` through a sibling temp file, returning the
/// number of bytes written. Missing parent directories are created.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> io::Result<u64> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&tmp_path, path)?;
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }

    Ok(data.len() as u64)
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid path for atomic write: {}", path.display()),
        )
    })?;
    Ok(path.with_file_name(format!("{}.tmp", file_name.to_string_lossy())))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    OpenOptions::new().read(true).open(path)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_through_temp_file_and_creates_parents() {
        let root = std::env::temp_dir().join(format!("tablewright-atomic-{}", uuid::Uuid::new_v4()));
        let path = root.join("remote").join("Person.schema.json");

        let bytes = write_bytes_atomic(&path, b"{}\n").expect("write");
        assert_eq!(bytes, 3);
        assert_eq!(std::fs::read(&path).expect("read"), b"{}\n");
        assert!(!root.join("remote").join("Person.schema.json.tmp").exists());

        write_bytes_atomic(&path, b"[]").expect("overwrite");
        assert_eq!(std::fs::read(&path).expect("read"), b"[]");

        let _ = std::fs::remove_dir_all(root);
    }
}
