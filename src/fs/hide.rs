//! OS-native file hiding

use crate::error::{IoResultExt, KaramelError, Result};
use std::path::{Path, PathBuf};

/// Split a path into its parent directory and file name
pub fn split_path(path: &Path) -> (PathBuf, Option<String>) {
    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    (parent, name)
}

/// Hide a file and return the path it is now reachable at.
///
/// On Unix the file is renamed to a dot-prefixed sibling; names that already
/// start with a dot are left alone. On Windows the hidden attribute is set
/// and the path is unchanged.
pub fn hide_file(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(KaramelError::NotFound(path.to_path_buf()));
    }
    let hidden = hide_impl(path)?;
    tracing::info!("Hid {} as {}", path.display(), hidden.display());
    Ok(hidden)
}

#[cfg(not(windows))]
fn hide_impl(path: &Path) -> Result<PathBuf> {
    let (parent, name) = split_path(path);
    let name = name.ok_or_else(|| {
        KaramelError::invalid_argument(format!("'{}' has no file name", path.display()))
    })?;

    if name.starts_with('.') {
        return Ok(path.to_path_buf());
    }

    let hidden = parent.join(format!(".{name}"));
    if hidden.exists() {
        return Err(KaramelError::invalid_argument(format!(
            "'{}' already exists",
            hidden.display()
        )));
    }
    std::fs::rename(path, &hidden).with_path(path)?;
    Ok(hidden)
}

#[cfg(windows)]
fn hide_impl(path: &Path) -> Result<PathBuf> {
    let status = std::process::Command::new("attrib")
        .arg("+H")
        .arg(path)
        .status()
        .with_path(path)?;

    if !status.success() {
        return Err(KaramelError::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("attrib exited with {status}"),
            ),
        ));
    }
    Ok(path.to_path_buf())
}
