//! Output directory tree.
//!
//! Two collision policies apply. Platform folders directly under the output
//! root are never reused: if `Android` exists the run gets `Android (2)`,
//! then `Android (3)` and so on. Everything inside a run's folders is
//! overwritten freely.

use crate::catalog::{Platform, VariantSpec};
use crate::error::{AssetError, Result};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Create the output root if it does not exist yet.
pub fn ensure_root(root: &Path) -> Result<()> {
    fs::create_dir_all(root).map_err(|e| AssetError::filesystem(root, e))
}

/// Path of the unscaled copy written at the run root.
pub fn main_copy_path(root: &Path, name: &str) -> PathBuf {
    root.join(format!("{name}.png"))
}

/// Create a fresh platform folder below `root`, never reusing an existing one.
pub fn create_platform_dir(root: &Path, platform: Platform) -> Result<PathBuf> {
    let base = platform.folder_name();
    let mut attempt: u32 = 1;
    loop {
        let dir = if attempt == 1 {
            root.join(base)
        } else {
            root.join(format!("{base} ({attempt})"))
        };

        match fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(AssetError::filesystem(&dir, e)),
        }
    }
}

/// Location of a variant file inside its platform folder.
pub fn variant_path(platform_dir: &Path, spec: &VariantSpec, name: &str) -> PathBuf {
    let mut path = platform_dir.to_path_buf();
    if let Some(sub) = spec.subdirectory() {
        path.push(sub);
    }
    path.push(spec.file_name(name));
    path
}

/// Write `bytes` to `path`, creating parent folders and replacing any
/// existing file.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AssetError::filesystem(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| AssetError::filesystem(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_platform_dir_uses_conventional_name_first() {
        let temp = TempDir::new().unwrap();
        let dir = create_platform_dir(temp.path(), Platform::Ios).unwrap();
        assert_eq!(dir, temp.path().join("IOS"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_platform_dir_never_reuses_existing_folder() {
        let temp = TempDir::new().unwrap();
        let first = create_platform_dir(temp.path(), Platform::Android).unwrap();
        let second = create_platform_dir(temp.path(), Platform::Android).unwrap();
        let third = create_platform_dir(temp.path(), Platform::Android).unwrap();

        assert_eq!(first, temp.path().join("Android"));
        assert_eq!(second, temp.path().join("Android (2)"));
        assert_eq!(third, temp.path().join("Android (3)"));
    }

    #[test]
    fn test_variant_paths() {
        let dir = Path::new("out/Android (2)");
        let xhdpi = Platform::Android.variant("XHDPI").unwrap();
        assert_eq!(
            variant_path(dir, xhdpi, "logo"),
            PathBuf::from("out/Android (2)/xhdpi/logo.png")
        );

        let at3 = Platform::Ios.variant("@3x").unwrap();
        assert_eq!(
            variant_path(Path::new("out/IOS"), at3, "logo"),
            PathBuf::from("out/IOS/logo@3.png")
        );
    }

    #[test]
    fn test_write_file_creates_parents_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Android").join("mdpi").join("logo.png");

        write_file(&path, b"first").unwrap();
        write_file(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_write_file_reports_path_on_failure() {
        let temp = TempDir::new().unwrap();
        // a regular file where a folder is expected
        let blocker = temp.path().join("Windows");
        fs::write(&blocker, b"").unwrap();

        let err = write_file(&blocker.join("logo.scale-100.png"), b"x").unwrap_err();
        assert!(matches!(err, AssetError::Filesystem { .. }), "{err}");
    }

    #[test]
    fn test_ensure_root_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("assets").join("nested");
        ensure_root(&root).unwrap();
        ensure_root(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(main_copy_path(&root, "logo"), root.join("logo.png"));
    }
}
