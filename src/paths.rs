//! Output-path resolution for generated sound effects.
//!
//! Given optional directory/filename hints and a default root, computes a
//! unique absolute target path, creating directories as needed. A file that
//! already exists is never overwritten: the chosen name is versioned with a
//! `_v2`, `_v3`, ... suffix until an unused name is found.
//!
//! The existence check runs against an injected [`FileProbe`] so tests can
//! substitute an in-memory fake. The probe is a plain read at resolution
//! time, not a reservation: two concurrent resolutions of the same
//! user-supplied filename can race and pick the same version suffix. That
//! window is a known limitation; generated names carry a UUID and cannot
//! collide.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SfxError};
use crate::types::ResolvedTarget;

/// Extension applied when the chosen filename has none.
pub const DEFAULT_EXTENSION: &str = ".mp3";

/// Filename prefix for system-generated names.
pub const GENERATED_PREFIX: &str = "sfx_";

/// Filesystem existence query used by the versioning probe.
pub trait FileProbe {
    /// Returns true if a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskProbe;

impl FileProbe for DiskProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Resolves the output location for one generated sound effect.
///
/// Directory selection: an absolute `output_directory` is used as given, a
/// relative one is rooted under the daemon's working directory, and `None`
/// falls back to `default_root`. The directory is created along with any
/// missing parents; an already-existing directory is not an error.
///
/// Filename selection: a supplied `output_filename` is reduced to its
/// base-name component (path separators never escape the target directory),
/// then given a `.mp3` extension if it has none. Without a hint the name is
/// `sfx_<id>.mp3` using the injected id generator.
pub fn resolve(
    output_directory: Option<&str>,
    output_filename: Option<&str>,
    default_root: &Path,
    id_gen: impl FnOnce() -> String,
    probe: &dyn FileProbe,
) -> Result<ResolvedTarget> {
    let directory = select_directory(output_directory, default_root)?;

    fs::create_dir_all(&directory).map_err(|e| {
        SfxError::filesystem(format!(
            "Failed to create output directory {}: {}",
            directory.display(),
            e
        ))
    })?;

    let filename = match output_filename {
        Some(raw) => sanitized_filename(raw)?,
        None => format!("{}{}{}", GENERATED_PREFIX, id_gen(), DEFAULT_EXTENSION),
    };

    let filename = next_unused_name(&directory, filename, probe);
    let full_path = directory.join(&filename);

    Ok(ResolvedTarget {
        directory,
        filename,
        full_path,
    })
}

/// Picks the target directory and converts it to absolute form.
fn select_directory(hint: Option<&str>, default_root: &Path) -> Result<PathBuf> {
    let chosen = match hint {
        Some(dir) => {
            let path = Path::new(dir);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                current_dir()?.join(path)
            }
        }
        None => default_root.to_path_buf(),
    };

    if chosen.is_absolute() {
        Ok(chosen)
    } else {
        Ok(current_dir()?.join(chosen))
    }
}

fn current_dir() -> Result<PathBuf> {
    env::current_dir()
        .map_err(|e| SfxError::filesystem(format!("Cannot determine working directory: {}", e)))
}

/// Reduces a filename hint to its base name and ensures it has an extension.
///
/// Hints like `../evil.mp3` become `evil.mp3`; hints with no usable base
/// name at all (`..`, `.`, a bare separator) are rejected.
fn sanitized_filename(raw: &str) -> Result<String> {
    let base = Path::new(raw)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            SfxError::invalid_parameter(format!(
                "output_filename '{}' has no usable file name component.",
                raw
            ))
        })?;

    if base.contains('.') {
        Ok(base)
    } else {
        Ok(format!("{}{}", base, DEFAULT_EXTENSION))
    }
}

/// Probes `stem.ext`, `stem_v2.ext`, `stem_v3.ext`, ... until a name not
/// present in `directory` is found.
fn next_unused_name(directory: &Path, filename: String, probe: &dyn FileProbe) -> String {
    let (stem, ext) = split_stem_ext(&filename);
    let mut candidate = filename.clone();
    let mut counter = 1u32;

    while probe.exists(&directory.join(&candidate)) {
        counter += 1;
        candidate = format!("{}_v{}{}", stem, counter, ext);
    }

    candidate
}

/// Splits a filename into stem and extension, the extension keeping its dot.
///
/// A leading dot is not an extension separator, so `.hidden` is all stem.
fn split_stem_ext(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename.split_at(idx),
        _ => (filename, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::tempdir;

    /// In-memory probe standing in for the filesystem.
    struct SetProbe(HashSet<PathBuf>);

    impl SetProbe {
        fn of(dir: &Path, names: &[&str]) -> Self {
            Self(names.iter().map(|n| dir.join(n)).collect())
        }
    }

    impl FileProbe for SetProbe {
        fn exists(&self, path: &Path) -> bool {
            self.0.contains(path)
        }
    }

    fn fixed_id() -> String {
        "0a70e96c-9d8e-4c22-8e6b-0f6b19a5a111".to_string()
    }

    #[test]
    fn generated_name_uses_prefix_and_extension() {
        let root = tempdir().unwrap();
        let target = resolve(None, None, root.path(), fixed_id, &DiskProbe).unwrap();

        assert_eq!(target.directory, root.path());
        assert_eq!(
            target.filename,
            "sfx_0a70e96c-9d8e-4c22-8e6b-0f6b19a5a111.mp3"
        );
        assert_eq!(target.full_path, root.path().join(&target.filename));
        assert!(target.full_path.is_absolute());
    }

    #[test]
    fn missing_extension_defaults_to_mp3() {
        let root = tempdir().unwrap();
        let target = resolve(None, Some("meow"), root.path(), fixed_id, &DiskProbe).unwrap();
        assert_eq!(target.filename, "meow.mp3");
    }

    #[test]
    fn foreign_extension_is_honored() {
        let root = tempdir().unwrap();
        let target = resolve(None, Some("ping.wav"), root.path(), fixed_id, &DiskProbe).unwrap();
        assert_eq!(target.filename, "ping.wav");
    }

    #[test]
    fn existing_versions_are_skipped() {
        let root = tempdir().unwrap();
        let probe = SetProbe::of(root.path(), &["x.mp3", "x_v2.mp3"]);
        let target = resolve(None, Some("x.mp3"), root.path(), fixed_id, &probe).unwrap();
        assert_eq!(target.filename, "x_v3.mp3");
    }

    #[test]
    fn second_resolution_versions_after_write() {
        let root = tempdir().unwrap();
        let first = resolve(None, Some("boom.mp3"), root.path(), fixed_id, &DiskProbe).unwrap();
        assert_eq!(first.filename, "boom.mp3");

        fs::write(&first.full_path, b"audio").unwrap();

        let second = resolve(None, Some("boom.mp3"), root.path(), fixed_id, &DiskProbe).unwrap();
        assert_eq!(second.filename, "boom_v2.mp3");
    }

    #[test]
    fn relative_directory_is_rooted_under_cwd() {
        let rel = format!("target/sfx-daemon-test-{}", uuid::Uuid::new_v4());
        let target = resolve(
            Some(&rel),
            Some("clip.mp3"),
            Path::new("/unused"),
            fixed_id,
            &DiskProbe,
        )
        .unwrap();

        let expected_dir = env::current_dir().unwrap().join(&rel);
        assert_eq!(target.directory, expected_dir);
        assert!(target.full_path.is_absolute());
        assert_eq!(target.full_path, expected_dir.join("clip.mp3"));

        fs::remove_dir_all(expected_dir).unwrap();
    }

    #[test]
    fn absolute_directory_is_used_verbatim() {
        let root = tempdir().unwrap();
        let dir = root.path().join("nested").join("deeper");
        let target = resolve(
            Some(dir.to_str().unwrap()),
            None,
            Path::new("/unused"),
            fixed_id,
            &DiskProbe,
        )
        .unwrap();

        assert_eq!(target.directory, dir);
        assert!(dir.is_dir());
    }

    #[test]
    fn traversal_hint_is_reduced_to_base_name() {
        let root = tempdir().unwrap();
        let target = resolve(
            None,
            Some("../evil.mp3"),
            root.path(),
            fixed_id,
            &DiskProbe,
        )
        .unwrap();

        assert_eq!(target.filename, "evil.mp3");
        assert!(target.full_path.starts_with(root.path()));
    }

    #[test]
    fn filename_without_base_name_is_rejected() {
        let root = tempdir().unwrap();
        let err = resolve(None, Some(".."), root.path(), fixed_id, &DiskProbe).unwrap_err();
        assert!(matches!(err, SfxError::InvalidParameter(_)));
    }

    #[test]
    fn directory_creation_failure_is_filesystem_error() {
        let root = tempdir().unwrap();
        let blocker = root.path().join("occupied");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = resolve(
            Some(blocker.to_str().unwrap()),
            None,
            root.path(),
            fixed_id,
            &DiskProbe,
        )
        .unwrap_err();
        assert!(matches!(err, SfxError::Filesystem(_)));
    }

    #[test]
    fn split_stem_ext_edge_cases() {
        assert_eq!(split_stem_ext("a.mp3"), ("a", ".mp3"));
        assert_eq!(split_stem_ext("a.b.mp3"), ("a.b", ".mp3"));
        assert_eq!(split_stem_ext(".hidden"), (".hidden", ""));
        assert_eq!(split_stem_ext("plain"), ("plain", ""));
    }
}
