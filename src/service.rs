//! Per-request generation orchestration.
//!
//! One call runs to completion before the next: resolve the output path,
//! invoke the provider, write the audio, confirm the file is on disk. The
//! absolute path is only reported after that confirmation; a failed write
//! never yields a success payload. No state survives between calls besides
//! the files themselves.

use std::fs;
use std::path::PathBuf;

use uuid::Uuid;

use crate::error::{Result, SfxError};
use crate::paths::{self, DiskProbe};
use crate::provider::SoundGenerator;
use crate::types::{GenerationRequest, GenerationResult};

/// Handles `generate_sfx` calls against a sound generator.
pub struct SfxService<G> {
    generator: G,
    default_root: PathBuf,
}

impl<G: SoundGenerator> SfxService<G> {
    /// Creates a service writing to `default_root` when a request carries no
    /// directory hint.
    pub fn new(generator: G, default_root: PathBuf) -> Self {
        Self {
            generator,
            default_root,
        }
    }

    /// Generates a sound effect and writes it to the resolved location.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let target = paths::resolve(
            request.output_directory.as_deref(),
            request.output_filename.as_deref(),
            &self.default_root,
            || Uuid::new_v4().to_string(),
            &DiskProbe,
        )?;

        let audio = self.generator.generate(
            &request.text,
            request.duration_seconds,
            request.prompt_influence,
        )?;

        fs::write(&target.full_path, &audio).map_err(|e| {
            SfxError::filesystem(format!(
                "Failed to write {}: {}",
                target.full_path.display(),
                e
            ))
        })?;

        // Confirm the file landed before reporting its path.
        let written = fs::metadata(&target.full_path).map_err(|e| {
            SfxError::filesystem(format!(
                "Generated file missing after write at {}: {}",
                target.full_path.display(),
                e
            ))
        })?;
        if written.len() != audio.len() as u64 {
            return Err(SfxError::filesystem(format!(
                "Short write at {}: expected {} bytes, found {}",
                target.full_path.display(),
                audio.len(),
                written.len()
            )));
        }

        eprintln!(
            "Generated sound effect ({} bytes) at {}",
            audio.len(),
            target.full_path.display()
        );

        Ok(GenerationResult {
            absolute_path: target.full_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Generator returning fixed bytes.
    struct StaticGenerator(Vec<u8>);

    impl SoundGenerator for StaticGenerator {
        fn generate(&self, _: &str, _: Option<f32>, _: Option<f32>) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    /// Generator failing with a fixed error.
    struct FailingGenerator(SfxError);

    impl SoundGenerator for FailingGenerator {
        fn generate(&self, _: &str, _: Option<f32>, _: Option<f32>) -> Result<Vec<u8>> {
            Err(self.0.clone())
        }
    }

    fn audio() -> Vec<u8> {
        b"ID3 mock mp3 payload".to_vec()
    }

    #[test]
    fn success_writes_file_and_returns_absolute_path() {
        let root = tempdir().unwrap();
        let service = SfxService::new(StaticGenerator(audio()), root.path().to_path_buf());

        let result = service
            .generate(&GenerationRequest::new("a cat meowing"))
            .unwrap();

        assert!(result.absolute_path.is_absolute());
        let name = result.absolute_path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("sfx_"));
        assert!(name.ends_with(".mp3"));
        // sfx_ + 36-char UUID + .mp3
        assert_eq!(name.len(), 44);
        assert_eq!(fs::read(&result.absolute_path).unwrap(), audio());
    }

    #[test]
    fn provider_failure_leaves_no_file() {
        let root = tempdir().unwrap();
        let service = SfxService::new(
            FailingGenerator(SfxError::Generation("provider exploded".into())),
            root.path().to_path_buf(),
        );

        let err = service
            .generate(&GenerationRequest::new("a cat meowing"))
            .unwrap_err();
        assert!(matches!(err, SfxError::Generation(_)));
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn write_failure_is_filesystem_error_not_success() {
        let root = tempdir().unwrap();
        let service = SfxService::new(StaticGenerator(audio()), root.path().to_path_buf());

        // A name longer than the filesystem allows makes the write itself fail.
        let mut request = GenerationRequest::new("a cat meowing");
        request.output_filename = Some(format!("{}.mp3", "a".repeat(300)));

        let err = service.generate(&request).unwrap_err();
        assert!(matches!(err, SfxError::Filesystem(_)));
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn repeated_filename_hint_gets_versioned() {
        let root = tempdir().unwrap();
        let service = SfxService::new(StaticGenerator(audio()), root.path().to_path_buf());

        let mut request = GenerationRequest::new("a door slam");
        request.output_filename = Some("slam.mp3".into());

        let first = service.generate(&request).unwrap();
        let second = service.generate(&request).unwrap();

        assert!(first.absolute_path.ends_with("slam.mp3"));
        assert!(second.absolute_path.ends_with("slam_v2.mp3"));
        assert!(second.absolute_path.exists());
    }
}
