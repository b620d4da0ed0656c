use image::DynamicImage;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// PNG dumps of captured frames, written to a directory that is emptied when
/// the run starts.
#[derive(Clone, Debug, Default)]
pub struct DebugArtifacts {
    directory: Option<PathBuf>,
}

impl DebugArtifacts {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn new(directory: impl Into<PathBuf>) -> io::Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        let mut removed = 0;
        for entry in fs::read_dir(&directory)? {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        log::debug!("Cleared {} files from {}", removed, directory.display());
        Ok(Self {
            directory: Some(directory),
        })
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.directory.is_some()
    }

    /// `{stage}_{game}_{YYYYmmdd_HHMMSS}.png`; a second save within the same
    /// second overwrites the first.
    pub fn file_name(stage: &str, game: u32) -> String {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        format!("{stage}_{game}_{timestamp}.png")
    }

    pub fn save(
        &self,
        stage: &str,
        game: u32,
        image: impl Into<DynamicImage>,
    ) -> image::ImageResult<Option<PathBuf>> {
        let Some(directory) = &self.directory else {
            return Ok(None);
        };
        let path = directory.join(Self::file_name(stage, game));
        image.into().save(&path)?;
        log::debug!("Saved {}", path.display());
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sweeper-debug-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn startup_clears_previous_files() {
        let dir = scratch_dir("clear");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.png"), b"old").unwrap();

        let artifacts = DebugArtifacts::new(&dir).unwrap();

        assert!(artifacts.is_enabled());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn saves_png_with_stage_and_game() {
        let dir = scratch_dir("save");
        let artifacts = DebugArtifacts::new(&dir).unwrap();

        let path = artifacts
            .save("start", 3, RgbImage::new(4, 4))
            .unwrap()
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("start_3_"));
        assert!(name.ends_with(".png"));
        // start_3_ + YYYYmmdd_HHMMSS + .png
        assert_eq!(name.len(), "start_3_".len() + 15 + 4);
        assert!(path.exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn saves_grayscale_masks() {
        let dir = scratch_dir("mask");
        let artifacts = DebugArtifacts::new(&dir).unwrap();

        let path = artifacts
            .save("end_threshold", 2, GrayImage::new(3, 3))
            .unwrap()
            .unwrap();

        assert_eq!(image::open(&path).unwrap().color(), image::ColorType::L8);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn disabled_saves_nothing() {
        let artifacts = DebugArtifacts::disabled();
        assert_eq!(artifacts.save("end", 1, RgbImage::new(1, 1)).unwrap(), None);
    }
}
