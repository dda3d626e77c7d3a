//! Image sequence source
//!
//! Treats a directory of still images as a video: one file per frame, ordered
//! by file name. A path to a single image is a one-frame sequence.

use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

use crate::source::FrameSource;
use crate::types::{RawFrame, SourceInfo};
use crate::{Result, StreamError};

/// File extensions recognised as frames
pub const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Source that decodes one image file per frame
pub struct ImageSequenceSource {
    /// Directory (or single file) the sequence was opened from
    path: PathBuf,

    /// Frame files in playback order
    frames: Vec<PathBuf>,

    /// Index of the next frame to read
    position: usize,

    /// Metadata captured at open
    info: SourceInfo,

    closed: bool,
}

impl ImageSequenceSource {
    /// Open a sequence
    ///
    /// Still images carry no timing, so the native rate is supplied by the caller.
    pub fn open<P: AsRef<Path>>(path: P, native_rate: f64) -> Result<Self> {
        let path = path.as_ref();

        if is_remote(path) {
            return Err(StreamError::source_open(
                path,
                "remote object storage is not read directly; fetch it to a local path first",
            ));
        }

        let metadata =
            std::fs::metadata(path).map_err(|e| StreamError::source_open(path, e.to_string()))?;

        let frames = if metadata.is_dir() {
            list_frames(path)?
        } else if has_frame_extension(path) {
            vec![path.to_path_buf()]
        } else {
            return Err(StreamError::source_open(
                path,
                format!("unsupported file type (expected one of {})", FRAME_EXTENSIONS.join(", ")),
            ));
        };

        let Some(first) = frames.first() else {
            return Err(StreamError::EmptySource { path: path.to_path_buf() });
        };

        let (width, height) = image::image_dimensions(first)
            .map_err(|e| StreamError::source_open(first, e.to_string()))?;

        let info = SourceInfo { width, height, native_rate, total_frames: frames.len() as u64 };

        info!(
            path = %path.display(),
            frames = frames.len(),
            width,
            height,
            native_rate,
            "Opened image sequence"
        );

        Ok(Self { path: path.to_path_buf(), frames, position: 0, info, closed: false })
    }

    /// Path the sequence was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Index of the next frame to be read
    pub fn position(&self) -> usize {
        self.position
    }
}

impl FrameSource for ImageSequenceSource {
    fn info(&self) -> SourceInfo {
        self.info
    }

    fn read(&mut self) -> Result<Option<RawFrame>> {
        if self.closed {
            return Ok(None);
        }

        let Some(file) = self.frames.get(self.position) else {
            trace!("Reached end of image sequence");
            return Ok(None);
        };

        let position = self.position as u64;
        // Advance before decoding so a corrupt file is skipped, not retried forever
        self.position += 1;

        let image = image::open(file).map_err(|e| StreamError::decode(position, e.to_string()))?;
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        Ok(Some(RawFrame::new(width, height, rgb.into_raw(), position)))
    }

    fn seek_to_start(&mut self) -> Result<()> {
        debug!(path = %self.path.display(), "Rewinding image sequence");
        self.position = 0;
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            debug!(path = %self.path.display(), "Closing image sequence");
            self.closed = true;
            self.frames.clear();
        }
    }
}

fn is_remote(path: &Path) -> bool {
    path.to_str().is_some_and(|s| s.contains("://"))
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FRAME_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}

fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| StreamError::file_error(dir, e))?;

    let mut frames: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_frame_extension(path))
        .collect();

    frames.sort();
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_frames(dir: &Path, count: u8) {
        for i in 0..count {
            let img = RgbImage::from_pixel(8, 6, Rgb([i, 255 - i, 0]));
            img.save(dir.join(format!("frame_{i:03}.png"))).unwrap();
        }
    }

    #[test]
    fn reads_frames_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 3);
        std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

        let mut source = ImageSequenceSource::open(dir.path(), 25.0).unwrap();
        let info = source.info();
        assert_eq!(info.total_frames, 3);
        assert_eq!((info.width, info.height), (8, 6));
        assert_eq!(info.native_rate, 25.0);

        for expected in 0..3u8 {
            let frame = source.read().unwrap().expect("frame");
            assert_eq!(frame.position, expected as u64);
            assert_eq!(frame.pixels.len(), frame.expected_len());
            assert_eq!(frame.pixels[0], expected);
        }
        assert!(source.read().unwrap().is_none());

        source.seek_to_start().unwrap();
        assert_eq!(source.read().unwrap().unwrap().position, 0);
    }

    #[test]
    fn empty_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageSequenceSource::open(dir.path(), 30.0).err().unwrap();
        assert!(matches!(err, StreamError::EmptySource { .. }));
    }

    #[test]
    fn missing_path_and_remote_refs_fail_to_open() {
        let err = ImageSequenceSource::open("/definitely/not/here", 30.0).err().unwrap();
        assert!(matches!(err, StreamError::SourceOpen { .. }));

        let err = ImageSequenceSource::open("gs://bucket/video", 30.0).err().unwrap();
        assert!(err.to_string().contains("gs://bucket/video"));
    }

    #[test]
    fn corrupt_frame_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 1);
        std::fs::write(dir.path().join("frame_001.png"), b"garbage").unwrap();
        write_frames_from(dir.path(), 2);

        let mut source = ImageSequenceSource::open(dir.path(), 30.0).unwrap();
        assert!(source.read().unwrap().is_some());
        assert!(matches!(source.read(), Err(StreamError::Decode { position: 1, .. })));
        assert_eq!(source.read().unwrap().unwrap().position, 2);
    }

    fn write_frames_from(dir: &Path, start: u8) {
        let img = RgbImage::from_pixel(8, 6, Rgb([start, 0, 0]));
        img.save(dir.join(format!("frame_{start:03}.png"))).unwrap();
    }

    #[test]
    fn closed_source_reports_end() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 2);

        let mut source = ImageSequenceSource::open(dir.path(), 30.0).unwrap();
        source.close();
        assert!(source.read().unwrap().is_none());
    }
}
