use std::path::{Path, PathBuf};

/// First `<base>_<n>.<ext>` in `dir`, counting from 1, that does not exist yet.
pub fn next_output_path(dir: &Path, base: &str, ext: &str) -> PathBuf {
    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{base}_{n}.{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(feature = "vision")]
pub use video::{AnnotatedOutput, VideoFile};

#[cfg(feature = "vision")]
mod video {
    use anyhow::{bail, Context, Result};
    use opencv::{
        core::{Mat, Size},
        highgui,
        prelude::*,
        videoio::{self, VideoCapture, VideoWriter},
    };
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tracing::{info, warn};

    use crate::overlay::{draw_banner, Banner};
    use crate::pipeline::{Control, FrameSink, FrameSource, TimedFrame};

    const WINDOW_NAME: &str = "Live Feed";

    pub struct VideoFile {
        capture: VideoCapture,
        fps: f64,
        size: Size,
        index: u64,
    }

    impl VideoFile {
        pub fn open(path: &Path) -> Result<Self> {
            let name = path
                .to_str()
                .with_context(|| format!("non UTF-8 video path {}", path.display()))?;
            let capture = VideoCapture::from_file(name, videoio::CAP_ANY)?;

            if !capture.is_opened()? {
                bail!("Failed to open video {}", path.display());
            }

            let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
            let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;
            let fps = capture.get(videoio::CAP_PROP_FPS)?;
            info!(width, height, fps, "opened {}", path.display());

            Ok(Self {
                capture,
                fps,
                size: Size::new(width, height),
                index: 0,
            })
        }

        pub fn size(&self) -> Size {
            self.size
        }

        fn position(&self) -> Result<Duration> {
            let msec = self.capture.get(videoio::CAP_PROP_POS_MSEC)?;
            let secs = if msec.is_finite() && msec > 0.0 {
                msec / 1000.0
            } else if self.fps > 0.0 {
                self.index as f64 / self.fps
            } else {
                0.0
            };
            Ok(Duration::from_secs_f64(secs))
        }
    }

    impl FrameSource for VideoFile {
        type Frame = Mat;

        fn next_frame(&mut self) -> Result<Option<TimedFrame<Mat>>> {
            let mut frame = Mat::default();
            if !self.capture.read(&mut frame)? || frame.empty() {
                return Ok(None);
            }

            let timed = TimedFrame {
                frame,
                index: self.index,
                position: self.position()?,
            };
            self.index += 1;
            Ok(Some(timed))
        }
    }

    impl Drop for VideoFile {
        fn drop(&mut self) {
            if let Err(err) = self.capture.release() {
                warn!("Failed to release video: {}", err);
            }
        }
    }

    /// Annotated copy of the input plus the optional live window.
    pub struct AnnotatedOutput {
        writer: VideoWriter,
        path: PathBuf,
        show_window: bool,
        quit_key: char,
    }

    impl AnnotatedOutput {
        pub fn create(
            path: PathBuf,
            fps: f64,
            size: Size,
            show_window: bool,
            quit_key: char,
        ) -> Result<Self> {
            let name = path
                .to_str()
                .with_context(|| format!("non UTF-8 output path {}", path.display()))?;
            let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
            let writer = VideoWriter::new(name, fourcc, fps, size, true)?;

            if !writer.is_opened()? {
                bail!("Failed to open output video {}", path.display());
            }

            let mut show_window = show_window;
            if show_window {
                if let Err(err) = highgui::named_window(WINDOW_NAME, highgui::WINDOW_AUTOSIZE) {
                    warn!("Failed to open display window: {}. Running headless.", err);
                    show_window = false;
                }
            }

            info!("Writing annotated video to {}", path.display());
            Ok(Self {
                writer,
                path,
                show_window,
                quit_key,
            })
        }
    }

    impl FrameSink<Mat> for AnnotatedOutput {
        fn present(&mut self, mut frame: Mat, banner: &Banner) -> Result<Control> {
            draw_banner(&mut frame, banner)?;
            self.writer.write(&frame)?;

            if self.show_window {
                highgui::imshow(WINDOW_NAME, &frame)?;
                let key = highgui::wait_key(1)?;
                if key >= 0 && char::from((key & 0xFF) as u8) == self.quit_key {
                    return Ok(Control::Stop);
                }
            }
            Ok(Control::Continue)
        }
    }

    impl Drop for AnnotatedOutput {
        fn drop(&mut self) {
            if let Err(err) = self.writer.release() {
                warn!("Failed to finish {}: {}", self.path.display(), err);
            }
            if self.show_window {
                if let Err(err) = highgui::destroy_all_windows() {
                    warn!("Failed to close display window: {}", err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_first_output_is_one() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            next_output_path(dir.path(), "squat_analyzed", "mp4"),
            dir.path().join("squat_analyzed_1.mp4")
        );
    }

    #[test]
    fn test_skips_existing_outputs() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("squat_analyzed_1.mp4")).unwrap();
        File::create(dir.path().join("squat_analyzed_2.mp4")).unwrap();
        File::create(dir.path().join("squat_analyzed_4.mp4")).unwrap();

        assert_eq!(
            next_output_path(dir.path(), "squat_analyzed", "mp4"),
            dir.path().join("squat_analyzed_3.mp4")
        );
    }
}
