use crate::landmarks::{Landmark, POSE_LANDMARK_COUNT};

/// Values per landmark in the BlazePose landmark tensor: x, y, z, visibility, presence.
pub const LANDMARK_STRIDE: usize = 5;

/// Decode the raw landmark tensor into normalized landmarks.
///
/// `x`/`y` come in model-input pixels and visibility as a logit. Auxiliary
/// landmarks past the 33 body points are dropped.
pub fn decode_landmarks(values: &[f32], input_width: usize, input_height: usize) -> Vec<Landmark> {
    values
        .chunks_exact(LANDMARK_STRIDE)
        .take(POSE_LANDMARK_COUNT)
        .map(|v| Landmark {
            x: v[0] / input_width as f32,
            y: v[1] / input_height as f32,
            z: v[2] / input_width as f32,
            visibility: sigmoid(v[3]),
        })
        .collect()
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(feature = "vision")]
pub use detector::PoseDetector;

#[cfg(feature = "vision")]
mod detector {
    use anyhow::{anyhow, Result};
    use opencv::{
        core::{self, Mat, Size, Vec3f},
        imgproc,
        prelude::*,
    };
    use ort::session::{builder::GraphOptimizationLevel, Session};
    use ort::value::Tensor;
    use tracing::{debug, info};

    use super::decode_landmarks;
    use crate::landmarks::Landmark;
    use crate::pipeline::PoseEstimator;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Layout {
        Nhwc,
        Nchw,
    }

    /// BlazePose landmark model run on the whole frame.
    ///
    /// There is no person-detection crop: the frame is resized straight to
    /// the model input, so the lifter should roughly fill the frame.
    pub struct PoseDetector {
        session: Session,
        input_width: usize,
        input_height: usize,
        layout: Layout,
        min_confidence: f32,
    }

    impl PoseDetector {
        pub fn new(model_path: &str, min_confidence: f32) -> Result<Self> {
            let session = Session::builder()?
                .with_optimization_level(GraphOptimizationLevel::Level3)?
                .commit_from_file(model_path)?;

            let (input_width, input_height, layout) = Self::get_input_dimensions(&session)?;
            info!(
                input_width,
                input_height,
                ?layout,
                "loaded pose model {}",
                model_path
            );

            Ok(Self {
                session,
                input_width,
                input_height,
                layout,
                min_confidence,
            })
        }

        fn get_input_dimensions(session: &Session) -> Result<(usize, usize, Layout)> {
            let input = session
                .inputs
                .first()
                .ok_or_else(|| anyhow!("No model inputs found"))?;

            match input.input_type.tensor_dimensions() {
                Some(dims) if dims.len() == 4 && dims[1] == 3 => {
                    Ok((dims[3] as usize, dims[2] as usize, Layout::Nchw))
                }
                Some(dims) if dims.len() == 4 && dims[1] > 0 && dims[2] > 0 => {
                    Ok((dims[2] as usize, dims[1] as usize, Layout::Nhwc))
                }
                _ => Ok((256, 256, Layout::Nhwc)),
            }
        }

        pub fn detect(&self, frame: &Mat) -> Result<Option<Vec<Landmark>>> {
            let input_tensor = self.preprocess(frame)?;
            let outputs = self.session.run(ort::inputs![input_tensor]?)?;

            if outputs.len() > 1 {
                let (_, score) = outputs[1].try_extract_raw_tensor::<f32>()?;
                let score = score.first().copied().unwrap_or(0.0);
                if score < self.min_confidence {
                    debug!(score, "no person detected");
                    return Ok(None);
                }
            }

            let (_, values) = outputs[0].try_extract_raw_tensor::<f32>()?;
            let landmarks = decode_landmarks(values, self.input_width, self.input_height);
            Ok((!landmarks.is_empty()).then_some(landmarks))
        }

        fn preprocess(&self, frame: &Mat) -> Result<Tensor<f32>> {
            let mut rgb = Mat::default();
            imgproc::cvt_color_def(frame, &mut rgb, imgproc::COLOR_BGR2RGB)?;

            let mut resized = Mat::default();
            imgproc::resize(
                &rgb,
                &mut resized,
                Size::new(self.input_width as i32, self.input_height as i32),
                0.0,
                0.0,
                imgproc::INTER_LINEAR,
            )?;

            let mut float_img = Mat::default();
            resized.convert_to(&mut float_img, core::CV_32FC3, 1.0 / 255.0, 0.0)?;

            let (h, w) = (self.input_height, self.input_width);
            let pixels = float_img.data_typed::<Vec3f>()?;

            let data: Vec<f32> = match self.layout {
                Layout::Nhwc => pixels.iter().flat_map(|p| [p[0], p[1], p[2]]).collect(),
                Layout::Nchw => (0..3)
                    .flat_map(|c| pixels.iter().map(move |p| p[c]))
                    .collect(),
            };
            let shape = match self.layout {
                Layout::Nhwc => [1, h, w, 3],
                Layout::Nchw => [1, 3, h, w],
            };

            Ok(Tensor::from_array((shape, data))?)
        }
    }

    impl PoseEstimator<Mat> for PoseDetector {
        fn estimate(&mut self, frame: &Mat) -> Result<Option<Vec<Landmark>>> {
            self.detect(frame)
        }
    }
}
