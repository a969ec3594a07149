use crate::angle::{angle, Point2D};

/// BlazePose landmark indices read by the squat tracker.
pub const LEFT_SHOULDER: usize = 11;
pub const LEFT_HIP: usize = 23;
pub const LEFT_KNEE: usize = 25;

pub const POSE_LANDMARK_COUNT: usize = 33;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

impl Landmark {
    fn point(&self) -> Point2D {
        Point2D::new(self.x as f64, self.y as f64)
    }
}

/// The three points that form the hip-flexion angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HipPoints {
    pub shoulder: Point2D,
    pub hip: Point2D,
    pub knee: Point2D,
}

impl HipPoints {
    /// `None` if any point is absent, non-finite or below `min_visibility`.
    pub fn from_landmarks(landmarks: &[Landmark], min_visibility: f32) -> Option<Self> {
        let pick = |index: usize| {
            let lm = landmarks.get(index)?;
            let usable = lm.visibility >= min_visibility && lm.x.is_finite() && lm.y.is_finite();
            usable.then(|| lm.point())
        };

        Some(Self {
            shoulder: pick(LEFT_SHOULDER)?,
            hip: pick(LEFT_HIP)?,
            knee: pick(LEFT_KNEE)?,
        })
    }

    pub fn angle(&self) -> f64 {
        angle(self.shoulder, self.hip, self.knee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(shoulder: (f32, f32), hip: (f32, f32), knee: (f32, f32)) -> Vec<Landmark> {
        let mut landmarks = vec![
            Landmark {
                x: 0.5,
                y: 0.5,
                z: 0.0,
                visibility: 0.9,
            };
            POSE_LANDMARK_COUNT
        ];
        for (index, (x, y)) in [(LEFT_SHOULDER, shoulder), (LEFT_HIP, hip), (LEFT_KNEE, knee)] {
            landmarks[index].x = x;
            landmarks[index].y = y;
        }
        landmarks
    }

    #[test]
    fn test_standing_pose_is_near_straight() {
        let landmarks = pose((0.5, 0.25), (0.5, 0.5), (0.5, 0.75));
        let points = HipPoints::from_landmarks(&landmarks, 0.5).unwrap();
        assert!((points.angle() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_deep_squat_is_acute() {
        // Torso folded forward over the thighs
        let landmarks = pose((0.6, 0.45), (0.4, 0.5), (0.65, 0.5));
        let a = HipPoints::from_landmarks(&landmarks, 0.5).unwrap().angle();
        assert!(a < 30.0, "angle {a}");
    }

    #[test]
    fn test_low_visibility_is_missing() {
        let mut landmarks = pose((0.5, 0.25), (0.5, 0.5), (0.5, 0.75));
        landmarks[LEFT_KNEE].visibility = 0.2;
        assert_eq!(HipPoints::from_landmarks(&landmarks, 0.5), None);
        assert!(HipPoints::from_landmarks(&landmarks, 0.1).is_some());
    }

    #[test]
    fn test_truncated_landmarks_are_missing() {
        let landmarks = pose((0.5, 0.25), (0.5, 0.5), (0.5, 0.75));
        assert_eq!(HipPoints::from_landmarks(&landmarks[..24], 0.0), None);
        assert_eq!(HipPoints::from_landmarks(&[], 0.0), None);
    }
}
