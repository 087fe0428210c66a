use featmatch_core::{CoreConfig, Image, Keypoint};
use rayon::prelude::*;

use crate::error::{FastError, FastResult};
use crate::types::ScoredKeypoint;

/// Offsets of the 16-pixel Bresenham circle used by the segment test
const CIRCLE: [(i32, i32); 16] = [
    (-3, 0), (-3, 1), (-2, 2), (-1, 3),
    (0, 3), (1, 3), (2, 2), (3, 1),
    (3, 0), (3, -1), (2, -2), (1, -3),
    (0, -3), (-1, -3), (-2, -2), (-3, -1),
];

pub struct FastDetector {
    cfg: CoreConfig,
    w: usize,
    h: usize,
    nms_radius: f32,
}

impl FastDetector {
    /// Creates a new FAST detector, validating configuration up front
    pub fn new(cfg: CoreConfig, width: usize, height: usize) -> FastResult<Self> {
        if width == 0 || height == 0 {
            return Err(FastError::ZeroDimension { width, height });
        }

        // The segment test needs a 3-pixel border on every side
        const MIN_SIZE: usize = 7;
        if width < MIN_SIZE || height < MIN_SIZE {
            return Err(FastError::ImageTooSmall {
                width,
                height,
                min_size: MIN_SIZE,
            });
        }

        // 0 would accept every pixel, >127 breaks the u8 comparisons
        if cfg.threshold == 0 || cfg.threshold > 127 {
            return Err(FastError::ThresholdOutOfRange(cfg.threshold));
        }

        let min_dim = std::cmp::min(width, height);
        if cfg.patch_size % 2 == 0 || cfg.patch_size >= min_dim {
            return Err(FastError::BadPatchSize {
                patch_size: cfg.patch_size,
                min_dim,
            });
        }

        Ok(Self {
            cfg,
            w: width,
            h: height,
            nms_radius: 3.0,
        })
    }

    /// Override the non-maximum suppression radius (default 3 px)
    pub fn with_nms_radius(mut self, radius: f32) -> Self {
        self.nms_radius = radius;
        self
    }

    fn validate_image(&self, img: &Image) -> FastResult<()> {
        let expected = self.w * self.h;
        if img.len() != expected {
            return Err(FastError::LengthMismatch {
                expected,
                actual: img.len(),
            });
        }
        Ok(())
    }

    /// Detect keypoints: segment test, then NMS, orientation per survivor
    pub fn detect_keypoints(&self, img: &Image) -> FastResult<Vec<Keypoint>> {
        let scored = self.detect_keypoints_with_response(img)?;
        let suppressed = self.non_maximum_suppression(&scored, self.nms_radius);
        Ok(suppressed.into_iter().map(|sk| sk.keypoint).collect())
    }

    /// Detect keypoints with corner response scores, no suppression applied
    pub fn detect_keypoints_with_response(&self, img: &Image) -> FastResult<Vec<ScoredKeypoint>> {
        self.validate_image(img)?;

        let rows = 3..self.h.saturating_sub(3);
        let keypoints = rows
            .into_par_iter()
            .flat_map_iter(|y| {
                let mut v = Vec::new();
                for x in 3..self.w - 3 {
                    let p = img[y * self.w + x];
                    let mut bri = 0;
                    let mut drk = 0;
                    let mut bri_sum = 0i32;
                    let mut drk_sum = 0i32;

                    for &(dx, dy) in &CIRCLE {
                        let xx = (x as i32 + dx) as usize;
                        let yy = (y as i32 + dy) as usize;
                        let q = img[yy * self.w + xx];

                        if q >= p.saturating_add(self.cfg.threshold) {
                            bri += 1;
                            bri_sum += (q as i32) - (p as i32);
                        } else if q.saturating_add(self.cfg.threshold) <= p {
                            drk += 1;
                            drk_sum += (p as i32) - (q as i32);
                        }
                    }

                    if bri >= 12 || drk >= 12 {
                        let angle = self.compute_orientation(img, x, y);
                        // Response = mean intensity excess of the winning arc
                        let response = if bri >= 12 {
                            bri_sum as f32 / bri as f32
                        } else {
                            drk_sum as f32 / drk as f32
                        };

                        v.push(ScoredKeypoint {
                            keypoint: Keypoint {
                                x: x as f32,
                                y: y as f32,
                                angle,
                                response: response.abs(),
                                scale: 1.0,
                            },
                            response: response.abs(),
                        });
                    }
                }
                v
            })
            .collect();

        Ok(keypoints)
    }

    /// Greedy non-maximum suppression, strongest response wins
    pub fn non_maximum_suppression(
        &self,
        keypoints: &[ScoredKeypoint],
        min_distance: f32,
    ) -> Vec<ScoredKeypoint> {
        if keypoints.is_empty() {
            return Vec::new();
        }

        let mut sorted = keypoints.to_vec();
        sorted.sort_by(|a, b| {
            b.response
                .partial_cmp(&a.response)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut suppressed: Vec<ScoredKeypoint> = Vec::new();
        let min_distance_sq = min_distance * min_distance;

        for candidate in sorted {
            let mut is_local_maximum = true;

            for accepted in &suppressed {
                let dx = candidate.keypoint.x - accepted.keypoint.x;
                let dy = candidate.keypoint.y - accepted.keypoint.y;
                if dx * dx + dy * dy < min_distance_sq {
                    is_local_maximum = false;
                    break;
                }
            }

            if is_local_maximum {
                suppressed.push(candidate);
            }
        }

        suppressed
    }

    /// Intensity-centroid orientation over the configured patch
    fn compute_orientation(&self, img: &Image, x: usize, y: usize) -> f32 {
        let half = (self.cfg.patch_size / 2) as i32;
        let (cx, cy) = (x as i32, y as i32);

        // Patches that reach outside the image get the default orientation
        if cx - half < 0 || cy - half < 0 || cx + half >= self.w as i32 || cy + half >= self.h as i32
        {
            return 0.0;
        }

        let mut m10 = 0i64;
        let mut m01 = 0i64;

        for dy in -half..=half {
            let yy = (cy + dy) as usize;
            for dx in -half..=half {
                let xx = (cx + dx) as usize;
                let val = img[yy * self.w + xx] as i64;
                m10 += dx as i64 * val;
                m01 += dy as i64 * val;
            }
        }

        (m01 as f32).atan2(m10 as f32)
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CoreConfig {
        CoreConfig {
            threshold: 20,
            patch_size: 15,
            n_threads: 1,
        }
    }

    fn small_test_config() -> CoreConfig {
        CoreConfig {
            threshold: 20,
            patch_size: 5,
            n_threads: 1,
        }
    }

    fn uniform_image(width: usize, height: usize) -> Image {
        vec![128; width * height]
    }

    fn corner_image(width: usize, height: usize) -> Image {
        let mut img = vec![50; width * height];
        let cx = width / 2;
        let cy = height / 2;

        // Bright square against a dark background triggers the segment test
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let x = (cx as i32 + dx) as usize;
                let y = (cy as i32 + dy) as usize;
                if x < width && y < height {
                    img[y * width + x] = 255;
                }
            }
        }
        img
    }

    fn multi_corner_image(width: usize, height: usize) -> Image {
        let mut img = vec![50; width * height];
        let corners = [
            (width / 4, height / 4),
            (3 * width / 4, height / 4),
            (width / 2, height / 2),
        ];
        for &(cx, cy) in &corners {
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    let x = (cx as i32 + dx) as usize;
                    let y = (cy as i32 + dy) as usize;
                    if x < width && y < height {
                        img[y * width + x] = 255;
                    }
                }
            }
        }
        img
    }

    #[test]
    fn valid_constructor() {
        assert!(FastDetector::new(test_config(), 100, 100).is_ok());
    }

    #[test]
    fn invalid_dimensions() {
        let result = FastDetector::new(test_config(), 0, 100);
        assert!(matches!(result, Err(FastError::ZeroDimension { .. })));

        let result = FastDetector::new(test_config(), 100, 0);
        assert!(matches!(result, Err(FastError::ZeroDimension { .. })));
    }

    #[test]
    fn too_small_image() {
        let result = FastDetector::new(test_config(), 6, 6);
        assert!(matches!(result, Err(FastError::ImageTooSmall { .. })));
    }

    #[test]
    fn invalid_threshold() {
        let mut cfg = test_config();

        cfg.threshold = 0;
        let result = FastDetector::new(cfg.clone(), 100, 100);
        assert!(matches!(result, Err(FastError::ThresholdOutOfRange(0))));

        cfg.threshold = 200;
        let result = FastDetector::new(cfg, 100, 100);
        assert!(matches!(result, Err(FastError::ThresholdOutOfRange(200))));
    }

    #[test]
    fn invalid_patch_size() {
        let mut cfg = test_config();

        cfg.patch_size = 16;
        let result = FastDetector::new(cfg.clone(), 100, 100);
        assert!(matches!(result, Err(FastError::BadPatchSize { .. })));

        cfg.patch_size = 101;
        let result = FastDetector::new(cfg, 100, 100);
        assert!(matches!(result, Err(FastError::BadPatchSize { .. })));
    }

    #[test]
    fn invalid_image_data() {
        let detector = FastDetector::new(small_test_config(), 10, 10).unwrap();
        let img = vec![0; 50]; // should be 100
        let result = detector.detect_keypoints(&img);
        assert!(matches!(result, Err(FastError::LengthMismatch { .. })));
    }

    #[test]
    fn uniform_image_has_no_corners() {
        let detector = FastDetector::new(small_test_config(), 10, 10).unwrap();
        let keypoints = detector.detect_keypoints(&uniform_image(10, 10)).unwrap();
        assert_eq!(keypoints.len(), 0);
    }

    #[test]
    fn detects_bright_corner() {
        let detector = FastDetector::new(small_test_config(), 20, 20).unwrap();
        let keypoints = detector.detect_keypoints(&corner_image(20, 20)).unwrap();
        assert!(!keypoints.is_empty());
    }

    #[test]
    fn nms_enforces_min_distance() {
        let detector = FastDetector::new(test_config(), 50, 50).unwrap();
        let img = multi_corner_image(50, 50);

        let scored = detector.detect_keypoints_with_response(&img).unwrap();
        let suppressed = detector.non_maximum_suppression(&scored, 5.0);

        assert!(suppressed.len() <= scored.len());
        for i in 0..suppressed.len() {
            for j in (i + 1)..suppressed.len() {
                let dx = suppressed[i].keypoint.x - suppressed[j].keypoint.x;
                let dy = suppressed[i].keypoint.y - suppressed[j].keypoint.y;
                let distance = (dx * dx + dy * dy).sqrt();
                assert!(distance >= 5.0, "keypoints too close after NMS: {}", distance);
            }
        }
    }

    #[test]
    fn responses_are_positive_and_finite() {
        let detector = FastDetector::new(small_test_config(), 20, 20).unwrap();
        let scored = detector
            .detect_keypoints_with_response(&corner_image(20, 20))
            .unwrap();
        for sk in &scored {
            assert!(sk.response > 0.0);
            assert!(sk.response.is_finite());
        }
    }

    #[test]
    fn orientation_is_finite() {
        let detector = FastDetector::new(small_test_config(), 20, 20).unwrap();
        let keypoints = detector.detect_keypoints(&corner_image(20, 20)).unwrap();
        for kp in &keypoints {
            assert!(kp.angle.is_finite());
        }
    }

    #[test]
    fn boundary_minimum_size() {
        let detector = FastDetector::new(small_test_config(), 7, 7).unwrap();
        let result = detector.detect_keypoints(&uniform_image(7, 7));
        assert!(result.is_ok());
    }

    #[test]
    fn configuration_access() {
        let cfg = test_config();
        let detector = FastDetector::new(cfg.clone(), 20, 20).unwrap();
        assert_eq!(detector.config().threshold, cfg.threshold);
        assert_eq!(detector.config().patch_size, cfg.patch_size);
        assert_eq!(detector.dimensions(), (20, 20));
    }

    #[test]
    fn detection_is_repeatable() {
        let detector = FastDetector::new(test_config(), 100, 100).unwrap();
        let img = corner_image(100, 100);

        let first = detector.detect_keypoints(&img).unwrap();
        for _ in 0..5 {
            let again = detector.detect_keypoints(&img).unwrap();
            assert_eq!(again.len(), first.len());
        }
    }
}
