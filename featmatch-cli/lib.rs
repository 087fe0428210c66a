use featmatch_brief::BriefExtractor;
use featmatch_core::{CoreConfig, Descriptor, Image, Keypoint, Match};
use featmatch_fast::{FastDetector, FastError, ImagePyramid};
use featmatch_nn::{good_matches, HammingMatcher, MatchStats};

mod draw;

pub use draw::render_matches;
pub use featmatch_core::{
    self, Descriptor as FeatureDescriptor, Keypoint as FeatureKeypoint, Match as FeatureMatch,
};

#[derive(Debug)]
pub enum PipelineError {
    Fast(FastError),
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Fast(e) => write!(f, "detection error: {}", e),
            PipelineError::ThreadPool(e) => write!(f, "thread pool error: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<FastError> for PipelineError {
    fn from(err: FastError) -> Self {
        PipelineError::Fast(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for PipelineError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        PipelineError::ThreadPool(err)
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Keypoints and descriptors extracted from one image
#[derive(Debug, Clone)]
pub struct ImageFeatures {
    pub keypoints: Vec<Keypoint>,
    pub descriptors: Vec<Descriptor>,
}

/// Matching outcome for one anchor/other image pair
#[derive(Debug, Clone)]
pub struct PairReport {
    pub matches: Vec<Match>,
    pub good: Vec<Match>,
    pub stats: MatchStats,
}

/// Detection + description pipeline shared by all images of a run.
///
/// Per-image state (detector, extractor) is sized on demand so images of
/// different dimensions can flow through the same pipeline.
pub struct Pipeline {
    cfg: CoreConfig,
    nms_radius: f32,
    use_pyramid: bool,
}

impl Pipeline {
    pub fn new(cfg: CoreConfig) -> Self {
        Self {
            cfg,
            nms_radius: 3.0,
            use_pyramid: true,
        }
    }

    pub fn with_nms_radius(mut self, radius: f32) -> Self {
        self.nms_radius = radius;
        self
    }

    pub fn with_pyramid(mut self, enable: bool) -> Self {
        self.use_pyramid = enable;
        self
    }

    /// Detect keypoints and compute descriptors for one grayscale image.
    ///
    /// With the pyramid enabled, every scale level is processed and the
    /// keypoint coordinates are mapped back into base-image space.
    pub fn extract(&self, img: &Image, width: usize, height: usize) -> PipelineResult<ImageFeatures> {
        let levels = if self.use_pyramid {
            ImagePyramid::generate_scale_levels(width, height)
        } else {
            Vec::new()
        };

        if levels.len() <= 1 {
            // Base image only: either the pyramid is disabled or the image
            // is too small for more than one level.
            let (kps, descriptors) = self.extract_single(img, width, height, 1.0)?;
            return Ok(ImageFeatures {
                keypoints: kps,
                descriptors,
            });
        }

        let pyramid = ImagePyramid::build(img, width, height, &levels);

        let mut keypoints = Vec::new();
        let mut descriptors = Vec::new();
        for (level, data) in levels.iter().zip(&pyramid) {
            let (kps, descs) = self.extract_single(data, level.width, level.height, level.scale)?;
            keypoints.extend(kps);
            descriptors.extend(descs);
        }

        Ok(ImageFeatures {
            keypoints,
            descriptors,
        })
    }

    fn extract_single(
        &self,
        img: &Image,
        width: usize,
        height: usize,
        scale: f32,
    ) -> PipelineResult<(Vec<Keypoint>, Vec<Descriptor>)> {
        // The segment test needs a 7x7 window; smaller images simply
        // carry no detectable features.
        const MIN_DETECT_DIM: usize = 7;
        let min_dim = width.min(height);
        if min_dim < MIN_DETECT_DIM {
            return Ok((Vec::new(), Vec::new()));
        }

        // An odd patch wider than the image is shrunk to fit rather than
        // rejected; a malformed (even) patch still errors in the detector.
        let mut cfg = self.cfg.clone();
        if cfg.patch_size % 2 == 1 && cfg.patch_size >= min_dim {
            cfg.patch_size = if min_dim % 2 == 0 {
                min_dim - 1
            } else {
                min_dim - 2
            };
        }

        let detector = FastDetector::new(cfg, width, height)?.with_nms_radius(self.nms_radius);
        let mut keypoints = detector.detect_keypoints(img)?;

        // Describe at the level's resolution, report in base coordinates
        let extractor = BriefExtractor::new(width, height);
        let descriptors = extractor.describe(img, &keypoints);

        if scale != 1.0 {
            for kp in &mut keypoints {
                kp.x *= scale;
                kp.y *= scale;
                kp.scale = scale;
            }
        }

        Ok((keypoints, descriptors))
    }
}

/// Match an anchor image's features against another image and apply the
/// good-match filter.
pub fn compare(anchor: &ImageFeatures, other: &ImageFeatures) -> PairReport {
    let matcher = HammingMatcher::new();
    let matches = matcher.match_descriptors(&anchor.descriptors, &other.descriptors);
    let stats = MatchStats::from_matches(&matches);
    let good = good_matches(&matches, stats);

    PairReport {
        matches,
        good,
        stats,
    }
}
