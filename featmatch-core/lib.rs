#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row-major 8-bit grayscale image
pub type Image = Vec<u8>;

/// Detected feature point with subpixel position, orientation (radians),
/// corner response and the pyramid scale it was found at.
#[derive(Debug, Clone, Copy)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub response: f32,
    /// Scale factor of the pyramid level relative to the base image.
    /// Coordinates are always expressed in base-image space.
    pub scale: f32,
}

impl Keypoint {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            angle: 0.0,
            response: 0.0,
            scale: 1.0,
        }
    }
}

/// 256-bit binary descriptor = 32 bytes
pub type Descriptor = [u8; 32];

/// Pairing of a query-image keypoint with its nearest train-image keypoint.
/// Indices point into the keypoint/descriptor vectors of the two source
/// images for the duration of the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub query_idx: usize,
    pub train_idx: usize,
    /// Normalized Hamming distance in [0, 1].
    pub distance: f32,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoreConfig {
    pub threshold: u8,
    pub patch_size: usize,
    pub n_threads: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            threshold: 20,
            patch_size: 15,
            n_threads: num_cpus::get().max(1),
        }
    }
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_threads() {
        let cfg = CoreConfig::default();
        assert!(cfg.n_threads >= 1);
        assert_eq!(cfg.threshold, 20);
    }

    #[test]
    fn keypoint_at_defaults() {
        let kp = Keypoint::at(4.0, 7.5);
        assert_eq!(kp.x, 4.0);
        assert_eq!(kp.y, 7.5);
        assert_eq!(kp.angle, 0.0);
        assert_eq!(kp.scale, 1.0);
    }
}
