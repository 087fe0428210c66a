mod config;
mod detector;
mod error;
mod pyramid;
mod types;

pub use config::{DetectorBuilder, DetectorConfig};
pub use detector::FastDetector;
pub use error::{FastError, FastResult};
pub use pyramid::{ImagePyramid, SCALE_FACTOR};
pub use types::{ScaleLevel, ScoredKeypoint};
