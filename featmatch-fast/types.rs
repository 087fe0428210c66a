use featmatch_core::Keypoint;

/// Keypoint with corner response score, kept separate until NMS has run
#[derive(Debug, Clone, Copy)]
pub struct ScoredKeypoint {
    pub keypoint: Keypoint,
    pub response: f32,
}

/// Scale information for one pyramid level
#[derive(Debug, Clone, Copy)]
pub struct ScaleLevel {
    pub level: usize,
    pub scale: f32,
    pub width: usize,
    pub height: usize,
}
