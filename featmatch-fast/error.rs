#[derive(Debug, Clone)]
pub enum FastError {
    ZeroDimension { width: usize, height: usize },
    LengthMismatch { expected: usize, actual: usize },
    ThresholdOutOfRange(u8),
    BadPatchSize { patch_size: usize, min_dim: usize },
    ImageTooSmall { width: usize, height: usize, min_size: usize },
}

impl std::fmt::Display for FastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FastError::ZeroDimension { width, height } => {
                write!(f, "image dimensions {}x{} contain a zero", width, height)
            }
            FastError::LengthMismatch { expected, actual } => {
                write!(f, "pixel buffer holds {} bytes, dimensions require {}", actual, expected)
            }
            FastError::ThresholdOutOfRange(t) => {
                write!(f, "threshold {} outside the valid range 1-127", t)
            }
            FastError::BadPatchSize { patch_size, min_dim } => {
                write!(f, "patch size {} must be odd and below the smallest image dimension {}", patch_size, min_dim)
            }
            FastError::ImageTooSmall { width, height, min_size } => {
                write!(f, "image {}x{} below the {}x{} detection minimum", width, height, min_size, min_size)
            }
        }
    }
}

impl std::error::Error for FastError {}

pub type FastResult<T> = Result<T, FastError>;
