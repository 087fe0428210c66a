use featmatch_core::Image;

use crate::types::ScaleLevel;

/// Scale factor between consecutive pyramid levels
pub const SCALE_FACTOR: f32 = 1.2;

/// Smallest level dimension still worth detecting on
const MIN_LEVEL_DIM: usize = 32;

/// Maximum number of pyramid levels
const MAX_LEVELS: usize = 8;

/// Image pyramid for multi-scale feature detection
pub struct ImagePyramid;

impl ImagePyramid {
    /// Generate the scale levels for an image of the given size
    pub fn generate_scale_levels(width: usize, height: usize) -> Vec<ScaleLevel> {
        let mut levels = Vec::new();
        let mut scale = 1.0f32;

        for level in 0..MAX_LEVELS {
            let w = (width as f32 / scale) as usize;
            let h = (height as f32 / scale) as usize;
            if w < MIN_LEVEL_DIM || h < MIN_LEVEL_DIM {
                break;
            }
            levels.push(ScaleLevel {
                level,
                scale,
                width: w,
                height: h,
            });
            scale *= SCALE_FACTOR;
        }

        levels
    }

    /// Build the pyramid images for the given scale levels
    pub fn build(img: &Image, width: usize, height: usize, levels: &[ScaleLevel]) -> Vec<Image> {
        levels
            .iter()
            .map(|lvl| {
                if lvl.level == 0 {
                    img.clone()
                } else {
                    Self::downsample(img, width, height, lvl.width, lvl.height)
                }
            })
            .collect()
    }

    /// Bilinear downsampling into a freshly allocated buffer
    fn downsample(img: &Image, sw: usize, sh: usize, tw: usize, th: usize) -> Image {
        let x_step = sw as f32 / tw as f32;
        let y_step = sh as f32 / th as f32;
        let mut out = vec![0u8; tw * th];

        for ty in 0..th {
            let sy = ty as f32 * y_step;
            let y0 = (sy as usize).min(sh - 1);
            let y1 = (y0 + 1).min(sh - 1);
            let fy = sy - y0 as f32;

            for tx in 0..tw {
                let sx = tx as f32 * x_step;
                let x0 = (sx as usize).min(sw - 1);
                let x1 = (x0 + 1).min(sw - 1);
                let fx = sx - x0 as f32;

                let top = img[y0 * sw + x0] as f32 * (1.0 - fx) + img[y0 * sw + x1] as f32 * fx;
                let bot = img[y1 * sw + x0] as f32 * (1.0 - fx) + img[y1 * sw + x1] as f32 * fx;
                out[ty * tw + tx] = (top * (1.0 - fy) + bot * fy) as u8;
            }
        }

        out
    }
}
