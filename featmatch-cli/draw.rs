use featmatch_core::{Keypoint, Match};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};

const KEYPOINT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const MATCH_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const KEYPOINT_RADIUS: i32 = 3;

/// Render a side-by-side match visualization.
///
/// The anchor image sits on the left, the other image on the right. Every
/// keypoint of both images gets a hollow circle; each match gets a line
/// from its anchor keypoint to its (right-shifted) counterpart.
pub fn render_matches(
    anchor: &RgbImage,
    other: &RgbImage,
    anchor_kps: &[Keypoint],
    other_kps: &[Keypoint],
    matches: &[Match],
) -> RgbImage {
    let (aw, ah) = anchor.dimensions();
    let (ow, oh) = other.dimensions();
    let mut canvas = RgbImage::new(aw + ow, ah.max(oh));

    for (x, y, px) in anchor.enumerate_pixels() {
        canvas.put_pixel(x, y, *px);
    }
    for (x, y, px) in other.enumerate_pixels() {
        canvas.put_pixel(aw + x, y, *px);
    }

    for kp in anchor_kps {
        draw_hollow_circle_mut(
            &mut canvas,
            (kp.x as i32, kp.y as i32),
            KEYPOINT_RADIUS,
            KEYPOINT_COLOR,
        );
    }
    for kp in other_kps {
        draw_hollow_circle_mut(
            &mut canvas,
            (kp.x as i32 + aw as i32, kp.y as i32),
            KEYPOINT_RADIUS,
            KEYPOINT_COLOR,
        );
    }

    for m in matches {
        let from = &anchor_kps[m.query_idx];
        let to = &other_kps[m.train_idx];
        draw_line_segment_mut(
            &mut canvas,
            (from.x, from.y),
            (to.x + aw as f32, to.y),
            MATCH_COLOR,
        );
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    #[test]
    fn canvas_spans_both_images() {
        let left = solid_image(40, 30, 100);
        let right = solid_image(50, 45, 150);
        let canvas = render_matches(&left, &right, &[], &[], &[]);
        assert_eq!(canvas.dimensions(), (90, 45));
    }

    #[test]
    fn source_pixels_are_copied() {
        let left = solid_image(10, 10, 100);
        let right = solid_image(10, 10, 200);
        let canvas = render_matches(&left, &right, &[], &[], &[]);
        assert_eq!(canvas.get_pixel(2, 2), &Rgb([100, 100, 100]));
        assert_eq!(canvas.get_pixel(12, 2), &Rgb([200, 200, 200]));
    }

    #[test]
    fn match_line_is_drawn() {
        let left = solid_image(20, 20, 0);
        let right = solid_image(20, 20, 0);
        let anchor_kps = [Keypoint::at(5.0, 10.0)];
        let other_kps = [Keypoint::at(5.0, 10.0)];
        let matches = [featmatch_core::Match {
            query_idx: 0,
            train_idx: 0,
            distance: 0.0,
        }];

        let canvas = render_matches(&left, &right, &anchor_kps, &other_kps, &matches);
        // Some pixel between the endpoints carries the match color
        let mid = canvas.get_pixel(15, 10);
        assert_eq!(mid, &MATCH_COLOR);
    }

    #[test]
    fn keypoint_circles_are_drawn() {
        let left = solid_image(20, 20, 0);
        let right = solid_image(20, 20, 0);
        let anchor_kps = [Keypoint::at(10.0, 10.0)];

        let canvas = render_matches(&left, &right, &anchor_kps, &[], &[]);
        // The hollow circle touches (10 + radius, 10)
        assert_eq!(canvas.get_pixel(13, 10), &KEYPOINT_COLOR);
    }
}
