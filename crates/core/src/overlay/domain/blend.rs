use crate::shared::frame::{Frame, FRAME_CHANNELS};
use crate::shared::sprite::Sprite;

/// Source-over composite of `sprite` onto `background` with its top-left
/// corner at `(x, y)`.
///
/// Each covered channel becomes `bg × (1 − a) + fg × a` with `a = alpha / 255`,
/// truncated to `u8`. If the sprite would cross any frame edge nothing is
/// drawn (no clipping) and `false` is returned.
pub fn blend(background: &mut Frame, sprite: &Sprite, x: i64, y: i64) -> bool {
    let w = sprite.width() as i64;
    let h = sprite.height() as i64;
    if x < 0
        || y < 0
        || x + w > background.width() as i64
        || y + h > background.height() as i64
    {
        return false;
    }

    let stride = background.width() as usize * FRAME_CHANNELS;
    let data = background.data_mut();
    for (row, sprite_row) in sprite.as_image().rows().enumerate() {
        let row_start = (y as usize + row) * stride + x as usize * FRAME_CHANNELS;
        for (col, px) in sprite_row.enumerate() {
            let [r, g, b, a] = px.0;
            if a == 0 {
                continue;
            }
            let alpha = a as f64 / 255.0;
            let offset = row_start + col * FRAME_CHANNELS;
            for (dst, fg) in data[offset..offset + FRAME_CHANNELS].iter_mut().zip([r, g, b]) {
                *dst = (*dst as f64 * (1.0 - alpha) + fg as f64 * alpha) as u8;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use rstest::rstest;

    fn solid_sprite(width: u32, height: u32, rgba: [u8; 4]) -> Sprite {
        Sprite::new(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let data = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        Frame::new(data, width, height)
    }

    #[test]
    fn test_transparent_sprite_leaves_frame_unchanged() {
        let original = gradient_frame(20, 20);
        let mut frame = original.clone();
        assert!(blend(&mut frame, &solid_sprite(10, 10, [255, 0, 0, 0]), 5, 5));
        assert_eq!(frame, original);
    }

    #[test]
    fn test_opaque_sprite_replaces_pixels() {
        let mut frame = gradient_frame(20, 20);
        assert!(blend(&mut frame, &solid_sprite(4, 3, [1, 2, 3, 255]), 2, 7));
        for y in 7..10 {
            for x in 2..6 {
                assert_eq!(frame.pixel(x, y), [1, 2, 3]);
            }
        }
    }

    #[test]
    fn test_only_covered_region_changes() {
        let original = Frame::filled(10, 10, [50, 50, 50]);
        let mut frame = original.clone();
        blend(&mut frame, &solid_sprite(2, 2, [200, 200, 200, 255]), 4, 4);
        for y in 0..10 {
            for x in 0..10 {
                let inside = (4..6).contains(&x) && (4..6).contains(&y);
                let expected = if inside { [200; 3] } else { [50; 3] };
                assert_eq!(frame.pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_half_alpha_mixes_and_truncates() {
        let mut frame = Frame::filled(4, 4, [100, 0, 255]);
        blend(&mut frame, &solid_sprite(1, 1, [200, 255, 0, 128]), 0, 0);
        let a = 128.0 / 255.0;
        let expect = |bg: f64, fg: f64| (bg * (1.0 - a) + fg * a) as u8;
        assert_eq!(
            frame.pixel(0, 0),
            [expect(100.0, 200.0), expect(0.0, 255.0), expect(255.0, 0.0)]
        );
    }

    #[test]
    fn test_sprite_filling_whole_frame() {
        let mut frame = Frame::filled(5, 5, [0, 0, 0]);
        assert!(blend(&mut frame, &solid_sprite(5, 5, [9, 9, 9, 255]), 0, 0));
        assert_eq!(frame, Frame::filled(5, 5, [9, 9, 9]));
    }

    #[rstest]
    #[case::left(-1, 0)]
    #[case::top(0, -1)]
    #[case::right(16, 0)]
    #[case::bottom(0, 16)]
    #[case::far_away(1000, 1000)]
    fn test_out_of_bounds_is_noop(#[case] x: i64, #[case] y: i64) {
        let original = gradient_frame(20, 20);
        let mut frame = original.clone();
        assert!(!blend(&mut frame, &solid_sprite(5, 5, [255, 255, 255, 255]), x, y));
        assert_eq!(frame, original);
    }
}
