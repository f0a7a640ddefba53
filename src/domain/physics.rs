/// Overlap tests between entity bodies.
///
/// Collision reads only the integer cell positions, never the fractional
/// ones, so two entities collide exactly when their rendered cells touch.

use crate::domain::entity::Body;

/// Two bodies collide when their rows differ by at most `margin` AND their
/// horizontal spans (glyph widths included) overlap once each is inflated by
/// `margin` cells. Margin 0 is exact contact; power-up pickup uses a
/// deliberately generous margin of 3.
pub fn collides(a: &Body, b: &Body, margin: i32) -> bool {
    let horizontal = a.x < b.x + b.width() + margin && b.x < a.x + a.width() + margin;
    let vertical = (a.y - b.y).abs() <= margin;
    horizontal && vertical
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: i32, y: i32, glyph: &'static str) -> Body {
        Body::new(x, y, glyph, 1)
    }

    #[test]
    fn overlap_same_cell() {
        let a = body(5, 5, "*");
        let b = body(5, 5, "*");
        assert!(collides(&a, &b, 0));
    }

    #[test]
    fn adjacent_cells_touch_at_margin_zero() {
        // a spans column 5 only; b at column 6 is inside a.x + width + 0? No:
        // 5 < 6+1+0 and 6 < 5+1+0 is false, so side-by-side singles miss.
        let a = body(5, 5, "*");
        let b = body(6, 5, "*");
        assert!(!collides(&a, &b, 0));
        // a wide glyph reaching into b's column does hit
        let wide = body(5, 5, "**");
        assert!(collides(&wide, &b, 0));
    }

    #[test]
    fn rows_must_be_within_margin() {
        let a = body(5, 5, "***");
        let b = body(5, 7, "***");
        assert!(!collides(&a, &b, 0));
        assert!(!collides(&a, &b, 1));
        assert!(collides(&a, &b, 2));
    }

    #[test]
    fn margin_inflates_horizontal_span() {
        let a = body(0, 0, "*");
        let b = body(4, 0, "*");
        assert!(!collides(&a, &b, 0));
        assert!(collides(&a, &b, 3));
    }

    #[test]
    fn symmetric_for_all_pairs() {
        let cases = [
            (body(0, 0, "*"), body(0, 0, "*")),
            (body(3, 2, "<<=+=>>"), body(5, 2, "->")),
            (body(10, 4, "{-+==+-}"), body(30, 9, "⊕")),
            (body(-2, 1, "**"), body(0, 1, "***")),
        ];
        for (a, b) in &cases {
            for margin in 0..4 {
                assert_eq!(collides(a, b, margin), collides(b, a, margin));
            }
        }
    }

    #[test]
    fn width_counts_chars_not_bytes() {
        // multi-byte glyph is still one cell wide
        let a = body(5, 0, "⊕");
        let b = body(6, 0, "*");
        assert!(!collides(&a, &b, 0));
    }
}
