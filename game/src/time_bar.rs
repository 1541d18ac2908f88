//! Time-bar geometry: pure presentation of the round's fill ratio.
//!
//! A vertical bar on the left edge that drains from the top as the ratio
//! approaches 1, with one faint mark per elapsed-minute boundary of the
//! round duration.

use crate::geom::{RectF, Vec2};

pub const BAR_LEFT: f64 = 15.0;
pub const BAR_WIDTH: f64 = 70.0;
pub const BAR_MARGIN_Y: f64 = 40.0;

/// Outer bar bounds for a given play area.
pub fn bounds(play: Vec2) -> RectF {
    RectF::new(BAR_LEFT, BAR_MARGIN_Y, BAR_WIDTH, play.y - 2.0 * BAR_MARGIN_Y)
}

/// The filled (remaining-time) part: full height at ratio 0, empty at 1,
/// anchored to the bottom of the bar.
pub fn fill_rect(outer: RectF, fill_ratio: f64) -> RectF {
    let ratio = fill_ratio.clamp(0.0, 1.0);
    let inner = RectF::new(outer.x + 2.0, outer.y + 2.0, outer.w - 4.0, outer.h - 4.0);
    let h = inner.h * (1.0 - ratio);
    RectF::new(inner.x, inner.y + (inner.h - h), inner.w, h)
}

/// Horizontal tick marks, one per whole minute of the duration (interior
/// boundaries only).
pub fn minute_marks(outer: RectF, duration_secs: f64) -> Vec<(Vec2, Vec2)> {
    let parts = (duration_secs / 60.0).floor();
    if parts < 2.0 {
        return Vec::new();
    }
    let part_len = outer.h / parts;
    (1..parts as usize)
        .map(|i| {
            let y = outer.y + i as f64 * part_len;
            (
                Vec2::new(outer.x, y),
                Vec2::new(outer.x + outer.w * 0.66, y),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outer() -> RectF {
        bounds(Vec2::new(960.0, 600.0))
    }

    #[test]
    fn fill_is_full_at_zero_and_empty_at_one() {
        let outer = outer();
        let full = fill_rect(outer, 0.0);
        assert!((full.h - (outer.h - 4.0)).abs() < 1e-9);

        let empty = fill_rect(outer, 1.0);
        assert_eq!(empty.h, 0.0);
        // Drains from the top: the bottom edge stays put.
        assert!((empty.y + empty.h - (outer.y + outer.h - 2.0)).abs() < 1e-9);
    }

    #[test]
    fn fill_ratio_is_clamped() {
        let outer = outer();
        assert_eq!(fill_rect(outer, -3.0).h, fill_rect(outer, 0.0).h);
        assert_eq!(fill_rect(outer, 7.0).h, 0.0);
    }

    #[test]
    fn one_mark_per_interior_minute() {
        let outer = outer();
        assert!(minute_marks(outer, 60.0).is_empty());
        assert_eq!(minute_marks(outer, 180.0).len(), 2);
        assert_eq!(minute_marks(outer, 300.0).len(), 4);
    }

    #[test]
    fn marks_are_evenly_spaced_inside_the_bar() {
        let outer = outer();
        let marks = minute_marks(outer, 180.0);
        let step = outer.h / 3.0;
        for (i, (start, stop)) in marks.iter().enumerate() {
            assert!((start.y - (outer.y + (i + 1) as f64 * step)).abs() < 1e-9);
            assert!(start.y > outer.y && start.y < outer.y + outer.h);
            assert!(stop.x > start.x);
        }
    }
}
