//! Geometry assertions.

use sizer_core::{Rect, Size};

/// Assert that `inner` lies entirely inside `outer`.
#[track_caller]
pub fn assert_contains(outer: Rect, inner: Rect) {
    assert!(
        outer.contains_rect(&inner),
        "expected {inner:?} to lie inside {outer:?}"
    );
}

/// Assert that no two rectangles overlap.
#[track_caller]
pub fn assert_disjoint(rects: &[Rect]) {
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(!a.intersects(b), "expected {a:?} and {b:?} not to overlap");
        }
    }
}

/// Assert that `size` is at least `min` on both axes.
#[track_caller]
pub fn assert_size_at_least(size: Size, min: Size) {
    assert!(
        size.width >= min.width && size.height >= min.height,
        "expected {size:?} to be at least {min:?}"
    );
}

/// Assert that `lengths` separated by `gap` add up to `total`.
#[track_caller]
pub fn assert_total(lengths: &[i32], gap: i32, total: i32) {
    let gaps = gap * lengths.len().saturating_sub(1) as i32;
    let sum: i32 = lengths.iter().sum::<i32>() + gaps;
    assert_eq!(sum, total, "lengths {lengths:?} with gap {gap} do not add up");
}
