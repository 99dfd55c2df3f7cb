//! Douglas-Peucker polyline simplification with a preserve-set.

use std::collections::BTreeSet;

use crate::engine::corridor::cross_track_distance;
use crate::engine::models::GeoPoint;

/// Returns the sorted, de-duplicated raw indices to keep.
///
/// Endpoints and every index in `preserve` are always retained. A tolerance
/// of zero or a polyline of two points or fewer keeps everything.
pub fn simplify_indices(
    points: &[GeoPoint],
    tolerance_nm: f64,
    preserve: &BTreeSet<usize>,
) -> Vec<usize> {
    let n = points.len();
    if tolerance_nm <= 0.0 || n <= 2 {
        return (0..n).collect();
    }

    let mut kept = vec![0, n - 1];
    kept.extend(preserve.iter().copied().filter(|&i| i < n));
    split(points, tolerance_nm, 0, n - 1, preserve, &mut kept);

    kept.sort_unstable();
    kept.dedup();
    kept
}

fn split(
    points: &[GeoPoint],
    tolerance_nm: f64,
    start: usize,
    end: usize,
    preserve: &BTreeSet<usize>,
    kept: &mut Vec<usize>,
) {
    if start + 1 >= end {
        return;
    }

    // Preserved interior indices partition the chord before any distance test.
    if let Some(&pinned) = preserve.range(start + 1..end).next() {
        split(points, tolerance_nm, start, pinned, preserve, kept);
        split(points, tolerance_nm, pinned, end, preserve, kept);
        return;
    }

    let mut max_dist = 0.0;
    let mut max_idx = None;
    for i in start + 1..end {
        let d = cross_track_distance(&points[i], &points[start], &points[end]);
        if d > max_dist {
            max_dist = d;
            max_idx = Some(i);
        }
    }

    if let Some(idx) = max_idx {
        if max_dist > tolerance_nm {
            kept.push(idx);
            split(points, tolerance_nm, start, idx, preserve, kept);
            split(points, tolerance_nm, idx, end, preserve, kept);
        }
    }
}
