//! Band ordering.
//!
//! Bands are processed largest-first: every later section of a candidate set
//! then holds only smaller-scale detections, which the overlap resolver
//! relies on.

use dropsize_core::Band;

/// Returns the bands sorted by descending minimum radius.
///
/// Recursive top-down merge sort, O(n log n). Bands with equal `min_r` keep
/// their original relative order.
#[must_use]
pub fn sort_bands(bands: &[Band]) -> Vec<Band> {
    merge_sort_desc(bands, &|band: &Band| band.min_r)
}

/// Checks that `bands` is ordered by non-increasing minimum radius.
#[must_use]
pub fn is_sorted_desc(bands: &[Band]) -> bool {
    bands.windows(2).all(|pair| pair[0].min_r >= pair[1].min_r)
}

fn merge_sort_desc<T: Clone, K: Ord>(items: &[T], key: &impl Fn(&T) -> K) -> Vec<T> {
    if items.len() <= 1 {
        return items.to_vec();
    }
    let mid = items.len() / 2;
    let left = merge_sort_desc(&items[..mid], key);
    let right = merge_sort_desc(&items[mid..], key);
    merge_desc(left, right, key)
}

fn merge_desc<T, K: Ord>(left: Vec<T>, right: Vec<T>, key: &impl Fn(&T) -> K) -> Vec<T> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            // `>=` keeps equal keys in their left-first order
            (Some(l), Some(r)) => key(l) >= key(r),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(min_r: i32, max_r: i32, tag: f64) -> Band {
        Band::new(min_r, max_r, tag, 1.0)
    }

    #[test]
    fn test_sorts_descending() {
        let bands = vec![
            band(10, 15, 1.0),
            band(100, 200, 2.0),
            band(30, 50, 3.0),
            band(15, 30, 4.0),
            band(50, 100, 5.0),
        ];
        let sorted = sort_bands(&bands);
        let mins: Vec<i32> = sorted.iter().map(|b| b.min_r).collect();
        assert_eq!(mins, vec![100, 50, 30, 15, 10]);
        assert!(is_sorted_desc(&sorted));
    }

    #[test]
    fn test_stable_for_equal_min_radius() {
        let bands = vec![band(20, 30, 1.0), band(40, 60, 2.0), band(20, 25, 3.0)];
        let sorted = sort_bands(&bands);
        let tags: Vec<f64> = sorted.iter().map(|b| b.p1).collect();
        assert_eq!(tags, vec![2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_idempotent() {
        let bands = vec![band(5, 9, 1.0), band(30, 40, 2.0), band(12, 20, 3.0), band(30, 35, 4.0)];
        let once = sort_bands(&bands);
        let twice = sort_bands(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(sort_bands(&[]).is_empty());
        assert_eq!(sort_bands(&[band(3, 4, 1.0)]).len(), 1);
    }
}
