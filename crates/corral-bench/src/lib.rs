//! Benchmark workloads for the Corral containers.
//!
//! Provides deterministic inputs and pre-filled containers shared by the
//! criterion benches:
//!
//! - [`scrambled_keys`]: seeded pseudo-random `u64` keys
//! - [`filled_array`]: a [`DynArray`] grown under a chosen [`GrowthPolicy`]
//! - [`filled_deque`]: a [`BlockDeque`] filled from both ends
//! - [`erase_windows`]: deterministic `[start, end)` ranges for erase benches

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::ops::Range;

use corral_array::DynArray;
use corral_core::GrowthPolicy;
use corral_deque::BlockDeque;

/// Every policy exercised by the growth benches, with a display label.
pub const GROWTH_POLICIES: [(&str, GrowthPolicy); 4] = [
    ("increment", GrowthPolicy::Increment),
    ("plus_half", GrowthPolicy::PlusHalf),
    ("double", GrowthPolicy::Double),
    ("factor_1_25", GrowthPolicy::Factor(1.25)),
];

/// Generate `n` deterministic pseudo-random keys from `seed`.
pub fn scrambled_keys(n: usize, seed: u64) -> Vec<u64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            state >> 11
        })
        .collect()
}

/// An array of `n` keys grown one push at a time under `policy`.
pub fn filled_array(policy: GrowthPolicy, n: usize, seed: u64) -> DynArray<u64> {
    let mut array = DynArray::new();
    array.set_growth_policy(policy);
    for key in scrambled_keys(n, seed) {
        array.push_back(key);
    }
    array
}

/// A deque of `n` keys, alternating front and back pushes.
pub fn filled_deque<const SIZE: usize>(n: usize, seed: u64) -> BlockDeque<u64, SIZE> {
    let mut deque = BlockDeque::new();
    for (i, key) in scrambled_keys(n, seed).into_iter().enumerate() {
        if i % 2 == 0 {
            deque.push_back(key);
        } else {
            deque.push_front(key);
        }
    }
    deque
}

/// `count` erase windows of `width` elements inside an array of `len`.
///
/// Windows are placed deterministically and never reach past `len`.
pub fn erase_windows(len: usize, width: usize, count: usize, seed: u64) -> Vec<Range<usize>> {
    if width == 0 || width > len {
        return Vec::new();
    }
    let span = (len - width + 1) as u64;
    scrambled_keys(count, seed)
        .into_iter()
        .map(|key| {
            let start = (key % span) as usize;
            start..start + width
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrambled_keys_deterministic() {
        assert_eq!(scrambled_keys(16, 42), scrambled_keys(16, 42));
        assert_ne!(scrambled_keys(16, 42), scrambled_keys(16, 43));
    }

    #[test]
    fn filled_array_holds_every_key() {
        for (label, policy) in GROWTH_POLICIES {
            let array = filled_array(policy, 100, 7);
            assert_eq!(array.len(), 100, "{label}");
            assert_eq!(array.as_slice(), scrambled_keys(100, 7).as_slice(), "{label}");
        }
    }

    #[test]
    fn filled_deque_alternates_ends() {
        let deque = filled_deque::<4>(5, 1);
        let keys = scrambled_keys(5, 1);
        let expected = [keys[3], keys[1], keys[0], keys[2], keys[4]];
        assert!(deque.iter().eq(expected.iter()));
    }

    #[test]
    fn erase_windows_stay_in_bounds() {
        for window in erase_windows(50, 10, 100, 3) {
            assert_eq!(window.len(), 10);
            assert!(window.end <= 50, "window {window:?} out of bounds");
        }
        assert!(erase_windows(5, 10, 3, 3).is_empty());
    }
}
