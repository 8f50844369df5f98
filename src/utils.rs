use std::borrow::Borrow;

#[cfg(all(feature = "ahash", not(feature = "foldhash")))]
pub(crate) type DefaultHashBuilder = ahash::RandomState;

#[cfg(feature = "foldhash")]
pub(crate) type DefaultHashBuilder = foldhash::fast::RandomState;

#[cfg(all(not(feature = "ahash"), not(feature = "foldhash")))]
pub(crate) type DefaultHashBuilder = std::collections::hash_map::RandomState;

/// Place a key hash into `[0, modulus)`. The hash is read as a signed value and
/// reduced with the truncated remainder before taking the absolute value. The
/// remainder is strictly smaller in magnitude than `modulus`, so `abs` can not
/// overflow even for `i64::MIN`.
#[inline]
pub(crate) fn bucket_index(hash: u64, modulus: i64) -> usize {
    debug_assert!(modulus > 0);
    ((hash as i64) % modulus).abs() as usize
}

pub(crate) fn slice_search_linear<T, K, Q>(
    slice: &[T],
    k: &Q,
    key_of: impl Fn(&T) -> &K,
) -> Option<usize>
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    for (idx, item) in slice.iter().enumerate() {
        if <K as Borrow<Q>>::borrow(key_of(item)) == k {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{bucket_index, slice_search_linear};

    #[test]
    fn test_bucket_index_in_range() {
        for modulus in [1i64, 2, 7, 16, 1021] {
            for hash in [0u64, 1, 42, u64::MAX, u64::MAX - 1, 1 << 63, (1 << 63) + 1] {
                let idx = bucket_index(hash, modulus);
                assert!((idx as i64) < modulus);
            }
        }
    }

    #[test]
    fn test_bucket_index_negative_hash() {
        // -1 % 7 == -1, abs => 1
        assert_eq!(bucket_index(u64::MAX, 7), 1);
        // -8 % 7 == -1, abs => 1
        assert_eq!(bucket_index((-8i64) as u64, 7), 1);
        assert_eq!(bucket_index(8, 7), 1);
    }

    #[test]
    fn test_bucket_index_min_hash() {
        // i64::MIN is an exact multiple of every power of two.
        assert_eq!(bucket_index(1 << 63, 16), 0);
        // i64::MIN % 7 == -1
        assert_eq!(bucket_index(1 << 63, 7), 1);
        assert_eq!(bucket_index(1 << 63, 1), 0);
        assert_eq!(bucket_index(1 << 63, i64::MAX), 1);
    }

    #[test]
    fn test_slice_search_linear() {
        let slice = [(1u32, "a"), (5, "b"), (3, "c")];
        assert_eq!(slice_search_linear(&slice, &5u32, |(k, _)| k), Some(1));
        assert_eq!(slice_search_linear(&slice, &3u32, |(k, _)| k), Some(2));
        assert_eq!(slice_search_linear(&slice, &4u32, |(k, _)| k), None);

        let empty: [(u32, &str); 0] = [];
        assert_eq!(slice_search_linear(&empty, &1u32, |(k, _)| k), None);
    }
}
