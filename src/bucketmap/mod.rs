//! BucketMap - A HashMap with a lock per bucket
//!
//! The map is a fixed number of buckets, chosen at construction, each of which
//! is an independently locked list of entries. A key is always placed into the
//! same bucket, so operations on keys in different buckets never contend on
//! a lock, while operations on keys sharing a bucket are serialised by that
//! bucket's mutex.
//!
//! The map never resizes. As more keys are inserted the bucket lists grow, and
//! lookups degrade towards a linear scan of the bucket. Choose a bucket count
//! that fits the expected number of keys and the number of threads that will
//! access the map.
//!
//! Values are cloned out of the map on read, since a reference can not outlive
//! the bucket lock that protects it.

use parking_lot::Mutex;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::error::BucketMapError;
use crate::utils::{bucket_index, slice_search_linear, DefaultHashBuilder};

struct Entry<K, V> {
    key: K,
    value: V,
}

type Bucket<K, V> = Mutex<Vec<Entry<K, V>>>;

/// A concurrent map with a fixed number of buckets, each guarded by its own
/// lock.
///
/// # Examples
/// ```
/// use lockbucket::bucketmap::BucketMap;
///
/// let map: BucketMap<&str, u32> = BucketMap::new(16).unwrap();
///
/// assert_eq!(map.put("a", 1), None);
/// assert_eq!(map.put("a", 2), Some(1));
/// assert_eq!(map.get("a"), Some(2));
/// assert_eq!(map.get("b"), None);
/// ```
pub struct BucketMap<K, V, S = DefaultHashBuilder> {
    // Each bucket owns its entries behind its own mutex, so there is no way to
    // touch a bucket's entries without holding the matching lock.
    buckets: Box<[Bucket<K, V>]>,
    modulus: i64,
    build_hasher: S,
}

impl<K, V> BucketMap<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    /// Create a new map with `bucket_count` buckets, using the default hasher.
    ///
    /// Fails if `bucket_count` is zero.
    pub fn new(bucket_count: usize) -> Result<Self, BucketMapError> {
        Self::with_hasher(bucket_count, DefaultHashBuilder::default())
    }
}

impl<K, V, S> BucketMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Create a new map with `bucket_count` buckets, placing keys with the
    /// provided hasher.
    ///
    /// Fails if `bucket_count` is zero, or too large to act as a signed 64 bit
    /// modulus.
    pub fn with_hasher(bucket_count: usize, build_hasher: S) -> Result<Self, BucketMapError> {
        let modulus = match i64::try_from(bucket_count) {
            Ok(m) if m > 0 => m,
            _ => return Err(BucketMapError::IllegalBucketCount(bucket_count)),
        };

        let buckets = (0..bucket_count)
            .map(|_| Mutex::new(Vec::new()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        tracing::debug!(bucket_count, "bucket map created");

        Ok(BucketMap {
            buckets,
            modulus,
            build_hasher,
        })
    }

    /// The number of buckets this map was created with. This never changes.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_of<Q>(&self, k: &Q) -> &Bucket<K, V>
    where
        Q: Hash + ?Sized,
    {
        let idx = bucket_index(self.build_hasher.hash_one(k), self.modulus);
        &self.buckets[idx]
    }

    /// Insert `value` under `key`. If the key was already present, the value is
    /// replaced in place and the previous value returned. Otherwise the entry is
    /// appended to its bucket and `None` is returned.
    ///
    /// Only the lock of the key's bucket is taken.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let mut bucket = self.bucket_of(&key).lock();
        let found = slice_search_linear(bucket.as_slice(), &key, |e| &e.key);
        match found {
            Some(idx) => Some(std::mem::replace(&mut bucket[idx].value, value)),
            None => {
                if !bucket.is_empty() {
                    tracing::trace!(entries = bucket.len(), "bucket collision");
                }
                bucket.push(Entry { key, value });
                None
            }
        }
    }

    /// Retrieve a clone of the value stored under `key`, or `None` if the key
    /// has never been inserted.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let bucket = self.bucket_of(key).lock();
        slice_search_linear(bucket.as_slice(), key, |e| &e.key)
            .map(|idx| bucket[idx].value.clone())
    }

    /// Returns true if `key` has a value in the map.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket_of(key).lock();
        slice_search_linear(bucket.as_slice(), key, |e| &e.key).is_some()
    }
}

impl<K, V, S> fmt::Debug for BucketMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketMap")
            .field("bucket_count", &self.buckets.len())
            .finish_non_exhaustive()
    }
}
