use std::collections::HashMap;

use lockbucket::{BucketMap, BucketMapError};

#[derive(Debug, Clone)]
enum Op {
    Put(u8, u32),
    Get(u8),
}

fn op_strategy() -> impl proptest::strategy::Strategy<Value = Op> {
    use proptest::prelude::*;
    prop_oneof![
        (any::<u8>(), any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        any::<u8>().prop_map(Op::Get),
    ]
}

proptest::proptest! {
    #[test]
    fn bucket_map_consistent(bucket_count in 1usize..64, ops in proptest::collection::vec(op_strategy(), 0..512)) {
        let mut model = HashMap::new();
        let map = BucketMap::new(bucket_count).unwrap();

        for op in ops {
            match op {
                Op::Put(k, v) => assert_eq!(model.insert(k, v), map.put(k, v)),
                Op::Get(k) => assert_eq!(model.get(&k).copied(), map.get(&k)),
            }
        }

        for (k, v) in model.iter() {
            assert_eq!(map.get(k), Some(*v));
        }
    }

    #[test]
    fn bucket_map_put_returns_previous(values: Vec<u16>) {
        let map = BucketMap::new(5).unwrap();
        let mut prev = None;
        for v in values {
            assert_eq!(map.put("key".to_string(), v), prev);
            prev = Some(v);
        }
        assert_eq!(map.get("key"), prev);
    }
}

#[test]
fn bucket_map_zero_buckets() {
    let err = BucketMap::<u8, u8>::new(0).unwrap_err();
    assert_eq!(err, BucketMapError::IllegalBucketCount(0));
    assert_eq!(err.to_string(), "Illegal number of buckets: 0");
}

#[test]
fn bucket_map_shared_across_threads() {
    let map = BucketMap::new(16).unwrap();

    std::thread::scope(|scope| {
        for t in 0..4u32 {
            let map = &map;
            scope.spawn(move || {
                for i in 0..250u32 {
                    map.put(format!("{}-{}", t, i), i);
                }
            });
        }
    });

    for t in 0..4u32 {
        for i in 0..250u32 {
            assert_eq!(map.get(format!("{}-{}", t, i).as_str()), Some(i));
        }
    }
    assert_eq!(map.get("4-0"), None);
}
