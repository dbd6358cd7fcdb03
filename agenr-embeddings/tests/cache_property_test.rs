use agenr_embeddings::EmbeddingCache;
use proptest::prelude::*;

proptest! {
    #[test]
    fn size_never_exceeds_cap(cap in 1usize..8, keys in proptest::collection::vec("[a-e]", 0..40)) {
        let cache = EmbeddingCache::new(cap).unwrap();
        for k in keys {
            cache.set(k, vec![1.0]);
            prop_assert!(cache.size() <= cap);
        }
    }

    #[test]
    fn every_set_key_is_immediately_gettable(cap in 1usize..8, keys in proptest::collection::vec("[a-e]", 1..40)) {
        let cache = EmbeddingCache::new(cap).unwrap();
        for k in keys {
            cache.set(k.clone(), vec![7.0]);
            prop_assert_eq!(cache.get(&k), Some(vec![7.0]));
        }
    }
}
