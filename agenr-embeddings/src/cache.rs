use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

const NIL: usize = usize::MAX;

/// Errors constructing an [`EmbeddingCache`].
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("embedding cache capacity must be at least 1, got {0}")]
    ZeroCapacity(usize),
}

struct Node {
    key: String,
    value: Vec<f32>,
    prev: usize,
    next: usize,
}

struct Inner {
    slab: Vec<Node>,
    free: Vec<usize>,
    index: HashMap<String, usize>,
    head: usize, // MRU
    tail: usize, // LRU
    cap: usize,
}

impl Inner {
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.slab[slot].prev, self.slab[slot].next);
        if prev != NIL {
            self.slab[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.slab[next].prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn push_front(&mut self, slot: usize) {
        self.slab[slot].prev = NIL;
        self.slab[slot].next = self.head;
        if self.head != NIL {
            self.slab[self.head].prev = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }

    fn promote(&mut self, slot: usize) {
        if self.head == slot {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    fn evict_tail(&mut self) {
        if self.tail == NIL {
            return;
        }
        let slot = self.tail;
        self.unlink(slot);
        let key = std::mem::take(&mut self.slab[slot].key);
        self.index.remove(&key);
        self.slab[slot].value.clear();
        self.free.push(slot);
    }
}

/// Text -> embedding LRU cache with promote-on-access semantics.
/// `cap` must be at least 1.
pub struct EmbeddingCache {
    inner: Mutex<Inner>,
}

impl EmbeddingCache {
    pub fn new(cap: usize) -> Result<Self, CacheError> {
        if cap == 0 {
            return Err(CacheError::ZeroCapacity(cap));
        }
        Ok(Self {
            inner: Mutex::new(Inner {
                slab: Vec::new(),
                free: Vec::new(),
                index: HashMap::new(),
                head: NIL,
                tail: NIL,
                cap,
            }),
        })
    }

    /// Returns a cached vector and promotes it to most-recently-used.
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        let mut guard = self.inner.lock().expect("cache lock poisoned");
        let slot = *guard.index.get(text)?;
        guard.promote(slot);
        Some(guard.slab[slot].value.clone())
    }

    /// Insert or update. Promotes on update; evicts the LRU tail on
    /// overflow.
    pub fn set(&self, text: impl Into<String>, value: Vec<f32>) {
        let text = text.into();
        let mut guard = self.inner.lock().expect("cache lock poisoned");
        if let Some(&slot) = guard.index.get(&text) {
            guard.slab[slot].value = value;
            guard.promote(slot);
            return;
        }

        let node = Node {
            key: text.clone(),
            value,
            prev: NIL,
            next: NIL,
        };
        let slot = if let Some(slot) = guard.free.pop() {
            guard.slab[slot] = node;
            slot
        } else {
            guard.slab.push(node);
            guard.slab.len() - 1
        };
        guard.index.insert(text, slot);
        guard.push_front(slot);

        if guard.index.len() > guard.cap {
            guard.evict_tail();
        }
    }

    pub fn size(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").index.len()
    }

    pub fn cap(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_then_hit() {
        let cache = EmbeddingCache::new(2).unwrap();
        assert!(cache.get("a").is_none());
        cache.set("a", vec![1.0]);
        assert_eq!(cache.get("a"), Some(vec![1.0]));
    }

    #[test]
    fn overflow_evicts_least_recently_used() {
        let cache = EmbeddingCache::new(2).unwrap();
        cache.set("a", vec![1.0]);
        cache.set("b", vec![2.0]);
        cache.set("c", vec![3.0]); // evicts "a"
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(vec![2.0]));
        assert_eq!(cache.get("c"), Some(vec![3.0]));
        assert_eq!(cache.size(), 2);
    }

    #[test]
    fn get_promotes_so_it_survives_eviction() {
        let cache = EmbeddingCache::new(2).unwrap();
        cache.set("a", vec![1.0]);
        cache.set("b", vec![2.0]);
        cache.get("a"); // promote a over b
        cache.set("c", vec![3.0]); // should evict b, not a
        assert_eq!(cache.get("a"), Some(vec![1.0]));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn update_existing_key_does_not_grow_size() {
        let cache = EmbeddingCache::new(2).unwrap();
        cache.set("a", vec![1.0]);
        cache.set("a", vec![9.0]);
        assert_eq!(cache.size(), 1);
        assert_eq!(cache.get("a"), Some(vec![9.0]));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(EmbeddingCache::new(0), Err(CacheError::ZeroCapacity(0))));
    }

    #[test]
    fn cap_one_always_keeps_most_recent() {
        let cache = EmbeddingCache::new(1).unwrap();
        cache.set("a", vec![1.0]);
        cache.set("b", vec![2.0]);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(vec![2.0]));
    }
}
