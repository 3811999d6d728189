use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::{PoisonError, RwLock};

const SHARD_COUNT: usize = 8;

/// Grow-only concurrent set of the action parameters that have rendered at
/// least once. Sharded so the tick sweep and inserts arriving from render
/// calls on other host threads do not serialize on one lock.
pub struct KnownParams {
    shards: [RwLock<HashSet<String>>; SHARD_COUNT],
}

impl Default for KnownParams {
    fn default() -> Self {
        Self {
            shards: std::array::from_fn(|_| RwLock::new(HashSet::new())),
        }
    }
}

impl KnownParams {
    fn shard(&self, id: &str) -> &RwLock<HashSet<String>> {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        &self.shards[hasher.finish() as usize % SHARD_COUNT]
    }

    /// Idempotent insert; callers may race freely.
    pub fn record(&self, id: &str) {
        let shard = self.shard(id);
        {
            let known = shard.read().unwrap_or_else(PoisonError::into_inner);
            if known.contains(id) {
                return;
            }
        }
        shard
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_owned());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shard(id)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visits every identifier recorded before the call started. Each shard
    /// is snapshotted under its read lock and released before the callback
    /// runs, so an insert racing with the sweep is picked up no later than
    /// the next tick.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&str),
    {
        for shard in &self.shards {
            let snapshot: Vec<String> = {
                let known = shard.read().unwrap_or_else(PoisonError::into_inner);
                known.iter().cloned().collect()
            };
            for id in &snapshot {
                f(id);
            }
        }
    }
}
