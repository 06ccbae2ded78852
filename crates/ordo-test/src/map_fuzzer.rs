//! Sorted Map Fuzzer - Randomized model testing for the sorted map
//!
//! Tests:
//! - Length matches the keys never deleted
//! - Iteration order matches an independent sort
//! - Every surviving key is found with the indices that set it
//! - Full teardown leaves an empty map

use std::collections::BTreeSet;

use ordo_core::{Comparator, Value};
use ordo_map::{MapResult, SortedMap, VecStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    /// Number of keys to insert
    pub op_count: usize,
    /// One in `delete_chance` inserts is followed by a delete
    pub delete_chance: u32,
    /// Maximum list nesting in generated keys
    pub max_nesting: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            op_count: 1000,
            delete_chance: 4,
            max_nesting: 3,
            seed: 4454887,
        }
    }
}

impl FuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        FuzzerConfig {
            op_count: 200,
            delete_chance: 4,
            max_nesting: 2,
            seed: 4454887,
        }
    }

    /// Heavy fuzzing for thorough testing
    pub fn heavy() -> Self {
        FuzzerConfig {
            op_count: 10000,
            delete_chance: 3,
            max_nesting: 4,
            seed: 4454887,
        }
    }
}

/// Random heterogeneous key: a small int, a complex, a word or a list of keys
pub fn random_key<R: Rng>(rng: &mut R, max_nesting: usize) -> Value {
    let choices = if max_nesting == 0 { 3 } else { 4 };
    match rng.gen_range(0..choices) {
        0 => Value::Int(rng.gen_range(2..=10)),
        1 => Value::complex(rng.gen(), rng.gen()),
        2 => {
            let len = rng.gen_range(1..=10);
            let word: String = rand::seq::index::sample(rng, 26, len)
                .into_iter()
                .map(|i| char::from(b'a' + i as u8))
                .collect();
            Value::Text(word)
        }
        _ => {
            let len = rng.gen_range(1..=4);
            Value::Sequence((0..len).map(|_| random_key(rng, max_nesting - 1)).collect())
        }
    }
}

/// Sorted map fuzzer
///
/// Each insert `i` adds index `i` to the set stored under its key; a delete
/// picks a previously inserted key and forgets every index filed under it.
pub struct MapFuzzer {
    config: FuzzerConfig,
    map: SortedMap<VecStore<BTreeSet<usize>>>,
    /// Key inserted at each step; `None` once deleted
    keys: Vec<Option<Value>>,
    rng: StdRng,
    deletes: usize,
}

impl MapFuzzer {
    /// Create a new fuzzer
    pub fn new(config: FuzzerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        MapFuzzer {
            keys: Vec::with_capacity(config.op_count),
            config,
            map: SortedMap::new(),
            rng,
            deletes: 0,
        }
    }

    pub fn map(&self) -> &SortedMap<VecStore<BTreeSet<usize>>> {
        &self.map
    }

    /// Keys still live, in insertion order
    pub fn live_keys(&self) -> impl Iterator<Item = &Value> {
        self.keys.iter().flatten()
    }

    /// Insert `op_count` keys, interleaving random deletes
    pub fn populate(&mut self) -> MapResult<()> {
        for i in 0..self.config.op_count {
            let key = random_key(&mut self.rng, self.config.max_nesting);
            self.keys.push(Some(key.clone()));
            self.map.set_default(key, BTreeSet::new())?.insert(i);

            if self.rng.gen_range(0..self.config.delete_chance) == 0 {
                let pick = self.rng.gen_range(0..self.keys.len());
                if let Some(key) = self.keys[pick].clone() {
                    for j in self.map.delete(&key)? {
                        self.keys[j] = None;
                    }
                    self.deletes += 1;
                }
            }
        }
        debug!(
            inserts = self.config.op_count,
            deletes = self.deletes,
            len = self.map.len(),
            "populated map"
        );
        Ok(())
    }

    /// Run the fuzzer
    pub fn run(&mut self) -> MapResult<FuzzResult> {
        self.populate()?;
        let mut result = self.check_invariants()?;
        result.leftover_entries = self.teardown()?;
        Ok(result)
    }

    /// Check the populated map against the live keys
    pub fn check_invariants(&self) -> MapResult<FuzzResult> {
        let mut result = FuzzResult::new();
        result.inserts = self.config.op_count;
        result.deletes = self.deletes;
        result.final_len = self.map.len();

        let comparator = Comparator::new();
        let live: Vec<Value> = self.live_keys().cloned().collect();
        let sorted = comparator.sort(&live)?;

        // distinct live keys in ascending order
        let mut reference: Vec<&Value> = Vec::with_capacity(sorted.len());
        for key in sorted {
            let duplicate = match reference.last() {
                Some(prev) => comparator.equal(prev, key)?,
                None => false,
            };
            if !duplicate {
                reference.push(key);
            }
        }
        result.expected_len = reference.len();

        for (key, expected) in self.map.keys().zip(&reference) {
            if !comparator.equal(key, expected)? {
                result.order_violations += 1;
            }
        }

        for (i, key) in self.keys.iter().enumerate() {
            if let Some(key) = key {
                if !self.map.get(key)?.contains(&i) {
                    result.missing_indices += 1;
                }
            }
        }

        Ok(result)
    }

    /// Remove every live index, then every live key; returns entries left over
    pub fn teardown(&mut self) -> MapResult<usize> {
        for (i, key) in self.keys.iter().enumerate() {
            if let Some(key) = key {
                self.map.get_mut(key)?.remove(&i);
            }
        }

        let mut leftover = 0;
        for key in self.keys.iter().flatten() {
            if self.map.contains_key(key)? && !self.map.delete(key)?.is_empty() {
                leftover += 1;
            }
        }
        if leftover > 0 {
            debug!(leftover, "entries kept indices through teardown");
        }

        Ok(leftover + self.map.len())
    }
}

/// Fuzzing result
#[derive(Debug)]
pub struct FuzzResult {
    pub inserts: usize,
    pub deletes: usize,
    pub final_len: usize,
    pub expected_len: usize,
    pub order_violations: u32,
    pub missing_indices: u32,
    pub leftover_entries: usize,
}

impl FuzzResult {
    pub fn new() -> Self {
        FuzzResult {
            inserts: 0,
            deletes: 0,
            final_len: 0,
            expected_len: 0,
            order_violations: 0,
            missing_indices: 0,
            leftover_entries: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.final_len == self.expected_len
            && self.order_violations == 0
            && self.missing_indices == 0
            && self.leftover_entries == 0
    }
}

impl Default for FuzzResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Order-law helpers
pub mod properties {
    use ordo_core::{Comparator, OrderResult, Value};
    use ordo_map::{EntryStore, SortedMap};

    /// Property: nothing is less than itself
    pub fn irreflexive(cmp: &Comparator, x: &Value) -> OrderResult<bool> {
        Ok(!cmp.less_than(x, x)?)
    }

    /// Property: `x < y` and `y < x` never both hold
    pub fn antisymmetric(cmp: &Comparator, x: &Value, y: &Value) -> OrderResult<bool> {
        Ok(!(cmp.less_than(x, y)? && cmp.less_than(y, x)?))
    }

    /// Property: `x < y < z` implies `x < z`
    pub fn transitive(cmp: &Comparator, x: &Value, y: &Value, z: &Value) -> OrderResult<bool> {
        if cmp.less_than(x, y)? && cmp.less_than(y, z)? {
            cmp.less_than(x, z)
        } else {
            Ok(true)
        }
    }

    /// Property: exactly one of `x < y`, `x == y`, `x > y` holds
    pub fn trichotomous(cmp: &Comparator, x: &Value, y: &Value) -> OrderResult<bool> {
        let outcomes = [
            cmp.less_than(x, y)?,
            cmp.equal(x, y)?,
            cmp.greater_than(x, y)?,
        ];
        Ok(outcomes.iter().filter(|&&b| b).count() == 1)
    }

    /// Property: no later item is less than an earlier one
    pub fn ascending(cmp: &Comparator, items: &[&Value]) -> OrderResult<bool> {
        for pair in items.windows(2) {
            if cmp.less_than(pair[1], pair[0])? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Property: map keys are strictly ascending
    pub fn strictly_ascending<S: EntryStore>(map: &SortedMap<S>) -> OrderResult<bool> {
        let keys: Vec<&Value> = map.keys().collect();
        for pair in keys.windows(2) {
            if !map.comparator().less_than(pair[0], pair[1])? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
