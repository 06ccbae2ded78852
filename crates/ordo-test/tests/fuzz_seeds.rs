//! Model test across many seeds

use ordo_core::Comparator;
use ordo_test::{properties, random_key, FuzzerConfig, MapFuzzer};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_fuzzer_heavy() {
    let mut fuzzer = MapFuzzer::new(FuzzerConfig::heavy());
    let result = fuzzer.run().unwrap();
    assert!(result.is_valid(), "{:?}", result);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_fuzzer_valid_for_any_seed(seed in any::<u64>(), delete_chance in 1u32..6) {
        let config = FuzzerConfig {
            seed,
            delete_chance,
            ..FuzzerConfig::light()
        };
        let result = MapFuzzer::new(config).run().unwrap();
        prop_assert!(result.is_valid(), "{:?}", result);
    }

    #[test]
    fn prop_random_keys_obey_order_laws(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let cmp = Comparator::new();
        let (x, y, z) = (
            random_key(&mut rng, 2),
            random_key(&mut rng, 2),
            random_key(&mut rng, 2),
        );

        prop_assert!(properties::irreflexive(&cmp, &x).unwrap());
        prop_assert!(properties::antisymmetric(&cmp, &x, &y).unwrap());
        prop_assert!(properties::trichotomous(&cmp, &x, &y).unwrap());
        prop_assert!(properties::transitive(&cmp, &x, &y, &z).unwrap());
    }
}
