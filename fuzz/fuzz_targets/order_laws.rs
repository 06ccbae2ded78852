#![no_main]

use libfuzzer_sys::fuzz_target;
use ordo_fuzz::{check_laws, fuzz_comparator, FuzzValue};

fuzz_target!(|input: (FuzzValue, FuzzValue, FuzzValue)| {
    let (x, y, z) = match (input.0.to_value(), input.1.to_value(), input.2.to_value()) {
        (Ok(x), Ok(y), Ok(z)) => (x, y, z),
        _ => return,
    };

    let cmp = fuzz_comparator();
    // comparator errors are fine, broken laws are not
    if let Ok(Some(violation)) = check_laws(&cmp, &x, &y, &z) {
        panic!("{:?} on {:?} / {:?} / {:?}", violation, x, y, z);
    }
});
