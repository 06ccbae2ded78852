#![no_main]

use libfuzzer_sys::fuzz_target;
use ordo_fuzz::{replay, FuzzOp};

fuzz_target!(|ops: Vec<FuzzOp>| {
    if let Ok(report) = replay(&ops) {
        assert!(report.is_valid(), "{:?}", report);
    }
});
