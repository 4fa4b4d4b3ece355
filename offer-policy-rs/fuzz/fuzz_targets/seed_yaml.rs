#![no_main]

use libfuzzer_sys::fuzz_target;
use offer_policy::record::SeedData;

fuzz_target!(|data: &str| {
    // Try to parse arbitrary strings as seed data
    // This should never panic, only return errors
    let _ = SeedData::from_yaml(data);
});
