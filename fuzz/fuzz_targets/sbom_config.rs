#![no_main]

use libfuzzer_sys::fuzz_target;
use bomsmith_spdx::{GenerateOptions, SbomConfigFile};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(config) = SbomConfigFile::parse(content) {
            let mut options = GenerateOptions::default();
            config.fold_into(&mut options);
        }
    }
});
