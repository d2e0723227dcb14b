#![no_main]

use libfuzzer_sys::fuzz_target;
use bomsmith_spdx::scanner::gomod;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(module) = gomod::parse(content, "fuzz/go.mod") {
            for dep in module.dependencies(false) {
                let _ = dep.to_package();
            }
        }
    }
});
