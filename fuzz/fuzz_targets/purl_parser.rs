#![no_main]

use libfuzzer_sys::fuzz_target;
use bomsmith_spdx::{PackageUrl, PurlSpec};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(purl) = raw.parse::<PackageUrl>() else {
        return;
    };

    // 정규 형식은 다시 파싱해도 같은 문자열이 되어야 함
    let canonical = purl.to_string();
    if let Ok(again) = canonical.parse::<PackageUrl>() {
        assert_eq!(again.to_string(), canonical);
    }

    // 자기 자신에서 만든 spec은 항상 일치
    assert!(PurlSpec::from(&purl).matches(&purl));
    assert!(PurlSpec::new().matches(&purl));
});
