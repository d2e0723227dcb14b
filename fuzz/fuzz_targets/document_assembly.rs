#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use bomsmith_spdx::checksum::{ChecksumAlgorithm, sha1_hex};
use bomsmith_spdx::render::render;
use bomsmith_spdx::{Document, DocumentFormat, File, Package};

/// 퍼저용 구조적 패키지 입력
#[derive(Arbitrary, Debug)]
struct FuzzPackage {
    name: String,
    version: String,
    files_analyzed: bool,
    files: Vec<FuzzFile>,
}

#[derive(Arbitrary, Debug)]
struct FuzzFile {
    name: String,
    content: Vec<u8>,
    with_sha1: bool,
}

fuzz_target!(|input: Vec<FuzzPackage>| {
    let mut doc = Document::new("fuzz");

    // 패키지 수 제한 (퍼징 성능)
    for p in input.iter().take(50) {
        let mut package = Package::new(p.name.as_str()).with_version(p.version.as_str());
        package.files_analyzed = p.files_analyzed;
        for f in p.files.iter().take(50) {
            let mut file = File::new(f.name.as_str());
            if f.with_sha1 {
                file = file.with_checksum(ChecksumAlgorithm::Sha1, sha1_hex(&f.content));
            }
            // 같은 패키지 안의 중복 파일 이름은 거부됨
            let _ = package.add_file(file);
        }

        if let Ok(id) = doc.add_package(package) {
            assert!(doc.has_element(&id));
            let _ = doc.describe(&id);
        }
    }

    if doc.compute_verification_codes().is_ok() {
        let _ = render(&doc, DocumentFormat::TagValue);
        let _ = render(&doc, DocumentFormat::Json);
    }
});
