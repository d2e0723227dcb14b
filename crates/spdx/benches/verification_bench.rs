//! 문서 조립 벤치마크
//!
//! 검증 코드 계산, purl 파싱/매칭, 문서 병합과 렌더링 성능을 측정합니다.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use bomsmith_spdx::checksum::{ChecksumAlgorithm, sha1_hex};
use bomsmith_spdx::render::render;
use bomsmith_spdx::{
    Document, DocumentFormat, File, Package, PackageUrl, PurlSpec, verification,
};

/// `count`개의 파일을 가진 분석된 패키지
fn package_with_files(name: &str, count: usize) -> Package {
    let mut package = Package::new(name).with_version("1.0.0");
    package.files_analyzed = true;
    for i in 0..count {
        let file = File::new(format!("src/file-{i:05}.rs"))
            .with_checksum(ChecksumAlgorithm::Sha1, sha1_hex(format!("content-{i}")));
        package.add_file(file).unwrap();
    }
    package
}

fn bench_verification_code(c: &mut Criterion) {
    let small = package_with_files("small", 10);
    let large = package_with_files("large", 10_000);

    let mut group = c.benchmark_group("verification_code");

    group.throughput(Throughput::Elements(10));
    group.bench_function("small_10_files", |b| {
        b.iter(|| verification::compute(black_box(&small)).unwrap())
    });

    group.throughput(Throughput::Elements(10_000));
    group.bench_function("large_10000_files", |b| {
        b.iter(|| verification::compute(black_box(&large)).unwrap())
    });

    group.finish();
}

fn bench_purl(c: &mut Criterion) {
    let raw = "pkg:deb/debian/libssl3@3.0.11-1~deb12u2?arch=amd64&distro=debian-12";
    let purl: PackageUrl = raw.parse().unwrap();
    let spec = PurlSpec::new()
        .with_type("deb")
        .with_name("libssl3")
        .with_qualifier("arch", "amd64");

    let mut group = c.benchmark_group("purl");

    group.bench_function("parse", |b| {
        b.iter(|| black_box(raw).parse::<PackageUrl>().unwrap())
    });
    group.bench_function("match", |b| b.iter(|| spec.matches(black_box(&purl))));

    group.finish();
}

fn bench_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");

    // 100개 패키지 추가 (패키지당 20개 파일)
    group.throughput(Throughput::Elements(100));
    group.bench_function("add_100_packages", |b| {
        b.iter(|| {
            let mut doc = Document::new("bench");
            for i in 0..100 {
                let id = doc
                    .add_package(package_with_files(&format!("pkg-{i}"), 20))
                    .unwrap();
                doc.describe(&id).unwrap();
            }
            doc
        })
    });

    let mut doc = Document::new("bench");
    for i in 0..100 {
        let id = doc
            .add_package(package_with_files(&format!("pkg-{i}"), 20))
            .unwrap();
        doc.describe(&id).unwrap();
    }
    doc.compute_verification_codes().unwrap();

    group.bench_function("render_tag_value_100", |b| {
        b.iter(|| render(black_box(&doc), DocumentFormat::TagValue).unwrap())
    });
    group.bench_function("render_json_100", |b| {
        b.iter(|| render(black_box(&doc), DocumentFormat::Json).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_verification_code, bench_purl, bench_document);
criterion_main!(benches);
