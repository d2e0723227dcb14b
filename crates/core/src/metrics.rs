//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않으면 호출은 아무 동작도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `bomsmith_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)

use metrics::{describe_counter, describe_histogram};

/// 스캐너 레이블 키 (directory, file, image, ...)
pub const LABEL_SOURCE_KIND: &str = "source_kind";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 생성 완료된 문서 수 (counter, label: result)
pub const DOCUMENTS_GENERATED_TOTAL: &str = "bomsmith_documents_generated_total";

/// 스캔한 입력 소스 수 (counter, label: source_kind)
pub const SOURCES_SCANNED_TOTAL: &str = "bomsmith_sources_scanned_total";

/// 문서에 추가된 패키지 수 (counter)
pub const PACKAGES_ADDED_TOTAL: &str = "bomsmith_packages_added_total";

/// purl 일치로 병합된 패키지 수 (counter)
pub const PACKAGES_MERGED_TOTAL: &str = "bomsmith_packages_merged_total";

/// 문서 생성 소요 시간 (histogram, 초)
pub const GENERATION_DURATION_SECONDS: &str = "bomsmith_generation_duration_seconds";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    describe_counter!(
        DOCUMENTS_GENERATED_TOTAL,
        "Total number of SBOM documents generated"
    );
    describe_counter!(
        SOURCES_SCANNED_TOTAL,
        "Total number of input sources handed to scanners"
    );
    describe_counter!(
        PACKAGES_ADDED_TOTAL,
        "Total number of packages added to documents as new nodes"
    );
    describe_counter!(
        PACKAGES_MERGED_TOTAL,
        "Total number of packages merged into an existing node by purl match"
    );
    describe_histogram!(
        GENERATION_DURATION_SECONDS,
        "Time to generate a single SBOM document in seconds"
    );
}
