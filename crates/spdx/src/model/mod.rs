//! SPDX 문서 그래프 모델
//!
//! - [`Package`]: 파일을 소유하고 purl로 식별되는 패키지
//! - [`File`]: 체크섬을 가진 파일
//! - [`Relationship`]: 요소 사이의 방향성 관계
//! - [`Document`]: 위 요소들을 소유하는 문서 루트

mod document;
mod file;
mod package;
mod relationship;

pub use document::{
    CreationInfo, DATA_LICENSE, DEFAULT_CREATOR, DEFAULT_NAMESPACE_BASE, DOCUMENT_ID, Document,
    SPDX_VERSION,
};
pub use file::File;
pub use package::{CATEGORY_PACKAGE_MANAGER, ExternalRef, Package, REF_TYPE_PURL};
pub use relationship::{Relationship, RelationshipType};

/// 값이 없는 SPDX 필드에 쓰는 표기
pub const NOASSERTION: &str = "NOASSERTION";

/// SPDX ID에 허용되지 않는 문자(`[A-Za-z0-9.-]` 외)를 `-`로 치환합니다.
pub(crate) fn spdx_id_fragment(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
