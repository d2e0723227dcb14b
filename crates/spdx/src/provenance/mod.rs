//! provenance 출력
//!
//! - [`Predicate`]: SLSA v0.2 predicate 누적기 (교체 가능한 구현)
//! - [`Statement`]: SPDX 문서를 in-toto v0.1 statement로 내보내기

pub mod predicate;
pub mod statement;

pub use predicate::{
    BuildMetadata, Completeness, ConfigSource, DefaultPredicateImplementation, DigestSet,
    Invocation, Predicate, PredicateImplementation, ProvenanceBuilder, ProvenanceMaterial,
    ProvenancePredicate,
};
pub use statement::{ProvenanceOptions, Statement, Subject};

use std::io::Write;
use std::path::Path;

use crate::error::SpdxError;

/// provenance 파일 모드
pub const PROVENANCE_FILE_MODE: u32 = 0o644;

/// JSON 데이터를 파일에 기록합니다 (생성 또는 덮어쓰기, unix에서 0644).
pub(crate) fn write_json_file(path: &Path, data: &[u8]) -> Result<(), SpdxError> {
    let io_err = |e: std::io::Error| SpdxError::Io {
        path: path.display().to_string(),
        source: e,
    };

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PROVENANCE_FILE_MODE);
    }

    let mut file = options.open(path).map_err(io_err)?;
    file.write_all(data).map_err(io_err)?;

    // umask나 기존 파일 권한과 무관하게 모드 고정
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(PROVENANCE_FILE_MODE))
            .map_err(io_err)?;
    }
    Ok(())
}
