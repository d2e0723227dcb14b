//! SPDX 엔진 에러 타입
//!
//! [`SpdxError`]는 문서 조립, 검증 코드 계산, 스캐너 실행, 렌더링,
//! provenance 출력 중 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<SpdxError> for BomsmithError` 구현을 통해 `?` 연산자로
//! 단계 식별 에러로 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **설정**: `Config`, `MissingInput`, `PathNotFound`, `NoScanner`
//! - **증거 불완전**: `IncompleteEvidence`
//! - **그래프 불변식**: `DuplicateFile`, `DuplicateElement`, `DanglingRelationship`
//! - **purl 파싱**: `Purl` (패키지 조회 시에는 `None`으로 복구됨)
//! - **스캐너**: `Scanner`, `Task`
//! - **출력**: `Render`, `Serialize`, `Io`

use bomsmith_core::error::{BomsmithError, ConfigError, GenerationError, ProvenanceError};

use crate::purl::PurlError;

/// SPDX 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum SpdxError {
    /// 설정 값 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 입력 소스가 하나도 지정되지 않음
    #[error("to generate a SPDX BOM you have to provide at least one image or file")]
    MissingInput,

    /// 지정된 로컬 경로가 존재하지 않음
    #[error("{kind} #{index} not found ({path})")]
    PathNotFound {
        /// 입력 카테고리 (file, directory, ...)
        kind: String,
        /// 1부터 시작하는 입력 순번
        index: usize,
        /// 경로
        path: String,
    },

    /// 요청된 입력 카테고리를 처리할 스캐너가 등록되지 않음
    #[error("no scanner registered for {0} sources")]
    NoScanner(String),

    /// purl 파싱 실패
    #[error("invalid purl: {0}")]
    Purl(#[from] PurlError),

    /// 패키지 내 파일 이름 중복
    #[error("duplicate file in package {package}: {file}")]
    DuplicateFile {
        /// 패키지 이름
        package: String,
        /// 파일 이름
        file: String,
    },

    /// 문서 내 SPDX 요소 ID 중복
    #[error("duplicate element id: {0}")]
    DuplicateElement(String),

    /// 존재하지 않는 요소를 가리키는 관계
    #[error("relationship references unknown element: {element} -> {related}")]
    DanglingRelationship {
        /// 관계 시작 요소
        element: String,
        /// 관계 대상 요소
        related: String,
    },

    /// 파일 분석된 패키지에 체크섬 없는 파일이 있음
    #[error("computing verification code for package {package}: file {file} has no SHA1 checksum")]
    IncompleteEvidence {
        /// 패키지 이름
        package: String,
        /// 체크섬이 없는 파일
        file: String,
    },

    /// 스캐너 실패
    #[error("scanner {scanner} failed on {source_path}: {source}")]
    Scanner {
        /// 스캐너 이름
        scanner: String,
        /// 입력 소스
        source_path: String,
        /// 원인 에러
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 스캔 태스크 실행 실패 (panic, 취소)
    #[error("scan task error: {0}")]
    Task(String),

    /// 문서 렌더링 실패
    #[error("render error: {0}")]
    Render(String),

    /// JSON 직렬화 실패
    #[error("serialization error: {0}")]
    Serialize(String),

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },
}

impl SpdxError {
    /// 스캐너 에러를 생성합니다.
    ///
    /// `reason`은 문자열 또는 원인 에러이며 `Error::source()`로 조회됩니다.
    pub fn scanner(
        scanner: impl Into<String>,
        source_path: impl Into<String>,
        reason: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Scanner {
            scanner: scanner.into(),
            source_path: source_path.into(),
            source: reason.into(),
        }
    }

    /// 설정 단계에서 발생한 에러인지 반환합니다.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::MissingInput
                | Self::PathNotFound { .. }
                | Self::NoScanner(_)
        )
    }
}

impl From<SpdxError> for BomsmithError {
    fn from(err: SpdxError) -> Self {
        match err {
            SpdxError::Config { field, reason } => {
                BomsmithError::Config(ConfigError::InvalidValue { field, reason })
            }
            e @ (SpdxError::MissingInput
            | SpdxError::PathNotFound { .. }
            | SpdxError::NoScanner(_)) => BomsmithError::Config(ConfigError::InvalidValue {
                field: "inputs".to_owned(),
                reason: e.to_string(),
            }),
            e @ SpdxError::IncompleteEvidence { .. } => {
                BomsmithError::Generation(GenerationError::IncompleteEvidence(e.to_string()))
            }
            e @ (SpdxError::Purl(_)
            | SpdxError::DuplicateFile { .. }
            | SpdxError::DuplicateElement(_)
            | SpdxError::DanglingRelationship { .. }) => {
                BomsmithError::Generation(GenerationError::Graph(e.to_string()))
            }
            e @ (SpdxError::Scanner { .. } | SpdxError::Task(_)) => {
                BomsmithError::Generation(GenerationError::ScanFailed(e.to_string()))
            }
            SpdxError::Render(msg) => BomsmithError::Generation(GenerationError::Render(msg)),
            SpdxError::Serialize(msg) => BomsmithError::Provenance(ProvenanceError::Serialize(msg)),
            SpdxError::Io { path, source } => {
                BomsmithError::Io(std::io::Error::new(source.kind(), format!("{path}: {source}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_not_found_display() {
        let err = SpdxError::PathNotFound {
            kind: "image archive".to_owned(),
            index: 2,
            path: "/tmp/nginx.tar".to_owned(),
        };
        assert_eq!(err.to_string(), "image archive #2 not found (/tmp/nginx.tar)");
    }

    #[test]
    fn incomplete_evidence_display() {
        let err = SpdxError::IncompleteEvidence {
            package: "busybox".to_owned(),
            file: "bin/sh".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("busybox"));
        assert!(msg.contains("bin/sh"));
    }

    #[test]
    fn scanner_error_display() {
        let err = SpdxError::scanner("directory", "/src", "permission denied");
        let msg = err.to_string();
        assert!(msg.contains("directory"));
        assert!(msg.contains("/src"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn scanner_error_keeps_cause() {
        use std::error::Error as _;

        let cause = SpdxError::Io {
            path: "src/main.go".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let err = SpdxError::scanner("directory", "src", cause);

        let source = err.source().expect("scanner error should expose its cause");
        match source.downcast_ref::<SpdxError>() {
            Some(SpdxError::Io { path, .. }) => assert_eq!(path, "src/main.go"),
            other => panic!("expected io cause, got {other:?}"),
        }
        assert!(err.to_string().contains("src/main.go"));
    }

    #[test]
    fn config_errors_are_classified() {
        assert!(SpdxError::MissingInput.is_config());
        assert!(SpdxError::NoScanner("image".to_owned()).is_config());
        assert!(!SpdxError::Task("panicked".to_owned()).is_config());
    }

    #[test]
    fn converts_missing_input_to_config_error() {
        let err: BomsmithError = SpdxError::MissingInput.into();
        assert!(matches!(err, BomsmithError::Config(_)));
    }

    #[test]
    fn converts_incomplete_evidence_to_generation_error() {
        let err: BomsmithError = SpdxError::IncompleteEvidence {
            package: "p".to_owned(),
            file: "f".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            BomsmithError::Generation(GenerationError::IncompleteEvidence(_))
        ));
    }

    #[test]
    fn converts_scanner_to_generation_error() {
        let err: BomsmithError = SpdxError::scanner("file", "a.txt", "boom").into();
        assert!(matches!(
            err,
            BomsmithError::Generation(GenerationError::ScanFailed(_))
        ));
    }

    #[test]
    fn converts_io_keeping_path_and_kind() {
        let err: BomsmithError = SpdxError::Io {
            path: "/tmp/out.json".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        match err {
            BomsmithError::Io(io) => {
                assert_eq!(io.kind(), std::io::ErrorKind::PermissionDenied);
                assert!(io.to_string().contains("/tmp/out.json"));
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn converts_serialize_to_provenance_error() {
        let err: BomsmithError = SpdxError::Serialize("bad float".to_owned()).into();
        assert!(matches!(
            err,
            BomsmithError::Provenance(ProvenanceError::Serialize(_))
        ));
    }
}
