//! 에러 타입 -- 단계별 에러 정의
//!
//! SBOM 생성은 검증 → 스캔 → 검증 코드 계산 → 렌더링 → provenance 출력 순서로 진행됩니다.
//! [`BomsmithError`]의 각 variant는 실패한 단계를 식별하며, 원본 원인은
//! 메시지 안에 그대로 보존됩니다.

/// bomsmith 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum BomsmithError {
    /// 설정 관련 에러 (입력 누락, 존재하지 않는 경로 등)
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 문서 생성 에러 (스캐너 실패, 증거 불완전 등)
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    /// provenance 출력 에러
    #[error("provenance error: {0}")]
    Provenance(#[from] ProvenanceError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 문서 생성 에러
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// 스캐너 실패
    #[error("scanner failed: {0}")]
    ScanFailed(String),

    /// 패키지 파일 증거 불완전 (체크섬 누락)
    #[error("incomplete evidence: {0}")]
    IncompleteEvidence(String),

    /// 문서 그래프 불변식 위반 (중복 요소, 끊어진 관계 등)
    #[error("invalid document graph: {0}")]
    Graph(String),

    /// 문서 렌더링 실패
    #[error("render failed: {0}")]
    Render(String),
}

/// provenance 출력 에러
#[derive(Debug, thiserror::Error)]
pub enum ProvenanceError {
    /// JSON 직렬화 실패
    #[error("marshalling predicate: {0}")]
    Serialize(String),
}
