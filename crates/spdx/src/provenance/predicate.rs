//! SLSA v0.2 provenance predicate 누적기
//!
//! [`Predicate`]는 빌드 재료(material)를 호출 순서대로 누적하고 JSON 파일로
//! 내보냅니다. 실제 동작은 교체 가능한 [`PredicateImplementation`]에 위임되어
//! 테스트에서 기록용 구현으로 바꿔 끼울 수 있습니다.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::write_json_file;
use crate::error::SpdxError;

/// 알고리즘 이름(`sha256` 등)에서 다이제스트로의 매핑
pub type DigestSet = BTreeMap<String, String>;

/// 빌더 식별자
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceBuilder {
    /// 빌더 URI
    pub id: String,
}

/// 빌드 설정 출처
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSource {
    /// 설정 위치
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    /// 설정 다이제스트
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub digest: DigestSet,
    /// 진입점
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub entry_point: String,
}

/// 빌드 호출 정보
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    /// 설정 출처
    #[serde(default)]
    pub config_source: ConfigSource,
    /// 외부 파라미터
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
    /// 실행 환경
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<serde_json::Value>,
}

/// 메타데이터 완전성 표시
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    /// 파라미터가 완전한지
    #[serde(default)]
    pub parameters: bool,
    /// 환경이 완전한지
    #[serde(default)]
    pub environment: bool,
    /// 재료 목록이 완전한지
    #[serde(default)]
    pub materials: bool,
}

/// 빌드 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetadata {
    /// 빌드 호출 ID
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build_invocation_id: String,
    /// 시작 시각 (RFC3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_started_on: Option<String>,
    /// 종료 시각 (RFC3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_finished_on: Option<String>,
    /// 완전성
    #[serde(default)]
    pub completeness: Completeness,
    /// 재현 가능 여부
    #[serde(default)]
    pub reproducible: bool,
}

/// 빌드 재료
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceMaterial {
    /// 재료 URI
    pub uri: String,
    /// 다이제스트
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub digest: DigestSet,
}

/// SLSA v0.2 provenance predicate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenancePredicate {
    /// 빌더
    pub builder: ProvenanceBuilder,
    /// 빌드 타입 URI
    pub build_type: String,
    /// 호출 정보
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation: Option<Invocation>,
    /// 빌드 설정
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_config: Option<serde_json::Value>,
    /// 메타데이터
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BuildMetadata>,
    /// 재료 목록 (첫 추가 시 생성)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<ProvenanceMaterial>>,
}

/// predicate 동작 전략
pub trait PredicateImplementation: Send + Sync {
    /// 재료를 추가합니다.
    fn add_material(&self, predicate: &mut ProvenancePredicate, uri: &str, digest: DigestSet);

    /// predicate를 JSON 파일로 기록합니다.
    fn write(&self, predicate: &ProvenancePredicate, path: &Path) -> Result<(), SpdxError>;
}

/// 기본 구현: 재료는 호출 순서대로 추가(중복 허용), 파일은 0644 모드로 기록
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPredicateImplementation;

impl PredicateImplementation for DefaultPredicateImplementation {
    fn add_material(&self, predicate: &mut ProvenancePredicate, uri: &str, digest: DigestSet) {
        predicate
            .materials
            .get_or_insert_with(Vec::new)
            .push(ProvenanceMaterial {
                uri: uri.to_owned(),
                digest,
            });
    }

    fn write(&self, predicate: &ProvenancePredicate, path: &Path) -> Result<(), SpdxError> {
        let data = serde_json::to_vec(predicate)
            .map_err(|e| SpdxError::Serialize(format!("marshalling predicate to json: {e}")))?;
        write_json_file(path, &data)
    }
}

/// provenance predicate와 교체 가능한 구현
pub struct Predicate {
    /// predicate 데이터
    pub provenance: ProvenancePredicate,
    implementation: Box<dyn PredicateImplementation>,
}

impl Default for Predicate {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicate")
            .field("provenance", &self.provenance)
            .finish_non_exhaustive()
    }
}

impl Predicate {
    /// 기본 구현을 사용하는 빈 predicate를 생성합니다.
    pub fn new() -> Self {
        Self::from_provenance(ProvenancePredicate::default())
    }

    /// 주어진 데이터로 predicate를 생성합니다.
    pub fn from_provenance(provenance: ProvenancePredicate) -> Self {
        Self {
            provenance,
            implementation: Box::new(DefaultPredicateImplementation),
        }
    }

    /// 구현을 교체합니다.
    pub fn set_implementation(&mut self, implementation: Box<dyn PredicateImplementation>) {
        self.implementation = implementation;
    }

    /// 재료를 추가합니다.
    pub fn add_material(&mut self, uri: &str, digest: DigestSet) {
        self.implementation
            .add_material(&mut self.provenance, uri, digest);
    }

    /// 누적된 재료 목록
    pub fn materials(&self) -> &[ProvenanceMaterial] {
        self.provenance.materials.as_deref().unwrap_or_default()
    }

    /// predicate를 JSON 파일로 기록합니다.
    pub fn write(&self, path: &Path) -> Result<(), SpdxError> {
        self.implementation.write(&self.provenance, path)
    }
}
