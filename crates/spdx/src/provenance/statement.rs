//! in-toto statement 내보내기
//!
//! 체크섬을 가진 문서 요소(패키지, 패키지 파일, 최상위 파일)가 statement의
//! subject가 되며, predicate에는 subject마다 하나의 재료가 기록됩니다.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::predicate::{
    BuildMetadata, DigestSet, Predicate, ProvenanceBuilder, ProvenancePredicate,
};
use super::write_json_file;
use crate::checksum::Checksums;
use crate::error::SpdxError;
use crate::model::Document;

/// in-toto statement 타입
pub const STATEMENT_TYPE: &str = "https://in-toto.io/Statement/v0.1";

/// SLSA provenance v0.2 predicate 타입
pub const SLSA_PREDICATE_TYPE: &str = "https://slsa.dev/provenance/v0.2";

/// statement subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// subject 이름
    pub name: String,
    /// 다이제스트
    pub digest: DigestSet,
}

/// in-toto v0.1 statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// statement 타입
    #[serde(rename = "_type")]
    pub statement_type: String,
    /// predicate 타입
    #[serde(rename = "predicateType")]
    pub predicate_type: String,
    /// subject 목록
    pub subject: Vec<Subject>,
    /// predicate
    pub predicate: ProvenancePredicate,
}

impl Statement {
    /// statement를 JSON 파일로 기록합니다 (unix에서 0644).
    pub fn write(&self, path: &Path) -> Result<(), SpdxError> {
        let data = serde_json::to_vec(self)
            .map_err(|e| SpdxError::Serialize(format!("marshalling statement to json: {e}")))?;
        write_json_file(path, &data)
    }
}

/// statement 생성 옵션
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceOptions {
    /// predicate 빌더 ID
    pub builder_id: String,
    /// predicate 빌드 타입
    pub build_type: String,
    /// subject 이름에서 제거할 경로 접두사
    pub strip_prefix: Option<String>,
}

impl Default for ProvenanceOptions {
    fn default() -> Self {
        Self {
            builder_id: "bomsmith".to_owned(),
            build_type: "https://spdx.dev/Document".to_owned(),
            strip_prefix: None,
        }
    }
}

impl ProvenanceOptions {
    fn subject_name(&self, name: &str) -> String {
        match self.strip_prefix {
            Some(ref prefix) => name
                .strip_prefix(prefix.as_str())
                .map(|n| n.trim_start_matches('/'))
                .unwrap_or(name)
                .to_owned(),
            None => name.to_owned(),
        }
    }
}

impl Document {
    /// 문서를 in-toto statement로 변환합니다.
    pub fn to_provenance_statement(&self, options: &ProvenanceOptions) -> Statement {
        let mut subjects = Vec::new();

        for package in self.packages() {
            if !package.checksum.is_empty() {
                subjects.push(Subject {
                    name: options.subject_name(&package.name),
                    digest: digest_set(&package.checksum),
                });
            }
            for file in package.files() {
                if !file.checksum.is_empty() {
                    subjects.push(Subject {
                        name: options.subject_name(&file.name),
                        digest: digest_set(&file.checksum),
                    });
                }
            }
        }
        for file in self.files() {
            if !file.checksum.is_empty() {
                subjects.push(Subject {
                    name: options.subject_name(&file.name),
                    digest: digest_set(&file.checksum),
                });
            }
        }

        let mut predicate = Predicate::from_provenance(ProvenancePredicate {
            builder: ProvenanceBuilder {
                id: options.builder_id.clone(),
            },
            build_type: options.build_type.clone(),
            metadata: Some(BuildMetadata {
                build_invocation_id: self.namespace.clone(),
                build_started_on: Some(self.creation_info.created.clone()),
                ..Default::default()
            }),
            ..Default::default()
        });
        for subject in &subjects {
            predicate.add_material(&subject.name, subject.digest.clone());
        }

        Statement {
            statement_type: STATEMENT_TYPE.to_owned(),
            predicate_type: SLSA_PREDICATE_TYPE.to_owned(),
            subject: subjects,
            predicate: predicate.provenance,
        }
    }

    /// 문서를 in-toto statement JSON 파일로 기록합니다.
    pub fn write_provenance_statement(
        &self,
        options: &ProvenanceOptions,
        path: &Path,
    ) -> Result<(), SpdxError> {
        self.to_provenance_statement(options).write(path)
    }
}

/// SPDX 체크섬을 in-toto 다이제스트 집합(소문자 알고리즘 이름)으로 변환합니다.
fn digest_set(sums: &Checksums) -> DigestSet {
    sums.iter()
        .map(|(algorithm, value)| (algorithm.spdx_name().to_lowercase(), value.clone()))
        .collect()
}
