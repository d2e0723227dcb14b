//! SPDX 문서 그래프
//!
//! [`Document`]는 패키지, 최상위 파일, 관계를 소유하며 다음 불변식을 지킵니다.
//!
//! - 모든 요소 ID는 문서 안에서 유일합니다. ID가 비어 있는 요소는
//!   이름/버전/경로에서 결정론적으로 만든 ID를 받고, 충돌 시 `-2`, `-3`...
//!   접미사가 붙습니다.
//! - 관계의 양 끝은 반드시 문서의 요소여야 합니다.
//! - 같은 관계는 한 번만 기록됩니다.

use std::collections::HashSet;

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use super::file::File;
use super::package::Package;
use super::relationship::{Relationship, RelationshipType};
use super::spdx_id_fragment;
use crate::error::SpdxError;
use crate::purl::PurlSpec;

/// 문서 자신의 SPDX 요소 ID
pub const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";

/// SPDX 문서 데이터 라이선스
pub const DATA_LICENSE: &str = "CC0-1.0";

/// SPDX 사양 버전
pub const SPDX_VERSION: &str = "SPDX-2.3";

/// 기본 문서 namespace 접두사
pub const DEFAULT_NAMESPACE_BASE: &str = "https://spdx.org/spdxdocs";

/// 기본 생성 도구 이름
pub const DEFAULT_CREATOR: &str = "bomsmith";

/// 문서 생성 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationInfo {
    /// 생성 시각 (RFC3339, UTC)
    pub created: String,
    /// 생성자 목록 (예: `Tool: bomsmith`)
    pub creators: Vec<String>,
}

impl CreationInfo {
    /// 현재 시각과 도구 이름으로 생성 정보를 만듭니다.
    pub fn now(tool: &str) -> Self {
        Self {
            created: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            creators: vec![format!("Tool: {tool}")],
        }
    }
}

/// SPDX 문서
#[derive(Debug, Clone)]
pub struct Document {
    /// 문서 ID (`SPDXRef-DOCUMENT`)
    pub id: String,
    /// 문서 이름
    pub name: String,
    /// 문서 namespace (실행마다 유일)
    pub namespace: String,
    /// 데이터 라이선스
    pub data_license: String,
    /// 생성 정보
    pub creation_info: CreationInfo,
    packages: Vec<Package>,
    files: Vec<File>,
    relationships: Vec<Relationship>,
    element_ids: HashSet<String>,
    relationship_index: HashSet<Relationship>,
}

impl Document {
    /// 새 문서를 생성합니다. namespace는 기본 접두사와 UUID v4로 만들어집니다.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: DOCUMENT_ID.to_owned(),
            namespace: Self::default_namespace(DEFAULT_NAMESPACE_BASE, &name),
            name,
            data_license: DATA_LICENSE.to_owned(),
            creation_info: CreationInfo::now(DEFAULT_CREATOR),
            packages: Vec::new(),
            files: Vec::new(),
            relationships: Vec::new(),
            element_ids: HashSet::new(),
            relationship_index: HashSet::new(),
        }
    }

    /// `<base>/<name>-<uuid v4>` 형식의 유일한 namespace를 만듭니다.
    pub fn default_namespace(base: &str, name: &str) -> String {
        format!(
            "{}/{}-{}",
            base.trim_end_matches('/'),
            spdx_id_fragment(name),
            Uuid::new_v4()
        )
    }

    /// namespace를 지정합니다.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// 패키지 목록 (추가 순서)
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// 최상위 파일 목록 (추가 순서)
    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// 관계 목록 (추가 순서)
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// ID로 패키지를 찾습니다.
    pub fn package(&self, id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == id)
    }

    pub(crate) fn package_mut(&mut self, id: &str) -> Option<&mut Package> {
        self.packages.iter_mut().find(|p| p.id == id)
    }

    /// purl 명세와 일치하는 첫 번째 패키지를 찾습니다.
    pub fn find_package(&self, spec: &PurlSpec) -> Option<&Package> {
        self.packages.iter().find(|p| p.purl_matches(spec))
    }

    /// 문서에 해당 ID의 요소가 있는지 확인합니다.
    pub fn has_element(&self, id: &str) -> bool {
        id == self.id || self.element_ids.contains(id)
    }

    /// 패키지를 추가하고 할당된 ID를 반환합니다.
    ///
    /// 패키지와 그 파일의 ID가 비어 있으면 결정론적 ID가 할당됩니다.
    /// 명시된 ID가 이미 존재하면 [`SpdxError::DuplicateElement`]를 반환하며
    /// 문서는 변경되지 않습니다.
    pub fn add_package(&mut self, mut package: Package) -> Result<String, SpdxError> {
        let requests = std::iter::once((package.id.clone(), package_base_id(&package))).chain(
            package
                .files()
                .iter()
                .map(|f| (f.id.clone(), file_base_id(f))),
        );
        let ids = self.plan_ids(requests)?;

        let mut ids = ids.into_iter();
        if let Some(id) = ids.next() {
            package.id = id;
        }
        for (file, id) in package.files_mut().iter_mut().zip(ids) {
            file.id = id;
        }

        let id = package.id.clone();
        self.commit_package_ids(&package);
        self.packages.push(package);
        Ok(id)
    }

    /// 기존 패키지에 다른 패키지의 증거를 합칩니다.
    ///
    /// 새로 추가되는 파일에는 ID가 할당됩니다. 추가된 파일 수를 반환합니다.
    pub fn merge_package(&mut self, id: &str, other: Package) -> Result<usize, SpdxError> {
        let index = self
            .packages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| SpdxError::DanglingRelationship {
                element: self.id.clone(),
                related: id.to_owned(),
            })?;

        let target = &self.packages[index];
        let requests: Vec<(String, String)> = other
            .files()
            .iter()
            .filter(|f| target.file(&f.name).is_none())
            .map(|f| (f.id.clone(), file_base_id(f)))
            .collect();
        let ids = self.plan_ids(requests.into_iter())?;

        let target = &mut self.packages[index];
        let before = target.files().len();
        let added = target.merge(other);
        for (file, id) in target.files_mut()[before..].iter_mut().zip(ids) {
            file.id = id;
        }
        for file in &self.packages[index].files()[before..] {
            self.element_ids.insert(file.id.clone());
        }
        Ok(added)
    }

    /// 최상위 파일을 추가하고 할당된 ID를 반환합니다.
    pub fn add_file(&mut self, mut file: File) -> Result<String, SpdxError> {
        let ids = self.plan_ids(std::iter::once((file.id.clone(), file_base_id(&file))))?;
        if let Some(id) = ids.into_iter().next() {
            file.id = id;
        }
        let id = file.id.clone();
        self.element_ids.insert(id.clone());
        self.files.push(file);
        Ok(id)
    }

    /// 관계를 추가합니다.
    ///
    /// 어느 한쪽 끝이 문서의 요소가 아니면 [`SpdxError::DanglingRelationship`]을
    /// 반환합니다. 이미 같은 관계가 있으면 `false`를 반환합니다.
    pub fn add_relationship(&mut self, relationship: Relationship) -> Result<bool, SpdxError> {
        if !self.has_element(&relationship.element) || !self.has_element(&relationship.related) {
            return Err(SpdxError::DanglingRelationship {
                element: relationship.element,
                related: relationship.related,
            });
        }
        if !self.relationship_index.insert(relationship.clone()) {
            return Ok(false);
        }
        self.relationships.push(relationship);
        Ok(true)
    }

    /// 문서가 요소를 기술한다는 `DESCRIBES` 관계를 추가합니다.
    pub fn describe(&mut self, id: &str) -> Result<bool, SpdxError> {
        let rel = Relationship::new(self.id.clone(), RelationshipType::Describes, id);
        self.add_relationship(rel)
    }

    /// 모든 패키지의 검증 코드를 계산합니다.
    pub fn compute_verification_codes(&mut self) -> Result<(), SpdxError> {
        for package in &mut self.packages {
            package.compute_verification_code()?;
        }
        Ok(())
    }

    fn commit_package_ids(&mut self, package: &Package) {
        self.element_ids.insert(package.id.clone());
        for file in package.files() {
            self.element_ids.insert(file.id.clone());
        }
    }

    /// 요청된 ID 목록을 유일한 ID로 확정합니다. 실패 시 아무것도 예약하지 않습니다.
    fn plan_ids(
        &self,
        requests: impl Iterator<Item = (String, String)>,
    ) -> Result<Vec<String>, SpdxError> {
        let mut planned: HashSet<String> = HashSet::new();
        let mut ids = Vec::new();

        for (explicit, base) in requests {
            let id = if explicit.is_empty() {
                let taken =
                    |candidate: &str| self.has_element(candidate) || planned.contains(candidate);
                let mut candidate = base.clone();
                let mut suffix = 2;
                while taken(&candidate) {
                    candidate = format!("{base}-{suffix}");
                    suffix += 1;
                }
                candidate
            } else {
                if self.has_element(&explicit) || planned.contains(&explicit) {
                    return Err(SpdxError::DuplicateElement(explicit));
                }
                explicit
            };
            planned.insert(id.clone());
            ids.push(id);
        }
        Ok(ids)
    }
}

fn package_base_id(package: &Package) -> String {
    if package.version.is_empty() {
        format!("SPDXRef-Package-{}", spdx_id_fragment(&package.name))
    } else {
        format!(
            "SPDXRef-Package-{}-{}",
            spdx_id_fragment(&package.name),
            spdx_id_fragment(&package.version)
        )
    }
}

fn file_base_id(file: &File) -> String {
    format!("SPDXRef-File-{}", spdx_id_fragment(&file.name))
}
