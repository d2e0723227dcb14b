//! SPDX 패키지 요소
//!
//! 패키지는 자신이 포함하는 [`File`]을 소유하며, purl 외부 참조로
//! 식별됩니다. 서로 다른 스캐너가 같은 패키지를 보고하면
//! [`Package::merge`]로 증거를 합칩니다.

use tracing::debug;

use super::file::File;
use crate::checksum::Checksums;
use crate::error::SpdxError;
use crate::purl::{PackageUrl, PurlSpec};
use crate::verification;

/// purl 외부 참조의 카테고리
pub const CATEGORY_PACKAGE_MANAGER: &str = "PACKAGE-MANAGER";

/// purl 외부 참조의 타입
pub const REF_TYPE_PURL: &str = "purl";

/// 패키지 외부 참조
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalRef {
    /// 참조 카테고리 (예: `PACKAGE-MANAGER`, `SECURITY`)
    pub category: String,
    /// 참조 타입 (예: `purl`, `cpe23Type`)
    pub ref_type: String,
    /// 참조 위치 값
    pub locator: String,
}

impl ExternalRef {
    /// purl 외부 참조를 생성합니다.
    pub fn purl(purl: &PackageUrl) -> Self {
        Self {
            category: CATEGORY_PACKAGE_MANAGER.to_owned(),
            ref_type: REF_TYPE_PURL.to_owned(),
            locator: purl.to_string(),
        }
    }

    /// purl 참조인지 확인합니다.
    pub fn is_purl(&self) -> bool {
        self.category == CATEGORY_PACKAGE_MANAGER && self.ref_type == REF_TYPE_PURL
    }
}

/// SPDX 패키지
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// SPDX 요소 ID (비어 있으면 문서에 추가될 때 할당)
    pub id: String,
    /// 패키지 이름
    pub name: String,
    /// 버전 (없으면 빈 문자열)
    pub version: String,
    /// 파일 수준 분석 여부
    pub files_analyzed: bool,
    /// 패키지 검증 코드 (`files_analyzed`가 false면 빈 문자열)
    pub verification_code: String,
    /// 외부 참조 (순서 유지)
    pub external_refs: Vec<ExternalRef>,
    /// 결론 라이선스
    pub license_concluded: String,
    /// 선언 라이선스
    pub license_declared: String,
    /// 저작권 표기
    pub copyright_text: String,
    /// 공급자
    pub supplier: String,
    /// 원작자
    pub originator: String,
    /// 다운로드 위치
    pub download_location: String,
    /// 패키지 자체 체크섬
    pub checksum: Checksums,
    files: Vec<File>,
}

impl Package {
    /// 이름만 가진 패키지를 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 버전을 설정합니다.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// purl 외부 참조를 추가합니다.
    pub fn with_purl(mut self, purl: &PackageUrl) -> Self {
        self.add_external_ref(ExternalRef::purl(purl));
        self
    }

    /// 외부 참조를 추가합니다. 이미 같은 참조가 있으면 무시합니다.
    pub fn add_external_ref(&mut self, external_ref: ExternalRef) {
        if !self.external_refs.contains(&external_ref) {
            self.external_refs.push(external_ref);
        }
    }

    /// 포함된 파일 목록 (추가 순서)
    pub fn files(&self) -> &[File] {
        &self.files
    }

    pub(crate) fn files_mut(&mut self) -> &mut [File] {
        &mut self.files
    }

    /// 이름으로 파일을 찾습니다.
    pub fn file(&self, name: &str) -> Option<&File> {
        self.files.iter().find(|f| f.name == name)
    }

    /// 파일을 추가합니다.
    ///
    /// 같은 이름의 파일이 이미 있으면 [`SpdxError::DuplicateFile`]을 반환합니다.
    pub fn add_file(&mut self, file: File) -> Result<(), SpdxError> {
        if self.file(&file.name).is_some() {
            return Err(SpdxError::DuplicateFile {
                package: self.name.clone(),
                file: file.name,
            });
        }
        self.files.push(file);
        Ok(())
    }

    /// 첫 번째로 파싱 가능한 purl 외부 참조를 반환합니다.
    ///
    /// 형식이 잘못된 purl은 건너뜁니다.
    pub fn purl(&self) -> Option<PackageUrl> {
        self.external_refs
            .iter()
            .filter(|r| r.is_purl())
            .find_map(|r| match r.locator.parse::<PackageUrl>() {
                Ok(purl) => Some(purl),
                Err(e) => {
                    debug!(
                        package = %self.name,
                        locator = %r.locator,
                        error = %e,
                        "ignoring malformed purl"
                    );
                    None
                }
            })
    }

    /// 패키지의 purl이 명세와 일치하는지 확인합니다.
    ///
    /// purl이 없는 패키지는 어떤 명세와도 일치하지 않습니다.
    pub fn purl_matches(&self, spec: &PurlSpec) -> bool {
        self.purl().is_some_and(|purl| spec.matches(&purl))
    }

    /// 같은 패키지로 판정된 다른 패키지의 증거를 합칩니다.
    ///
    /// 이름이 없는 파일과 없는 외부 참조는 뒤에 추가되고, 비어 있는 스칼라
    /// 필드는 `other`의 값으로 채워집니다. 추가된 파일 수를 반환합니다.
    pub fn merge(&mut self, other: Package) -> usize {
        let Package {
            id: _,
            name,
            version,
            files_analyzed,
            verification_code: _,
            external_refs,
            license_concluded,
            license_declared,
            copyright_text,
            supplier,
            originator,
            download_location,
            checksum,
            files,
        } = other;

        fill(&mut self.name, name);
        fill(&mut self.version, version);
        fill(&mut self.license_concluded, license_concluded);
        fill(&mut self.license_declared, license_declared);
        fill(&mut self.copyright_text, copyright_text);
        fill(&mut self.supplier, supplier);
        fill(&mut self.originator, originator);
        fill(&mut self.download_location, download_location);

        for (algorithm, value) in checksum {
            self.checksum.entry(algorithm).or_insert(value);
        }
        for external_ref in external_refs {
            self.add_external_ref(external_ref);
        }

        let before = self.files.len();
        for file in files {
            if self.file(&file.name).is_none() {
                self.files.push(file);
            }
        }

        self.files_analyzed |= files_analyzed;
        self.files.len() - before
    }

    /// 패키지 검증 코드를 계산하여 `verification_code`에 저장합니다.
    ///
    /// 계산에 실패하면 `verification_code`는 빈 문자열로 남습니다.
    pub fn compute_verification_code(&mut self) -> Result<(), SpdxError> {
        self.verification_code.clear();
        self.verification_code = verification::compute(self)?;
        Ok(())
    }
}

fn fill(target: &mut String, value: String) {
    if target.is_empty() {
        *target = value;
    }
}
