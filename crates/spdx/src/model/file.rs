//! SPDX 파일 요소

use std::path::Path;

use crate::checksum::{self, ChecksumAlgorithm, Checksums};
use crate::error::SpdxError;

/// 패키지(또는 문서)에 속한 파일
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    /// SPDX 요소 ID (비어 있으면 문서에 추가될 때 할당)
    pub id: String,
    /// 파일 경로 (정렬/중복 판정 키)
    pub name: String,
    /// 알고리즘별 체크섬
    pub checksum: Checksums,
    /// 결론 라이선스
    pub license_concluded: String,
    /// 파일 내 라이선스 정보
    pub license_info_in_file: String,
    /// 저작권 표기
    pub copyright_text: String,
}

impl File {
    /// 이름만 가진 파일을 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 디스크의 파일을 읽어 체크섬을 채운 파일 요소를 생성합니다.
    ///
    /// 동기 I/O를 수행하므로 `spawn_blocking` 안에서 호출되어야 합니다.
    pub fn from_path(path: &Path, name: impl Into<String>) -> Result<Self, SpdxError> {
        let checksum = checksum::checksums_from_file(path)?;
        Ok(Self {
            name: name.into(),
            checksum,
            ..Default::default()
        })
    }

    /// 체크섬을 설정합니다.
    pub fn with_checksum(mut self, algorithm: ChecksumAlgorithm, hex: impl Into<String>) -> Self {
        self.checksum.insert(algorithm, hex.into());
        self
    }

    /// SHA1 체크섬
    pub fn sha1(&self) -> Option<&str> {
        self.checksum
            .get(&ChecksumAlgorithm::Sha1)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_ignores_empty_value() {
        let f = File::new("a.txt").with_checksum(ChecksumAlgorithm::Sha1, "");
        assert_eq!(f.sha1(), None);

        let f = File::new("a.txt").with_checksum(ChecksumAlgorithm::Sha1, "abc");
        assert_eq!(f.sha1(), Some("abc"));
    }

    #[test]
    fn from_path_hashes_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello\n").unwrap();

        let f = File::from_path(&path, "hello.txt").unwrap();
        assert_eq!(f.name, "hello.txt");
        assert_eq!(f.sha1(), Some("f572d396fae9206628714fb2ce00f72e94f2258f"));
        assert!(f.checksum.contains_key(&ChecksumAlgorithm::Sha256));
        assert!(f.id.is_empty());
    }
}
