//! 체크섬 유틸리티 -- 바이트 스트림의 콘텐츠 해시 계산
//!
//! SPDX 파일 체크섬은 알고리즘 이름(`SHA1`, `SHA256`, `SHA512`)에서
//! 소문자 16진수 다이제스트로의 매핑으로 기록됩니다.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::error::SpdxError;

/// 스트리밍 해시 버퍼 크기
const READ_BUF_SIZE: usize = 64 * 1024;

/// 체크섬 알고리즘
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChecksumAlgorithm {
    /// SHA-1 (패키지 검증 코드의 기준 알고리즘)
    Sha1,
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
}

impl ChecksumAlgorithm {
    /// 모든 알고리즘 목록
    pub const ALL: [ChecksumAlgorithm; 3] = [Self::Sha1, Self::Sha256, Self::Sha512];

    /// SPDX 문서에 기록되는 알고리즘 이름
    pub fn spdx_name(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }

    /// 문자열에서 알고리즘을 파싱합니다 (대소문자, 하이픈 무시).
    ///
    /// 예: "SHA1", "sha-256", "Sha512"
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_uppercase().replace('-', "").as_str() {
            "SHA1" => Some(Self::Sha1),
            "SHA256" => Some(Self::Sha256),
            "SHA512" => Some(Self::Sha512),
            _ => None,
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spdx_name())
    }
}

/// 알고리즘별 체크섬 맵
pub type Checksums = BTreeMap<ChecksumAlgorithm, String>;

/// 바이트 슬라이스의 SHA1 다이제스트 (소문자 hex)
pub fn sha1_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(Sha1::digest(data.as_ref()))
}

/// 바이트 슬라이스의 SHA256 다이제스트 (소문자 hex)
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(Sha256::digest(data.as_ref()))
}

/// 바이트 슬라이스의 SHA512 다이제스트 (소문자 hex)
pub fn sha512_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(Sha512::digest(data.as_ref()))
}

/// 리더를 끝까지 읽으며 세 알고리즘의 다이제스트를 한 번에 계산합니다.
pub fn checksums_from_reader<R: Read>(mut reader: R) -> std::io::Result<Checksums> {
    let mut sha1 = Sha1::new();
    let mut sha256 = Sha256::new();
    let mut sha512 = Sha512::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        sha1.update(&buf[..n]);
        sha256.update(&buf[..n]);
        sha512.update(&buf[..n]);
    }

    let mut sums = Checksums::new();
    sums.insert(ChecksumAlgorithm::Sha1, hex::encode(sha1.finalize()));
    sums.insert(ChecksumAlgorithm::Sha256, hex::encode(sha256.finalize()));
    sums.insert(ChecksumAlgorithm::Sha512, hex::encode(sha512.finalize()));
    Ok(sums)
}

/// 파일 내용의 체크섬을 계산합니다 (동기 I/O).
///
/// `tokio::task::spawn_blocking` 내에서 호출되어야 합니다.
pub fn checksums_from_file(path: &Path) -> Result<Checksums, SpdxError> {
    let file = std::fs::File::open(path).map_err(|e| SpdxError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    checksums_from_reader(std::io::BufReader::new(file)).map_err(|e| SpdxError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
