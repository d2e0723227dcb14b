//! 입력 소스 스캐너
//!
//! [`Scanner`] trait은 하나의 입력 소스(이미지, 아카이브, 디렉토리, 파일)를
//! 분석하여 패키지와 파일 증거를 [`ScanOutput`]으로 반환하는 인터페이스입니다.
//! [`ScannerRegistry`]는 입력 카테고리별로 스캐너를 보관하며,
//! 문서 빌더는 요청된 카테고리마다 등록된 스캐너를 찾아 실행합니다.
//!
//! # 기본 제공 스캐너
//!
//! - [`FileScanner`]: 개별 파일 해시
//! - [`DirectoryScanner`]: `.gitignore`를 따르는 디렉토리 순회와 go.mod 의존성
//!
//! 컨테이너 이미지, 이미지 아카이브, 일반 아카이브 스캐너는 포함되어 있지 않으며
//! `Scanner` trait을 구현하여 [`ScannerRegistry::register`]로 추가합니다.
//!
//! # 실행 모델
//!
//! `scan`은 동기 함수이며 빌더가 `tokio::task::spawn_blocking` 안에서 호출합니다.

pub mod directory;
pub mod file;
pub mod gomod;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use regex::Regex;

use crate::error::SpdxError;
use crate::model::{File, Package};

pub use directory::DirectoryScanner;
pub use file::FileScanner;

/// 입력 소스 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    /// 레지스트리 이미지 참조
    Image,
    /// 로컬 이미지 tarball
    ImageArchive,
    /// 일반 아카이브 (tar, tar.gz)
    Archive,
    /// 디렉토리
    Directory,
    /// 개별 파일
    File,
}

impl SourceKind {
    /// 사람이 읽는 카테고리 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::ImageArchive => "image archive",
            Self::Archive => "archive",
            Self::Directory => "directory",
            Self::File => "file",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 모든 스캐너가 공유하는 분석 설정
#[derive(Debug, Clone, Default)]
pub struct ScanSettings {
    /// 제외할 상대 경로 정규식
    pub ignore_patterns: Vec<Regex>,
    /// `.gitignore` 규칙 적용 여부
    pub use_gitignore: bool,
    /// go.mod 의존성 처리 여부
    pub process_go_modules: bool,
    /// go 모듈 직접 의존성만 포함할지 여부
    pub only_direct_deps: bool,
    /// 이미지 레이어 분석 여부
    pub analyse_layers: bool,
    /// 이미지 내부 OS 패키지 스캔 여부
    pub scan_images: bool,
}

impl ScanSettings {
    /// 상대 경로가 ignore 패턴 중 하나와 일치하는지 확인합니다.
    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.ignore_patterns
            .iter()
            .any(|re| re.is_match(relative_path))
    }
}

/// 스캔 요청
#[derive(Debug, Clone)]
pub struct SourceRequest {
    /// 입력 카테고리
    pub kind: SourceKind,
    /// 사용자가 지정한 그대로의 위치 (이름과 메시지에 사용)
    pub location: String,
    /// 작업 디렉토리 기준으로 해석된 경로
    pub path: PathBuf,
}

/// 의존성과 함께 보고된 패키지
#[derive(Debug, Clone, Default)]
pub struct ScannedPackage {
    /// 최상위 패키지
    pub package: Package,
    /// 이 패키지가 의존하는 패키지
    pub dependencies: Vec<Package>,
}

impl From<Package> for ScannedPackage {
    fn from(package: Package) -> Self {
        Self {
            package,
            dependencies: Vec::new(),
        }
    }
}

/// 스캐너 결과
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    /// 발견된 최상위 패키지
    pub packages: Vec<ScannedPackage>,
    /// 어떤 패키지에도 속하지 않는 파일
    pub files: Vec<File>,
}

/// 입력 소스 스캐너 trait
pub trait Scanner: Send + Sync {
    /// 스캐너 이름 (로그와 에러 메시지용)
    fn name(&self) -> &'static str;

    /// 이 스캐너가 처리하는 입력 카테고리
    fn kind(&self) -> SourceKind;

    /// 소스를 분석합니다. 블로킹 I/O를 수행할 수 있습니다.
    fn scan(&self, request: &SourceRequest, settings: &ScanSettings)
    -> Result<ScanOutput, SpdxError>;
}

/// 입력 카테고리별 스캐너 레지스트리
#[derive(Clone, Default)]
pub struct ScannerRegistry {
    scanners: HashMap<SourceKind, Arc<dyn Scanner>>,
}

impl ScannerRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 제공 파일/디렉토리 스캐너가 등록된 레지스트리를 생성합니다.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FileScanner));
        registry.register(Arc::new(DirectoryScanner));
        registry
    }

    /// 스캐너를 등록합니다. 같은 카테고리의 기존 스캐너는 교체됩니다.
    pub fn register(&mut self, scanner: Arc<dyn Scanner>) {
        self.scanners.insert(scanner.kind(), scanner);
    }

    /// 카테고리에 등록된 스캐너를 반환합니다.
    pub fn get(&self, kind: SourceKind) -> Option<Arc<dyn Scanner>> {
        self.scanners.get(&kind).cloned()
    }

    /// 등록된 카테고리 목록 (정렬됨)
    pub fn kinds(&self) -> Vec<SourceKind> {
        let mut kinds: Vec<SourceKind> = self.scanners.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl fmt::Debug for ScannerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScannerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// 경로의 마지막 구성 요소를 이름으로 사용합니다.
pub(crate) fn base_name(path: &std::path::Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .unwrap_or_else(|| fallback.to_owned())
}
