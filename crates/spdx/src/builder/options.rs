//! 문서 생성 옵션

use std::path::{Path, PathBuf};

use bomsmith_core::config::GenerateDefaults;
use regex::Regex;

use crate::error::SpdxError;
use crate::scanner::{ScanSettings, SourceKind, SourceRequest};

/// 기본 동시 스캔 수
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// 기본 ignore 패턴 (`.git` 디렉토리)
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[r"^\.git(/|$)"];

/// 문서 생성 옵션
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// 레지스트리 이미지 참조
    pub images: Vec<String>,
    /// 로컬 이미지 tarball 경로
    pub image_archives: Vec<String>,
    /// 아카이브 경로
    pub archives: Vec<String>,
    /// 개별 파일 경로
    pub files: Vec<String>,
    /// 디렉토리 경로
    pub directories: Vec<String>,
    /// SBOM 구성 파일 경로
    pub config_file: Option<String>,
    /// 디렉토리 스캔 시 제외할 경로 정규식
    pub ignore_patterns: Vec<String>,
    /// `.gitignore` 적용 여부
    pub use_gitignore: bool,
    /// 상대 경로 해석 기준 디렉토리
    pub work_dir: Option<PathBuf>,
    /// 문서 namespace (없으면 자동 생성)
    pub namespace: Option<String>,
    /// 문서 이름
    pub name: Option<String>,
    /// 최상위 패키지에 선언할 SPDX 라이선스 식별자
    pub license: Option<String>,
    /// 이미지 레이어 분석 여부
    pub analyse_layers: bool,
    /// go.mod 의존성 처리 여부
    pub process_go_modules: bool,
    /// go 모듈 직접 의존성만 포함
    pub only_direct_deps: bool,
    /// 이미지 OS 패키지 스캔 여부
    pub scan_images: bool,
    /// 동시에 실행할 최대 스캔 수
    pub max_concurrency: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            image_archives: Vec::new(),
            archives: Vec::new(),
            files: Vec::new(),
            directories: Vec::new(),
            config_file: None,
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            use_gitignore: true,
            work_dir: None,
            namespace: None,
            name: None,
            license: None,
            analyse_layers: false,
            process_go_modules: true,
            only_direct_deps: false,
            scan_images: true,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl GenerateOptions {
    /// `bomsmith.toml`의 `[generate]` 기본값으로 옵션을 만듭니다.
    pub fn from_defaults(defaults: &GenerateDefaults) -> Self {
        Self {
            use_gitignore: defaults.use_gitignore,
            process_go_modules: defaults.process_go_modules,
            only_direct_deps: defaults.only_direct_deps,
            scan_images: defaults.scan_images,
            max_concurrency: defaults.max_concurrency,
            ..Self::default()
        }
    }

    /// 입력 소스가 하나라도 지정되었는지 확인합니다.
    pub fn has_inputs(&self) -> bool {
        !(self.images.is_empty()
            && self.image_archives.is_empty()
            && self.archives.is_empty()
            && self.files.is_empty()
            && self.directories.is_empty())
    }

    /// 상대 경로를 작업 디렉토리 기준으로 해석합니다.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        match self.work_dir {
            Some(ref dir) if p.is_relative() => dir.join(p),
            _ => p.to_path_buf(),
        }
    }

    /// 옵션을 검증합니다. 스캔을 시작하기 전에 호출됩니다.
    ///
    /// # Errors
    ///
    /// - 입력이 하나도 없고 구성 파일도 없으면 [`SpdxError::MissingInput`]
    /// - 작업 디렉토리가 없으면 `work_dir` 설정 에러
    /// - 로컬 경로가 없으면 카테고리, 1부터 시작하는 순번, 경로를 담은
    ///   [`SpdxError::PathNotFound`]
    /// - `max_concurrency`가 0이거나 ignore 패턴이 정규식이 아니면 설정 에러
    pub fn validate(&self) -> Result<(), SpdxError> {
        if !self.has_inputs() && self.config_file.is_none() {
            return Err(SpdxError::MissingInput);
        }

        if let Some(ref dir) = self.work_dir {
            if !dir.is_dir() {
                return Err(SpdxError::Config {
                    field: "work_dir".to_owned(),
                    reason: format!("directory {} not found", dir.display()),
                });
            }
        }

        let local_inputs = [
            (SourceKind::ImageArchive, &self.image_archives),
            (SourceKind::File, &self.files),
            (SourceKind::Directory, &self.directories),
            (SourceKind::Archive, &self.archives),
        ];
        for (kind, paths) in local_inputs {
            for (i, path) in paths.iter().enumerate() {
                if !self.resolve(path).exists() {
                    return Err(SpdxError::PathNotFound {
                        kind: kind.to_string(),
                        index: i + 1,
                        path: path.clone(),
                    });
                }
            }
        }

        if self.max_concurrency == 0 {
            return Err(SpdxError::Config {
                field: "max_concurrency".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        self.compile_ignore_patterns()?;
        Ok(())
    }

    /// 스캐너에 전달할 분석 설정을 만듭니다.
    pub fn scan_settings(&self) -> Result<ScanSettings, SpdxError> {
        Ok(ScanSettings {
            ignore_patterns: self.compile_ignore_patterns()?,
            use_gitignore: self.use_gitignore,
            process_go_modules: self.process_go_modules,
            only_direct_deps: self.only_direct_deps,
            analyse_layers: self.analyse_layers,
            scan_images: self.scan_images,
        })
    }

    /// 스캔 요청 목록을 만듭니다.
    ///
    /// 순서: 이미지, 이미지 아카이브, 아카이브, 디렉토리, 파일. 병합 순서도 이를 따릅니다.
    pub fn sources(&self) -> Vec<SourceRequest> {
        let groups = [
            (SourceKind::Image, &self.images),
            (SourceKind::ImageArchive, &self.image_archives),
            (SourceKind::Archive, &self.archives),
            (SourceKind::Directory, &self.directories),
            (SourceKind::File, &self.files),
        ];

        groups
            .into_iter()
            .flat_map(|(kind, locations)| {
                locations.iter().map(move |location| SourceRequest {
                    kind,
                    location: location.clone(),
                    path: if kind == SourceKind::Image {
                        PathBuf::from(location)
                    } else {
                        self.resolve(location)
                    },
                })
            })
            .collect()
    }

    fn compile_ignore_patterns(&self) -> Result<Vec<Regex>, SpdxError> {
        self.ignore_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| SpdxError::Config {
                    field: "ignore_patterns".to_owned(),
                    reason: format!("invalid pattern '{p}': {e}"),
                })
            })
            .collect()
    }
}
