//! 설정 관리 -- bomsmith.toml 파싱 및 런타임 설정
//!
//! [`BomsmithConfig`]는 CLI와 문서 빌더가 공유하는 최상위 설정 구조체입니다.
//! SBOM 입력 목록(이미지, 파일, 디렉토리 등)은 여기에 두지 않고
//! 실행마다 명령줄 또는 SBOM 설정 파일로 전달합니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`BOMSMITH_GENERATE_MAX_CONCURRENCY=8` 형식)
//! 3. 설정 파일 (`bomsmith.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), bomsmith_core::error::BomsmithError> {
//! use bomsmith_core::config::BomsmithConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = BomsmithConfig::load("bomsmith.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = BomsmithConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BomsmithError, ConfigError};

/// 동시 스캔 워커 수 상한
const MAX_CONCURRENCY_LIMIT: usize = 256;

/// bomsmith 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BomsmithConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 문서 생성 기본값
    #[serde(default)]
    pub generate: GenerateDefaults,
}

impl BomsmithConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BomsmithError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값(+ 환경변수 오버라이드)을 사용합니다.
    ///
    /// 파일이 존재하지만 파싱에 실패하면 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, BomsmithError> {
        match Self::load(path.as_ref()).await {
            Err(BomsmithError::Config(ConfigError::FileNotFound { path })) => {
                tracing::debug!(path = %path, "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, BomsmithError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BomsmithError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                BomsmithError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, BomsmithError> {
        toml::from_str(toml_str).map_err(|e| {
            BomsmithError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `BOMSMITH_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "BOMSMITH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "BOMSMITH_GENERAL_LOG_FORMAT");

        // Generate
        override_string(
            &mut self.generate.namespace_base,
            "BOMSMITH_GENERATE_NAMESPACE_BASE",
        );
        override_string(&mut self.generate.creator, "BOMSMITH_GENERATE_CREATOR");
        override_usize(
            &mut self.generate.max_concurrency,
            "BOMSMITH_GENERATE_MAX_CONCURRENCY",
        );
        override_bool(
            &mut self.generate.process_go_modules,
            "BOMSMITH_GENERATE_PROCESS_GO_MODULES",
        );
        override_bool(
            &mut self.generate.only_direct_deps,
            "BOMSMITH_GENERATE_ONLY_DIRECT_DEPS",
        );
        override_bool(&mut self.generate.scan_images, "BOMSMITH_GENERATE_SCAN_IMAGES");
        override_bool(
            &mut self.generate.use_gitignore,
            "BOMSMITH_GENERATE_USE_GITIGNORE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), BomsmithError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.generate.max_concurrency == 0
            || self.generate.max_concurrency > MAX_CONCURRENCY_LIMIT
        {
            return Err(ConfigError::InvalidValue {
                field: "generate.max_concurrency".to_owned(),
                reason: format!("must be 1-{MAX_CONCURRENCY_LIMIT}"),
            }
            .into());
        }

        let base = &self.generate.namespace_base;
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                field: "generate.namespace_base".to_owned(),
                reason: "must be an http(s) URI".to_owned(),
            }
            .into());
        }

        if self.generate.creator.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "generate.creator".to_owned(),
                reason: "creator must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 문서 생성 기본값
///
/// 명령줄 플래그가 지정되지 않았을 때 빌더 옵션의 초기값으로 사용됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateDefaults {
    /// 문서 namespace 접두사 (`<base>/<name>-<uuid>` 형태로 완성)
    pub namespace_base: String,
    /// SPDX creationInfo에 기록할 도구 이름
    pub creator: String,
    /// 동시에 실행할 스캐너 수
    pub max_concurrency: usize,
    /// go.mod 분석 여부
    pub process_go_modules: bool,
    /// go 모듈 직접 의존성만 포함
    pub only_direct_deps: bool,
    /// 컨테이너 이미지 OS 식별 스캔 여부
    pub scan_images: bool,
    /// 디렉토리 스캔 시 .gitignore 제외 규칙 사용 여부
    pub use_gitignore: bool,
}

impl Default for GenerateDefaults {
    fn default() -> Self {
        Self {
            namespace_base: "https://spdx.org/spdxdocs".to_owned(),
            creator: "bomsmith".to_owned(),
            max_concurrency: 4,
            process_go_modules: true,
            only_direct_deps: false,
            scan_images: true,
            use_gitignore: true,
        }
    }
}

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = BomsmithConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.generate.max_concurrency, 4);
        assert!(config.generate.process_go_modules);
        assert!(!config.generate.only_direct_deps);
        assert!(config.generate.use_gitignore);
    }

    #[test]
    fn default_config_passes_validation() {
        BomsmithConfig::default().validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = BomsmithConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.generate.creator, "bomsmith");
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[generate]
max_concurrency = 8
"#;
        let config = BomsmithConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.generate.max_concurrency, 8);
        assert!(config.generate.scan_images);
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = BomsmithConfig::parse("this is not [valid toml");
        assert!(matches!(
            result,
            Err(BomsmithError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn validate_rejects_unknown_log_level() {
        let mut config = BomsmithConfig::default();
        config.general.log_level = "verbose".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_log_format() {
        let mut config = BomsmithConfig::default();
        config.general.log_format = "xml".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = BomsmithConfig::default();
        config.generate.max_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_namespace_base() {
        let mut config = BomsmithConfig::default();
        config.generate.namespace_base = "spdx-docs".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_creator() {
        let mut config = BomsmithConfig::default();
        config.generate.creator = String::new();
        assert!(config.validate().is_err());
    }
}
