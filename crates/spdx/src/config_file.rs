//! SBOM 구성 파일 (`--config`)
//!
//! 문서 메타데이터와 분석할 산출물 목록을 TOML 파일로 선언합니다.
//!
//! ```toml
//! name = "my-release"
//! namespace = "https://example.com/sbom/my-release"
//! license = "Apache-2.0"
//!
//! [[artifacts]]
//! type = "directory"
//! source = "."
//!
//! [[artifacts]]
//! type = "image"
//! source = "registry.k8s.io/pause:3.9"
//! ```
//!
//! 파일에 선언된 산출물은 명령줄 입력 뒤에 추가되고, 메타데이터는
//! 명령줄에서 지정하지 않은 경우에만 적용됩니다.

use std::path::Path;

use serde::Deserialize;

use crate::builder::GenerateOptions;
use crate::error::SpdxError;

/// 산출물 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// 레지스트리 이미지
    Image,
    /// 로컬 이미지 tarball
    ImageArchive,
    /// 일반 아카이브
    Archive,
    /// 디렉토리
    Directory,
    /// 파일
    File,
}

/// 구성 파일에 선언된 산출물
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artifact {
    /// 산출물 종류
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    /// 위치 (이미지 참조 또는 경로)
    pub source: String,
}

/// SBOM 구성 파일
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SbomConfigFile {
    /// 문서 이름
    pub name: Option<String>,
    /// 문서 namespace
    pub namespace: Option<String>,
    /// 선언 라이선스
    pub license: Option<String>,
    /// 산출물 목록
    pub artifacts: Vec<Artifact>,
}

impl SbomConfigFile {
    /// TOML 문자열에서 구성을 파싱합니다.
    pub fn parse(content: &str) -> Result<Self, SpdxError> {
        toml::from_str(content).map_err(|e| SpdxError::Config {
            field: "config_file".to_owned(),
            reason: e.to_string(),
        })
    }

    /// 파일에서 구성을 읽습니다.
    pub async fn load(path: &Path) -> Result<Self, SpdxError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpdxError::Config {
                    field: "config_file".to_owned(),
                    reason: format!("{} not found", path.display()),
                }
            } else {
                SpdxError::Io {
                    path: path.display().to_string(),
                    source: e,
                }
            }
        })?;
        Self::parse(&content)
    }

    /// 선언된 산출물과 메타데이터를 생성 옵션에 합칩니다.
    pub fn fold_into(self, options: &mut GenerateOptions) {
        if options.name.is_none() {
            options.name = self.name;
        }
        if options.namespace.is_none() {
            options.namespace = self.namespace;
        }
        if options.license.is_none() {
            options.license = self.license;
        }

        for artifact in self.artifacts {
            let target = match artifact.kind {
                ArtifactKind::Image => &mut options.images,
                ArtifactKind::ImageArchive => &mut options.image_archives,
                ArtifactKind::Archive => &mut options.archives,
                ArtifactKind::Directory => &mut options.directories,
                ArtifactKind::File => &mut options.files,
            };
            target.push(artifact.source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
name = "my-release"
license = "Apache-2.0"

[[artifacts]]
type = "directory"
source = "."

[[artifacts]]
type = "image-archive"
source = "images/app.tar"
"#;

    #[test]
    fn parse_sample() {
        let cfg = SbomConfigFile::parse(SAMPLE).unwrap();
        assert_eq!(cfg.name.as_deref(), Some("my-release"));
        assert_eq!(cfg.namespace, None);
        assert_eq!(cfg.artifacts.len(), 2);
        assert_eq!(cfg.artifacts[1].kind, ArtifactKind::ImageArchive);
    }

    #[test]
    fn unknown_artifact_type_is_config_error() {
        let err = SbomConfigFile::parse("[[artifacts]]\ntype = \"floppy\"\nsource = \"a\"\n")
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn fold_keeps_command_line_metadata() {
        let cfg = SbomConfigFile::parse(SAMPLE).unwrap();
        let mut options = GenerateOptions {
            name: Some("from-cli".to_owned()),
            directories: vec!["src".to_owned()],
            ..Default::default()
        };
        cfg.fold_into(&mut options);

        assert_eq!(options.name.as_deref(), Some("from-cli"));
        assert_eq!(options.license.as_deref(), Some("Apache-2.0"));
        assert_eq!(options.directories, vec!["src".to_owned(), ".".to_owned()]);
        assert_eq!(options.image_archives, vec!["images/app.tar".to_owned()]);
    }

    #[tokio::test]
    async fn load_missing_file_is_config_error() {
        let err = SbomConfigFile::load(Path::new("/nonexistent/sbom.toml"))
            .await
            .unwrap_err();
        assert!(err.is_config());
    }
}
