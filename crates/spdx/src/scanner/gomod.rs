//! go.mod 의존성 리더
//!
//! `go.mod`의 `module`, `go`, `require` 지시어를 읽어 Go 모듈 의존성을
//! SPDX 패키지로 변환합니다. `// indirect` 주석이 붙은 요구사항은 간접
//! 의존성으로 표시됩니다. `replace`, `exclude`, `retract` 등 나머지 지시어는
//! 무시합니다.

use std::path::Path;

use crate::error::SpdxError;
use crate::model::Package;
use crate::purl::PackageUrl;

/// go.mod 파일 이름
pub const GO_MOD_FILE: &str = "go.mod";

const GO_PROXY: &str = "https://proxy.golang.org";

/// go.mod의 require 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    /// 모듈 경로 (예: `github.com/sirupsen/logrus`)
    pub path: String,
    /// 버전 (예: `v1.8.1`)
    pub version: String,
    /// `// indirect` 여부
    pub indirect: bool,
}

impl GoModule {
    /// `pkg:golang/...` purl
    pub fn purl(&self) -> Option<PackageUrl> {
        module_purl(&self.path, &self.version)
    }

    /// SPDX 패키지로 변환합니다.
    pub fn to_package(&self) -> Package {
        let mut package = Package::new(&self.path).with_version(&self.version);
        package.download_location = format!(
            "{GO_PROXY}/{}/@v/{}.zip",
            escape_module_path(&self.path),
            escape_module_path(&self.version)
        );
        if let Some(purl) = self.purl() {
            package = package.with_purl(&purl);
        }
        package
    }
}

/// 파싱된 go.mod
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoModFile {
    /// 모듈 경로
    pub module: String,
    /// `go` 지시어 버전
    pub go_version: Option<String>,
    /// require 목록 (파일 순서)
    pub requires: Vec<GoModule>,
}

impl GoModFile {
    /// 의존성 목록을 반환합니다. `only_direct`면 간접 의존성을 제외합니다.
    pub fn dependencies(&self, only_direct: bool) -> impl Iterator<Item = &GoModule> {
        self.requires
            .iter()
            .filter(move |m| !(only_direct && m.indirect))
    }
}

/// go.mod 내용을 파싱합니다.
pub fn parse(content: &str, source_path: &str) -> Result<GoModFile, SpdxError> {
    let mut file = GoModFile::default();
    let mut block: Option<String> = None;

    for (lineno, raw) in content.lines().enumerate() {
        let (code, comment) = match raw.split_once("//") {
            Some((code, comment)) => (code.trim(), comment.trim()),
            None => (raw.trim(), ""),
        };
        if code.is_empty() {
            continue;
        }

        if let Some(ref directive) = block {
            if code == ")" {
                block = None;
                continue;
            }
            if directive == "require" {
                file.requires
                    .push(parse_require(code, comment, source_path, lineno + 1)?);
            }
            continue;
        }

        let (directive, rest) = match code.split_once(char::is_whitespace) {
            Some((d, rest)) => (d, rest.trim()),
            None => (code, ""),
        };

        if rest == "(" {
            block = Some(directive.to_owned());
            continue;
        }

        match directive {
            "module" => file.module = unquote(rest).to_owned(),
            "go" => file.go_version = Some(rest.to_owned()),
            "require" => file
                .requires
                .push(parse_require(rest, comment, source_path, lineno + 1)?),
            _ => {}
        }
    }

    if block.is_some() {
        return Err(SpdxError::scanner(
            "gomod",
            source_path,
            "unterminated directive block",
        ));
    }
    if file.module.is_empty() {
        return Err(SpdxError::scanner(
            "gomod",
            source_path,
            "missing module directive",
        ));
    }
    Ok(file)
}

/// 디렉토리의 go.mod를 읽습니다. go.mod가 없으면 `None`을 반환합니다.
///
/// 동기 I/O를 수행하므로 `spawn_blocking` 안에서 호출되어야 합니다.
pub fn read_dir_module(dir: &Path) -> Result<Option<GoModFile>, SpdxError> {
    let path = dir.join(GO_MOD_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path).map_err(|e| SpdxError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content, &path.display().to_string()).map(Some)
}

/// 모듈 경로와 버전으로 golang purl을 만듭니다.
pub fn module_purl(module: &str, version: &str) -> Option<PackageUrl> {
    let (namespace, name) = match module.rsplit_once('/') {
        Some((ns, name)) => (ns, name),
        None => ("", module),
    };
    PackageUrl::new("golang", name)
        .ok()
        .map(|p| p.with_namespace(namespace).with_version(version))
}

fn parse_require(
    spec: &str,
    comment: &str,
    source_path: &str,
    lineno: usize,
) -> Result<GoModule, SpdxError> {
    let mut parts = spec.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(path), Some(version)) => Ok(GoModule {
            path: unquote(path).to_owned(),
            version: version.to_owned(),
            indirect: comment.split(';').any(|c| c.trim() == "indirect"),
        }),
        _ => Err(SpdxError::scanner(
            "gomod",
            source_path,
            format!("line {lineno}: malformed require '{spec}'"),
        )),
    }
}

fn unquote(s: &str) -> &str {
    s.trim_matches('"')
}

/// 모듈 프록시 경로 인코딩: 대문자는 `!` + 소문자
fn escape_module_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            out.push('!');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
