//! 디렉토리 스캐너
//!
//! 디렉토리 트리를 순회하며 모든 일반 파일을 해시하여 하나의 패키지로
//! 보고합니다. `.gitignore` 규칙(옵션)과 정규식 ignore 패턴을 적용하고,
//! 루트에 `go.mod`가 있으면 Go 모듈 의존성을 함께 보고합니다.

use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use super::{
    ScanOutput, ScanSettings, ScannedPackage, Scanner, SourceKind, SourceRequest, base_name, gomod,
};
use crate::error::SpdxError;
use crate::model::{File, Package};

/// 디렉토리 스캐너
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryScanner;

impl Scanner for DirectoryScanner {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Directory
    }

    fn scan(
        &self,
        request: &SourceRequest,
        settings: &ScanSettings,
    ) -> Result<ScanOutput, SpdxError> {
        let root = &request.path;
        if !root.is_dir() {
            return Err(SpdxError::scanner(
                self.name(),
                &request.location,
                "not a directory",
            ));
        }

        let name = std::fs::canonicalize(root)
            .map(|abs| base_name(&abs, &request.location))
            .unwrap_or_else(|_| base_name(root, &request.location));
        let mut package = Package::new(name);
        package.files_analyzed = true;

        let entries = walk_files(root, settings)
            .map_err(|e| SpdxError::scanner(self.name(), &request.location, e))?;
        for (path, relative) in entries {
            let file = File::from_path(&path, relative)?;
            package.add_file(file)?;
        }

        let mut dependencies = Vec::new();
        if settings.process_go_modules {
            if let Some(module) = gomod::read_dir_module(root)? {
                if let Some(purl) = gomod::module_purl(&module.module, "") {
                    package = package.with_purl(&purl);
                }
                dependencies = module
                    .dependencies(settings.only_direct_deps)
                    .map(gomod::GoModule::to_package)
                    .collect();
                debug!(
                    module = %module.module,
                    dependencies = dependencies.len(),
                    only_direct = settings.only_direct_deps,
                    "read go module dependencies"
                );
            }
        }

        debug!(
            path = %request.location,
            files = package.files().len(),
            "scanned directory"
        );

        Ok(ScanOutput {
            packages: vec![ScannedPackage {
                package,
                dependencies,
            }],
            files: Vec::new(),
        })
    }
}

/// 무시 규칙을 적용하여 (실제 경로, 루트 기준 상대 이름) 목록을 이름순으로 반환합니다.
///
/// 순회 중 읽을 수 없는 항목이 있으면 에러를 반환합니다.
fn walk_files(
    root: &Path,
    settings: &ScanSettings,
) -> Result<Vec<(PathBuf, String)>, ignore::Error> {
    let patterns = settings.ignore_patterns.clone();
    let filter_root = root.to_path_buf();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .parents(settings.use_gitignore)
        .ignore(settings.use_gitignore)
        .git_ignore(settings.use_gitignore)
        .git_exclude(settings.use_gitignore)
        .git_global(false)
        .require_git(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| match relative_path(&filter_root, entry.path()) {
            Some(rel) if !rel.is_empty() => !patterns.iter().any(|re| re.is_match(&rel)),
            _ => true,
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = result?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if let Some(rel) = relative_path(root, entry.path()) {
            files.push((entry.into_path(), rel));
        }
    }
    Ok(files)
}

/// `/` 구분자를 쓰는 루트 기준 상대 경로
///
/// UTF-8이 아닌 이름 요소는 U+FFFD로 치환됩니다. 루트 자체는 `None`입니다.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn request(path: &Path) -> SourceRequest {
        SourceRequest {
            kind: SourceKind::Directory,
            location: path.display().to_string(),
            path: path.to_path_buf(),
        }
    }

    fn settings() -> ScanSettings {
        ScanSettings {
            ignore_patterns: vec![Regex::new(r"^\.git(/|$)").unwrap()],
            use_gitignore: true,
            process_go_modules: true,
            only_direct_deps: true,
            ..Default::default()
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn file_names(output: &ScanOutput) -> Vec<String> {
        output.packages[0]
            .package
            .files()
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }

    #[test]
    fn walks_all_regular_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.txt", "b");
        write(dir.path(), "a/z.txt", "z");
        write(dir.path(), ".hidden", "h");

        let output = DirectoryScanner.scan(&request(dir.path()), &settings()).unwrap();
        assert_eq!(output.packages.len(), 1);
        assert!(output.packages[0].package.files_analyzed);
        assert_eq!(file_names(&output), vec![".hidden", "a/z.txt", "b.txt"]);
        assert!(output.files.is_empty());
    }

    #[test]
    fn applies_gitignore_and_patterns() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".gitignore", "target/\n");
        write(dir.path(), "target/debug/app", "bin");
        write(dir.path(), ".git/HEAD", "ref: refs/heads/main");
        write(dir.path(), "src/main.rs", "fn main() {}");
        write(dir.path(), "notes.log", "log");

        let mut s = settings();
        s.ignore_patterns.push(Regex::new(r"\.log$").unwrap());
        let output = DirectoryScanner.scan(&request(dir.path()), &s).unwrap();
        assert_eq!(file_names(&output), vec![".gitignore", "src/main.rs"]);
    }

    #[test]
    fn gitignore_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".gitignore", "*.tmp\n");
        write(dir.path(), "scratch.tmp", "x");

        let mut s = settings();
        s.use_gitignore = false;
        let output = DirectoryScanner.scan(&request(dir.path()), &s).unwrap();
        assert_eq!(file_names(&output), vec![".gitignore", "scratch.tmp"]);
    }

    #[test]
    fn reports_direct_go_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "go.mod",
            "module example.com/hello\n\ngo 1.21\n\nrequire (\n\tgithub.com/sirupsen/logrus v1.8.1\n\tgolang.org/x/sys v0.1.0 // indirect\n)\n",
        );

        let output = DirectoryScanner.scan(&request(dir.path()), &settings()).unwrap();
        let scanned = &output.packages[0];
        assert_eq!(scanned.dependencies.len(), 1);
        assert_eq!(scanned.dependencies[0].name, "github.com/sirupsen/logrus");
        assert_eq!(scanned.package.purl().unwrap().name, "hello");

        let mut s = settings();
        s.only_direct_deps = false;
        let output = DirectoryScanner.scan(&request(dir.path()), &s).unwrap();
        assert_eq!(output.packages[0].dependencies.len(), 2);

        s.process_go_modules = false;
        let output = DirectoryScanner.scan(&request(dir.path()), &s).unwrap();
        assert!(output.packages[0].dependencies.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn keeps_files_with_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let bad = OsStr::from_bytes(b"bad\xff.bin");
        write(dir.path(), "ok.txt", "ok");
        std::fs::write(dir.path().join(bad), "root").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join(bad), "nested").unwrap();

        let output = DirectoryScanner.scan(&request(dir.path()), &settings()).unwrap();
        assert_eq!(
            file_names(&output),
            vec!["bad\u{FFFD}.bin", "ok.txt", "sub/bad\u{FFFD}.bin"]
        );
        let package = &output.packages[0].package;
        assert!(package.files().iter().all(|f| f.sha1().is_some()));
        assert_ne!(
            package.file("bad\u{FFFD}.bin").unwrap().sha1(),
            package.file("sub/bad\u{FFFD}.bin").unwrap().sha1()
        );
    }

    #[test]
    fn rejects_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, "x").unwrap();
        let err = DirectoryScanner.scan(&request(&path), &settings()).unwrap_err();
        assert!(matches!(err, SpdxError::Scanner { .. }));
    }
}
