//! 문서 빌더 -- 입력 소스 스캔과 문서 조립
//!
//! [`DocBuilder::generate`]는 다음 순서로 동작합니다.
//!
//! 1. 구성 파일이 있으면 읽어서 옵션에 합칩니다.
//! 2. 옵션을 검증합니다. 실패하면 어떤 스캔도 시작하지 않습니다.
//! 3. 각 입력 소스의 스캐너를 레지스트리에서 찾습니다. 없는 카테고리가 있으면
//!    설정 에러로 실패합니다.
//! 4. 소스마다 하나의 태스크를 `JoinSet`에서 실행하고 `Semaphore`로 동시 실행 수를
//!    제한합니다. 스캔 자체는 `spawn_blocking`에서 실행됩니다.
//! 5. 첫 스캐너 에러가 나머지 태스크를 모두 취소하고 생성을 실패시킵니다.
//! 6. 결과를 입력 순서대로 정렬한 뒤 단일 태스크에서 병합합니다.
//!    purl이 기존 패키지와 일치하면 증거를 합치고, 아니면 새 패키지로 추가합니다.
//! 7. 모든 패키지의 검증 코드를 계산하고 완성된 문서를 반환합니다.
//!
//! 어느 단계에서든 실패하면 부분 문서는 반환되지 않습니다.

mod options;

pub use options::{DEFAULT_IGNORE_PATTERNS, DEFAULT_MAX_CONCURRENCY, GenerateOptions};

use std::sync::Arc;
use std::time::Instant;

use bomsmith_core::config::GenerateDefaults;
use bomsmith_core::metrics as m;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config_file::SbomConfigFile;
use crate::error::SpdxError;
use crate::model::{
    CreationInfo, DEFAULT_CREATOR, DEFAULT_NAMESPACE_BASE, Document, Package, Relationship,
    RelationshipType,
};
use crate::purl::PurlSpec;
use crate::scanner::{ScanOutput, Scanner, ScannerRegistry, SourceKind};

/// SPDX 문서 빌더
///
/// 스캐너 레지스트리와 문서 메타데이터 기본값을 보관합니다.
///
/// # 사용 예시
///
/// ```ignore
/// let builder = DocBuilder::new();
/// let options = GenerateOptions {
///     directories: vec![".".to_owned()],
///     ..Default::default()
/// };
/// let doc = builder.generate(options).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DocBuilder {
    registry: ScannerRegistry,
    namespace_base: String,
    creator: String,
}

impl Default for DocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocBuilder {
    /// 기본 스캐너가 등록된 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            registry: ScannerRegistry::with_defaults(),
            namespace_base: DEFAULT_NAMESPACE_BASE.to_owned(),
            creator: DEFAULT_CREATOR.to_owned(),
        }
    }

    /// `bomsmith.toml`의 `[generate]` 값으로 빌더를 생성합니다.
    pub fn from_defaults(defaults: &GenerateDefaults) -> Self {
        Self::new()
            .with_namespace_base(&defaults.namespace_base)
            .with_creator(&defaults.creator)
    }

    /// 스캐너 레지스트리를 교체합니다.
    pub fn with_registry(mut self, registry: ScannerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// 스캐너를 등록합니다.
    pub fn with_scanner(mut self, scanner: Arc<dyn Scanner>) -> Self {
        self.registry.register(scanner);
        self
    }

    /// 자동 생성 namespace의 접두사를 설정합니다.
    pub fn with_namespace_base(mut self, base: impl Into<String>) -> Self {
        self.namespace_base = base.into();
        self
    }

    /// 문서 생성자 도구 이름을 설정합니다.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    /// 스캐너 레지스트리
    pub fn registry(&self) -> &ScannerRegistry {
        &self.registry
    }

    /// 옵션에 따라 SPDX 문서를 생성합니다.
    pub async fn generate(&self, options: GenerateOptions) -> Result<Document, SpdxError> {
        let started = Instant::now();
        let result = self.generate_inner(options).await;

        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::counter!(m::DOCUMENTS_GENERATED_TOTAL, m::LABEL_RESULT => outcome).increment(1);
        metrics::histogram!(m::GENERATION_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        match result {
            Ok(ref doc) => info!(
                name = %doc.name,
                namespace = %doc.namespace,
                packages = doc.packages().len(),
                files = doc.files().len(),
                relationships = doc.relationships().len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "document generated"
            ),
            Err(ref e) => warn!(error = %e, "document generation failed"),
        }
        result
    }

    async fn generate_inner(&self, mut options: GenerateOptions) -> Result<Document, SpdxError> {
        if let Some(config_file) = options.config_file.clone() {
            let path = options.resolve(&config_file);
            debug!(path = %path.display(), "loading sbom config file");
            SbomConfigFile::load(&path).await?.fold_into(&mut options);
        }

        options.validate()?;
        let settings = Arc::new(options.scan_settings()?);

        let mut jobs = Vec::new();
        for request in options.sources() {
            let scanner = self
                .registry
                .get(request.kind)
                .ok_or_else(|| SpdxError::NoScanner(request.kind.to_string()))?;
            jobs.push((request, scanner));
        }

        info!(
            sources = jobs.len(),
            max_concurrency = options.max_concurrency,
            "starting document generation"
        );

        let semaphore = Arc::new(Semaphore::new(options.max_concurrency));
        let mut tasks: JoinSet<Result<(usize, ScanOutput), SpdxError>> = JoinSet::new();
        let total = jobs.len();

        for (index, (request, scanner)) in jobs.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let settings = Arc::clone(&settings);

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| SpdxError::Task(format!("semaphore closed: {e}")))?;

                let kind = request.kind;
                let scanner_name = scanner.name();
                let location = request.location.clone();
                info!(scanner = scanner_name, source = %location, "scanning source");

                let output = tokio::task::spawn_blocking(move || scanner.scan(&request, &settings))
                    .await
                    .map_err(|e| SpdxError::Task(format!("spawn_blocking failed: {e}")))?
                    .map_err(|e| match e {
                        e @ SpdxError::Scanner { .. } => e,
                        other => SpdxError::scanner(scanner_name, &location, other),
                    })?;

                metrics::counter!(m::SOURCES_SCANNED_TOTAL, m::LABEL_SOURCE_KIND => kind.as_str())
                    .increment(1);
                debug!(
                    scanner = scanner_name,
                    source = %location,
                    packages = output.packages.len(),
                    files = output.files.len(),
                    "source scanned"
                );
                Ok((index, output))
            });
        }

        let mut outputs: Vec<Option<ScanOutput>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => Err(SpdxError::Task(e.to_string())),
            };
            match result {
                Ok((index, output)) => outputs[index] = Some(output),
                Err(e) => {
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        let mut doc = self.new_document(&options);
        for output in outputs.into_iter().flatten() {
            merge_output(&mut doc, output)?;
        }

        doc.compute_verification_codes()?;

        if let Some(ref license) = options.license {
            apply_license(&mut doc, license);
        }

        Ok(doc)
    }

    fn new_document(&self, options: &GenerateOptions) -> Document {
        let name = options
            .name
            .clone()
            .unwrap_or_else(|| format!("SBOM-SPDX-{}", Uuid::new_v4()));
        let namespace = options
            .namespace
            .clone()
            .unwrap_or_else(|| Document::default_namespace(&self.namespace_base, &name));

        let mut doc = Document::new(name).with_namespace(namespace);
        doc.creation_info = CreationInfo::now(&self.creator);
        doc
    }
}

/// 스캐너 결과 하나를 문서에 병합합니다.
fn merge_output(doc: &mut Document, output: ScanOutput) -> Result<(), SpdxError> {
    for scanned in output.packages {
        let id = add_or_merge(doc, scanned.package)?;
        doc.describe(&id)?;

        for dependency in scanned.dependencies {
            let dep_id = add_or_merge(doc, dependency)?;
            if dep_id == id {
                continue;
            }
            doc.add_relationship(Relationship::new(
                id.clone(),
                RelationshipType::DependsOn,
                dep_id,
            ))?;
        }
    }

    for file in output.files {
        let id = doc.add_file(file)?;
        doc.describe(&id)?;
    }
    Ok(())
}

/// purl이 일치하는 기존 패키지가 있으면 병합하고, 없으면 추가합니다.
///
/// 패키지의 각 파일에 `CONTAINS` 관계를 기록하고 패키지 ID를 반환합니다.
fn add_or_merge(doc: &mut Document, package: Package) -> Result<String, SpdxError> {
    let existing = package
        .purl()
        .and_then(|purl| doc.find_package(&PurlSpec::from(&purl)))
        .map(|p| p.id.clone());

    let id = match existing {
        Some(id) => {
            let added = doc.merge_package(&id, package)?;
            metrics::counter!(m::PACKAGES_MERGED_TOTAL).increment(1);
            debug!(package = %id, new_files = added, "merged package by purl match");
            id
        }
        None => {
            let id = doc.add_package(package)?;
            metrics::counter!(m::PACKAGES_ADDED_TOTAL).increment(1);
            id
        }
    };

    let file_ids: Vec<String> = doc
        .package(&id)
        .map(|p| p.files().iter().map(|f| f.id.clone()).collect())
        .unwrap_or_default();
    for file_id in file_ids {
        doc.add_relationship(Relationship::new(
            id.clone(),
            RelationshipType::Contains,
            file_id,
        ))?;
    }
    Ok(id)
}

/// 선언 라이선스가 없는 최상위 패키지(문서가 기술하는 패키지)에 라이선스를 적용합니다.
fn apply_license(doc: &mut Document, license: &str) {
    let described: Vec<String> = doc
        .relationships()
        .iter()
        .filter(|r| r.element == doc.id && r.kind == RelationshipType::Describes)
        .map(|r| r.related.clone())
        .collect();

    for id in described {
        if let Some(package) = doc.package_mut(&id) {
            if package.license_declared.is_empty() {
                package.license_declared = license.to_owned();
            }
        }
    }
}
