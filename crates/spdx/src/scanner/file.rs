//! 개별 파일 스캐너

use tracing::debug;

use super::{ScanOutput, ScanSettings, Scanner, SourceKind, SourceRequest};
use crate::error::SpdxError;
use crate::model::File;

/// `--file`로 지정된 파일을 해시하여 최상위 파일로 보고합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileScanner;

impl Scanner for FileScanner {
    fn name(&self) -> &'static str {
        "file"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn scan(
        &self,
        request: &SourceRequest,
        _settings: &ScanSettings,
    ) -> Result<ScanOutput, SpdxError> {
        if !request.path.is_file() {
            return Err(SpdxError::scanner(
                self.name(),
                &request.location,
                "not a regular file",
            ));
        }

        let file = File::from_path(&request.path, request.location.as_str())?;
        debug!(path = %request.location, "hashed file");

        Ok(ScanOutput {
            packages: Vec::new(),
            files: vec![file],
        })
    }
}
