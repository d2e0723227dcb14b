//! 문서 렌더러
//!
//! 완성된 [`Document`]를 SPDX 출력 형식으로 변환합니다.
//!
//! - [`DocumentFormat::TagValue`]: SPDX tag-value 텍스트
//! - [`DocumentFormat::Json`]: SPDX 2.3 JSON

pub mod json;
pub mod tag_value;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpdxError;
use crate::model::{Document, NOASSERTION};

/// 출력 형식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentFormat {
    /// SPDX tag-value
    #[default]
    TagValue,
    /// SPDX 2.3 JSON
    Json,
}

impl DocumentFormat {
    /// 형식 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TagValue => "tag-value",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = SpdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tag-value" | "tagvalue" | "spdx" => Ok(Self::TagValue),
            "json" | "spdx-json" => Ok(Self::Json),
            other => Err(SpdxError::Config {
                field: "format".to_owned(),
                reason: format!("unknown document format '{other}' (expected tag-value or json)"),
            }),
        }
    }
}

/// 문서를 지정된 형식으로 렌더링합니다.
pub fn render(doc: &Document, format: DocumentFormat) -> Result<String, SpdxError> {
    match format {
        DocumentFormat::TagValue => Ok(tag_value::render(doc)),
        DocumentFormat::Json => json::render(doc),
    }
}

/// 빈 값은 `NOASSERTION`으로 대체합니다.
pub(crate) fn or_noassertion(value: &str) -> &str {
    if value.is_empty() { NOASSERTION } else { value }
}
