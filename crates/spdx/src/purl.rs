//! Package URL (purl) 파서와 부분 일치 매처
//!
//! `pkg:type/namespace/name@version?qualifiers#subpath` 형식의 purl을 파싱하고,
//! 일부 필드만 지정된 [`PurlSpec`]으로 패키지 식별자를 비교합니다.
//!
//! # 매칭 규칙
//!
//! - spec 필드가 `None`이면 와일드카드 (항상 일치)
//! - spec 필드가 `Some("")`이면 purl 쪽 필드도 비어 있어야 일치
//! - 그 외 필드는 대소문자를 구분하는 정확한 문자열 비교
//! - qualifier는 부분집합 비교: spec의 모든 qualifier가 같은 값으로 존재해야 하며
//!   purl 쪽의 추가 qualifier는 무시
//!
//! 스캐너마다 purl을 채우는 정도가 달라서 (예: 한쪽은 `arch`를 생략)
//! 비어 있는 필드까지 일치를 강제하지 않습니다.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// purl 파싱 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurlError {
    /// `pkg:` scheme 누락
    #[error("purl must start with 'pkg:'")]
    MissingScheme,

    /// 유효하지 않은 type
    #[error("invalid purl type: '{0}'")]
    InvalidType(String),

    /// 이름 누락
    #[error("purl has no name")]
    MissingName,

    /// 유효하지 않은 qualifier
    #[error("invalid purl qualifier: '{0}'")]
    InvalidQualifier(String),

    /// 퍼센트 인코딩 디코딩 실패
    #[error("invalid percent-encoding in '{0}'")]
    InvalidEncoding(String),
}

/// 파싱된 Package URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUrl {
    /// 패키지 type (소문자로 정규화, 예: `deb`, `oci`, `golang`)
    pub ty: String,
    /// namespace (예: `debian`)
    pub namespace: Option<String>,
    /// 패키지 이름
    pub name: String,
    /// 버전
    pub version: Option<String>,
    /// qualifier 맵 (키는 소문자)
    pub qualifiers: BTreeMap<String, String>,
    /// 패키지 내부 하위 경로
    pub subpath: Option<String>,
}

impl PackageUrl {
    /// type과 이름으로 purl을 생성합니다.
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Result<Self, PurlError> {
        let ty = ty.into().to_lowercase();
        validate_type(&ty)?;
        let name = name.into();
        if name.is_empty() {
            return Err(PurlError::MissingName);
        }
        Ok(Self {
            ty,
            namespace: None,
            name,
            version: None,
            qualifiers: BTreeMap::new(),
            subpath: None,
        })
    }

    /// namespace를 설정합니다. 빈 문자열은 namespace 없음으로 처리합니다.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let ns = namespace.into();
        self.namespace = (!ns.is_empty()).then_some(ns);
        self
    }

    /// 버전을 설정합니다. 빈 문자열은 버전 없음으로 처리합니다.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let v = version.into();
        self.version = (!v.is_empty()).then_some(v);
        self
    }

    /// qualifier를 추가합니다. 빈 값은 무시합니다.
    pub fn with_qualifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.qualifiers.insert(key.into().to_lowercase(), value);
        }
        self
    }
}

impl FromStr for PackageUrl {
    type Err = PurlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, subpath) = match s.rsplit_once('#') {
            Some((rest, sub)) => (rest, parse_subpath(sub)?),
            None => (s, None),
        };

        let (rest, qualifiers) = match rest.rsplit_once('?') {
            Some((rest, q)) => (rest, parse_qualifiers(q)?),
            None => (rest, BTreeMap::new()),
        };

        let (scheme, rest) = rest.split_once(':').ok_or(PurlError::MissingScheme)?;
        if !scheme.eq_ignore_ascii_case("pkg") {
            return Err(PurlError::MissingScheme);
        }

        let rest = rest.trim_start_matches('/');
        let (ty, rest) = rest.split_once('/').ok_or(PurlError::MissingName)?;
        let ty = ty.to_lowercase();
        validate_type(&ty)?;

        let rest = rest.trim_end_matches('/');

        // '@' 뒤에 '/'가 있으면 버전 구분자가 아닌 namespace의 일부 (예: 인코딩 안 된 npm scope)
        let (rest, version) = match rest.rsplit_once('@') {
            Some((r, v)) if !v.contains('/') => {
                let v = decode(v)?;
                (r, (!v.is_empty()).then_some(v))
            }
            _ => (rest, None),
        };

        let (namespace, name) = match rest.rsplit_once('/') {
            Some((ns, name)) => (Some(ns), name),
            None => (None, rest),
        };

        let name = decode(name)?;
        if name.is_empty() {
            return Err(PurlError::MissingName);
        }

        let namespace = match namespace {
            Some(ns) => {
                let segments = ns
                    .split('/')
                    .filter(|seg| !seg.is_empty())
                    .map(decode)
                    .collect::<Result<Vec<_>, _>>()?;
                (!segments.is_empty()).then(|| segments.join("/"))
            }
            None => None,
        };

        Ok(Self {
            ty,
            namespace,
            name,
            version,
            qualifiers,
            subpath,
        })
    }
}

impl fmt::Display for PackageUrl {
    /// 정규 형식으로 출력합니다 (qualifier는 키 순서로 정렬).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pkg:{}/", self.ty)?;
        if let Some(ref ns) = self.namespace {
            for seg in ns.split('/').filter(|s| !s.is_empty()) {
                write!(f, "{}/", encode(seg))?;
            }
        }
        write!(f, "{}", encode(&self.name))?;
        if let Some(ref v) = self.version {
            write!(f, "@{}", encode(v))?;
        }
        if !self.qualifiers.is_empty() {
            let pairs: Vec<String> = self
                .qualifiers
                .iter()
                .map(|(k, v)| format!("{k}={}", encode(v)))
                .collect();
            write!(f, "?{}", pairs.join("&"))?;
        }
        if let Some(ref sub) = self.subpath {
            let segs: Vec<String> = sub.split('/').map(encode).collect();
            write!(f, "#{}", segs.join("/"))?;
        }
        Ok(())
    }
}

/// 부분 purl 명세
///
/// 각 필드는 `None`(와일드카드)과 `Some(값)`(정확히 일치)을 구분합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurlSpec {
    /// type
    pub ty: Option<String>,
    /// namespace
    pub namespace: Option<String>,
    /// 이름
    pub name: Option<String>,
    /// 버전
    pub version: Option<String>,
    /// 반드시 포함되어야 하는 qualifier
    pub qualifiers: BTreeMap<String, String>,
}

impl PurlSpec {
    /// 모든 purl과 일치하는 빈 명세를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// type을 지정합니다.
    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    /// namespace를 지정합니다.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// 이름을 지정합니다.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 버전을 지정합니다.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// 필수 qualifier를 추가합니다.
    pub fn with_qualifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.qualifiers.insert(key.into(), value.into());
        self
    }

    /// 아무 필드도 지정되지 않았는지 반환합니다.
    pub fn is_wildcard(&self) -> bool {
        self.ty.is_none()
            && self.namespace.is_none()
            && self.name.is_none()
            && self.version.is_none()
            && self.qualifiers.is_empty()
    }

    /// purl이 이 명세와 일치하는지 확인합니다.
    pub fn matches(&self, purl: &PackageUrl) -> bool {
        field_matches(self.ty.as_deref(), Some(purl.ty.as_str()))
            && field_matches(self.namespace.as_deref(), purl.namespace.as_deref())
            && field_matches(self.name.as_deref(), Some(purl.name.as_str()))
            && field_matches(self.version.as_deref(), purl.version.as_deref())
            && self
                .qualifiers
                .iter()
                .all(|(k, v)| purl.qualifiers.get(k) == Some(v))
    }
}

impl From<&PackageUrl> for PurlSpec {
    /// 파싱된 purl의 모든 필드를 지정하는 명세를 만듭니다.
    ///
    /// purl에 없는 namespace/version은 와일드카드가 됩니다.
    fn from(purl: &PackageUrl) -> Self {
        Self {
            ty: Some(purl.ty.clone()),
            namespace: purl.namespace.clone(),
            name: Some(purl.name.clone()),
            version: purl.version.clone(),
            qualifiers: purl.qualifiers.clone(),
        }
    }
}

fn field_matches(spec: Option<&str>, actual: Option<&str>) -> bool {
    match spec {
        None => true,
        Some(expected) => actual.unwrap_or("") == expected,
    }
}

fn validate_type(ty: &str) -> Result<(), PurlError> {
    let valid = !ty.is_empty()
        && !ty.starts_with(|c: char| c.is_ascii_digit())
        && ty
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '+' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(PurlError::InvalidType(ty.to_owned()))
    }
}

fn parse_qualifiers(raw: &str) -> Result<BTreeMap<String, String>, PurlError> {
    let mut qualifiers = BTreeMap::new();
    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| PurlError::InvalidQualifier(pair.to_owned()))?;
        let key = key.to_lowercase();
        let key_valid = !key.is_empty()
            && !key.starts_with(|c: char| c.is_ascii_digit())
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');
        if !key_valid {
            return Err(PurlError::InvalidQualifier(pair.to_owned()));
        }
        let value = decode(value)?;
        if value.is_empty() {
            continue;
        }
        if qualifiers.insert(key, value).is_some() {
            return Err(PurlError::InvalidQualifier(pair.to_owned()));
        }
    }
    Ok(qualifiers)
}

fn parse_subpath(raw: &str) -> Result<Option<String>, PurlError> {
    let segments = raw
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != "." && *seg != "..")
        .map(decode)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((!segments.is_empty()).then(|| segments.join("/")))
}

fn decode(raw: &str) -> Result<String, PurlError> {
    let decoded =
        urlencoding::decode(raw).map_err(|_| PurlError::InvalidEncoding(raw.to_owned()))?;
    if decoded.chars().any(char::is_whitespace) && !raw.contains('%') {
        return Err(PurlError::InvalidEncoding(raw.to_owned()));
    }
    Ok(decoded.into_owned())
}

fn encode(raw: &str) -> String {
    // ':'는 버전 다이제스트(sha256:...)에서 흔하며 인코딩하지 않는 것이 정규 형식
    urlencoding::encode(raw).replace("%3A", ":")
}
