//! SPDX 관계

use std::fmt;

/// 관계 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    /// 문서가 요소를 기술함
    Describes,
    /// 요소가 다른 요소에 의존함
    DependsOn,
    /// 요소가 다른 요소를 포함함
    Contains,
    /// 요소가 다른 요소의 의존성임
    DependencyOf,
    /// 요소가 다른 요소에 포함됨
    ContainedBy,
    /// 기타
    Other,
}

impl RelationshipType {
    /// SPDX 문서에 기록되는 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Describes => "DESCRIBES",
            Self::DependsOn => "DEPENDS_ON",
            Self::Contains => "CONTAINS",
            Self::DependencyOf => "DEPENDENCY_OF",
            Self::ContainedBy => "CONTAINED_BY",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 두 요소 사이의 방향성 관계
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relationship {
    /// 시작 요소 ID
    pub element: String,
    /// 관계 종류
    pub kind: RelationshipType,
    /// 대상 요소 ID
    pub related: String,
}

impl Relationship {
    /// 관계를 생성합니다.
    pub fn new(
        element: impl Into<String>,
        kind: RelationshipType,
        related: impl Into<String>,
    ) -> Self {
        Self {
            element: element.into(),
            kind,
            related: related.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_type_names() {
        assert_eq!(RelationshipType::Describes.to_string(), "DESCRIBES");
        assert_eq!(RelationshipType::DependsOn.to_string(), "DEPENDS_ON");
        assert_eq!(RelationshipType::ContainedBy.as_str(), "CONTAINED_BY");
    }
}
