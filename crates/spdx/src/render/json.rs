//! SPDX 2.3 JSON 렌더러
//!
//! [SPDX](https://spdx.dev/) 2.3 JSON 스키마에 맞춰 문서를 직렬화합니다.
//! 패키지 파일과 최상위 파일은 모두 최상위 `files` 배열에 기록되고,
//! 패키지는 `hasFiles`로 자신의 파일 ID를 참조합니다.

use serde::Serialize;

use super::or_noassertion;
use crate::checksum::Checksums;
use crate::error::SpdxError;
use crate::model::{Document, File, Package, SPDX_VERSION};

/// SPDX 2.3 문서 루트 구조
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxDocument<'a> {
    spdx_version: &'a str,
    #[serde(rename = "SPDXID")]
    spdx_id: &'a str,
    name: &'a str,
    data_license: &'a str,
    document_namespace: &'a str,
    creation_info: SpdxCreationInfo<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    packages: Vec<SpdxPackage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    files: Vec<SpdxFile<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    relationships: Vec<SpdxRelationship<'a>>,
}

/// SPDX 생성 정보
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxCreationInfo<'a> {
    created: &'a str,
    creators: &'a [String],
}

/// SPDX 패키지
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxPackage<'a> {
    #[serde(rename = "SPDXID")]
    spdx_id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    version_info: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    supplier: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    originator: &'a str,
    download_location: &'a str,
    files_analyzed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_verification_code: Option<SpdxVerificationCode<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checksums: Vec<SpdxChecksum<'a>>,
    license_concluded: &'a str,
    license_declared: &'a str,
    copyright_text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_refs: Vec<SpdxExternalRef<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    has_files: Vec<&'a str>,
}

/// SPDX 패키지 검증 코드
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxVerificationCode<'a> {
    package_verification_code_value: &'a str,
}

/// SPDX 파일
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxFile<'a> {
    #[serde(rename = "SPDXID")]
    spdx_id: &'a str,
    file_name: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checksums: Vec<SpdxChecksum<'a>>,
    license_concluded: &'a str,
    license_info_in_files: Vec<&'a str>,
    copyright_text: &'a str,
}

/// SPDX 외부 참조
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxExternalRef<'a> {
    reference_category: &'a str,
    reference_type: &'a str,
    reference_locator: &'a str,
}

/// SPDX 체크섬
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxChecksum<'a> {
    algorithm: &'static str,
    checksum_value: &'a str,
}

/// SPDX 관계
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxRelationship<'a> {
    spdx_element_id: &'a str,
    relationship_type: &'static str,
    related_spdx_element: &'a str,
}

/// 문서를 SPDX 2.3 JSON으로 렌더링합니다.
pub fn render(doc: &Document) -> Result<String, SpdxError> {
    let files = doc
        .packages()
        .iter()
        .flat_map(|p| p.files())
        .chain(doc.files())
        .map(file)
        .collect();

    let spdx = SpdxDocument {
        spdx_version: SPDX_VERSION,
        spdx_id: &doc.id,
        name: &doc.name,
        data_license: &doc.data_license,
        document_namespace: &doc.namespace,
        creation_info: SpdxCreationInfo {
            created: &doc.creation_info.created,
            creators: &doc.creation_info.creators,
        },
        packages: doc.packages().iter().map(package).collect(),
        files,
        relationships: doc
            .relationships()
            .iter()
            .map(|r| SpdxRelationship {
                spdx_element_id: &r.element,
                relationship_type: r.kind.as_str(),
                related_spdx_element: &r.related,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&spdx)
        .map_err(|e| SpdxError::Render(format!("SPDX JSON serialization failed: {e}")))
}

fn package(p: &Package) -> SpdxPackage<'_> {
    SpdxPackage {
        spdx_id: &p.id,
        name: &p.name,
        version_info: &p.version,
        supplier: &p.supplier,
        originator: &p.originator,
        download_location: or_noassertion(&p.download_location),
        files_analyzed: p.files_analyzed,
        package_verification_code: (!p.verification_code.is_empty()).then(|| {
            SpdxVerificationCode {
                package_verification_code_value: &p.verification_code,
            }
        }),
        checksums: checksums(&p.checksum),
        license_concluded: or_noassertion(&p.license_concluded),
        license_declared: or_noassertion(&p.license_declared),
        copyright_text: or_noassertion(&p.copyright_text),
        external_refs: p
            .external_refs
            .iter()
            .map(|r| SpdxExternalRef {
                reference_category: &r.category,
                reference_type: &r.ref_type,
                reference_locator: &r.locator,
            })
            .collect(),
        has_files: p.files().iter().map(|f| f.id.as_str()).collect(),
    }
}

fn file(f: &File) -> SpdxFile<'_> {
    SpdxFile {
        spdx_id: &f.id,
        file_name: &f.name,
        checksums: checksums(&f.checksum),
        license_concluded: or_noassertion(&f.license_concluded),
        license_info_in_files: vec![or_noassertion(&f.license_info_in_file)],
        copyright_text: or_noassertion(&f.copyright_text),
    }
}

fn checksums(sums: &Checksums) -> Vec<SpdxChecksum<'_>> {
    sums.iter()
        .map(|(algorithm, value)| SpdxChecksum {
            algorithm: algorithm.spdx_name(),
            checksum_value: value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::ChecksumAlgorithm;
    use crate::purl::PackageUrl;

    fn sample() -> Document {
        let purl: PackageUrl = "pkg:cargo/serde@1.0.204".parse().unwrap();
        let mut doc = Document::new("sample");
        let mut pkg = Package::new("serde").with_version("1.0.204").with_purl(&purl);
        pkg.files_analyzed = true;
        pkg.add_file(File::new("src/lib.rs").with_checksum(
            ChecksumAlgorithm::Sha1,
            "2dce2a1b847cf337770abcf2f5a23fdb4150826a",
        ))
        .unwrap();
        let id = doc.add_package(pkg).unwrap();
        doc.describe(&id).unwrap();

        let loose = doc
            .add_file(File::new("README.md").with_checksum(
                ChecksumAlgorithm::Sha1,
                "637ca3c1d37083c3de7f5928b1cec99f4495adc7",
            ))
            .unwrap();
        doc.describe(&loose).unwrap();
        doc.compute_verification_codes().unwrap();
        doc
    }

    #[test]
    fn json_is_valid_spdx_shape() {
        let content = render(&sample()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed["spdxVersion"], "SPDX-2.3");
        assert_eq!(parsed["SPDXID"], "SPDXRef-DOCUMENT");
        assert_eq!(parsed["dataLicense"], "CC0-1.0");
        assert!(parsed["creationInfo"]["creators"].is_array());
    }

    #[test]
    fn json_packages_reference_files() {
        let parsed: serde_json::Value = serde_json::from_str(&render(&sample()).unwrap()).unwrap();

        let pkg = &parsed["packages"][0];
        assert_eq!(pkg["SPDXID"], "SPDXRef-Package-serde-1.0.204");
        assert_eq!(pkg["versionInfo"], "1.0.204");
        assert_eq!(pkg["downloadLocation"], "NOASSERTION");
        assert_eq!(pkg["filesAnalyzed"], true);
        assert_eq!(
            pkg["packageVerificationCode"]["packageVerificationCodeValue"]
                .as_str()
                .unwrap()
                .len(),
            40
        );
        assert_eq!(pkg["externalRefs"][0]["referenceType"], "purl");
        assert_eq!(pkg["hasFiles"][0], "SPDXRef-File-src-lib.rs");

        let files = parsed["files"].as_array().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0]["fileName"], "src/lib.rs");
        assert_eq!(files[1]["fileName"], "README.md");
        assert_eq!(files[0]["checksums"][0]["algorithm"], "SHA1");
    }

    #[test]
    fn json_relationships() {
        let parsed: serde_json::Value = serde_json::from_str(&render(&sample()).unwrap()).unwrap();
        let rels = parsed["relationships"].as_array().unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0]["spdxElementId"], "SPDXRef-DOCUMENT");
        assert_eq!(rels[0]["relationshipType"], "DESCRIBES");
    }

    #[test]
    fn empty_package_omits_verification_code() {
        let mut doc = Document::new("empty");
        doc.add_package(Package::new("plain")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&render(&doc).unwrap()).unwrap();
        assert!(parsed["packages"][0].get("packageVerificationCode").is_none());
        assert!(parsed["packages"][0].get("versionInfo").is_none());
    }
}
