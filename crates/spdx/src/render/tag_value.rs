//! SPDX tag-value 렌더러

use std::fmt::Write;

use super::or_noassertion;
use crate::checksum::Checksums;
use crate::model::{Document, File, Package, SPDX_VERSION};

/// 문서를 SPDX tag-value 텍스트로 렌더링합니다.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();

    line(&mut out, "SPDXVersion", SPDX_VERSION);
    line(&mut out, "DataLicense", &doc.data_license);
    line(&mut out, "SPDXID", &doc.id);
    line(&mut out, "DocumentName", &doc.name);
    line(&mut out, "DocumentNamespace", &doc.namespace);
    for creator in &doc.creation_info.creators {
        line(&mut out, "Creator", creator);
    }
    line(&mut out, "Created", &doc.creation_info.created);

    for file in doc.files() {
        out.push('\n');
        render_file(&mut out, file);
    }

    for package in doc.packages() {
        out.push('\n');
        render_package(&mut out, package);
    }

    if !doc.relationships().is_empty() {
        out.push('\n');
        for rel in doc.relationships() {
            let value = format!("{} {} {}", rel.element, rel.kind, rel.related);
            line(&mut out, "Relationship", &value);
        }
    }

    out
}

fn render_package(out: &mut String, package: &Package) {
    let _ = writeln!(out, "##### Package: {}", package.name);
    out.push('\n');
    line(out, "PackageName", &package.name);
    line(out, "SPDXID", &package.id);
    optional(out, "PackageVersion", &package.version);
    optional(out, "PackageSupplier", &package.supplier);
    optional(out, "PackageOriginator", &package.originator);
    line(
        out,
        "PackageDownloadLocation",
        or_noassertion(&package.download_location),
    );
    line(
        out,
        "FilesAnalyzed",
        if package.files_analyzed { "true" } else { "false" },
    );
    optional(out, "PackageVerificationCode", &package.verification_code);
    checksums(out, "PackageChecksum", &package.checksum);
    line(
        out,
        "PackageLicenseConcluded",
        or_noassertion(&package.license_concluded),
    );
    line(
        out,
        "PackageLicenseDeclared",
        or_noassertion(&package.license_declared),
    );
    line(
        out,
        "PackageCopyrightText",
        or_noassertion(&package.copyright_text),
    );
    for external_ref in &package.external_refs {
        let value = format!(
            "{} {} {}",
            external_ref.category, external_ref.ref_type, external_ref.locator
        );
        line(out, "ExternalRef", &value);
    }

    for file in package.files() {
        out.push('\n');
        render_file(out, file);
    }
}

fn render_file(out: &mut String, file: &File) {
    line(out, "FileName", &file.name);
    line(out, "SPDXID", &file.id);
    checksums(out, "FileChecksum", &file.checksum);
    line(
        out,
        "LicenseConcluded",
        or_noassertion(&file.license_concluded),
    );
    line(
        out,
        "LicenseInfoInFile",
        or_noassertion(&file.license_info_in_file),
    );
    line(
        out,
        "FileCopyrightText",
        or_noassertion(&file.copyright_text),
    );
}

fn checksums(out: &mut String, tag: &str, sums: &Checksums) {
    for (algorithm, value) in sums {
        let _ = writeln!(out, "{tag}: {algorithm}: {value}");
    }
}

fn optional(out: &mut String, tag: &str, value: &str) {
    if !value.is_empty() {
        line(out, tag, value);
    }
}

/// 여러 줄 값은 `<text>` 태그로 감쌉니다.
fn line(out: &mut String, tag: &str, value: &str) {
    if value.contains('\n') {
        let _ = writeln!(out, "{tag}: <text>{value}</text>");
    } else {
        let _ = writeln!(out, "{tag}: {value}");
    }
}
