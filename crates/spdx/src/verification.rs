//! 패키지 검증 코드 계산
//!
//! 검증 코드는 패키지를 구성하는 파일 내용의 결정론적 요약입니다.
//!
//! 1. 각 파일의 SHA1 체크섬(소문자 hex)을 모읍니다.
//! 2. 체크섬 문자열을 사전순으로 정렬합니다 (파일 이름 순서가 아님).
//! 3. 구분자 없이 이어 붙인 문자열의 SHA1을 소문자 hex로 반환합니다.
//!
//! 파일 순서와 무관하게 같은 내용 집합은 같은 코드를 만듭니다.

use crate::checksum;
use crate::error::SpdxError;
use crate::model::Package;

/// 패키지의 검증 코드를 계산합니다.
///
/// `files_analyzed`가 false이거나 파일이 없으면 빈 문자열을 반환합니다.
/// SHA1 체크섬이 없는 파일이 있으면 [`SpdxError::IncompleteEvidence`]를 반환합니다.
pub fn compute(package: &Package) -> Result<String, SpdxError> {
    if !package.files_analyzed || package.files().is_empty() {
        return Ok(String::new());
    }

    let mut sums = Vec::with_capacity(package.files().len());
    for file in package.files() {
        let sha1 = file.sha1().ok_or_else(|| SpdxError::IncompleteEvidence {
            package: package.name.clone(),
            file: file.name.clone(),
        })?;
        sums.push(sha1);
    }

    Ok(code_from_sha1s(sums))
}

/// SHA1 hex 목록에서 검증 코드를 계산합니다.
pub fn code_from_sha1s<'a>(sums: impl IntoIterator<Item = &'a str>) -> String {
    let mut sums: Vec<&str> = sums.into_iter().collect();
    sums.sort_unstable();
    checksum::sha1_hex(sums.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::ChecksumAlgorithm;
    use crate::model::File;
    use proptest::prelude::*;

    const KNOWN_SHA1S: [&str; 4] = [
        "2dce2a1b847cf337770abcf2f5a23fdb4150826a",
        "637ca3c1d37083c3de7f5928b1cec99f4495adc7",
        "05dd7d2e432a28126fe7b41c7cc1458b2936af8d",
        "805914c62e61ef0e5c8a23b4a388adf9c7154845",
    ];
    const KNOWN_CODE: &str = "7772199fd355003bfd91c7d946404685da0c5bb0";

    fn analysed_package() -> Package {
        let mut pkg = Package::new("testPackage");
        pkg.files_analyzed = true;
        for sum in KNOWN_SHA1S {
            let file = File::new(format!("{sum}.txt")).with_checksum(ChecksumAlgorithm::Sha1, sum);
            pkg.add_file(file).unwrap();
        }
        pkg
    }

    #[test]
    fn empty_package_has_empty_code() {
        let mut pkg = Package::new("testPackage");
        pkg.files_analyzed = true;
        assert_eq!(compute(&pkg).unwrap(), "");
    }

    #[test]
    fn known_vector() {
        let mut pkg = analysed_package();
        pkg.compute_verification_code().unwrap();
        assert_eq!(pkg.verification_code, KNOWN_CODE);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let mut pkg = analysed_package();
        pkg.compute_verification_code().unwrap();
        pkg.compute_verification_code().unwrap();
        assert_eq!(pkg.verification_code, KNOWN_CODE);
    }

    #[test]
    fn missing_sha1_fails_with_file_name() {
        let mut pkg = analysed_package();
        pkg.add_file(File::new("test.txt")).unwrap();
        match pkg.compute_verification_code() {
            Err(SpdxError::IncompleteEvidence { package, file }) => {
                assert_eq!(package, "testPackage");
                assert_eq!(file, "test.txt");
            }
            other => panic!("expected incomplete evidence, got {other:?}"),
        }
    }

    #[test]
    fn failed_recomputation_clears_stale_code() {
        let mut pkg = analysed_package();
        pkg.compute_verification_code().unwrap();
        assert_eq!(pkg.verification_code, KNOWN_CODE);

        pkg.add_file(File::new("test.txt")).unwrap();
        assert!(pkg.compute_verification_code().is_err());
        assert_eq!(pkg.verification_code, "");
    }

    #[test]
    fn files_analyzed_gate() {
        let mut pkg = analysed_package();
        pkg.add_file(File::new("test.txt")).unwrap();
        pkg.files_analyzed = false;
        pkg.compute_verification_code().unwrap();
        assert_eq!(pkg.verification_code, "");
    }

    #[test]
    fn sorts_by_checksum_not_file_name() {
        let mut pkg = Package::new("p");
        pkg.files_analyzed = true;
        // 파일 이름 순서와 체크섬 순서가 반대
        for (name, sum) in ["a", "b", "c", "d"].into_iter().zip(KNOWN_SHA1S.iter().rev()) {
            pkg.add_file(File::new(name).with_checksum(ChecksumAlgorithm::Sha1, *sum)).unwrap();
        }
        assert_eq!(compute(&pkg).unwrap(), KNOWN_CODE);
    }

    proptest! {
        #[test]
        fn code_is_independent_of_file_order(
            sums in prop::collection::vec("[0-9a-f]{40}", 1..16),
            seed in any::<u64>(),
        ) {
            let mut shuffled = sums.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            if seed % 2 == 0 {
                shuffled.reverse();
            }

            let a = code_from_sha1s(sums.iter().map(String::as_str));
            let b = code_from_sha1s(shuffled.iter().map(String::as_str));
            prop_assert_eq!(a, b);
        }
    }
}
