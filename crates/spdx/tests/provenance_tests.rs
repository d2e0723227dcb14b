//! Provenance export integration tests
//!
//! Tests predicate strategy injection and statement export from generated documents

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bomsmith_spdx::{
    DigestSet, DocBuilder, GenerateOptions, Predicate, PredicateImplementation,
    ProvenanceOptions, ProvenancePredicate, SpdxError, Statement,
};

/// Records every call instead of touching the filesystem
#[derive(Default, Clone)]
struct RecordingImplementation {
    materials: Arc<Mutex<Vec<String>>>,
    writes: Arc<Mutex<Vec<PathBuf>>>,
}

impl PredicateImplementation for RecordingImplementation {
    fn add_material(&self, _: &mut ProvenancePredicate, uri: &str, _: DigestSet) {
        self.materials.lock().unwrap().push(uri.to_owned());
    }

    fn write(&self, _: &ProvenancePredicate, path: &Path) -> Result<(), SpdxError> {
        self.writes.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

fn sha256(value: &str) -> DigestSet {
    DigestSet::from([("sha256".to_owned(), value.to_owned())])
}

#[cfg(unix)]
fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[test]
fn test_injected_implementation_receives_calls() {
    let recorder = RecordingImplementation::default();
    let mut predicate = Predicate::new();
    predicate.set_implementation(Box::new(recorder.clone()));

    predicate.add_material("git+https://example.com/repo@main", sha256("aa"));
    predicate.add_material("file:go.sum", sha256("bb"));
    predicate.write(Path::new("/unused/predicate.json")).unwrap();

    assert_eq!(
        *recorder.materials.lock().unwrap(),
        vec!["git+https://example.com/repo@main", "file:go.sum"]
    );
    assert_eq!(
        *recorder.writes.lock().unwrap(),
        vec![PathBuf::from("/unused/predicate.json")]
    );
    // The recorder does not mutate the predicate itself
    assert!(predicate.materials().is_empty());
}

#[cfg(unix)]
#[test]
fn test_predicate_write_overwrites_with_fixed_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("predicate.json");
    std::fs::write(&path, "stale").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).unwrap();

    let mut predicate = Predicate::new();
    predicate.add_material("file:a", sha256("aa"));
    predicate.write(&path).unwrap();

    assert_eq!(mode_of(&path), 0o644);
    let back: ProvenancePredicate =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back.materials.unwrap().len(), 1);
}

#[tokio::test]
async fn test_statement_from_generated_document() {
    let temp_dir = tempfile::tempdir().unwrap();
    let project = temp_dir.path().join("app");
    std::fs::create_dir_all(project.join("bin")).unwrap();
    std::fs::write(project.join("bin/app"), "binary").unwrap();
    std::fs::write(project.join("Makefile"), "all:\n").unwrap();

    let options = GenerateOptions {
        directories: vec![project.display().to_string()],
        ..Default::default()
    };
    let doc = DocBuilder::new().generate(options).await.unwrap();

    let statement = doc.to_provenance_statement(&ProvenanceOptions::default());
    let names: Vec<&str> = statement.subject.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Makefile", "bin/app"]);
    for subject in &statement.subject {
        assert_eq!(subject.digest["sha1"].len(), 40);
        assert_eq!(subject.digest["sha256"].len(), 64);
        assert_eq!(subject.digest["sha512"].len(), 128);
    }

    let materials = statement.predicate.materials.as_ref().unwrap();
    assert_eq!(materials.len(), statement.subject.len());

    let metadata = statement.predicate.metadata.as_ref().unwrap();
    assert_eq!(metadata.build_invocation_id, doc.namespace);
    assert_eq!(
        metadata.build_started_on.as_deref(),
        Some(doc.creation_info.created.as_str())
    );
}

#[tokio::test]
async fn test_write_provenance_statement() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("release.tar"), "tarball").unwrap();

    let options = GenerateOptions {
        files: vec!["release.tar".to_owned()],
        work_dir: Some(temp_dir.path().to_path_buf()),
        ..Default::default()
    };
    let doc = DocBuilder::new().generate(options).await.unwrap();

    let out = temp_dir.path().join("provenance.json");
    let options = ProvenanceOptions {
        builder_id: "https://ci.example.com/builder".to_owned(),
        ..Default::default()
    };
    doc.write_provenance_statement(&options, &out).unwrap();

    let statement: Statement =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(statement.subject.len(), 1);
    assert_eq!(statement.subject[0].name, "release.tar");
    assert_eq!(
        statement.predicate.builder.id,
        "https://ci.example.com/builder"
    );

    #[cfg(unix)]
    assert_eq!(mode_of(&out), 0o644);
}
