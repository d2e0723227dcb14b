#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`SpdxError`)
//! - [`checksum`]: SHA1/SHA256/SHA512 digests over readers and files
//! - [`purl`]: Package URL parser and partial matcher (`PackageUrl`, `PurlSpec`)
//! - [`model`]: Document graph (`Document`, `Package`, `File`, `Relationship`)
//! - [`verification`]: Package verification code
//! - [`scanner`]: Source scanners (`Scanner` trait, `ScannerRegistry`, file/directory scanners)
//! - [`builder`]: Orchestrator (`DocBuilder`, `GenerateOptions`)
//! - [`config_file`]: TOML SBOM configuration file
//! - [`render`]: Tag-value and SPDX 2.3 JSON output
//! - [`provenance`]: SLSA v0.2 predicate and in-toto statement export
//!
//! # Architecture
//!
//! ```text
//! GenerateOptions --> validate --> ScannerRegistry --> JoinSet (bounded by Semaphore)
//!                                                         |  spawn_blocking per source
//!                                                         v
//!                                               Vec<ScanOutput> (source order)
//!                                                         |
//!                                        merge by purl (single task) --> Document
//!                                                         |
//!                                             verification codes
//!                                                         |
//!                                  +----------------------+----------------------+
//!                                  |                                             |
//!                           render (tag-value / json)                 provenance Statement
//! ```

pub mod builder;
pub mod checksum;
pub mod config_file;
pub mod error;
pub mod model;
pub mod provenance;
pub mod purl;
pub mod render;
pub mod scanner;
pub mod verification;

// --- Public API Re-exports ---

// Builder
pub use builder::{DocBuilder, GenerateOptions};

// Error
pub use error::SpdxError;

// Model
pub use model::{Document, ExternalRef, File, Package, Relationship, RelationshipType};

// Purl
pub use purl::{PackageUrl, PurlError, PurlSpec};

// Checksum
pub use checksum::{ChecksumAlgorithm, Checksums};

// Scanner
pub use scanner::{
    DirectoryScanner, FileScanner, ScanOutput, ScanSettings, ScannedPackage, Scanner,
    ScannerRegistry, SourceKind, SourceRequest,
};

// Render
pub use render::DocumentFormat;

// Provenance
pub use provenance::{
    DefaultPredicateImplementation, DigestSet, Predicate, PredicateImplementation,
    ProvenanceOptions, ProvenancePredicate, Statement,
};

// Config file
pub use config_file::SbomConfigFile;
