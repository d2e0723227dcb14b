//! `bomsmith generate` command handler

use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use bomsmith_core::config::{BomsmithConfig, GenerateDefaults};
use bomsmith_spdx::render::render;
use bomsmith_spdx::{DocBuilder, DocumentFormat, GenerateOptions, ProvenanceOptions};

use crate::cli::GenerateArgs;
use crate::error::CliError;

/// Execute the `generate` command.
///
/// Renders the document to `--output` (or stdout) and, when requested,
/// writes an in-toto provenance statement next to it.
pub async fn execute(args: GenerateArgs, config: &BomsmithConfig) -> Result<(), CliError> {
    let options = build_options(&args, &config.generate);
    let builder = DocBuilder::from_defaults(&config.generate);

    let doc = builder.generate(options).await?;
    let rendered = render(&doc, args.format.into())?;

    match args.output {
        Some(ref path) => {
            tokio::fs::write(path, rendered.as_bytes())
                .await
                .map_err(|source| CliError::Output {
                    path: path.display().to_string(),
                    source,
                })?;
            info!(
                path = %path.display(),
                format = %DocumentFormat::from(args.format),
                "document written"
            );
        }
        None => write_stdout(rendered.as_bytes())
            .await
            .map_err(|source| CliError::Output {
                path: "<stdout>".to_owned(),
                source,
            })?,
    }

    if let Some(path) = args.provenance {
        info!(path = %path.display(), "writing provenance statement");
        tokio::task::spawn_blocking(move || {
            doc.write_provenance_statement(&ProvenanceOptions::default(), &path)
        })
        .await
        .map_err(|e| CliError::Command(format!("provenance task failed: {e}")))??;
    }

    Ok(())
}

async fn write_stdout(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(bytes).await?;
    stdout.flush().await
}

/// Build generation options from settings defaults and command-line flags.
///
/// Flags win over `[generate]` settings. Positional arguments that are
/// existing directories are appended to the directory inputs.
pub fn build_options(args: &GenerateArgs, defaults: &GenerateDefaults) -> GenerateOptions {
    let mut options = GenerateOptions::from_defaults(defaults);

    options.images = args.images.clone();
    options.image_archives = args.image_archives.clone();
    options.archives = args.archives.clone();
    options.files = args.files.clone();
    options.directories = args.directories.clone();
    options.config_file = args.config_file.clone();
    options.work_dir = args.work_dir.clone();
    options.namespace = args.namespace.clone();
    options.name = args.name.clone();
    options.license = args.license.clone();
    options.analyse_layers = args.analyze_images;
    options
        .ignore_patterns
        .extend(args.ignore_patterns.iter().cloned());

    if args.no_gitignore {
        options.use_gitignore = false;
    }
    if args.no_gomod {
        options.process_go_modules = false;
    }
    if let Some(only_direct) = args.no_transient {
        options.only_direct_deps = only_direct;
    }
    if let Some(scan_images) = args.scan_images {
        options.scan_images = scan_images;
    }

    for path in &args.paths {
        if options.resolve(path).is_dir() {
            options.directories.push(path.clone());
        } else {
            warn!(path = %path, "ignoring positional argument that is not a directory");
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use bomsmith_spdx::builder::DEFAULT_IGNORE_PATTERNS;

    #[test]
    fn test_defaults_come_from_settings() {
        let defaults = GenerateDefaults {
            max_concurrency: 2,
            process_go_modules: false,
            only_direct_deps: false,
            use_gitignore: false,
            ..Default::default()
        };
        let options = build_options(&GenerateArgs::default(), &defaults);
        assert_eq!(options.max_concurrency, 2);
        assert!(!options.process_go_modules);
        assert!(!options.only_direct_deps);
        assert!(!options.use_gitignore);
    }

    #[test]
    fn test_no_transient_flag_enables_direct_only() {
        let options = build_options(&GenerateArgs::default(), &GenerateDefaults::default());
        assert!(!options.only_direct_deps, "transient deps are included by default");

        let args = GenerateArgs {
            no_transient: Some(true),
            ..Default::default()
        };
        let options = build_options(&args, &GenerateDefaults::default());
        assert!(options.only_direct_deps);
    }

    #[test]
    fn test_flags_override_settings() {
        let args = GenerateArgs {
            no_gitignore: true,
            no_gomod: true,
            no_transient: Some(false),
            scan_images: Some(false),
            analyze_images: true,
            ignore_patterns: vec![r"\.log$".to_owned()],
            license: Some("MIT".to_owned()),
            format: OutputFormat::Json,
            ..Default::default()
        };
        let options = build_options(&args, &GenerateDefaults::default());

        assert!(!options.use_gitignore);
        assert!(!options.process_go_modules);
        assert!(!options.only_direct_deps);
        assert!(!options.scan_images);
        assert!(options.analyse_layers);
        assert_eq!(options.license.as_deref(), Some("MIT"));
        assert_eq!(options.ignore_patterns.len(), DEFAULT_IGNORE_PATTERNS.len() + 1);
        assert_eq!(options.ignore_patterns.last().map(String::as_str), Some(r"\.log$"));
    }

    #[test]
    fn test_positional_directories_are_appended() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp_dir.path().join("tools")).unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();

        let args = GenerateArgs {
            directories: vec!["src".to_owned()],
            work_dir: Some(temp_dir.path().to_path_buf()),
            paths: vec!["tools".to_owned(), "notes.txt".to_owned(), "absent".to_owned()],
            ..Default::default()
        };
        let options = build_options(&args, &GenerateDefaults::default());
        assert_eq!(options.directories, vec!["src", "tools"]);
    }
}
