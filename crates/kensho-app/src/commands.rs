// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand implementations. Each returns the text to print on success.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use kensho_core::config::{DocumentCatalog, PreprocessConfig};
use kensho_core::error::{KenshoError, Result};
use kensho_core::types::{DocumentType, ValidationOutcome};
use kensho_document::mime::{self, MIME_JPEG, MIME_PNG};
use kensho_document::{ImageProcessor, Preprocessor, SkewEstimator};
use kensho_extract::Annotator;
use kensho_validation::FieldValidator;
use tracing::{debug, info, instrument};

use crate::cli::Commands;

/// Fallback when neither a declared nor a sniffed type is available.
const UNKNOWN_MIME: &str = "application/octet-stream";

pub fn run(command: Commands) -> Result<String> {
    match command {
        Commands::Preprocess {
            input,
            mime,
            output,
            config,
        } => preprocess(&input, mime.as_deref(), output, config.as_deref()),
        Commands::Skew { input } => skew(&input),
        Commands::Validate {
            document_type,
            field,
            value,
        } => validate(&document_type, &field, &value),
        Commands::Annotate {
            response,
            document_type,
            mask,
            catalog,
        } => annotate(&response, &document_type, mask, catalog.as_deref()),
        Commands::Documents { catalog } => documents(catalog.as_deref()),
    }
}

#[instrument(skip_all, fields(input = %input.display()))]
pub fn preprocess(
    input: &Path,
    declared_mime: Option<&str>,
    output: Option<PathBuf>,
    config: Option<&Path>,
) -> Result<String> {
    let bytes = std::fs::read(input)?;
    let mime_type = match declared_mime {
        Some(declared) => declared.to_owned(),
        None => mime::sniff_mime_type(&bytes).unwrap_or(UNKNOWN_MIME).to_owned(),
    };
    let config = load_preprocess_config(config)?;

    let processed = Preprocessor::new(&config).process_detailed(&bytes, &mime_type)?;
    let output = output.unwrap_or_else(|| default_output_path(input, &processed.mime_type));
    std::fs::write(&output, processed.bytes.as_ref())?;

    let mut summary = format!("{} ({})", output.display(), processed.mime_type);
    match (processed.is_passthrough(), processed.skew_angle) {
        (true, _) => summary.push_str(", not an image: copied unchanged"),
        (false, Some(angle)) => {
            let _ = write!(summary, ", deskewed by {angle:.1}°");
        }
        (false, None) => summary.push_str(", no skew correction"),
    }
    info!(output = %output.display(), "Preprocessed file written");
    Ok(summary)
}

#[instrument(skip_all, fields(input = %input.display()))]
pub fn skew(input: &Path) -> Result<String> {
    let bytes = std::fs::read(input)?;
    let detected = mime::sniff_mime_type(&bytes).unwrap_or(UNKNOWN_MIME);
    let image = ImageProcessor::decode(&bytes, mime::decode_format(detected)).map_err(|err| {
        debug!(error = %err, "Skew input did not decode");
        KenshoError::UnsupportedMimeType(detected.to_owned())
    })?;

    let search = PreprocessConfig::default().skew;
    let angle = SkewEstimator::new(&search).estimate_angle(&image.edge_magnitude());
    let verdict = if angle.abs() >= search.min_correction {
        "would rotate"
    } else {
        "below correction threshold"
    };
    Ok(format!("{angle:.1} ({verdict})"))
}

pub fn validate(document_type: &str, field: &str, value: &str) -> Result<String> {
    let document: DocumentType = document_type.parse()?;
    let outcome = FieldValidator::default().validate(document, field, value);
    Ok(outcome_label(outcome).to_owned())
}

#[instrument(skip_all, fields(response = %response.display(), document_type = %document_type))]
pub fn annotate(
    response: &Path,
    document_type: &str,
    mask: bool,
    catalog: Option<&Path>,
) -> Result<String> {
    let text = std::fs::read_to_string(response)?;
    let annotator = Annotator::new(load_catalog(catalog)?, FieldValidator::default());
    let result = annotator.finalize(&text, document_type, mask)?;
    Ok(serde_json::to_string_pretty(&result)?)
}

pub fn documents(catalog: Option<&Path>) -> Result<String> {
    let catalog = load_catalog(catalog)?;
    let mut listing = String::new();
    for (tag, spec) in &catalog.documents {
        let _ = writeln!(
            listing,
            "{tag}: parts [{}], {} fields",
            spec.image_parts.join(", "),
            spec.json_structure.len()
        );
    }
    Ok(listing.trim_end().to_owned())
}

fn outcome_label(outcome: ValidationOutcome) -> &'static str {
    match outcome {
        ValidationOutcome::Valid => "valid",
        ValidationOutcome::Invalid => "invalid",
        ValidationOutcome::Unannotated => "unannotated",
    }
}

fn load_catalog(path: Option<&Path>) -> Result<DocumentCatalog> {
    match path {
        Some(path) => DocumentCatalog::load(path),
        None => DocumentCatalog::embedded(),
    }
}

fn load_preprocess_config(path: Option<&Path>) -> Result<PreprocessConfig> {
    let Some(path) = path else {
        return Ok(PreprocessConfig::default());
    };
    let content = std::fs::read_to_string(path).map_err(|err| {
        KenshoError::Config(format!("failed to read {}: {}", path.display(), err))
    })?;
    let config: PreprocessConfig = serde_json::from_str(&content)
        .map_err(|err| KenshoError::Config(format!("invalid preprocessing config: {err}")))?;
    config.validate()?;
    Ok(config)
}

/// `<dir>/<stem>.processed.<ext>` with the extension of the output type.
fn default_output_path(input: &Path, output_mime: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_owned());
    let extension = match output_mime {
        MIME_JPEG => "jpg".to_owned(),
        MIME_PNG => "png".to_owned(),
        _ => input
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bin".to_owned()),
    };
    input.with_file_name(format!("{stem}.processed.{extension}"))
}
