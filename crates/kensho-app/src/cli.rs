// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "kensho")]
#[command(about = "Identity-document image normalisation and field validation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Deskew and enhance an image; non-image input is copied unchanged
    Preprocess {
        /// Input file
        input: PathBuf,

        /// Declared MIME type (default: sniffed from the content)
        #[arg(short, long)]
        mime: Option<String>,

        /// Output file (default: <input stem>.processed.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preprocessing settings (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the estimated skew angle of an image in degrees
    Skew {
        /// Input image
        input: PathBuf,
    },

    /// Check a single field value
    Validate {
        /// Document type tag, e.g. driver_license
        #[arg(short, long)]
        document_type: String,

        /// Field key, e.g. card_number or birth_date
        #[arg(short, long)]
        field: String,

        /// Value as recognised
        value: String,
    },

    /// Validate and assemble a saved recognizer response
    Annotate {
        /// File holding the raw recognizer response
        response: PathBuf,

        /// Document type tag
        #[arg(short, long)]
        document_type: String,

        /// Mask the card number in the output
        #[arg(long)]
        mask: bool,

        /// Document catalog (YAML; default: embedded)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List the document types in the catalog
    Documents {
        /// Document catalog (YAML; default: embedded)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}
