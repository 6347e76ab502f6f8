//! Preview pipeline and download artifacts.
//!
//! `raw → strip → qualify → downlevel → assemble`. Each stage either hands
//! its whole output to the next one or fails the request; a failed compile
//! never yields a document.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::config::PreviewConfig;
use crate::document::assemble_with;
use crate::downlevel::downlevel;
use crate::error::Result;
use crate::qualify::qualify_with;
use crate::strip::strip_module;

/// One fetched file and the forms derived from it for a preview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    pub raw: String,
    /// Module statements removed, fragments spelled out, primitives qualified.
    pub stripped: String,
    /// `stripped` without TypeScript-only syntax; markup intact.
    pub downleveled: String,
    pub assembled: String,
    /// Component the bootstrap renders.
    pub entry: String,
}

/// What the host offers for download.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadArtifact {
    pub file_name: String,
    pub content_type: String,
    pub body: String,
}

pub const HTML_CONTENT_TYPE: &str = "text/html;charset=utf-8";
pub const SOURCE_CONTENT_TYPE: &str = "text/plain;charset=utf-8";
const DEFAULT_SOURCE_EXTENSION: &str = "tsx";

/// Run the full pipeline over one file's text.
pub fn compile_preview(raw: &str, config: &PreviewConfig) -> Result<SourceDocument> {
    let module = strip_module(raw, config)?;
    let stripped = qualify_with(&module.code, &config.qualifier)?;
    let downleveled = downlevel(&stripped)?;

    let entry = module
        .default_export
        .unwrap_or_else(|| config.entry_component.clone());
    let assembled = assemble_with(&downleveled, &entry, config)?;

    debug!(%entry, bytes = assembled.len(), "assembled standalone preview");
    Ok(SourceDocument {
        raw: raw.to_string(),
        stripped,
        downleveled,
        assembled,
        entry,
    })
}

/// Artifact for the current view: the assembled document in preview mode,
/// the untouched source otherwise.
pub fn download_artifact(
    raw: &str,
    file_path: Option<&str>,
    preview: bool,
    config: &PreviewConfig,
) -> Result<DownloadArtifact> {
    if preview {
        let document = compile_preview(raw, config)?;
        return Ok(DownloadArtifact {
            file_name: format!("{}.html", config.download_stem),
            content_type: HTML_CONTENT_TYPE.to_string(),
            body: document.assembled,
        });
    }

    let extension = file_path
        .and_then(|p| Path::new(p).extension())
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .unwrap_or(DEFAULT_SOURCE_EXTENSION);
    Ok(DownloadArtifact {
        file_name: format!("{}.{}", config.download_stem, extension),
        content_type: SOURCE_CONTENT_TYPE.to_string(),
        body: raw.to_string(),
    })
}

/// The pipeline bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct PreviewCompiler {
    config: PreviewConfig,
}

impl PreviewCompiler {
    pub fn new(config: PreviewConfig) -> Self {
        PreviewCompiler { config }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn compile(&self, raw: &str) -> Result<SourceDocument> {
        compile_preview(raw, &self.config)
    }

    pub fn artifact(
        &self,
        raw: &str,
        file_path: Option<&str>,
        preview: bool,
    ) -> Result<DownloadArtifact> {
        download_artifact(raw, file_path, preview, &self.config)
    }
}
