//! Node bindings for the host UI.
//!
//! JSON in, JSON out. Typed errors cross the boundary as their message.

use napi_derive::napi;

use crate::config::PreviewConfig;
use crate::finalize::{compile_preview, download_artifact};
use crate::listing::{FileContents, TreeListing};
use crate::tree::{build_tree, sort_for_display, FlatNode};

fn to_napi<E: std::fmt::Display>(e: E) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn config_from(config_json: Option<String>) -> napi::Result<PreviewConfig> {
    match config_json {
        Some(json) => PreviewConfig::from_json(&json).map_err(to_napi),
        None => Ok(PreviewConfig::default()),
    }
}

/// Accepts a git trees response body or a bare array of entries.
#[napi]
pub fn build_tree_native(
    listing_json: String,
    sort_for_display_order: Option<bool>,
) -> napi::Result<serde_json::Value> {
    let value: serde_json::Value = serde_json::from_str(&listing_json).map_err(to_napi)?;
    let mut build = if value.is_array() {
        let nodes: Vec<FlatNode> = serde_json::from_value(value).map_err(to_napi)?;
        build_tree(&nodes)
    } else {
        let listing: TreeListing = serde_json::from_value(value).map_err(to_napi)?;
        listing.build()
    };
    if sort_for_display_order.unwrap_or(false) {
        sort_for_display(&mut build.roots);
    }
    serde_json::to_value(build).map_err(to_napi)
}

#[napi]
pub fn decode_contents_native(contents_json: String) -> napi::Result<String> {
    FileContents::from_json(&contents_json)
        .and_then(|c| c.decode())
        .map_err(to_napi)
}

#[napi]
pub fn compile_preview_native(
    source: String,
    config_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let config = config_from(config_json)?;
    let document = compile_preview(&source, &config).map_err(to_napi)?;
    serde_json::to_value(document).map_err(to_napi)
}

#[napi]
pub fn download_artifact_native(
    source: String,
    file_path: Option<String>,
    preview: bool,
    config_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let config = config_from(config_json)?;
    let artifact =
        download_artifact(&source, file_path.as_deref(), preview, &config).map_err(to_napi)?;
    serde_json::to_value(artifact).map_err(to_napi)
}
