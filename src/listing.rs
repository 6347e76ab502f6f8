//! Payloads handed over by the fetching layer.
//!
//! The crate performs no I/O. These types describe the JSON bodies of the git
//! trees and contents endpoints so the host can pass them through untouched,
//! plus the URL helpers it needs to request them.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PreviewError, Result};
use crate::tree::{build_tree, FlatNode, TreeBuild};

const API_ROOT: &str = "https://api.github.com";

/// Body of `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeListing {
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub url: String,
    pub tree: Vec<FlatNode>,
    #[serde(default)]
    pub truncated: bool,
}

impl TreeListing {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PreviewError::Decode {
            reason: format!("invalid tree listing: {}", e),
        })
    }

    /// Build the forest from whatever the listing contains.
    pub fn build(&self) -> TreeBuild {
        if self.truncated {
            warn!(sha = %self.sha, "tree listing truncated by the server; forest is partial");
        }
        build_tree(&self.tree)
    }
}

/// Body of `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContents {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub encoding: String,
    #[serde(default)]
    pub content: String,
}

impl FileContents {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PreviewError::Decode {
            reason: format!("invalid contents payload: {}", e),
        })
    }

    /// Decode `content` into the file's text.
    pub fn decode(&self) -> Result<String> {
        match self.encoding.as_str() {
            "base64" => decode_base64_text(&self.content),
            "" | "utf-8" | "utf8" => Ok(self.content.clone()),
            other => Err(PreviewError::Decode {
                reason: format!("unsupported encoding '{}'", other),
            }),
        }
    }
}

/// The contents API wraps base64 at 60 columns; line breaks are not part of
/// the payload.
pub fn decode_base64_text(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|e| PreviewError::Decode {
        reason: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| PreviewError::Decode {
        reason: format!("file is not UTF-8: {}", e),
    })
}

/// `owner/repo` from a repository page URL such as
/// `https://github.com/owner/repo` (a trailing `.git` or `/` is ignored).
pub fn repo_path_from_url(repo_url: &str) -> Option<String> {
    let rest = repo_url.split_once("://").map_or(repo_url, |(_, r)| r);
    let (_, path) = rest.split_once('/')?;
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return None;
    }
    Some(format!("{}/{}", owner, repo))
}

pub fn tree_listing_url(repo_path: &str, branch: &str) -> String {
    format!(
        "{}/repos/{}/git/trees/{}?recursive=1",
        API_ROOT, repo_path, branch
    )
}

pub fn contents_url(owner: &str, repo: &str, path: &str, branch: &str) -> String {
    format!(
        "{}/repos/{}/{}/contents/{}?ref={}",
        API_ROOT,
        owner,
        repo,
        path.trim_start_matches('/'),
        branch
    )
}
