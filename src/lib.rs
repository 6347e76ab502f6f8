//! # Repository Tree & Standalone Preview Compiler
//!
//! Two pure, synchronous transforms consumed by a UI layer that owns all I/O.
//!
//! ## Tree Builder
//!
//! 1. **Any Input Order**: listings do not guarantee parents before children.
//!    Construction is two-pass: create every node, then link.
//! 2. **Partition**: roots plus all children cover every accepted entry exactly
//!    once. Nothing is dropped silently; skipped, orphaned and duplicate entries
//!    are reported as `TreeDiagnostic`s next to the forest.
//! 3. **Stable Order**: children keep input order. Display order is a separate
//!    `sort_for_display` step.
//!
//! ## Preview Compiler
//!
//! `raw → strip → qualify → downlevel → assemble`
//!
//! 1. **Strip**: module statements and shorthand fragments are rewritten on the
//!    AST, never by text pattern.
//! 2. **Qualify**: configured hook primitives resolve against the global runtime.
//! 3. **Downlevel**: oxc removes TypeScript-only syntax, markup is preserved.
//! 4. **Assemble**: one HTML document, three CDN scripts, one inline script.
//!
//! Every stage returns `Result`; a failed compile never produces a document.

mod config;
mod document;
mod downlevel;
mod edits;
mod error;
mod finalize;
mod listing;
mod parse;
mod qualify;
mod strip;
mod tree;

#[cfg(feature = "napi")]
mod bridge;

#[cfg(test)]
mod pipeline_tests;

pub use config::{CdnScripts, PreviewConfig, QualifierConfig};
pub use document::{assemble, assemble_with, bootstrap};
pub use downlevel::{downlevel, preserve_markup_options};
pub use edits::{apply_edits, Edit};
pub use error::{PreviewError, Result, SourceLocation, TreeError};
pub use finalize::{
    compile_preview, download_artifact, DownloadArtifact, PreviewCompiler, SourceDocument,
    HTML_CONTENT_TYPE, SOURCE_CONTENT_TYPE,
};
pub use listing::{
    contents_url, decode_base64_text, repo_path_from_url, tree_listing_url, FileContents,
    TreeListing,
};
pub use qualify::{qualify, qualify_with};
pub use strip::{strip, strip_module, StripOutput};
pub use tree::{
    build_forest, build_tree, sort_for_display, split_path, FlatNode, NodeKind, TreeBuild,
    TreeDiagnostic, TreeNode,
};

#[cfg(feature = "napi")]
pub use bridge::{
    build_tree_native, compile_preview_native, decode_contents_native, download_artifact_native,
};
