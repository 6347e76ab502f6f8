//! # Standalone Preview Documents
//!
//! The assembled document is the whole deliverable of a preview: one HTML
//! file that runs one component with no build step and no server.
//!
//! ## Key Invariants
//!
//! 1. **Three External Scripts**: runtime, DOM renderer and interpreter, in that
//!    order, from the configured versioned CDN locations. Nothing else is
//!    fetched.
//! 2. **One Inline Script**: the component source followed by the bootstrap,
//!    typed so the interpreter (not the browser) evaluates it.
//! 3. **Verbatim Source**: the source is embedded as-is, except that a
//!    `</script` sequence is escaped so it cannot close the element early.
//! 4. **Fixed Mount Point**: the bootstrap renders the entry component into the
//!    element with the configured id.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PreviewConfig;
use crate::error::{PreviewError, Result};

lazy_static! {
    static ref SCRIPT_CLOSE_RE: Regex = Regex::new(r"(?i)</(script)").unwrap();
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
    static ref ELEMENT_ID_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_:.\-]*$").unwrap();
}

/// Assemble with the default configuration, rendering `App`.
pub fn assemble(source: &str) -> String {
    let config = PreviewConfig::default();
    render_document(source, &config.entry_component, &config)
}

/// Assemble rendering `entry` with `config`.
pub fn assemble_with(source: &str, entry: &str, config: &PreviewConfig) -> Result<String> {
    if !IDENTIFIER_RE.is_match(entry) {
        return Err(PreviewError::InvalidEntry {
            name: entry.to_string(),
        });
    }
    if !ELEMENT_ID_RE.is_match(&config.mount_id) {
        return Err(PreviewError::Config {
            reason: format!("mount id '{}' is not a valid element id", config.mount_id),
        });
    }
    for global in [&config.renderer_global, &config.qualifier.namespace] {
        if !IDENTIFIER_RE.is_match(global) {
            return Err(PreviewError::Config {
                reason: format!("global '{}' is not a valid identifier", global),
            });
        }
    }
    Ok(render_document(source, entry, config))
}

fn render_document(source: &str, entry: &str, config: &PreviewConfig) -> String {
    let [runtime, renderer, interpreter] = config.cdn.in_load_order();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>{title}</title>
  </head>
  <body>
    <div id="{mount}"></div>

    <script src="{runtime}" crossorigin></script>
    <script src="{renderer}" crossorigin></script>
    <script src="{interpreter}"></script>

    <script type="{script_type}">
{source}

{bootstrap}
    </script>
  </body>
</html>
"#,
        title = escape_html(&config.title),
        mount = escape_html(&config.mount_id),
        runtime = escape_html(runtime),
        renderer = escape_html(renderer),
        interpreter = escape_html(interpreter),
        script_type = escape_html(&config.script_type),
        source = escape_script_body(source),
        bootstrap = bootstrap(entry, config),
    )
}

/// Mount the entry component. A lowercase name would be read as an
/// intrinsic tag in markup, so those go through `createElement`.
pub fn bootstrap(entry: &str, config: &PreviewConfig) -> String {
    let element = if entry.starts_with(|c: char| c.is_ascii_lowercase()) {
        format!("{}.createElement({})", config.qualifier.namespace, entry)
    } else {
        format!("<{} />", entry)
    };
    format!(
        "const root = {}.createRoot(document.getElementById('{}'));\nroot.render({});",
        config.renderer_global, config.mount_id, element
    )
}

fn escape_script_body(source: &str) -> String {
    SCRIPT_CLOSE_RE.replace_all(source, "<\\/$1").into_owned()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
