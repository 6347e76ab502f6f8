//! Preview configuration.
//!
//! Every constant the preview pipeline relies on lives here: CDN locations,
//! the mount element, the entry component, the primitive vocabulary and the
//! download naming. Hosts can override any field from JSON; missing fields
//! fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::{PreviewError, Result};

/// Versioned scripts loaded ahead of the component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CdnScripts {
    /// UI component runtime (exposes the global namespace).
    pub runtime: String,
    /// DOM renderer for the runtime.
    pub renderer: String,
    /// In-browser markup interpreter.
    pub interpreter: String,
}

impl Default for CdnScripts {
    fn default() -> Self {
        CdnScripts {
            runtime: "https://unpkg.com/react@18/umd/react.development.js".to_string(),
            renderer: "https://unpkg.com/react-dom@18/umd/react-dom.development.js".to_string(),
            interpreter: "https://unpkg.com/babel-standalone@6.26.0/babel.min.js".to_string(),
        }
    }
}

impl CdnScripts {
    pub fn in_load_order(&self) -> [&str; 3] {
        [&self.runtime, &self.renderer, &self.interpreter]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct QualifierConfig {
    /// Global object the runtime is loaded under.
    pub namespace: String,
    /// Closed set of primitive names resolved against `namespace`.
    pub primitives: Vec<String>,
}

impl Default for QualifierConfig {
    fn default() -> Self {
        QualifierConfig {
            namespace: "React".to_string(),
            primitives: ["useState", "useEffect", "useRef", "useContext"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl QualifierConfig {
    pub fn is_primitive(&self, name: &str) -> bool {
        self.primitives.iter().any(|p| p == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewConfig {
    pub cdn: CdnScripts,
    /// Global the DOM renderer is loaded under.
    pub renderer_global: String,
    /// `type` of the inline script the interpreter picks up.
    pub script_type: String,
    pub title: String,
    pub mount_id: String,
    /// Component rendered when the file's default export has no name.
    pub entry_component: String,
    /// Tag that replaces shorthand `<>...</>` fragments.
    pub fragment_tag: String,
    pub qualifier: QualifierConfig,
    /// File name stem for downloads.
    pub download_stem: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        PreviewConfig {
            cdn: CdnScripts::default(),
            renderer_global: "ReactDOM".to_string(),
            script_type: "text/babel".to_string(),
            title: "Front End Programming / React".to_string(),
            mount_id: "root".to_string(),
            entry_component: "App".to_string(),
            fragment_tag: "div".to_string(),
            qualifier: QualifierConfig::default(),
            download_stem: "student-code".to_string(),
        }
    }
}

impl PreviewConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PreviewError::Config {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PreviewConfig::from_json(
            r#"{ "mountId": "app", "qualifier": { "primitives": ["useMemo"] } }"#,
        )
        .unwrap();
        assert_eq!(config.mount_id, "app");
        assert_eq!(config.qualifier.namespace, "React");
        assert!(config.qualifier.is_primitive("useMemo"));
        assert!(!config.qualifier.is_primitive("useState"));
        assert_eq!(config.cdn, CdnScripts::default());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(
            PreviewConfig::from_json("{ mountId: 1"),
            Err(PreviewError::Config { .. })
        ));
    }

    #[test]
    fn test_default_cdn_order() {
        let cdn = CdnScripts::default();
        let order = cdn.in_load_order();
        assert!(order[0].contains("/react@18/"));
        assert!(order[1].contains("react-dom@18"));
        assert!(order[2].contains("babel"));
    }
}
