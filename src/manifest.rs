//! Plugin and UI metadata the bridge needs before it can load anything.
//!
//! The bridge does not parse RDF. Whoever launches it supplies a JSON
//! manifest describing each plugin's ports and UIs.

use crate::errors::{BridgeError, LoadStage, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything about one plugin/UI pair.
#[derive(Debug, Clone, PartialEq)]
pub struct UiManifest {
    pub plugin_uri: String,
    pub ui_uri: String,
    /// UI shared library.
    pub binary: PathBuf,
    /// Bundle directory the UI is loaded from.
    pub bundle: PathBuf,
    /// Port symbols in index order.
    pub port_symbols: Vec<String>,
    /// Extension data URIs the UI declares.
    pub extensions: Vec<String>,
    /// Feature URIs the UI declares (required or optional).
    pub features: Vec<String>,
}

impl UiManifest {
    pub fn declares_feature(&self, uri: &str) -> bool {
        self.features.iter().any(|f| f == uri)
    }

    pub fn declares_extension(&self, uri: &str) -> bool {
        self.extensions.iter().any(|e| e == uri)
    }
}

/// Looks up a plugin/UI pair.
pub trait ManifestSource {
    fn lookup(&self, plugin_uri: &str, ui_uri: &str) -> Result<UiManifest>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginEntry {
    pub uri: String,
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default)]
    pub uis: Vec<UiEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiEntry {
    pub uri: String,
    pub binary: PathBuf,
    /// Defaults to the directory containing `binary`.
    #[serde(default)]
    pub bundle: Option<PathBuf>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Manifest file: `{"plugins": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonManifest {
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,
}

impl JsonManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| BridgeError::LoadFailed {
            path: path.to_path_buf(),
            stage: LoadStage::Manifest,
            reason: e.to_string(),
        })?;
        let manifest = Self::parse(&text).map_err(|e| BridgeError::LoadFailed {
            path: path.to_path_buf(),
            stage: LoadStage::Manifest,
            reason: e.to_string(),
        })?;

        log::debug!(
            "Read {} plugin(s) from {}",
            manifest.plugins.len(),
            path.display()
        );
        Ok(manifest)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl ManifestSource for JsonManifest {
    fn lookup(&self, plugin_uri: &str, ui_uri: &str) -> Result<UiManifest> {
        let plugin = self
            .plugins
            .iter()
            .find(|p| p.uri == plugin_uri)
            .ok_or_else(|| BridgeError::PluginNotFound(plugin_uri.to_string()))?;

        let ui = plugin
            .uis
            .iter()
            .find(|u| u.uri == ui_uri)
            .ok_or_else(|| BridgeError::UiNotFound {
                plugin: plugin_uri.to_string(),
                ui: ui_uri.to_string(),
            })?;

        let bundle = match &ui.bundle {
            Some(bundle) => bundle.clone(),
            None => ui
                .binary
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };

        Ok(UiManifest {
            plugin_uri: plugin.uri.clone(),
            ui_uri: ui.uri.clone(),
            binary: ui.binary.clone(),
            bundle,
            port_symbols: plugin.ports.clone(),
            extensions: ui.extensions.clone(),
            features: ui.features.clone(),
        })
    }
}
