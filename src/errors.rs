use std::path::PathBuf;
use thiserror::Error;

/// Startup step at which the bridge gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Manifest,
    Opening,
    EntryPoint,
    Descriptor,
    Instantiation,
}

impl std::fmt::Display for LoadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStage::Manifest => write!(f, "reading plugin metadata"),
            LoadStage::Opening => write!(f, "opening UI library"),
            LoadStage::EntryPoint => write!(f, "looking up lv2ui_descriptor"),
            LoadStage::Descriptor => write!(f, "finding UI descriptor"),
            LoadStage::Instantiation => write!(f, "instantiating UI"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("UI load failed while {stage}: {path}: {reason}")]
    LoadFailed {
        path: PathBuf,
        stage: LoadStage,
        reason: String,
    },

    #[error("Plugin not found in manifest: {0}")]
    PluginNotFound(String),

    #[error("UI {ui} not declared by plugin {plugin}")]
    UiNotFound { plugin: String, ui: String },

    #[error("Invalid controller transition: cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: crate::controller::BridgeState,
    },

    #[error("Channel closed")]
    ChannelClosed,

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error(transparent)]
    Urid(#[from] UridError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Failures of the identifier table. Mapped to the null URID at the
/// foreign boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UridError {
    #[error("empty URI")]
    EmptyUri,

    #[error("URI contains a NUL byte: {0:?}")]
    InvalidUri(String),

    #[error("URID {0} is not mapped")]
    Unknown(u32),

    #[error("peer announced URID {got} for {uri:?} but next free id is {expected}")]
    OutOfOrder { expected: u32, got: u32, uri: String },
}

/// Rejections of malformed wire payloads. These are never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("empty buffer")]
    Empty,

    #[error("scalar payload is {0} bytes, expected 4")]
    ScalarSize(u32),

    #[error("atom buffer of {0} bytes is smaller than its header")]
    TooSmall(u32),

    #[error("declared atom size {declared} does not match computed size {computed}")]
    SizeMismatch { declared: u32, computed: u32 },

    #[error("atom body of {0} bytes does not fit a 32-bit size")]
    Oversized(u32),

    #[error("unknown port format {urid} ({uri})")]
    UnknownFormat { urid: u32, uri: String },
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_stage_display() {
        assert_eq!(LoadStage::Opening.to_string(), "opening UI library");
        assert_eq!(LoadStage::Descriptor.to_string(), "finding UI descriptor");
        assert_eq!(LoadStage::Instantiation.to_string(), "instantiating UI");
    }

    #[test]
    fn load_failed_names_the_stage() {
        let err = BridgeError::LoadFailed {
            path: PathBuf::from("/usr/lib/lv2/foo.lv2/foo_ui.so"),
            stage: LoadStage::EntryPoint,
            reason: "undefined symbol".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("lv2ui_descriptor"));
        assert!(text.contains("foo_ui.so"));
        assert!(text.contains("undefined symbol"));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn codec_errors_convert() {
        let err: BridgeError = CodecError::TooSmall(4).into();
        assert!(err.to_string().contains("smaller than its header"));
    }
}
