//! # lv2-ui-bridge
//!
//! Hosts an LV2 plugin UI in its own process and relays control, program,
//! and atom traffic between it and the audio host over a message channel.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lv2_ui_bridge::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let manifest = JsonManifest::load(std::path::Path::new("manifest.json"))?
//!     .lookup("urn:example:synth", "urn:example:synth#ui")?;
//!
//! let mut bridge = BridgeController::new(
//!     manifest,
//!     UiOptions::default(),
//!     None,
//!     Box::new(HeadlessToolkit::default()),
//! );
//! bridge.init(&LibraryLoader)?;
//!
//! while bridge.idle() {
//!     std::thread::sleep(std::time::Duration::from_millis(30));
//! }
//! bridge.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod controller;
pub mod crash_protection;
pub mod errors;
pub mod features;
pub mod ffi;
pub mod host;
pub mod manifest;
pub mod module;
pub mod options;
pub mod paths;
pub mod ports;
pub mod protocol;
pub mod toolkit;
pub mod urid;
pub mod uris;

pub use codec::{AtomBuffer, PortWrite};
pub use config::BridgeConfig;
pub use controller::{BridgeController, BridgeState};
pub use errors::{BridgeError, CodecError, LoadStage, Result, UridError};
pub use features::{Capability, FeatureSet};
pub use host::HostState;
pub use manifest::{JsonManifest, ManifestSource, UiManifest};
pub use module::{ExtensionSet, LibraryLoader, ModuleLoader, UiInstance, UiModule};
pub use options::UiOptions;
pub use ports::{PortTable, INVALID_PORT_INDEX};
pub use protocol::{BridgeMessage, Channel, MemoryChannel, PipeChannel};
pub use toolkit::{HeadlessToolkit, Toolkit};
pub use urid::{Urid, UridTable, N_WELLKNOWN};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        config::BridgeConfig,
        controller::{BridgeController, BridgeState},
        errors::{BridgeError, Result},
        manifest::{JsonManifest, ManifestSource, UiManifest},
        module::{LibraryLoader, ModuleLoader},
        options::UiOptions,
        protocol::{BridgeMessage, Channel, MemoryChannel, PipeChannel},
        toolkit::{HeadlessToolkit, Toolkit},
    };
}
