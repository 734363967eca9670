//! Lifecycle of one hosted UI and the relay between it and the host.
//!
//! ```text
//! Uninitialized -> ModuleLoaded -> DescriptorResolved -> Instantiated
//!     -> Running -> Draining -> Terminated
//! ```
//!
//! A failed startup step leaves the controller in its last good state, so
//! [`BridgeController::shutdown`] always reaches `Terminated` and only calls
//! foreign cleanup when an instance exists.

use crate::codec::{self, AtomBuffer, SCALAR_SIZE};
use crate::errors::{BridgeError, LoadStage, Result};
use crate::features::FeatureSet;
use crate::host::HostState;
use crate::manifest::UiManifest;
use crate::module::{ExtensionSet, InstantiateArgs, ModuleLoader, UiInstance, UiModule};
use crate::options::UiOptions;
use crate::ports::PortTable;
use crate::protocol::{BridgeMessage, Channel};
use crate::toolkit::Toolkit;
use crate::uris::{self, id};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Uninitialized,
    ModuleLoaded,
    DescriptorResolved,
    Instantiated,
    Running,
    Draining,
    Terminated,
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BridgeState::Uninitialized => "uninitialized",
            BridgeState::ModuleLoaded => "module loaded",
            BridgeState::DescriptorResolved => "descriptor resolved",
            BridgeState::Instantiated => "instantiated",
            BridgeState::Running => "running",
            BridgeState::Draining => "draining",
            BridgeState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

pub struct BridgeController {
    state: BridgeState,
    manifest: UiManifest,
    host: Rc<HostState>,
    module: Option<Box<dyn UiModule>>,
    features: Option<FeatureSet>,
    instance: Option<Box<dyn UiInstance>>,
    extensions: ExtensionSet,
}

impl BridgeController {
    pub fn new(
        manifest: UiManifest,
        mut options: UiOptions,
        channel: Option<Box<dyn Channel>>,
        toolkit: Box<dyn Toolkit>,
    ) -> Self {
        options.resizable = is_resizable(&manifest, toolkit.as_ref());

        let ports = PortTable::new(manifest.port_symbols.clone());
        let host = Rc::new(HostState::new(ports, options, channel, toolkit));
        Self::with_host(manifest, host)
    }

    /// Use an already built [`HostState`]; mostly for tests that need to
    /// choose its working directory.
    pub fn with_host(manifest: UiManifest, host: Rc<HostState>) -> Self {
        Self {
            state: BridgeState::Uninitialized,
            manifest,
            host,
            module: None,
            features: None,
            instance: None,
            extensions: ExtensionSet::default(),
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn host(&self) -> &HostState {
        &self.host
    }

    pub fn manifest(&self) -> &UiManifest {
        &self.manifest
    }

    pub fn extensions(&self) -> ExtensionSet {
        self.extensions
    }

    pub fn features(&self) -> Option<&FeatureSet> {
        self.features.as_ref()
    }

    pub fn options(&self) -> UiOptions {
        self.host.options()
    }

    pub fn is_running(&self) -> bool {
        self.state == BridgeState::Running
    }

    fn expect_state(&self, expected: BridgeState, action: &'static str) -> Result<()> {
        if self.state != expected {
            return Err(BridgeError::InvalidState {
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Run every startup step through to `Running`.
    pub fn init(&mut self, loader: &dyn ModuleLoader) -> Result<()> {
        self.load(loader)?;
        self.resolve_descriptor()?;
        self.instantiate()?;
        self.start()
    }

    pub fn load(&mut self, loader: &dyn ModuleLoader) -> Result<()> {
        self.expect_state(BridgeState::Uninitialized, "load the UI module")?;

        log::info!("Loading UI binary {}", self.manifest.binary.display());
        self.module = Some(loader.open(&self.manifest.binary)?);
        self.state = BridgeState::ModuleLoaded;
        Ok(())
    }

    /// Find the descriptor whose URI is the manifest's UI URI.
    pub fn resolve_descriptor(&mut self) -> Result<()> {
        self.expect_state(BridgeState::ModuleLoaded, "resolve the UI descriptor")?;

        let module = self
            .module
            .as_mut()
            .ok_or(BridgeError::InvalidState {
                action: "resolve the UI descriptor",
                state: self.state,
            })?;

        let mut index = 0;
        let found = loop {
            match module.descriptor_uri(index) {
                Some(uri) if uri == self.manifest.ui_uri => break Some(index),
                Some(_) => index += 1,
                None => break None,
            }
        };

        let Some(index) = found else {
            return Err(BridgeError::LoadFailed {
                path: self.manifest.binary.clone(),
                stage: LoadStage::Descriptor,
                reason: format!("no descriptor with URI {}", self.manifest.ui_uri),
            });
        };

        module.select_descriptor(index)?;
        log::debug!("Using UI descriptor #{} ({})", index, self.manifest.ui_uri);
        self.state = BridgeState::DescriptorResolved;
        Ok(())
    }

    pub fn instantiate(&mut self) -> Result<()> {
        self.expect_state(BridgeState::DescriptorResolved, "instantiate the UI")?;

        let options = self.host.options();
        let parent = self.host.with_toolkit(|toolkit| toolkit.parent_window());
        let features = FeatureSet::new(&self.host, &options, parent);

        let module = self.module.as_mut().ok_or(BridgeError::InvalidState {
            action: "instantiate the UI",
            state: self.state,
        })?;

        let instance = module.instantiate(InstantiateArgs {
            plugin_uri: &self.manifest.plugin_uri,
            bundle_path: &self.manifest.bundle,
            features: &features,
            host: &self.host,
        });

        // On failure the features are dropped here; no instance can use them.
        let mut instance = instance?;
        self.extensions = instance.probe_extensions();
        log::debug!("UI extensions: {:?}", self.extensions);

        let widget = instance.widget();
        if !widget.is_null() {
            self.host.with_toolkit(|toolkit| toolkit.embed_widget(widget));
        }

        self.features = Some(features);
        self.instance = Some(instance);

        if !options.window_title.is_empty() {
            self.host
                .with_toolkit(|toolkit| toolkit.set_title(&options.window_title));
        }

        self.state = BridgeState::Instantiated;
        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        self.expect_state(BridgeState::Instantiated, "start the UI")?;
        self.state = BridgeState::Running;
        log::info!("UI {} running", self.manifest.ui_uri);
        Ok(())
    }

    /// One pass of the event loop: dispatch every pending host message, then
    /// let the UI idle. Returns whether the controller is still running.
    pub fn idle(&mut self) -> bool {
        if self.state != BridgeState::Running {
            return false;
        }

        loop {
            match self.host.poll() {
                Ok(Some(message)) => {
                    self.handle_message(message);
                    if self.state != BridgeState::Running {
                        return false;
                    }
                }
                Ok(None) => break,
                Err(BridgeError::ChannelClosed) => {
                    log::info!("Host channel closed");
                    self.state = BridgeState::Draining;
                    return false;
                }
                Err(e) => {
                    log::warn!("Failed to read from host: {}", e);
                    break;
                }
            }
        }

        if self.extensions.idle {
            if let Some(instance) = self.instance.as_mut() {
                if instance.idle() != 0 {
                    log::info!("UI asked to close");
                    self.state = BridgeState::Draining;
                }
            }
        }

        self.state == BridgeState::Running
    }

    /// Apply one host message. Ignored unless running.
    pub fn handle_message(&mut self, message: BridgeMessage) {
        if self.state != BridgeState::Running {
            log::debug!("Ignoring {:?} while {}", message, self.state);
            return;
        }

        match message {
            BridgeMessage::Control { index, value } => {
                self.port_event(index, id::NULL, &value.to_ne_bytes());
            }
            BridgeMessage::Program { bank, program } => {
                if !self.extensions.programs {
                    log::debug!("UI has no program interface, ignoring program {}:{}", bank, program);
                    return;
                }
                if let Some(instance) = self.instance.as_mut() {
                    instance.select_program(bank, program);
                }
            }
            BridgeMessage::Note {
                on,
                channel,
                note,
                velocity,
            } => {
                let atom = codec::note_event(on, channel, note, velocity);
                self.port_event(0, id::ATOM_TRANSFER_EVENT, atom.to_aligned().as_bytes());
            }
            BridgeMessage::Atom {
                index,
                size,
                type_urid,
                data,
            } => self.deliver_atom(index, size, type_urid, data),
            BridgeMessage::Configure { key, value } => self.configure(&key, &value),
            BridgeMessage::UiOptions {
                sample_rate,
                use_theme,
                use_theme_colors,
                window_title,
                transient_window_id,
            } => {
                let title_changed = self.host.with_options(|options| {
                    options.sample_rate = sample_rate;
                    options.use_theme = use_theme;
                    options.use_theme_colors = use_theme_colors;
                    options.transient_window_id = transient_window_id;
                    let changed = options.window_title != window_title;
                    options.window_title = window_title;
                    changed
                });
                self.options_changed(title_changed);
            }
            BridgeMessage::Resize { width, height } => {
                if !self.extensions.resize {
                    log::debug!("UI has no resize interface, ignoring {}x{}", width, height);
                    return;
                }
                if let Some(instance) = self.instance.as_mut() {
                    instance.resize(width, height);
                }
            }
            BridgeMessage::Urid { urid, uri } => {
                if let Err(e) = self.host.insert_remote_urid(urid, &uri) {
                    log::warn!("Rejected URID from host: {}", e);
                }
            }
            BridgeMessage::Quit => {
                log::info!("Host asked the UI to quit");
                self.state = BridgeState::Draining;
            }
        }
    }

    fn port_event(&mut self, index: u32, format: u32, buffer: &[u8]) {
        if format == id::NULL && buffer.len() as u32 != SCALAR_SIZE {
            log::warn!("Dropping {}-byte control value for port {}", buffer.len(), index);
            return;
        }
        if let Some(instance) = self.instance.as_mut() {
            instance.port_event(index, format, buffer);
        }
    }

    fn deliver_atom(&mut self, index: u32, size: u32, type_urid: u32, data: Vec<u8>) {
        let atom = match AtomBuffer::from_wire(size, type_urid, data) {
            Ok(atom) => atom,
            Err(e) => {
                log::warn!("Dropping atom for port {}: {}", index, e);
                return;
            }
        };

        let kind = match self.host.translate_urid(atom.kind) {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("Dropping atom for port {}: {}", index, e);
                return;
            }
        };

        let atom = AtomBuffer { kind, ..atom };
        self.port_event(index, id::ATOM_TRANSFER_EVENT, atom.to_aligned().as_bytes());
    }

    fn configure(&mut self, key: &str, value: &str) {
        let mut title_changed = false;

        match key {
            "samplerate" => match value.trim().parse::<f64>() {
                Ok(rate) if rate > 0.0 => self.host.with_options(|o| o.sample_rate = rate),
                _ => {
                    log::warn!("Invalid sample rate {:?}", value);
                    return;
                }
            },
            "windowtitle" => {
                self.host
                    .with_options(|o| o.window_title = value.to_string());
                title_changed = true;
            }
            "transientwinid" => match value.trim().parse::<i64>() {
                Ok(window) => self.host.with_options(|o| o.transient_window_id = window),
                Err(_) => {
                    log::warn!("Invalid transient window id {:?}", value);
                    return;
                }
            },
            "usetheme" => {
                let flag = parse_flag(value);
                self.host.with_options(|o| o.use_theme = flag);
            }
            "usethemecolors" => {
                let flag = parse_flag(value);
                self.host.with_options(|o| o.use_theme_colors = flag);
            }
            other => {
                log::debug!("Ignoring configure {}={:?}", other, value);
                return;
            }
        }

        self.options_changed(title_changed);
    }

    fn options_changed(&mut self, title_changed: bool) {
        let options = self.host.options();
        if let Some(features) = self.features.as_mut() {
            features.update_options(&options);
        }
        if title_changed {
            self.host
                .with_toolkit(|toolkit| toolkit.set_title(&options.window_title));
        }
    }

    /// Tear down from any state. Foreign cleanup runs at most once and only
    /// if an instance exists; capability payloads outlive it.
    pub fn shutdown(&mut self) {
        if self.state == BridgeState::Terminated {
            return;
        }

        log::debug!("Shutting down UI bridge from state {}", self.state);
        self.state = BridgeState::Draining;

        if let Some(mut instance) = self.instance.take() {
            instance.cleanup();
        }
        self.features = None;
        self.module = None;
        self.host.release();

        self.state = BridgeState::Terminated;
        log::info!("UI bridge terminated");
    }
}

impl Drop for BridgeController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1" | "yes")
}

/// Whether the host may let the user resize the UI's window.
pub fn is_resizable(manifest: &UiManifest, toolkit: &dyn Toolkit) -> bool {
    let mut resizable = true;

    if toolkit.is_embedded() {
        resizable = manifest.declares_extension(uris::UI_RESIZE);
    }
    if manifest.declares_feature(uris::UI_FIXED_SIZE)
        || manifest.declares_feature(uris::UI_NO_USER_RESIZE)
    {
        resizable = false;
    }

    resizable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::HeadlessToolkit;

    struct Embedded;

    impl Toolkit for Embedded {
        fn set_size(&mut self, _width: u32, _height: u32) {}
        fn set_title(&mut self, _title: &str) {}
        fn is_embedded(&self) -> bool {
            true
        }
    }

    fn manifest(extensions: &[&str], features: &[&str]) -> UiManifest {
        UiManifest {
            plugin_uri: "urn:test:plugin".into(),
            ui_uri: "urn:test:plugin#ui".into(),
            binary: "/tmp/ui.so".into(),
            bundle: "/tmp".into(),
            port_symbols: vec![],
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
            features: features.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn resizable_detection() {
        let headless = HeadlessToolkit::default();
        assert!(is_resizable(&manifest(&[], &[]), &headless));
        assert!(!is_resizable(&manifest(&[], &[uris::UI_FIXED_SIZE]), &headless));
        assert!(!is_resizable(&manifest(&[], &[uris::UI_NO_USER_RESIZE]), &headless));

        assert!(!is_resizable(&manifest(&[], &[]), &Embedded));
        assert!(is_resizable(&manifest(&[uris::UI_RESIZE], &[]), &Embedded));
        assert!(!is_resizable(
            &manifest(&[uris::UI_RESIZE], &[uris::UI_FIXED_SIZE]),
            &Embedded
        ));
    }

    #[test]
    fn out_of_order_steps_are_rejected() {
        let mut controller = BridgeController::new(
            manifest(&[], &[]),
            UiOptions::default(),
            None,
            Box::new(HeadlessToolkit::default()),
        );

        assert!(matches!(
            controller.start(),
            Err(BridgeError::InvalidState {
                state: BridgeState::Uninitialized,
                ..
            })
        ));
        controller.shutdown();
        assert_eq!(controller.state(), BridgeState::Terminated);
    }

    #[test]
    fn flags_parse_loosely() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
