#![allow(dead_code)]

use lv2_ui_bridge::module::{ExtensionSet, InstantiateArgs, ModuleLoader, UiInstance, UiModule};
use lv2_ui_bridge::prelude::*;
use lv2_ui_bridge::{Capability, HostState};
use std::cell::RefCell;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// What the fake UI saw and did.
#[derive(Default)]
pub struct Recorder {
    pub opened: Vec<PathBuf>,
    pub instantiated_with: Vec<(String, PathBuf, Vec<&'static str>)>,
    pub port_events: Vec<(u32, u32, Vec<u8>)>,
    pub programs: Vec<(u32, u32)>,
    pub resizes: Vec<(u32, u32)>,
    pub idle_calls: u32,
    pub cleanups: u32,
    pub host: Option<Rc<HostState>>,
    /// `urid:map` payload as the UI received it.
    pub urid_map: Option<*mut c_void>,
}

/// Scripted stand-in for a UI binary.
#[derive(Clone)]
pub struct FakeLoader {
    pub recorder: Rc<RefCell<Recorder>>,
    pub descriptors: Vec<String>,
    pub fail_open: bool,
    pub fail_instantiate: bool,
    pub extensions: ExtensionSet,
    /// Idle returns non-zero from this call on.
    pub close_on_idle: Option<u32>,
    /// Address handed out as the UI's native widget; 0 for none.
    pub widget: usize,
}

impl FakeLoader {
    pub fn new(ui_uri: &str) -> Self {
        Self {
            recorder: Rc::new(RefCell::new(Recorder::default())),
            descriptors: vec!["urn:test:other#ui".to_string(), ui_uri.to_string()],
            fail_open: false,
            fail_instantiate: false,
            extensions: ExtensionSet::default(),
            close_on_idle: None,
            widget: 0,
        }
    }

    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }
}

impl ModuleLoader for FakeLoader {
    fn open(&self, binary: &Path) -> lv2_ui_bridge::Result<Box<dyn UiModule>> {
        if self.fail_open {
            return Err(BridgeError::LoadFailed {
                path: binary.to_path_buf(),
                stage: lv2_ui_bridge::LoadStage::Opening,
                reason: "no such file".to_string(),
            });
        }
        self.recorder.borrow_mut().opened.push(binary.to_path_buf());
        Ok(Box::new(FakeModule {
            loader: self.clone(),
            selected: None,
        }))
    }
}

struct FakeModule {
    loader: FakeLoader,
    selected: Option<u32>,
}

impl UiModule for FakeModule {
    fn descriptor_uri(&self, index: u32) -> Option<String> {
        self.loader.descriptors.get(index as usize).cloned()
    }

    fn select_descriptor(&mut self, index: u32) -> lv2_ui_bridge::Result<()> {
        self.selected = Some(index);
        Ok(())
    }

    fn instantiate(&mut self, args: InstantiateArgs<'_>) -> lv2_ui_bridge::Result<Box<dyn UiInstance>> {
        let mut recorder = self.loader.recorder.borrow_mut();
        recorder.instantiated_with.push((
            args.plugin_uri.to_string(),
            args.bundle_path.to_path_buf(),
            args.features.uris(),
        ));

        if self.loader.fail_instantiate {
            return Err(BridgeError::LoadFailed {
                path: PathBuf::from("fake"),
                stage: lv2_ui_bridge::LoadStage::Instantiation,
                reason: "instantiate returned null".to_string(),
            });
        }

        recorder.host = Some(Rc::clone(args.host));
        recorder.urid_map = Some(args.features.data(Capability::UridMap));

        Ok(Box::new(FakeInstance {
            recorder: Rc::clone(&self.loader.recorder),
            extensions: self.loader.extensions,
            close_on_idle: self.loader.close_on_idle,
            widget: self.loader.widget,
        }))
    }
}

struct FakeInstance {
    recorder: Rc<RefCell<Recorder>>,
    extensions: ExtensionSet,
    close_on_idle: Option<u32>,
    widget: usize,
}

impl UiInstance for FakeInstance {
    fn probe_extensions(&mut self) -> ExtensionSet {
        self.extensions
    }

    fn port_event(&mut self, port_index: u32, format: u32, buffer: &[u8]) {
        self.recorder
            .borrow_mut()
            .port_events
            .push((port_index, format, buffer.to_vec()));
    }

    fn select_program(&mut self, bank: u32, program: u32) {
        self.recorder.borrow_mut().programs.push((bank, program));
    }

    fn idle(&mut self) -> i32 {
        let mut recorder = self.recorder.borrow_mut();
        recorder.idle_calls += 1;
        match self.close_on_idle {
            Some(at) if recorder.idle_calls >= at => 1,
            _ => 0,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.recorder.borrow_mut().resizes.push((width, height));
    }

    fn widget(&self) -> *mut c_void {
        self.widget as *mut c_void
    }

    fn cleanup(&mut self) {
        self.recorder.borrow_mut().cleanups += 1;
    }
}

pub const PLUGIN_URI: &str = "urn:test:synth";
pub const UI_URI: &str = "urn:test:synth#ui";

pub fn manifest() -> UiManifest {
    UiManifest {
        plugin_uri: PLUGIN_URI.to_string(),
        ui_uri: UI_URI.to_string(),
        binary: PathBuf::from("/usr/lib/lv2/synth.lv2/synth_ui.so"),
        bundle: PathBuf::from("/usr/lib/lv2/synth.lv2"),
        port_symbols: vec![
            "events_in".to_string(),
            "out_l".to_string(),
            "out_r".to_string(),
            "cutoff".to_string(),
        ],
        extensions: vec![],
        features: vec![],
    }
}

/// A running controller wired to the returned host-side channel end.
pub fn running(loader: &FakeLoader) -> (BridgeController, MemoryChannel) {
    let (bridge_end, host_end) = MemoryChannel::pair();
    let mut controller = BridgeController::new(
        manifest(),
        UiOptions::default(),
        Some(Box::new(bridge_end)),
        Box::new(HeadlessToolkit::default()),
    );
    controller.init(loader).expect("controller should start");
    (controller, host_end)
}
