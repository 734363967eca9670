//! Foreign UI modules: opening the binary, picking a descriptor and driving
//! the instance it creates.
//!
//! The controller talks to the traits here; [`LibraryLoader`] is the real
//! implementation on top of `libloading`.

use crate::crash_protection::guard_callback;
use crate::errors::{BridgeError, LoadStage, Result};
use crate::features::FeatureSet;
use crate::ffi::{
    Lv2ProgramsUiInterface, Lv2UiDescriptor, Lv2UiDescriptorFunction, Lv2UiHandle,
    Lv2UiIdleInterface, Lv2UiResize, Lv2UiWidget,
};
use crate::host::{self, HostState};
use crate::urid::Urid;
use crate::uris;
use libloading::Library;
use std::ffi::{c_void, CStr, CString};
use std::path::{Path, PathBuf};
use std::ptr;
use std::rc::Rc;

const ENTRY_SYMBOL: &[u8] = b"lv2ui_descriptor\0";

/// Optional interfaces a UI instance turned out to provide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    pub options: bool,
    pub programs: bool,
    pub idle: bool,
    pub resize: bool,
}

/// Everything `instantiate` passes to the UI.
pub struct InstantiateArgs<'a> {
    pub plugin_uri: &'a str,
    pub bundle_path: &'a Path,
    pub features: &'a FeatureSet,
    pub host: &'a Rc<HostState>,
}

/// Opens UI binaries.
pub trait ModuleLoader {
    fn open(&self, binary: &Path) -> Result<Box<dyn UiModule>>;
}

/// An opened UI binary.
pub trait UiModule {
    /// URI of the descriptor at `index`, or `None` past the end.
    fn descriptor_uri(&self, index: u32) -> Option<String>;

    /// Make the descriptor at `index` the one [`instantiate`](Self::instantiate) uses.
    fn select_descriptor(&mut self, index: u32) -> Result<()>;

    fn instantiate(&mut self, args: InstantiateArgs<'_>) -> Result<Box<dyn UiInstance>>;
}

/// A live UI. Methods for extensions the instance lacks are no-ops.
pub trait UiInstance {
    /// Query the optional interfaces. Partially implemented ones are dropped.
    fn probe_extensions(&mut self) -> ExtensionSet;

    /// Deliver a port update. `buffer` is a 4-byte float for format 0, or a
    /// complete aligned atom.
    fn port_event(&mut self, port_index: u32, format: Urid, buffer: &[u8]);

    fn select_program(&mut self, bank: u32, program: u32);

    /// Run one idle cycle. Non-zero means the UI wants to close.
    fn idle(&mut self) -> i32;

    fn resize(&mut self, width: u32, height: u32);

    /// The native widget the UI created, if any.
    fn widget(&self) -> *mut c_void {
        ptr::null_mut()
    }

    /// Tear the instance down. Called exactly once.
    fn cleanup(&mut self);
}

/// [`ModuleLoader`] that `dlopen`s the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibraryLoader;

impl ModuleLoader for LibraryLoader {
    fn open(&self, binary: &Path) -> Result<Box<dyn UiModule>> {
        Ok(Box::new(Lv2UiLibrary::open(binary)?))
    }
}

/// A UI shared library and its `lv2ui_descriptor` entry point.
pub struct Lv2UiLibrary {
    path: PathBuf,
    // Shared with instances so the code stays mapped until they are gone.
    library: Rc<Library>,
    entry: Lv2UiDescriptorFunction,
    selected: *const Lv2UiDescriptor,
}

impl Lv2UiLibrary {
    pub fn open(path: &Path) -> Result<Self> {
        let library = unsafe { Library::new(path) }.map_err(|e| BridgeError::LoadFailed {
            path: path.to_path_buf(),
            stage: LoadStage::Opening,
            reason: e.to_string(),
        })?;

        let entry = unsafe {
            let symbol = library
                .get::<Lv2UiDescriptorFunction>(ENTRY_SYMBOL)
                .map_err(|e| BridgeError::LoadFailed {
                    path: path.to_path_buf(),
                    stage: LoadStage::EntryPoint,
                    reason: e.to_string(),
                })?;
            *symbol
        };

        log::info!("Loaded UI library {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            library: Rc::new(library),
            entry,
            selected: ptr::null(),
        })
    }

    /// Descriptor at `index`, null past the end.
    fn descriptor(&self, index: u32) -> *const Lv2UiDescriptor {
        let entry = self.entry;
        guard_callback("lv2ui_descriptor", ptr::null(), || unsafe { entry(index) })
    }

    fn load_error(&self, stage: LoadStage, reason: impl Into<String>) -> BridgeError {
        BridgeError::LoadFailed {
            path: self.path.clone(),
            stage,
            reason: reason.into(),
        }
    }
}

impl UiModule for Lv2UiLibrary {
    fn descriptor_uri(&self, index: u32) -> Option<String> {
        let descriptor = unsafe { self.descriptor(index).as_ref() }?;
        if descriptor.uri.is_null() {
            return Some(String::new());
        }
        Some(unsafe { CStr::from_ptr(descriptor.uri) }.to_string_lossy().into_owned())
    }

    fn select_descriptor(&mut self, index: u32) -> Result<()> {
        let descriptor = self.descriptor(index);
        if descriptor.is_null() {
            return Err(self.load_error(
                LoadStage::Descriptor,
                format!("no descriptor at index {}", index),
            ));
        }
        self.selected = descriptor;
        Ok(())
    }

    fn instantiate(&mut self, args: InstantiateArgs<'_>) -> Result<Box<dyn UiInstance>> {
        let descriptor = unsafe { self.selected.as_ref() }
            .ok_or_else(|| self.load_error(LoadStage::Instantiation, "no descriptor selected"))?;
        let instantiate = descriptor
            .instantiate
            .ok_or_else(|| self.load_error(LoadStage::Instantiation, "descriptor has no instantiate"))?;

        let plugin_uri = CString::new(args.plugin_uri)
            .map_err(|_| self.load_error(LoadStage::Instantiation, "plugin URI contains NUL"))?;

        // Bundle paths are handed over with a trailing separator.
        let mut bundle = args.bundle_path.to_string_lossy().into_owned();
        if !bundle.ends_with('/') {
            bundle.push('/');
        }
        let bundle = CString::new(bundle)
            .map_err(|_| self.load_error(LoadStage::Instantiation, "bundle path contains NUL"))?;

        let mut widget: Lv2UiWidget = ptr::null_mut();
        let handle = unsafe {
            instantiate(
                descriptor,
                plugin_uri.as_ptr(),
                bundle.as_ptr(),
                host::ui_write,
                host::handle_of(args.host),
                &mut widget,
                args.features.as_ptr(),
            )
        };

        if handle.is_null() {
            return Err(self.load_error(LoadStage::Instantiation, "instantiate returned null"));
        }

        Ok(Box::new(Lv2UiInstance {
            descriptor: self.selected,
            handle,
            widget,
            programs: ptr::null(),
            idle: ptr::null(),
            resize: ptr::null(),
            _library: Rc::clone(&self.library),
        }))
    }
}

struct Lv2UiInstance {
    descriptor: *const Lv2UiDescriptor,
    handle: Lv2UiHandle,
    widget: Lv2UiWidget,
    programs: *const Lv2ProgramsUiInterface,
    idle: *const Lv2UiIdleInterface,
    resize: *const Lv2UiResize,
    _library: Rc<Library>,
}

impl Lv2UiInstance {
    fn descriptor(&self) -> &Lv2UiDescriptor {
        unsafe { &*self.descriptor }
    }

    fn extension<T>(&self, uri: &str) -> *const T {
        let Some(extension_data) = self.descriptor().extension_data else {
            return ptr::null();
        };
        let Ok(uri) = CString::new(uri) else {
            return ptr::null();
        };
        unsafe { extension_data(uri.as_ptr()).cast::<T>() }
    }
}

impl UiInstance for Lv2UiInstance {
    fn probe_extensions(&mut self) -> ExtensionSet {
        let options = self.extension::<c_void>(uris::OPTIONS_INTERFACE);

        let programs = self.extension::<Lv2ProgramsUiInterface>(uris::PROGRAMS_UI_INTERFACE);
        if unsafe { programs.as_ref() }.is_some_and(|p| p.select_program.is_some()) {
            self.programs = programs;
        }

        let idle = self.extension::<Lv2UiIdleInterface>(uris::UI_IDLE_INTERFACE);
        if unsafe { idle.as_ref() }.is_some_and(|i| i.idle.is_some()) {
            self.idle = idle;
        }

        let resize = self.extension::<Lv2UiResize>(uris::UI_RESIZE);
        if unsafe { resize.as_ref() }.is_some_and(|r| r.ui_resize.is_some()) {
            self.resize = resize;
        }

        ExtensionSet {
            options: !options.is_null(),
            programs: !self.programs.is_null(),
            idle: !self.idle.is_null(),
            resize: !self.resize.is_null(),
        }
    }

    fn port_event(&mut self, port_index: u32, format: Urid, buffer: &[u8]) {
        if let Some(port_event) = self.descriptor().port_event {
            unsafe {
                port_event(
                    self.handle,
                    port_index,
                    buffer.len() as u32,
                    format,
                    buffer.as_ptr().cast(),
                )
            };
        }
    }

    fn select_program(&mut self, bank: u32, program: u32) {
        let Some(programs) = (unsafe { self.programs.as_ref() }) else {
            return;
        };
        if let Some(select_program) = programs.select_program {
            unsafe { select_program(self.handle, bank, program) };
        }
    }

    fn idle(&mut self) -> i32 {
        let Some(idle) = (unsafe { self.idle.as_ref() }).and_then(|i| i.idle) else {
            return 0;
        };
        unsafe { idle(self.handle) }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(resize) = (unsafe { self.resize.as_ref() }) else {
            return;
        };
        if let Some(ui_resize) = resize.ui_resize {
            unsafe { ui_resize(self.handle, width as i32, height as i32) };
        }
    }

    fn widget(&self) -> *mut c_void {
        self.widget
    }

    fn cleanup(&mut self) {
        if self.handle.is_null() {
            return;
        }
        if let Some(cleanup) = self.descriptor().cleanup {
            unsafe { cleanup(self.handle) };
        }
        self.handle = ptr::null_mut();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_fails_at_opening() {
        let err = LibraryLoader
            .open(Path::new("/nonexistent/ui.so"))
            .err()
            .unwrap();
        match err {
            BridgeError::LoadFailed { stage, .. } => assert_eq!(stage, LoadStage::Opening),
            other => panic!("unexpected error: {}", other),
        }
    }
}
