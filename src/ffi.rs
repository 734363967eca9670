//! C ABI of the parts of LV2 the bridge touches.
//!
//! Layouts follow `lv2/core/lv2.h`, `lv2/ui/ui.h`, `lv2/urid/urid.h`,
//! `lv2/log/log.h`, `lv2/options/options.h`, `lv2/state/state.h`,
//! `lv2/atom/atom.h` and the kxstudio programs extension.

use std::ffi::{c_char, c_int, c_void};

pub type Lv2Handle = *mut c_void;
pub type Lv2UiHandle = *mut c_void;
pub type Lv2UiWidget = *mut c_void;
pub type Lv2UiController = *mut c_void;

#[repr(C)]
pub struct Lv2Feature {
    pub uri: *const c_char,
    pub data: *mut c_void,
}

pub type Lv2UiWriteFunction = unsafe extern "C" fn(
    controller: Lv2UiController,
    port_index: u32,
    buffer_size: u32,
    port_protocol: u32,
    buffer: *const c_void,
);

#[repr(C)]
pub struct Lv2UiDescriptor {
    pub uri: *const c_char,
    pub instantiate: Option<
        unsafe extern "C" fn(
            descriptor: *const Lv2UiDescriptor,
            plugin_uri: *const c_char,
            bundle_path: *const c_char,
            write_function: Lv2UiWriteFunction,
            controller: Lv2UiController,
            widget: *mut Lv2UiWidget,
            features: *const *const Lv2Feature,
        ) -> Lv2UiHandle,
    >,
    pub cleanup: Option<unsafe extern "C" fn(ui: Lv2UiHandle)>,
    pub port_event: Option<
        unsafe extern "C" fn(
            ui: Lv2UiHandle,
            port_index: u32,
            buffer_size: u32,
            format: u32,
            buffer: *const c_void,
        ),
    >,
    pub extension_data: Option<unsafe extern "C" fn(uri: *const c_char) -> *const c_void>,
}

/// Signature of the `lv2ui_descriptor` entry symbol.
pub type Lv2UiDescriptorFunction = unsafe extern "C" fn(index: u32) -> *const Lv2UiDescriptor;

#[repr(C)]
pub struct Lv2UridMap {
    pub handle: *mut c_void,
    pub map: unsafe extern "C" fn(handle: *mut c_void, uri: *const c_char) -> u32,
}

#[repr(C)]
pub struct Lv2UridUnmap {
    pub handle: *mut c_void,
    pub unmap: unsafe extern "C" fn(handle: *mut c_void, urid: u32) -> *const c_char,
}

/// Deprecated uri-map extension, still requested by older UIs.
#[repr(C)]
pub struct Lv2UriMapFeature {
    pub callback_data: *mut c_void,
    pub uri_to_id: unsafe extern "C" fn(
        callback_data: *mut c_void,
        map: *const c_char,
        uri: *const c_char,
    ) -> u32,
}

/// `LV2_Log_Log`.
///
/// The C `printf` member is variadic. Rust cannot define variadic functions
/// on stable, so the slot holds a three-argument function: callers push the
/// variadic tail where the callee never reads it, and only the format string
/// is logged.
#[repr(C)]
pub struct Lv2LogLog {
    pub handle: *mut c_void,
    pub printf: unsafe extern "C" fn(handle: *mut c_void, kind: u32, fmt: *const c_char) -> c_int,
    pub vprintf: unsafe extern "C" fn(
        handle: *mut c_void,
        kind: u32,
        fmt: *const c_char,
        ap: *mut c_void,
    ) -> c_int,
}

#[repr(C)]
pub struct Lv2StateMakePath {
    pub handle: *mut c_void,
    pub path: unsafe extern "C" fn(handle: *mut c_void, path: *const c_char) -> *mut c_char,
}

#[repr(C)]
pub struct Lv2StateMapPath {
    pub handle: *mut c_void,
    pub abstract_path:
        unsafe extern "C" fn(handle: *mut c_void, absolute_path: *const c_char) -> *mut c_char,
    pub absolute_path:
        unsafe extern "C" fn(handle: *mut c_void, abstract_path: *const c_char) -> *mut c_char,
}

#[repr(C)]
pub struct Lv2ProgramsHost {
    pub handle: *mut c_void,
    pub program_changed: unsafe extern "C" fn(handle: *mut c_void, index: i32),
}

#[repr(C)]
pub struct Lv2UiPortMap {
    pub handle: *mut c_void,
    pub port_index: unsafe extern "C" fn(handle: *mut c_void, symbol: *const c_char) -> u32,
}

#[repr(C)]
pub struct Lv2UiResize {
    pub handle: *mut c_void,
    pub ui_resize: Option<unsafe extern "C" fn(handle: *mut c_void, width: c_int, height: c_int) -> c_int>,
}

pub const LV2_OPTIONS_INSTANCE: u32 = 0;

#[repr(C)]
pub struct Lv2OptionsOption {
    pub context: u32,
    pub subject: u32,
    pub key: u32,
    pub size: u32,
    pub kind: u32,
    pub value: *const c_void,
}

#[repr(C)]
pub struct Lv2OptionsInterface {
    pub get: Option<unsafe extern "C" fn(instance: Lv2Handle, options: *mut Lv2OptionsOption) -> u32>,
    pub set: Option<unsafe extern "C" fn(instance: Lv2Handle, options: *const Lv2OptionsOption) -> u32>,
}

#[repr(C)]
pub struct Lv2ProgramsUiInterface {
    pub select_program: Option<unsafe extern "C" fn(handle: Lv2UiHandle, bank: u32, program: u32)>,
}

#[repr(C)]
pub struct Lv2UiIdleInterface {
    pub idle: Option<unsafe extern "C" fn(handle: Lv2UiHandle) -> c_int>,
}

/// `LV2_Atom` header; the body follows immediately.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lv2Atom {
    pub size: u32,
    pub kind: u32,
}
