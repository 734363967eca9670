//! Capabilities offered to the UI at instantiation.
//!
//! The set is fixed: every capability is always offered, in the same order,
//! and the array handed to foreign code is null-terminated. Payload structs
//! are boxed so their addresses survive moves of the [`FeatureSet`].

use crate::ffi::{
    Lv2Feature, Lv2LogLog, Lv2ProgramsHost, Lv2StateMakePath, Lv2StateMapPath, Lv2UiPortMap,
    Lv2UiResize, Lv2UriMapFeature, Lv2UridMap, Lv2UridUnmap,
};
use crate::host::{self, HostState};
use crate::options::{OptionsBlock, UiOptions};
use crate::uris;
use std::ffi::{c_void, CString};
use std::ptr;
use std::rc::Rc;

/// One entry of the capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Log,
    Options,
    Programs,
    StateMakePath,
    StateMapPath,
    UriMap,
    UridMap,
    UridUnmap,
    UiIdleInterface,
    UiFixedSize,
    UiMakeResident,
    UiMakeSoNameResident,
    UiNoUserResize,
    UiParent,
    UiPortMap,
    UiPortSubscribe,
    UiResize,
    UiTouch,
}

impl Capability {
    /// Every capability, in the order they are offered.
    pub const ALL: [Capability; 18] = [
        Capability::Log,
        Capability::Options,
        Capability::Programs,
        Capability::StateMakePath,
        Capability::StateMapPath,
        Capability::UriMap,
        Capability::UridMap,
        Capability::UridUnmap,
        Capability::UiIdleInterface,
        Capability::UiFixedSize,
        Capability::UiMakeResident,
        Capability::UiMakeSoNameResident,
        Capability::UiNoUserResize,
        Capability::UiParent,
        Capability::UiPortMap,
        Capability::UiPortSubscribe,
        Capability::UiResize,
        Capability::UiTouch,
    ];

    pub fn uri(self) -> &'static str {
        match self {
            Capability::Log => uris::LOG_LOG,
            Capability::Options => uris::OPTIONS_OPTIONS,
            Capability::Programs => uris::PROGRAMS_HOST,
            Capability::StateMakePath => uris::STATE_MAKE_PATH,
            Capability::StateMapPath => uris::STATE_MAP_PATH,
            Capability::UriMap => uris::URI_MAP,
            Capability::UridMap => uris::URID_MAP,
            Capability::UridUnmap => uris::URID_UNMAP,
            Capability::UiIdleInterface => uris::UI_IDLE_INTERFACE,
            Capability::UiFixedSize => uris::UI_FIXED_SIZE,
            Capability::UiMakeResident => uris::UI_MAKE_RESIDENT,
            Capability::UiMakeSoNameResident => uris::UI_MAKE_SONAME_RESIDENT,
            Capability::UiNoUserResize => uris::UI_NO_USER_RESIZE,
            Capability::UiParent => uris::UI_PARENT,
            Capability::UiPortMap => uris::UI_PORT_MAP,
            Capability::UiPortSubscribe => uris::UI_PORT_SUBSCRIBE,
            Capability::UiResize => uris::UI_RESIZE,
            Capability::UiTouch => uris::UI_TOUCH,
        }
    }

    /// Marker capabilities advertise support and carry no payload.
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            Capability::UiIdleInterface
                | Capability::UiFixedSize
                | Capability::UiMakeResident
                | Capability::UiMakeSoNameResident
                | Capability::UiNoUserResize
                | Capability::UiPortSubscribe
                | Capability::UiTouch
        )
    }
}

enum Payload {
    Marker,
    Log(Box<Lv2LogLog>),
    Options,
    Programs(Box<Lv2ProgramsHost>),
    MakePath(Box<Lv2StateMakePath>),
    MapPath(Box<Lv2StateMapPath>),
    UriMap(Box<Lv2UriMapFeature>),
    UridMap(Box<Lv2UridMap>),
    UridUnmap(Box<Lv2UridUnmap>),
    Parent,
    PortMap(Box<Lv2UiPortMap>),
    Resize(Box<Lv2UiResize>),
}

struct FeatureEntry {
    capability: Capability,
    // Referenced by `raw.uri`.
    _uri: CString,
    _payload: Payload,
    raw: Box<Lv2Feature>,
}

/// The capability array for one UI instance and everything it points at.
pub struct FeatureSet {
    entries: Vec<FeatureEntry>,
    list: Vec<*const Lv2Feature>,
    options: OptionsBlock,
    // Keeps the callback handle alive as long as foreign code can use it.
    _host: Rc<HostState>,
}

impl FeatureSet {
    pub fn new(host: &Rc<HostState>, options: &UiOptions, parent: *mut c_void) -> Self {
        let handle = host::handle_of(host);
        let options = OptionsBlock::new(options);

        let mut entries = Vec::with_capacity(Capability::ALL.len());
        for capability in Capability::ALL {
            let (payload, data): (Payload, *mut c_void) = match capability {
                Capability::Log => boxed(Payload::Log, Lv2LogLog {
                    handle,
                    printf: host::log_printf,
                    vprintf: host::log_vprintf,
                }),
                Capability::Options => (Payload::Options, options.as_ptr()),
                Capability::Programs => boxed(Payload::Programs, Lv2ProgramsHost {
                    handle,
                    program_changed: host::program_changed,
                }),
                Capability::StateMakePath => boxed(Payload::MakePath, Lv2StateMakePath {
                    handle,
                    path: host::state_make_path,
                }),
                Capability::StateMapPath => boxed(Payload::MapPath, Lv2StateMapPath {
                    handle,
                    abstract_path: host::state_abstract_path,
                    absolute_path: host::state_absolute_path,
                }),
                Capability::UriMap => boxed(Payload::UriMap, Lv2UriMapFeature {
                    callback_data: handle,
                    uri_to_id: host::uri_to_id,
                }),
                Capability::UridMap => boxed(Payload::UridMap, Lv2UridMap {
                    handle,
                    map: host::urid_map,
                }),
                Capability::UridUnmap => boxed(Payload::UridUnmap, Lv2UridUnmap {
                    handle,
                    unmap: host::urid_unmap,
                }),
                Capability::UiParent => (Payload::Parent, parent),
                Capability::UiPortMap => boxed(Payload::PortMap, Lv2UiPortMap {
                    handle,
                    port_index: host::ui_port_index,
                }),
                Capability::UiResize => boxed(Payload::Resize, Lv2UiResize {
                    handle,
                    ui_resize: Some(host::ui_resize),
                }),
                _ => (Payload::Marker, ptr::null_mut()),
            };

            let uri = CString::new(capability.uri()).unwrap_or_default();
            let raw = Box::new(Lv2Feature {
                uri: uri.as_ptr(),
                data,
            });
            entries.push(FeatureEntry {
                capability,
                _uri: uri,
                _payload: payload,
                raw,
            });
        }

        let mut list: Vec<*const Lv2Feature> = entries
            .iter()
            .map(|entry| &*entry.raw as *const Lv2Feature)
            .collect();
        list.push(ptr::null());

        Self {
            entries,
            list,
            options,
            _host: Rc::clone(host),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.entries.iter().map(|entry| entry.capability)
    }

    pub fn uris(&self) -> Vec<&'static str> {
        self.capabilities().map(Capability::uri).collect()
    }

    /// The `data` pointer offered for `capability`.
    pub fn data(&self, capability: Capability) -> *mut c_void {
        self.entries
            .iter()
            .find(|entry| entry.capability == capability)
            .map_or(ptr::null_mut(), |entry| entry.raw.data)
    }

    pub fn options(&self) -> &OptionsBlock {
        &self.options
    }

    /// Refresh the option values the UI can read, in place.
    pub fn update_options(&mut self, options: &UiOptions) {
        self.options.update(options);
    }

    /// Null-terminated array for `instantiate`.
    pub fn as_ptr(&self) -> *const *const Lv2Feature {
        self.list.as_ptr()
    }
}

fn boxed<T>(wrap: fn(Box<T>) -> Payload, value: T) -> (Payload, *mut c_void) {
    let mut value = Box::new(value);
    let data = &mut *value as *mut T as *mut c_void;
    (wrap(value), data)
}
