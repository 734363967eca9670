//! Host-side state reachable from foreign UI code, and the `extern "C"`
//! trampolines that expose it.
//!
//! Foreign code only ever sees an opaque pointer to [`HostState`]. All state
//! behind it is single-threaded and guarded by `RefCell`, so a callback that
//! re-enters while another holds the same piece of state is refused with a
//! warning and a sentinel instead of aliasing.

use crate::codec::{self, PortWrite};
use crate::crash_protection::{guard_callback, guard_void};
use crate::errors::{BridgeError, Result, UridError};
use crate::options::UiOptions;
use crate::paths;
use crate::ports::{PortTable, INVALID_PORT_INDEX};
use crate::protocol::{BridgeMessage, Channel};
use crate::toolkit::Toolkit;
use crate::urid::{Interned, Urid, UridTable};
use crate::uris::id;
use std::borrow::Cow;
use std::cell::RefCell;
use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::path::{Path, PathBuf};
use std::ptr;
use std::rc::Rc;

const LOG_TARGET: &str = "lv2_ui";

pub struct HostState {
    urids: RefCell<UridTable>,
    channel: RefCell<Option<Box<dyn Channel>>>,
    ports: PortTable,
    options: RefCell<UiOptions>,
    toolkit: RefCell<Box<dyn Toolkit>>,
    cwd: PathBuf,
}

impl HostState {
    pub fn new(
        ports: PortTable,
        options: UiOptions,
        channel: Option<Box<dyn Channel>>,
        toolkit: Box<dyn Toolkit>,
    ) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self::with_cwd(ports, options, channel, toolkit, cwd)
    }

    /// Like [`new`](Self::new) with an explicit base for path mapping.
    pub fn with_cwd(
        ports: PortTable,
        options: UiOptions,
        channel: Option<Box<dyn Channel>>,
        toolkit: Box<dyn Toolkit>,
        cwd: PathBuf,
    ) -> Self {
        Self {
            urids: RefCell::new(UridTable::new()),
            channel: RefCell::new(channel),
            ports,
            options: RefCell::new(options),
            toolkit: RefCell::new(toolkit),
            cwd,
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn ports(&self) -> &PortTable {
        &self.ports
    }

    pub fn options(&self) -> UiOptions {
        self.options.borrow().clone()
    }

    pub(crate) fn with_options<R>(&self, f: impl FnOnce(&mut UiOptions) -> R) -> R {
        f(&mut self.options.borrow_mut())
    }

    pub(crate) fn with_toolkit<R>(&self, f: impl FnOnce(&mut dyn Toolkit) -> R) -> R {
        f(self.toolkit.borrow_mut().as_mut())
    }

    // ---------------------------------------------------------------------
    // Channel

    pub fn is_channel_running(&self) -> bool {
        match self.channel.try_borrow() {
            Ok(channel) => channel.as_ref().is_some_and(|c| c.is_running()),
            Err(_) => false,
        }
    }

    /// Send to the host if the channel is live. Returns whether it was sent.
    pub fn send(&self, message: &BridgeMessage) -> bool {
        let mut channel = match self.channel.try_borrow_mut() {
            Ok(channel) => channel,
            Err(_) => {
                log::warn!("Re-entrant send dropped: {:?}", message);
                return false;
            }
        };

        let Some(channel) = channel.as_mut() else {
            return false;
        };
        if !channel.is_running() {
            return false;
        }

        match channel.send(message) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to send {:?}: {}", message, e);
                false
            }
        }
    }

    /// Next inbound message, if any. Without a channel nothing ever arrives.
    pub fn poll(&self) -> Result<Option<BridgeMessage>> {
        let mut channel = self
            .channel
            .try_borrow_mut()
            .map_err(|_| BridgeError::ChannelError("channel busy".to_string()))?;

        match channel.as_mut() {
            Some(channel) => channel.poll(),
            None => Ok(None),
        }
    }

    // ---------------------------------------------------------------------
    // URIDs

    /// Map `uri`, announcing a newly allocated id to the peer before it is
    /// returned to anyone who could put it in a message.
    pub fn try_map_uri(&self, uri: &str) -> std::result::Result<Urid, UridError> {
        let interned = {
            let Ok(mut urids) = self.urids.try_borrow_mut() else {
                log::warn!("Re-entrant map of {:?} refused", uri);
                return Err(UridError::Unknown(id::NULL));
            };
            urids.lookup_or_intern(uri)?
        };

        if let Interned::New(urid) = interned {
            self.send(&BridgeMessage::Urid {
                urid,
                uri: uri.to_string(),
            });
        }

        Ok(interned.urid())
    }

    /// Sentinel form of [`try_map_uri`](Self::try_map_uri): 0 on failure.
    pub fn map_uri(&self, uri: &str) -> Urid {
        match self.try_map_uri(uri) {
            Ok(urid) => urid,
            Err(e) => {
                log::warn!("Cannot map URI {:?}: {}", uri, e);
                id::NULL
            }
        }
    }

    pub fn unmap_uri(&self, urid: Urid) -> String {
        match self.urids.try_borrow() {
            Ok(urids) => urids.reverse(urid).to_string(),
            Err(_) => crate::uris::NULL_URI.to_string(),
        }
    }

    /// Pointer to the table's copy of the URI, valid until the table is
    /// released. Null for the null id.
    fn unmap_uri_ptr(&self, urid: Urid) -> *const c_char {
        if urid == id::NULL {
            return ptr::null();
        }
        match self.urids.try_borrow() {
            Ok(urids) => urids.reverse_c(urid).as_ptr(),
            Err(_) => ptr::null(),
        }
    }

    pub fn urid_count(&self) -> u32 {
        self.urids.borrow().len()
    }

    /// Record a URID announced by the peer.
    pub fn insert_remote_urid(&self, urid: Urid, uri: &str) -> std::result::Result<(), UridError> {
        self.urids.borrow_mut().insert_remote(urid, uri)
    }

    /// Re-map a type id through its URI. The peer is told about any id this
    /// allocates, as with [`try_map_uri`](Self::try_map_uri).
    pub fn translate_urid(&self, urid: Urid) -> std::result::Result<Urid, UridError> {
        let interned = self.urids.borrow_mut().translate(urid)?;
        if let Interned::New(new) = interned {
            let uri = self.unmap_uri(new);
            self.send(&BridgeMessage::Urid { urid: new, uri });
        }
        Ok(interned.urid())
    }

    // ---------------------------------------------------------------------
    // Feature callbacks

    pub fn port_index(&self, symbol: &str) -> u32 {
        match self.ports.index_of(symbol) {
            Some(index) => index,
            None => {
                log::debug!("UI asked for unknown port symbol {:?}", symbol);
                INVALID_PORT_INDEX
            }
        }
    }

    /// Handle a resize request from the UI. 0 on success, 1 if rejected.
    pub fn request_resize(&self, width: i32, height: i32) -> i32 {
        if width <= 0 || height <= 0 {
            log::warn!("Rejecting UI resize to {}x{}", width, height);
            return 1;
        }

        let (width, height) = (width as u32, height as u32);
        let Ok(mut toolkit) = self.toolkit.try_borrow_mut() else {
            log::warn!("Re-entrant resize request dropped");
            return 1;
        };
        toolkit.set_size(width, height);
        drop(toolkit);

        self.options.borrow_mut().window_size = Some((width, height));
        0
    }

    pub fn program_changed(&self, index: i32) {
        log::debug!("UI changed program to {}", index);
        self.send(&BridgeMessage::Configure {
            key: "reloadprograms".to_string(),
            value: String::new(),
        });
    }

    /// Route a foreign log line to the `log` facade. Returns the number of
    /// bytes logged, 0 for unknown levels.
    pub fn log_message(&self, kind: Urid, message: &str) -> i32 {
        let message = message.trim_end();
        match kind {
            id::LOG_ERROR => log::error!(target: LOG_TARGET, "{}", message),
            id::LOG_WARNING => log::warn!(target: LOG_TARGET, "{}", message),
            id::LOG_NOTE => log::info!(target: LOG_TARGET, "{}", message),
            id::LOG_TRACE => log::trace!(target: LOG_TARGET, "{}", message),
            _ => return 0,
        }
        message.len() as i32
    }

    pub fn make_path(&self, path: &str) -> Option<PathBuf> {
        paths::make_path(&self.cwd, path)
    }

    pub fn abstract_path(&self, path: &str) -> PathBuf {
        paths::abstract_path(&self.cwd, path)
    }

    pub fn absolute_path(&self, path: &str) -> PathBuf {
        paths::absolute_path(&self.cwd, path)
    }

    /// Forward one call of the UI's write function to the host.
    ///
    /// Malformed payloads and unknown formats are logged and dropped.
    pub fn ui_write(&self, port_index: u32, format: Urid, buffer: &[u8]) {
        let decoded = match self.urids.try_borrow() {
            Ok(urids) => codec::decode_ui_write(&urids, port_index, format, buffer),
            Err(_) => {
                log::warn!("Re-entrant UI write on port {} dropped", port_index);
                return;
            }
        };

        let message = match decoded {
            Ok(PortWrite::Control { index, value }) => BridgeMessage::Control { index, value },
            Ok(PortWrite::Atom { index, atom }) => {
                let type_urid = match self.translate_urid(atom.kind) {
                    Ok(urid) => urid,
                    Err(e) => {
                        log::warn!("UI write on port {} has unusable atom type: {}", index, e);
                        return;
                    }
                };
                BridgeMessage::Atom {
                    index,
                    size: atom.total_size(),
                    type_urid,
                    data: atom.body,
                }
            }
            Err(e) => {
                log::warn!("Dropping UI write on port {}: {}", port_index, e);
                return;
            }
        };

        self.send(&message);
    }

    /// Free process-local resources once the UI is gone.
    pub(crate) fn release(&self) {
        if let Ok(mut urids) = self.urids.try_borrow_mut() {
            urids.release();
        }
        if let Ok(mut channel) = self.channel.try_borrow_mut() {
            *channel = None;
        }
    }
}

/// Opaque handle given to foreign code for `state`.
pub(crate) fn handle_of(state: &Rc<HostState>) -> *mut c_void {
    Rc::as_ptr(state) as *mut c_void
}

// -------------------------------------------------------------------------
// Trampolines

unsafe fn host<'a>(handle: *mut c_void) -> Option<&'a HostState> {
    (handle as *const HostState).as_ref()
}

unsafe fn str_arg<'a>(arg: *const c_char) -> Option<Cow<'a, str>> {
    if arg.is_null() {
        return None;
    }
    Some(CStr::from_ptr(arg).to_string_lossy())
}

fn strdup_path(path: &Path) -> *mut c_char {
    let Ok(c_path) = CString::new(path.to_string_lossy().into_owned()) else {
        return ptr::null_mut();
    };
    // Foreign code frees these with free(3).
    unsafe { libc::strdup(c_path.as_ptr()) }
}

pub(crate) unsafe extern "C" fn urid_map(handle: *mut c_void, uri: *const c_char) -> u32 {
    guard_callback("urid_map", id::NULL, || {
        let (Some(host), Some(uri)) = (host(handle), str_arg(uri)) else {
            return id::NULL;
        };
        host.map_uri(&uri)
    })
}

pub(crate) unsafe extern "C" fn urid_unmap(handle: *mut c_void, urid: u32) -> *const c_char {
    guard_callback("urid_unmap", ptr::null(), || match host(handle) {
        Some(host) => host.unmap_uri_ptr(urid),
        None => ptr::null(),
    })
}

pub(crate) unsafe extern "C" fn uri_to_id(
    callback_data: *mut c_void,
    _map: *const c_char,
    uri: *const c_char,
) -> u32 {
    urid_map(callback_data, uri)
}

pub(crate) unsafe extern "C" fn log_printf(
    handle: *mut c_void,
    kind: u32,
    fmt: *const c_char,
) -> c_int {
    guard_callback("log_printf", 0, || {
        let (Some(host), Some(fmt)) = (host(handle), str_arg(fmt)) else {
            return 0;
        };
        if kind == id::NULL {
            return 0;
        }
        host.log_message(kind, &fmt)
    })
}

pub(crate) unsafe extern "C" fn log_vprintf(
    handle: *mut c_void,
    kind: u32,
    fmt: *const c_char,
    _ap: *mut c_void,
) -> c_int {
    log_printf(handle, kind, fmt)
}

pub(crate) unsafe extern "C" fn state_make_path(
    handle: *mut c_void,
    path: *const c_char,
) -> *mut c_char {
    guard_callback("state_make_path", ptr::null_mut(), || {
        let (Some(host), Some(path)) = (host(handle), str_arg(path)) else {
            return ptr::null_mut();
        };
        match host.make_path(&path) {
            Some(full) => strdup_path(&full),
            None => ptr::null_mut(),
        }
    })
}

pub(crate) unsafe extern "C" fn state_abstract_path(
    handle: *mut c_void,
    absolute_path: *const c_char,
) -> *mut c_char {
    guard_callback("state_abstract_path", ptr::null_mut(), || {
        let path = match (host(handle), str_arg(absolute_path)) {
            (Some(host), Some(path)) => host.abstract_path(&path),
            _ => PathBuf::new(),
        };
        strdup_path(&path)
    })
}

pub(crate) unsafe extern "C" fn state_absolute_path(
    handle: *mut c_void,
    abstract_path: *const c_char,
) -> *mut c_char {
    guard_callback("state_absolute_path", ptr::null_mut(), || {
        let path = match (host(handle), str_arg(abstract_path)) {
            (Some(host), Some(path)) => host.absolute_path(&path),
            (Some(host), None) => host.cwd().to_path_buf(),
            _ => std::env::current_dir().unwrap_or_default(),
        };
        strdup_path(&path)
    })
}

pub(crate) unsafe extern "C" fn program_changed(handle: *mut c_void, index: i32) {
    guard_void("program_changed", || {
        if let Some(host) = host(handle) {
            host.program_changed(index);
        }
    })
}

pub(crate) unsafe extern "C" fn ui_port_index(handle: *mut c_void, symbol: *const c_char) -> u32 {
    guard_callback("ui_port_index", INVALID_PORT_INDEX, || {
        let (Some(host), Some(symbol)) = (host(handle), str_arg(symbol)) else {
            return INVALID_PORT_INDEX;
        };
        host.port_index(&symbol)
    })
}

pub(crate) unsafe extern "C" fn ui_resize(handle: *mut c_void, width: c_int, height: c_int) -> c_int {
    guard_callback("ui_resize", 1, || match host(handle) {
        Some(host) => host.request_resize(width, height),
        None => 1,
    })
}

pub(crate) unsafe extern "C" fn ui_write(
    controller: *mut c_void,
    port_index: u32,
    buffer_size: u32,
    format: u32,
    buffer: *const c_void,
) {
    guard_void("ui_write", || {
        let Some(host) = host(controller) else {
            return;
        };
        if buffer.is_null() || buffer_size == 0 {
            log::warn!("UI wrote an empty buffer to port {}", port_index);
            return;
        }
        let bytes = std::slice::from_raw_parts(buffer.cast::<u8>(), buffer_size as usize);
        host.ui_write(port_index, format, bytes);
    })
}
