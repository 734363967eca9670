//! URID table: the append-only identifier log each side of the bridge keeps.
//!
//! Ids below [`uris::id::COUNT`] are compiled in and identical in both
//! processes. Everything above is allocated on first use, in order, and must
//! be announced to the peer before any message carries it. The table itself
//! does not talk to the channel; [`Interned::New`] tells the caller that an
//! announcement is owed.

use crate::errors::UridError;
use crate::uris::{self, NULL_URI, WELL_KNOWN};
use std::ffi::{CStr, CString};

/// Numeric identifier standing in for a URI.
pub type Urid = u32;

/// Number of ids fixed at compile time.
pub const N_WELLKNOWN: u32 = uris::id::COUNT;

/// Outcome of [`UridTable::lookup_or_intern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interned {
    /// Already in the table (well-known or previously interned).
    Existing(Urid),
    /// Appended just now; the peer has not been told yet.
    New(Urid),
}

impl Interned {
    pub fn urid(self) -> Urid {
        match self {
            Interned::Existing(urid) | Interned::New(urid) => urid,
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, Interned::New(_))
    }
}

pub struct UridTable {
    /// NUL-terminated copies of the well-known URIs, so `unmap` can hand
    /// foreign code a stable pointer for every id.
    well_known: Vec<CString>,
    dynamic: Vec<CString>,
    null: CString,
}

impl UridTable {
    pub fn new() -> Self {
        Self {
            well_known: WELL_KNOWN.iter().map(|uri| c_string(uri)).collect(),
            dynamic: Vec::new(),
            null: c_string(NULL_URI),
        }
    }

    /// Total number of ids currently allocated, well-known included.
    pub fn len(&self) -> u32 {
        N_WELLKNOWN + self.dynamic.len() as u32
    }

    /// Number of ids interned at runtime.
    pub fn dynamic_len(&self) -> usize {
        self.dynamic.len()
    }

    /// Id for `uri`, allocating the next free id if the URI is new.
    pub fn lookup_or_intern(&mut self, uri: &str) -> Result<Interned, UridError> {
        if uri.is_empty() {
            return Err(UridError::EmptyUri);
        }

        if let Some(urid) = self.lookup(uri) {
            return Ok(Interned::Existing(urid));
        }

        let entry = CString::new(uri).map_err(|_| UridError::InvalidUri(uri.to_string()))?;
        let urid = self.len();
        self.dynamic.push(entry);
        log::debug!("interned URID {} for {}", urid, uri);

        Ok(Interned::New(urid))
    }

    /// Id for `uri` without allocating.
    pub fn lookup(&self, uri: &str) -> Option<Urid> {
        if let Some(pos) = WELL_KNOWN.iter().position(|known| *known == uri) {
            return Some(pos as Urid);
        }

        self.dynamic
            .iter()
            .position(|entry| entry.as_bytes() == uri.as_bytes())
            .map(|pos| N_WELLKNOWN + pos as Urid)
    }

    /// URI for `urid`, or `None` for the null id and ids not yet allocated.
    pub fn uri(&self, urid: Urid) -> Option<&str> {
        self.c_uri(urid).and_then(|uri| uri.to_str().ok())
    }

    /// Like [`uri`](Self::uri) but as a C string owned by the table.
    pub fn c_uri(&self, urid: Urid) -> Option<&CStr> {
        if urid == uris::id::NULL {
            return None;
        }

        if urid < N_WELLKNOWN {
            return self.well_known.get(urid as usize).map(CString::as_c_str);
        }

        self.dynamic
            .get((urid - N_WELLKNOWN) as usize)
            .map(CString::as_c_str)
    }

    /// URI for `urid`, falling back to `"urn:null"` for anything unknown.
    ///
    /// A peer may reference an id whose announcement is still in flight;
    /// that is not an error.
    pub fn reverse(&self, urid: Urid) -> &str {
        self.uri(urid).unwrap_or(NULL_URI)
    }

    /// C-string flavour of [`reverse`](Self::reverse) for the unmap feature.
    pub fn reverse_c(&self, urid: Urid) -> &CStr {
        self.c_uri(urid).unwrap_or(self.null.as_c_str())
    }

    /// Record an id announced by the peer.
    ///
    /// Accepted only when it is exactly the next id this side would allocate.
    pub fn insert_remote(&mut self, urid: Urid, uri: &str) -> Result<(), UridError> {
        if uri.is_empty() {
            return Err(UridError::EmptyUri);
        }

        let expected = self.len();
        if urid != expected {
            return Err(UridError::OutOfOrder {
                expected,
                got: urid,
                uri: uri.to_string(),
            });
        }

        let entry = CString::new(uri).map_err(|_| UridError::InvalidUri(uri.to_string()))?;
        self.dynamic.push(entry);
        log::debug!("peer announced URID {} for {}", urid, uri);

        Ok(())
    }

    /// Re-derive a peer-supplied id through its URI.
    ///
    /// Both sides are expected to share a layout, so this is normally the
    /// identity, but the mapping is always performed. An id this replica has
    /// never seen is reported instead of guessed.
    pub fn translate(&mut self, urid: Urid) -> Result<Interned, UridError> {
        let uri = self.uri(urid).ok_or(UridError::Unknown(urid))?.to_owned();
        self.lookup_or_intern(&uri)
    }

    /// Drop every runtime entry. Only used when the process is going away.
    pub(crate) fn release(&mut self) {
        self.dynamic.clear();
        self.dynamic.shrink_to_fit();
    }
}

impl Default for UridTable {
    fn default() -> Self {
        Self::new()
    }
}

fn c_string(uri: &str) -> CString {
    // Compile-time constants, none contain NUL.
    CString::new(uri).unwrap_or_default()
}
