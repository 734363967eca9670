//! The three payload shapes carried between host and UI: plain floats,
//! short MIDI events wrapped in an atom, and opaque atoms.
//!
//! Foreign UIs are known to misreport atom sizes, so every size is recomputed
//! from the header and compared before anything is forwarded.

use crate::errors::CodecError;
use crate::ffi::Lv2Atom;
use crate::urid::{Urid, UridTable};
use crate::uris::id;

/// Size of the `LV2_Atom` header preceding every atom body.
pub const ATOM_HEADER_SIZE: u32 = std::mem::size_of::<Lv2Atom>() as u32;

/// Width of a control-port value on the wire.
pub const SCALAR_SIZE: u32 = std::mem::size_of::<f32>() as u32;

const MIDI_STATUS_NOTE_OFF: u8 = 0x80;
const MIDI_STATUS_NOTE_ON: u8 = 0x90;
const MIDI_CHANNEL_BITS: u8 = 0x0F;

/// Total size of an atom whose header declares `body_size` bytes, or `None`
/// if that does not fit in a `u32`.
pub fn atom_total_size(body_size: u32) -> Option<u32> {
    ATOM_HEADER_SIZE.checked_add(body_size)
}

/// An atom owned on the Rust side: type id plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomBuffer {
    pub kind: Urid,
    pub body: Vec<u8>,
}

impl AtomBuffer {
    pub fn new(kind: Urid, body: Vec<u8>) -> Self {
        Self { kind, body }
    }

    /// Parse an atom handed over by foreign code as `buffer_size` bytes.
    pub fn from_raw(buffer: &[u8]) -> Result<Self, CodecError> {
        let declared = buffer.len() as u32;
        if declared < ATOM_HEADER_SIZE {
            return Err(CodecError::TooSmall(declared));
        }

        let header = read_header(buffer);
        let computed = atom_total_size(header.size).ok_or(CodecError::Oversized(header.size))?;
        if computed != declared {
            return Err(CodecError::SizeMismatch { declared, computed });
        }

        Ok(Self {
            kind: header.kind,
            body: buffer[ATOM_HEADER_SIZE as usize..].to_vec(),
        })
    }

    /// Validate an atom received from the peer as `(size, type, body)`.
    pub fn from_wire(declared_size: u32, kind: Urid, body: Vec<u8>) -> Result<Self, CodecError> {
        if declared_size < ATOM_HEADER_SIZE {
            return Err(CodecError::TooSmall(declared_size));
        }

        let body_size = u32::try_from(body.len()).map_err(|_| CodecError::Oversized(u32::MAX))?;
        let computed = atom_total_size(body_size).ok_or(CodecError::Oversized(body_size))?;
        if computed != declared_size {
            return Err(CodecError::SizeMismatch {
                declared: declared_size,
                computed,
            });
        }

        Ok(Self { kind, body })
    }

    pub fn body_size(&self) -> u32 {
        self.body.len() as u32
    }

    pub fn total_size(&self) -> u32 {
        atom_total_size(self.body_size()).unwrap_or(u32::MAX)
    }

    /// Header and body laid out contiguously in 8-byte aligned storage, ready
    /// to be passed to `port_event` as an `LV2_Atom*`.
    pub fn to_aligned(&self) -> AlignedAtom {
        let total = self.total_size() as usize;
        let mut words = vec![0u64; total.div_ceil(8)];

        // SAFETY: `words` spans at least `total` bytes and u64 storage is
        // suitably aligned for the u32 header fields.
        let bytes = unsafe { std::slice::from_raw_parts_mut(words.as_mut_ptr().cast::<u8>(), total) };
        bytes[0..4].copy_from_slice(&self.body_size().to_ne_bytes());
        bytes[4..8].copy_from_slice(&self.kind.to_ne_bytes());
        bytes[ATOM_HEADER_SIZE as usize..].copy_from_slice(&self.body);

        AlignedAtom {
            words,
            size: total as u32,
        }
    }
}

/// Owned, aligned atom bytes.
pub struct AlignedAtom {
    words: Vec<u64>,
    size: u32,
}

impl AlignedAtom {
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `words` holds at least `size` initialized bytes.
        unsafe { std::slice::from_raw_parts(self.words.as_ptr().cast::<u8>(), self.size as usize) }
    }
}

fn read_header(buffer: &[u8]) -> Lv2Atom {
    let mut size = [0u8; 4];
    let mut kind = [0u8; 4];
    size.copy_from_slice(&buffer[0..4]);
    kind.copy_from_slice(&buffer[4..8]);
    Lv2Atom {
        size: u32::from_ne_bytes(size),
        kind: u32::from_ne_bytes(kind),
    }
}

/// A short MIDI note event as a `midi:MidiEvent` atom.
pub fn note_event(on: bool, channel: u8, note: u8, velocity: u8) -> AtomBuffer {
    let status = if on { MIDI_STATUS_NOTE_ON } else { MIDI_STATUS_NOTE_OFF };
    AtomBuffer::new(
        id::MIDI_EVENT,
        vec![status | (channel & MIDI_CHANNEL_BITS), note & 0x7F, velocity & 0x7F],
    )
}

/// What a UI meant by one call of its write function.
#[derive(Debug, Clone, PartialEq)]
pub enum PortWrite {
    Control { index: u32, value: f32 },
    Atom { index: u32, atom: AtomBuffer },
}

/// Decode a write-function call. `format` selects the shape: the null id is a
/// plain float, the two atom-transfer ids carry an atom, anything else is
/// rejected.
pub fn decode_ui_write(
    table: &UridTable,
    index: u32,
    format: Urid,
    buffer: &[u8],
) -> Result<PortWrite, CodecError> {
    if buffer.is_empty() {
        return Err(CodecError::Empty);
    }

    match format {
        id::NULL => {
            let size = buffer.len() as u32;
            if size != SCALAR_SIZE {
                return Err(CodecError::ScalarSize(size));
            }
            let mut raw = [0u8; 4];
            raw.copy_from_slice(buffer);
            Ok(PortWrite::Control {
                index,
                value: f32::from_ne_bytes(raw),
            })
        }
        id::ATOM_TRANSFER_ATOM | id::ATOM_TRANSFER_EVENT => Ok(PortWrite::Atom {
            index,
            atom: AtomBuffer::from_raw(buffer)?,
        }),
        other => Err(CodecError::UnknownFormat {
            urid: other,
            uri: table.reverse(other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_layout_puts_header_first() {
        let atom = AtomBuffer::new(id::ATOM_INT, 7i32.to_ne_bytes().to_vec());
        let aligned = atom.to_aligned();
        let bytes = aligned.as_bytes();

        assert_eq!(aligned.size(), 12);
        assert_eq!(&bytes[0..4], &4u32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &id::ATOM_INT.to_ne_bytes());
        assert_eq!(&bytes[8..12], &7i32.to_ne_bytes());
        assert_eq!(aligned.as_bytes().as_ptr() as usize % 8, 0);
    }

    #[test]
    fn header_reads_back() {
        let atom = AtomBuffer::new(id::ATOM_STRING, b"hi\0".to_vec());
        let parsed = AtomBuffer::from_raw(atom.to_aligned().as_bytes()).unwrap();
        assert_eq!(parsed, atom);
    }
}
