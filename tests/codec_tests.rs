use lv2_ui_bridge::codec::{atom_total_size, decode_ui_write, note_event, AtomBuffer, PortWrite};
use lv2_ui_bridge::uris::id;
use lv2_ui_bridge::{CodecError, UridTable};

#[test]
fn test_scalar_writes_need_four_bytes() {
    let table = UridTable::new();

    assert_eq!(
        decode_ui_write(&table, 2, id::NULL, &0.75f32.to_ne_bytes()),
        Ok(PortWrite::Control {
            index: 2,
            value: 0.75
        })
    );
    assert_eq!(
        decode_ui_write(&table, 2, id::NULL, &[0; 8]),
        Err(CodecError::ScalarSize(8))
    );
    assert_eq!(decode_ui_write(&table, 2, id::NULL, &[]), Err(CodecError::Empty));
}

#[test]
fn test_atom_writes_are_size_checked() {
    let table = UridTable::new();
    let atom = AtomBuffer::new(id::ATOM_STRING, b"hi\0".to_vec());
    let aligned = atom.to_aligned();

    for format in [id::ATOM_TRANSFER_ATOM, id::ATOM_TRANSFER_EVENT] {
        assert_eq!(
            decode_ui_write(&table, 1, format, aligned.as_bytes()),
            Ok(PortWrite::Atom {
                index: 1,
                atom: atom.clone()
            })
        );
    }

    assert_eq!(
        decode_ui_write(&table, 1, id::ATOM_TRANSFER_ATOM, &aligned.as_bytes()[..6]),
        Err(CodecError::TooSmall(6))
    );

    // Header claims a 3-byte body but 4 bytes follow.
    let mut padded = aligned.as_bytes().to_vec();
    padded.push(0);
    assert_eq!(
        decode_ui_write(&table, 1, id::ATOM_TRANSFER_ATOM, &padded),
        Err(CodecError::SizeMismatch {
            declared: 12,
            computed: 11
        })
    );
}

#[test]
fn test_unknown_format_names_its_uri() {
    let table = UridTable::new();
    match decode_ui_write(&table, 0, id::MIDI_EVENT, &[1, 2, 3, 4]) {
        Err(CodecError::UnknownFormat { urid, uri }) => {
            assert_eq!(urid, id::MIDI_EVENT);
            assert_eq!(uri, lv2_ui_bridge::uris::MIDI_EVENT);
        }
        other => panic!("unexpected decode result: {:?}", other),
    }
}

#[test]
fn test_wire_atoms_check_declared_size() {
    assert!(AtomBuffer::from_wire(8, id::ATOM_INT, vec![]).is_ok());
    assert_eq!(
        AtomBuffer::from_wire(7, id::ATOM_INT, vec![]),
        Err(CodecError::TooSmall(7))
    );
    assert_eq!(
        AtomBuffer::from_wire(12, id::ATOM_INT, vec![0; 2]),
        Err(CodecError::SizeMismatch {
            declared: 12,
            computed: 10
        })
    );
}

#[test]
fn test_note_events() {
    let on = note_event(true, 0, 64, 90);
    assert_eq!(on.kind, id::MIDI_EVENT);
    assert_eq!(on.body, vec![0x90, 64, 90]);
    assert_eq!(on.total_size(), atom_total_size(3).unwrap());
    assert_eq!(on.total_size(), 11);

    let off = note_event(false, 15, 64, 0);
    assert_eq!(off.body, vec![0x8F, 64, 0]);

    // Out-of-range inputs are masked into MIDI range.
    let masked = note_event(true, 0x1F, 0xFF, 0xFF);
    assert_eq!(masked.body, vec![0x9F, 0x7F, 0x7F]);
}

#[test]
fn test_atom_size_near_u32_max_is_rejected() {
    let table = UridTable::new();
    let mut buffer = Vec::new();
    buffer.extend_from_slice(&(u32::MAX - 3).to_ne_bytes());
    buffer.extend_from_slice(&id::ATOM_INT.to_ne_bytes());
    buffer.extend_from_slice(&[0, 0, 0, 0]);

    assert_eq!(
        decode_ui_write(&table, 0, id::ATOM_TRANSFER_ATOM, &buffer),
        Err(CodecError::Oversized(u32::MAX - 3))
    );
    assert_eq!(atom_total_size(u32::MAX - 7), Some(u32::MAX));
    assert_eq!(atom_total_size(u32::MAX - 6), None);
}
