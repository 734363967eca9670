use lv2_ui_bridge::urid::{Interned, UridTable, N_WELLKNOWN};
use lv2_ui_bridge::uris::{self, id};
use lv2_ui_bridge::UridError;

#[test]
fn test_well_known_ids_are_preassigned() {
    let table = UridTable::new();
    assert_eq!(table.len(), N_WELLKNOWN);
    assert_eq!(table.dynamic_len(), 0);
    assert_eq!(table.lookup(uris::MIDI_EVENT), Some(id::MIDI_EVENT));
    assert_eq!(table.lookup(uris::ATOM_EVENT_TRANSFER), Some(id::ATOM_TRANSFER_EVENT));
    assert_eq!(table.reverse(id::LOG_ERROR), uris::LOG_ERROR);
}

#[test]
fn test_new_custom_type_scenario() {
    let mut table = UridTable::new();

    let first = table.lookup_or_intern("urn:x-custom:thing").unwrap();
    assert_eq!(first, Interned::New(N_WELLKNOWN));
    assert!(first.is_new());

    let again = table.lookup_or_intern("urn:x-custom:thing").unwrap();
    assert_eq!(again, Interned::Existing(N_WELLKNOWN));

    let other = table.lookup_or_intern("urn:x-custom:other").unwrap();
    assert_eq!(other.urid(), N_WELLKNOWN + 1);
    assert_eq!(table.len(), N_WELLKNOWN + 2);
}

#[test]
fn test_round_trip() {
    let mut table = UridTable::new();
    for uri in ["urn:a", "urn:b", uris::ATOM_SEQUENCE, "http://example.org/ns#c"] {
        let urid = table.lookup_or_intern(uri).unwrap().urid();
        assert_eq!(table.reverse(urid), uri);
    }
}

#[test]
fn test_allocation_is_monotonic() {
    let mut table = UridTable::new();
    let ids: Vec<u32> = (0..20)
        .map(|i| table.lookup_or_intern(&format!("urn:seq:{}", i)).unwrap().urid())
        .collect();

    assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
    assert_eq!(ids[0], N_WELLKNOWN);
}

#[test]
fn test_unknown_ids_fall_back_to_null_uri() {
    let table = UridTable::new();
    assert_eq!(table.reverse(id::NULL), uris::NULL_URI);
    assert_eq!(table.reverse(N_WELLKNOWN), uris::NULL_URI);
    assert_eq!(table.reverse(u32::MAX), uris::NULL_URI);
    assert_eq!(table.uri(id::NULL), None);
    assert_eq!(table.reverse_c(9999).to_str().unwrap(), uris::NULL_URI);
}

#[test]
fn test_empty_and_nul_uris_are_rejected() {
    let mut table = UridTable::new();
    assert_eq!(table.lookup_or_intern(""), Err(UridError::EmptyUri));
    assert!(matches!(
        table.lookup_or_intern("urn:bad\0uri"),
        Err(UridError::InvalidUri(_))
    ));
    assert_eq!(table.len(), N_WELLKNOWN);
}

#[test]
fn test_remote_insert_must_be_next_id() {
    let mut table = UridTable::new();

    assert!(matches!(
        table.insert_remote(N_WELLKNOWN + 1, "urn:x-custom:late"),
        Err(UridError::OutOfOrder { expected, got, .. }) if expected == N_WELLKNOWN && got == N_WELLKNOWN + 1
    ));
    assert_eq!(table.insert_remote(N_WELLKNOWN, ""), Err(UridError::EmptyUri));

    table.insert_remote(N_WELLKNOWN, "urn:x-custom:thing").unwrap();
    assert_eq!(table.lookup("urn:x-custom:thing"), Some(N_WELLKNOWN));

    // Local allocation continues after the peer's entries.
    assert_eq!(table.lookup_or_intern("urn:mine").unwrap().urid(), N_WELLKNOWN + 1);
}

#[test]
fn test_replicas_agree_after_notifications() {
    let mut ui = UridTable::new();
    let mut host = UridTable::new();

    for uri in ["urn:x:one", "urn:x:two"] {
        if let Interned::New(urid) = ui.lookup_or_intern(uri).unwrap() {
            host.insert_remote(urid, uri).unwrap();
        }
    }

    assert_eq!(ui.len(), host.len());
    assert_eq!(host.reverse(N_WELLKNOWN + 1), "urn:x:two");
}

#[test]
fn test_translate_is_identity_for_shared_ids() {
    let mut table = UridTable::new();
    let custom = table.lookup_or_intern("urn:x:t").unwrap().urid();

    assert_eq!(table.translate(id::ATOM_INT).unwrap(), Interned::Existing(id::ATOM_INT));
    assert_eq!(table.translate(custom).unwrap().urid(), custom);
    assert_eq!(table.translate(custom + 1), Err(UridError::Unknown(custom + 1)));
}
