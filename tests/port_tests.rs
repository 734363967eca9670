use lv2_ui_bridge::{PortTable, INVALID_PORT_INDEX};

fn ports() -> PortTable {
    PortTable::new(
        ["lv2_events_in", "lv2_audio_out_1", "lv2_audio_out_2", "cutoff"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
}

#[test]
fn test_symbols_resolve_to_declaration_order() {
    let ports = ports();
    assert_eq!(ports.len(), 4);
    assert_eq!(ports.resolve("lv2_events_in"), 0);
    assert_eq!(ports.resolve("cutoff"), 3);
    assert_eq!(ports.index_of("lv2_audio_out_2"), Some(2));
    assert_eq!(ports.symbol(1), Some("lv2_audio_out_1"));
}

#[test]
fn test_misses_give_sentinel() {
    let ports = ports();
    assert_eq!(ports.resolve("resonance"), INVALID_PORT_INDEX);
    assert_eq!(ports.resolve(""), INVALID_PORT_INDEX);
    assert_eq!(ports.index_of("CUTOFF"), None);
    assert_eq!(ports.symbol(4), None);
    assert!(PortTable::default().is_empty());
}
