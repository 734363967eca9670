use lv2_ui_bridge::prelude::*;
use std::io::Write;
use std::time::{Duration, Instant};

#[test]
fn test_messages_are_kind_tagged_json() {
    let line = BridgeMessage::Control {
        index: 3,
        value: 0.5,
    }
    .to_line()
    .unwrap();
    let json: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(json["kind"], "control");
    assert_eq!(json["index"], 3);

    let line = BridgeMessage::UiOptions {
        sample_rate: 48000.0,
        use_theme: true,
        use_theme_colors: false,
        window_title: "Synth".to_string(),
        transient_window_id: 0,
    }
    .to_line()
    .unwrap();
    assert!(line.contains(r#""kind":"uioptions""#));

    assert_eq!(BridgeMessage::Quit.to_line().unwrap(), r#"{"kind":"quit"}"#);
}

#[test]
fn test_lines_parse_back() {
    let message = BridgeMessage::from_line(
        "{\"kind\":\"atom\",\"index\":0,\"size\":10,\"type_urid\":48,\"data\":[1,2]}\n",
    )
    .unwrap();
    assert_eq!(
        message,
        BridgeMessage::Atom {
            index: 0,
            size: 10,
            type_urid: 48,
            data: vec![1, 2],
        }
    );

    assert!(BridgeMessage::from_line(r#"{"kind":"explode"}"#).is_err());
}

#[test]
fn test_memory_channel_pair() {
    let (mut a, mut b) = MemoryChannel::pair();
    a.send(&BridgeMessage::Program { bank: 1, program: 2 }).unwrap();

    assert_eq!(
        b.poll().unwrap(),
        Some(BridgeMessage::Program { bank: 1, program: 2 })
    );
    assert_eq!(b.poll().unwrap(), None);

    drop(a);
    assert!(matches!(b.poll(), Err(BridgeError::ChannelClosed)));
    assert!(!b.is_running());
    assert!(matches!(b.send(&BridgeMessage::Quit), Err(BridgeError::ChannelClosed)));
}

fn poll_until_closed(channel: &mut PipeChannel) -> Vec<BridgeMessage> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut received = Vec::new();
    loop {
        match channel.poll() {
            Ok(Some(message)) => received.push(message),
            Ok(None) => {
                assert!(Instant::now() < deadline, "pipe never closed");
                std::thread::sleep(Duration::from_millis(5));
            }
            Err(BridgeError::ChannelClosed) => return received,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
}

#[test]
fn test_pipe_channel_over_files() {
    let mut input = tempfile::NamedTempFile::new().unwrap();
    writeln!(input, r#"{{"kind":"control","index":1,"value":0.5}}"#).unwrap();
    writeln!(input).unwrap();
    writeln!(input, "not json").unwrap();
    writeln!(input, r#"{{"kind":"quit"}}"#).unwrap();
    input.flush().unwrap();
    let output = tempfile::NamedTempFile::new().unwrap();

    let mut channel = PipeChannel::open(input.path(), output.path()).unwrap();
    assert!(channel.is_running());
    channel
        .send(&BridgeMessage::Urid {
            urid: 48,
            uri: "urn:x:thing".to_string(),
        })
        .unwrap();

    let received = poll_until_closed(&mut channel);
    assert_eq!(
        received,
        vec![
            BridgeMessage::Control {
                index: 1,
                value: 0.5
            },
            BridgeMessage::Quit,
        ]
    );

    let written = std::fs::read_to_string(output.path()).unwrap();
    assert_eq!(written, "{\"kind\":\"urid\",\"urid\":48,\"uri\":\"urn:x:thing\"}\n");
}

#[test]
fn test_pipe_channel_missing_output_fails() {
    let input = tempfile::NamedTempFile::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let result = PipeChannel::open(input.path(), &dir.path().join("missing/out"));
    assert!(matches!(result, Err(BridgeError::ChannelError(_))));
}
