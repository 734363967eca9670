//! Bridge wire protocol and the channel it travels over.
//!
//! Messages are framed as one JSON object per line. The bridge only needs to
//! send a frame and poll for one without blocking; how bytes move is up to
//! the [`Channel`] implementation.

use crate::errors::{BridgeError, Result};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Messages exchanged between the host and the UI bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BridgeMessage {
    /// Control port value
    Control { index: u32, value: f32 },
    /// Free-form key/value configuration
    Configure { key: String, value: String },
    /// A new URID, sent before its first use
    Urid { urid: u32, uri: String },
    /// Typed buffer. `size` is the total atom size, header included; `data`
    /// is the body only.
    Atom {
        index: u32,
        size: u32,
        type_urid: u32,
        data: Vec<u8>,
    },
    /// MIDI program selection
    Program { bank: u32, program: u32 },
    /// Note on/off to display in the UI
    Note {
        on: bool,
        channel: u8,
        note: u8,
        velocity: u8,
    },
    /// All runtime options at once
    UiOptions {
        sample_rate: f64,
        use_theme: bool,
        use_theme_colors: bool,
        window_title: String,
        transient_window_id: i64,
    },
    /// Host-side window was resized
    Resize { width: u32, height: u32 },
    /// Close the UI and exit
    Quit,
}

impl BridgeMessage {
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim_end())?)
    }
}

/// Framed, non-blocking message transport.
pub trait Channel {
    /// Write one message. Fails only when the transport is gone.
    fn send(&mut self, message: &BridgeMessage) -> Result<()>;

    /// Next pending message, `Ok(None)` if nothing is waiting, or
    /// [`BridgeError::ChannelClosed`] once the peer has gone away.
    fn poll(&mut self) -> Result<Option<BridgeMessage>>;

    /// Whether messages can still be sent.
    fn is_running(&self) -> bool;
}

/// JSON-lines channel over a pair of files, FIFOs, or stdio (`-`).
///
/// Reading happens on a dedicated thread so [`poll`](Channel::poll) never
/// blocks the UI loop.
pub struct PipeChannel {
    writer: Option<Box<dyn Write + Send>>,
    incoming: Receiver<BridgeMessage>,
    closed: bool,
}

impl PipeChannel {
    pub fn open(input: &Path, output: &Path) -> Result<Self> {
        let writer: Box<dyn Write + Send> = if output == Path::new("-") {
            Box::new(io::stdout())
        } else {
            Box::new(
                OpenOptions::new()
                    .write(true)
                    .open(output)
                    .map_err(|e| {
                        BridgeError::ChannelError(format!(
                            "Failed to open output pipe {}: {}",
                            output.display(),
                            e
                        ))
                    })?,
            )
        };

        let (tx, rx) = crossbeam_channel::unbounded();
        let input = input.to_path_buf();
        std::thread::Builder::new()
            .name("lv2-ui-bridge-reader".to_string())
            .spawn(move || read_loop(input, tx))?;

        Ok(Self {
            writer: Some(writer),
            incoming: rx,
            closed: false,
        })
    }
}

fn read_loop(input: PathBuf, tx: Sender<BridgeMessage>) {
    let reader: Box<dyn BufRead> = if input == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        match File::open(&input) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                log::error!("Failed to open input pipe {}: {}", input.display(), e);
                return;
            }
        }
    };

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::warn!("Failed to read from host: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match BridgeMessage::from_line(&line) {
            Ok(message) => {
                if tx.send(message).is_err() {
                    break;
                }
            }
            Err(e) => log::warn!("Dropping malformed message from host: {}", e),
        }
    }

    log::debug!("host pipe reached end of stream");
}

impl Channel for PipeChannel {
    fn send(&mut self, message: &BridgeMessage) -> Result<()> {
        let line = message.to_line()?;
        let writer = self.writer.as_mut().ok_or(BridgeError::ChannelClosed)?;

        let written = writeln!(writer, "{}", line).and_then(|_| writer.flush());
        if let Err(e) = written {
            log::warn!("Host pipe write failed: {}", e);
            self.writer = None;
            self.closed = true;
            return Err(BridgeError::ChannelClosed);
        }

        Ok(())
    }

    fn poll(&mut self) -> Result<Option<BridgeMessage>> {
        match self.incoming.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                Err(BridgeError::ChannelClosed)
            }
        }
    }

    fn is_running(&self) -> bool {
        !self.closed
    }
}

/// In-process channel endpoint. Created in connected pairs.
pub struct MemoryChannel {
    tx: Sender<BridgeMessage>,
    rx: Receiver<BridgeMessage>,
    closed: bool,
}

impl MemoryChannel {
    pub fn pair() -> (MemoryChannel, MemoryChannel) {
        let (a_tx, b_rx) = crossbeam_channel::unbounded();
        let (b_tx, a_rx) = crossbeam_channel::unbounded();
        (
            MemoryChannel {
                tx: a_tx,
                rx: a_rx,
                closed: false,
            },
            MemoryChannel {
                tx: b_tx,
                rx: b_rx,
                closed: false,
            },
        )
    }

    /// Everything the peer has sent so far.
    pub fn drain(&self) -> Vec<BridgeMessage> {
        self.rx.try_iter().collect()
    }
}

impl Channel for MemoryChannel {
    fn send(&mut self, message: &BridgeMessage) -> Result<()> {
        if self.closed {
            return Err(BridgeError::ChannelClosed);
        }
        self.tx.send(message.clone()).map_err(|_| {
            self.closed = true;
            BridgeError::ChannelClosed
        })
    }

    fn poll(&mut self) -> Result<Option<BridgeMessage>> {
        match self.rx.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                Err(BridgeError::ChannelClosed)
            }
        }
    }

    fn is_running(&self) -> bool {
        !self.closed
    }
}
