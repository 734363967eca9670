//! Port-symbol resolution for the `ui:portMap` feature.

/// Returned to foreign code when a symbol does not name a port.
pub const INVALID_PORT_INDEX: u32 = u32::MAX;

/// Port symbols in index order, as declared by the plugin.
#[derive(Debug, Clone, Default)]
pub struct PortTable {
    symbols: Vec<String>,
}

impl PortTable {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol(&self, index: u32) -> Option<&str> {
        self.symbols.get(index as usize).map(String::as_str)
    }

    pub fn index_of(&self, symbol: &str) -> Option<u32> {
        if symbol.is_empty() {
            return None;
        }

        self.symbols
            .iter()
            .position(|candidate| candidate == symbol)
            .map(|pos| pos as u32)
    }

    /// Sentinel-returning form of [`index_of`](Self::index_of).
    pub fn resolve(&self, symbol: &str) -> u32 {
        self.index_of(symbol).unwrap_or(INVALID_PORT_INDEX)
    }
}
