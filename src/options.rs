//! Runtime options of the hosted UI and the `options:options` array that
//! mirrors them for foreign code.

use crate::ffi::{Lv2OptionsOption, LV2_OPTIONS_INSTANCE};
use crate::uris::id;
use std::ffi::{c_void, CStr, CString};
use std::ptr;

/// Options the host can change while the UI is running.
#[derive(Debug, Clone, PartialEq)]
pub struct UiOptions {
    pub sample_rate: f64,
    pub transient_window_id: i64,
    pub window_title: String,
    pub resizable: bool,
    pub use_theme: bool,
    pub use_theme_colors: bool,
    /// Last size the UI asked for and was granted.
    pub window_size: Option<(u32, u32)>,
}

impl UiOptions {
    pub fn with_sample_rate(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            transient_window_id: 0,
            window_title: String::new(),
            resizable: true,
            use_theme: true,
            use_theme_colors: true,
            window_size: None,
        }
    }
}

const OPT_SAMPLE_RATE: usize = 0;
const OPT_TRANSIENT_WINDOW_ID: usize = 1;
const OPT_WINDOW_TITLE: usize = 2;
const OPT_COUNT: usize = 4;

struct OptionsStorage {
    sample_rate: f64,
    transient_window_id: i64,
    window_title: CString,
    options: [Lv2OptionsOption; OPT_COUNT],
}

/// Null-terminated `LV2_Options_Option` array with the values it points at.
///
/// Heap-pinned: the array and its values keep their addresses for the life of
/// the block, so the pointer given to foreign code stays valid while values
/// are refreshed in place.
pub struct OptionsBlock {
    storage: Box<OptionsStorage>,
}

impl OptionsBlock {
    pub fn new(options: &UiOptions) -> Self {
        let mut storage = Box::new(OptionsStorage {
            sample_rate: options.sample_rate,
            transient_window_id: options.transient_window_id,
            window_title: CString::default(),
            options: [
                option(id::PARAM_SAMPLE_RATE, id::ATOM_DOUBLE, std::mem::size_of::<f64>() as u32),
                option(
                    id::CARLA_TRANSIENT_WINDOW_ID,
                    id::ATOM_LONG,
                    std::mem::size_of::<i64>() as u32,
                ),
                option(id::UI_WINDOW_TITLE, id::ATOM_STRING, 0),
                option(id::NULL, id::NULL, 0),
            ],
        });

        storage.options[OPT_SAMPLE_RATE].value = ptr::addr_of!(storage.sample_rate).cast();
        storage.options[OPT_TRANSIENT_WINDOW_ID].value =
            ptr::addr_of!(storage.transient_window_id).cast();

        let mut block = Self { storage };
        block.set_window_title(&options.window_title);
        block
    }

    /// Refresh every value from `options`.
    pub fn update(&mut self, options: &UiOptions) {
        self.storage.sample_rate = options.sample_rate;
        self.storage.transient_window_id = options.transient_window_id;
        self.set_window_title(&options.window_title);
    }

    fn set_window_title(&mut self, title: &str) {
        let title = CString::new(title.replace('\0', "")).unwrap_or_default();
        self.storage.window_title = title;

        let storage = &mut *self.storage;
        let entry = &mut storage.options[OPT_WINDOW_TITLE];
        if storage.window_title.as_bytes().is_empty() {
            entry.size = 0;
            entry.value = ptr::null();
        } else {
            entry.size = storage.window_title.as_bytes_with_nul().len() as u32;
            entry.value = storage.window_title.as_ptr().cast();
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.storage.sample_rate
    }

    pub fn transient_window_id(&self) -> i64 {
        self.storage.transient_window_id
    }

    pub fn window_title(&self) -> &CStr {
        &self.storage.window_title
    }

    /// The array as seen by foreign code, terminator included.
    pub fn entries(&self) -> &[Lv2OptionsOption] {
        &self.storage.options
    }

    pub(crate) fn as_ptr(&self) -> *mut c_void {
        self.storage.options.as_ptr() as *mut c_void
    }
}

fn option(key: u32, kind: u32, size: u32) -> Lv2OptionsOption {
    Lv2OptionsOption {
        context: LV2_OPTIONS_INSTANCE,
        subject: 0,
        key,
        size,
        kind,
        value: ptr::null(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_reachable_through_the_array() {
        let block = OptionsBlock::new(&UiOptions {
            sample_rate: 48000.0,
            transient_window_id: 42,
            ..UiOptions::default()
        });

        let entries = block.entries();
        let rate = unsafe { *(entries[OPT_SAMPLE_RATE].value as *const f64) };
        let window = unsafe { *(entries[OPT_TRANSIENT_WINDOW_ID].value as *const i64) };
        assert_eq!(rate, 48000.0);
        assert_eq!(window, 42);
        assert!(entries[OPT_WINDOW_TITLE].value.is_null());
        assert_eq!(entries[OPT_COUNT - 1].key, id::NULL);
    }

    #[test]
    fn title_is_refreshed_in_place() {
        let mut block = OptionsBlock::new(&UiOptions::default());
        let array = block.as_ptr();

        block.update(&UiOptions {
            window_title: "Synth (GUI)".to_string(),
            ..UiOptions::default()
        });

        assert_eq!(block.as_ptr(), array);
        let entry = &block.entries()[OPT_WINDOW_TITLE];
        assert_eq!(entry.size, 12);
        let title = unsafe { CStr::from_ptr(entry.value.cast()) };
        assert_eq!(title.to_str().unwrap(), "Synth (GUI)");
    }
}
