//! Seam to the windowing toolkit that owns the UI's window.

use std::ffi::c_void;

/// The window side of the bridge. Event-loop and widget embedding live
/// behind this trait.
pub trait Toolkit {
    /// Resize the window around the UI widget.
    fn set_size(&mut self, width: u32, height: u32);

    /// Change the window title.
    fn set_title(&mut self, title: &str);

    /// Native container handle passed to embeddable UIs as `ui:parent`.
    fn parent_window(&self) -> *mut c_void {
        std::ptr::null_mut()
    }

    /// Whether UIs are embedded into a container this toolkit owns. Embedded
    /// UIs are only resizable if they implement the resize extension.
    fn is_embedded(&self) -> bool {
        false
    }

    /// Take the native widget the UI created during instantiation. Only
    /// called with a non-null widget.
    fn embed_widget(&mut self, _widget: *mut c_void) {}
}

/// Toolkit without a window; remembers what it was asked to do.
#[derive(Debug, Default, Clone)]
pub struct HeadlessToolkit {
    pub size: Option<(u32, u32)>,
    pub title: String,
    pub widget: Option<*mut c_void>,
}

impl Toolkit for HeadlessToolkit {
    fn set_size(&mut self, width: u32, height: u32) {
        log::debug!("headless resize to {}x{}", width, height);
        self.size = Some((width, height));
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn embed_widget(&mut self, widget: *mut c_void) {
        log::debug!("headless toolkit holding widget {:p}", widget);
        self.widget = Some(widget);
    }
}
