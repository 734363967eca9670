use std::panic::{catch_unwind, AssertUnwindSafe};

/// Extracts a readable message from a panic payload
pub fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Runs a host callback invoked by foreign code, returning `fallback` if it
/// panics. Unwinding across the C boundary is undefined behaviour, so every
/// `extern "C"` entry point goes through here.
pub fn guard_callback<T, F>(op: &'static str, fallback: T, f: F) -> T
where
    F: FnOnce() -> T,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            log::error!("Host callback `{}` panicked: {}", op, panic_message(payload));
            fallback
        }
    }
}

/// Like [`guard_callback`] for callbacks with no return value.
pub fn guard_void<F>(op: &'static str, f: F)
where
    F: FnOnce(),
{
    guard_callback(op, (), f)
}
