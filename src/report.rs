// stderr diagnostics and line endings that stay readable whether or not the
// terminal is in raw mode

use std::sync::atomic::{AtomicBool, Ordering};

static RAW_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_raw_mode(on: bool) {
    RAW_MODE.store(on, Ordering::Release);
}

/// Raw mode doesn't translate `\n`, so lines need an explicit `\r` there.
pub fn line_ending() -> &'static str {
    if RAW_MODE.load(Ordering::Acquire) { "\r\n" } else { "\n" }
}

/// `progress: ...` on stderr.
macro_rules! progress_warn {
    ($($arg:tt)*) => {
        eprint!("progress: {}{}", format_args!($($arg)*), $crate::report::line_ending())
    };
}

pub(crate) use progress_warn as warn;
