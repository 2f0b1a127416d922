//! `log` backend that writes to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

struct ConsoleLogger {
    level: Level,
}

static INFO: ConsoleLogger = ConsoleLogger { level: Level::Info };
static DEBUG: ConsoleLogger = ConsoleLogger {
    level: Level::Debug,
};

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Route `log` records to the console and panics to `console.error`.
/// Safe to call more than once; only the first call installs the logger.
pub fn init(verbose: bool) {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let (logger, filter) = if verbose {
        (&DEBUG, LevelFilter::Debug)
    } else {
        (&INFO, LevelFilter::Info)
    };
    if log::set_logger(logger).is_ok() {
        log::set_max_level(filter);
    }
}
