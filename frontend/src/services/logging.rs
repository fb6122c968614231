use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }
}

thread_local! {
    static MIN_LEVEL: Cell<LogLevel> = Cell::new(LogLevel::default());
}

/// Component-tagged logging to the browser console
pub struct Logger;

impl Logger {
    pub fn set_level(level: LogLevel) {
        MIN_LEVEL.with(|min| min.set(level));
    }

    pub fn level() -> LogLevel {
        MIN_LEVEL.with(Cell::get)
    }

    pub fn enabled(level: LogLevel) -> bool {
        level >= Self::level()
    }

    pub fn debug_with_component(component: &str, message: &str) {
        Self::log(LogLevel::Debug, component, message);
    }

    pub fn info_with_component(component: &str, message: &str) {
        Self::log(LogLevel::Info, component, message);
    }

    pub fn warn_with_component(component: &str, message: &str) {
        Self::log(LogLevel::Warn, component, message);
    }

    pub fn error_with_component(component: &str, message: &str) {
        Self::log(LogLevel::Error, component, message);
    }

    fn log(level: LogLevel, component: &str, message: &str) {
        if !Self::enabled(level) {
            return;
        }

        let line = format_line(component, message);
        match level {
            LogLevel::Debug => gloo::console::debug!(line),
            LogLevel::Info => gloo::console::info!(line),
            LogLevel::Warn => gloo::console::warn!(line),
            LogLevel::Error => gloo::console::error!(line),
        }
    }
}

fn format_line(component: &str, message: &str) -> String {
    format!("[{}] {}", component, message)
}
