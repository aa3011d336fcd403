use log::Level;

/// Tagged front-end over the `log` facade.
///
/// The tag becomes the record target, so `RUST_LOG=Scheduler=trace` narrows
/// output to one subsystem.
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    tag: &'static str,
}

impl Logger {
    pub const fn new(tag: &'static str) -> Self {
        Self { tag }
    }

    #[inline]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    #[inline]
    pub fn info(&self, msg: impl AsRef<str>) {
        self.emit(Level::Info, msg.as_ref());
    }

    #[inline]
    pub fn debug(&self, msg: impl AsRef<str>) {
        self.emit(Level::Debug, msg.as_ref());
    }

    #[inline]
    pub fn trace(&self, msg: impl AsRef<str>) {
        self.emit(Level::Trace, msg.as_ref());
    }

    #[inline]
    pub fn warn(&self, msg: impl AsRef<str>) {
        self.emit(Level::Warn, msg.as_ref());
    }

    #[inline]
    pub fn error(&self, msg: impl AsRef<str>) {
        self.emit(Level::Error, msg.as_ref());
    }

    #[inline]
    pub fn enabled(&self, lvl: Level) -> bool {
        log::log_enabled!(target: self.tag, lvl)
    }

    fn emit(&self, lvl: Level, msg: &str) {
        log::log!(target: self.tag, lvl, "{}", msg);
    }
}

/// Install `env_logger` with `default_filter` unless `RUST_LOG` is set.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .is_test(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_keeps_its_tag() {
        let log = Logger::new("Scheduler");
        assert_eq!(log.tag(), "Scheduler");
        // No logger installed: messages are dropped silently.
        log.info("boot");
        log.trace("frame");
    }

    #[test]
    fn init_logging_twice_is_harmless() {
        init_logging("warn");
        init_logging("debug");
    }
}
