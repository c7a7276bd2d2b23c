use log::{LevelFilter, Log, Metadata, Record};

/// Fans every record out to several loggers, after applying per-target
/// level filters.
pub struct MultiLogger {
    loggers: Vec<Box<dyn Log>>,
    target_filters: Vec<(String, LevelFilter)>,
}

impl Default for MultiLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiLogger {
    pub fn new() -> Self {
        Self {
            loggers: Vec::new(),
            target_filters: Vec::new(),
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn Log>) -> Self {
        self.add_logger(logger);
        self
    }

    pub fn add_logger(&mut self, logger: Box<dyn Log>) {
        self.loggers.push(logger);
    }

    /// Caps the level of every record whose target starts with `target`.
    /// The longest matching prefix wins.
    pub fn with_target_filter(mut self, target: impl Into<String>, level: LevelFilter) -> Self {
        self.target_filters.push((target.into(), level));
        self
    }

    /// Installs this logger as the global logger.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        log::set_max_level(LevelFilter::Trace);
        log::set_boxed_logger(Box::new(self))
    }

    fn target_allows(&self, metadata: &Metadata) -> bool {
        self.target_filters
            .iter()
            .filter(|(target, _)| metadata.target().starts_with(target.as_str()))
            .max_by_key(|(target, _)| target.len())
            .map_or(true, |(_, level)| metadata.level() <= *level)
    }
}

impl Log for MultiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.target_allows(metadata) && self.loggers.iter().any(|l| l.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        if !self.target_allows(record.metadata()) {
            return;
        }
        for logger in self.loggers.iter().filter(|l| l.enabled(record.metadata())) {
            logger.log(record);
        }
    }

    fn flush(&self) {
        self.loggers.iter().for_each(|l| l.flush());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use log::Level;

    use super::*;

    struct CountingLogger {
        max_level: LevelFilter,
        count: Arc<AtomicUsize>,
    }

    impl CountingLogger {
        fn boxed(max_level: LevelFilter) -> (Box<dyn Log>, Arc<AtomicUsize>) {
            let count = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    max_level,
                    count: count.clone(),
                }),
                count,
            )
        }
    }

    impl Log for CountingLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= self.max_level
        }

        fn log(&self, _: &Record) {
            self.count.fetch_add(1, Ordering::Relaxed);
        }

        fn flush(&self) {}
    }

    fn record(level: Level, target: &str, f: impl FnOnce(&Record)) {
        f(&Record::builder()
            .args(format_args!("message"))
            .level(level)
            .target(target)
            .build());
    }

    #[test]
    fn test_fan_out() {
        let (verbose, verbose_count) = CountingLogger::boxed(LevelFilter::Trace);
        let (quiet, quiet_count) = CountingLogger::boxed(LevelFilter::Warn);
        let logger = MultiLogger::new().with_logger(verbose).with_logger(quiet);

        record(Level::Debug, "ucsmkit", |r| logger.log(r));
        record(Level::Error, "ucsmkit", |r| logger.log(r));

        assert_eq!(verbose_count.load(Ordering::Relaxed), 2);
        assert_eq!(quiet_count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_target_filters() {
        let (inner, count) = CountingLogger::boxed(LevelFilter::Trace);
        let logger = MultiLogger::new()
            .with_logger(inner)
            .with_target_filter("moutils", LevelFilter::Info)
            .with_target_filter("moutils::memory", LevelFilter::Off);

        assert!(!logger.enabled(
            &Metadata::builder()
                .level(Level::Debug)
                .target("moutils::files")
                .build()
        ));
        assert!(logger.enabled(
            &Metadata::builder()
                .level(Level::Debug)
                .target("ucsmkit::boot")
                .build()
        ));

        record(Level::Error, "moutils::memory", |r| logger.log(r));
        record(Level::Info, "moutils::files", |r| logger.log(r));
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_no_loggers() {
        let logger = MultiLogger::default();
        assert!(!logger.enabled(&Metadata::builder().level(Level::Error).build()));
    }
}
