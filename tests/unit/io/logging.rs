//! Tests for the log backend

#[cfg(test)]
mod tests {
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use roomlattice::io::logging::{ProgressLogger, level_for};

    // Tests each verbosity flag maps to the next log level
    // Verified by letting quiet lose to verbose
    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, 0), LevelFilter::Warn);
        assert_eq!(level_for(false, 1), LevelFilter::Info);
        assert_eq!(level_for(false, 2), LevelFilter::Debug);
        assert_eq!(level_for(false, 7), LevelFilter::Trace);
        assert_eq!(level_for(true, 3), LevelFilter::Error);
    }

    #[test]
    fn test_format_record() {
        let record = Record::builder()
            .args(format_args!("hello"))
            .level(Level::Warn)
            .build();
        assert_eq!(ProgressLogger::format_record(&record), "[WARN ] hello");

        let record = Record::builder()
            .args(format_args!("placed {}", 3))
            .level(Level::Error)
            .build();
        assert_eq!(ProgressLogger::format_record(&record), "[ERROR] placed 3");
    }

    // Tests records below the configured level are filtered
    #[test]
    fn test_enabled_respects_level() {
        let logger = ProgressLogger::new(LevelFilter::Info, None);
        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&debug));

        let silent = ProgressLogger::new(LevelFilter::Off, None);
        assert!(!silent.enabled(&Metadata::builder().level(Level::Error).build()));
    }
}
