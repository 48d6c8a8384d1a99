use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};

/// Writes log records to stderr
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    /// 0 -> warnings, 1 -> info, 2+ -> debug
    pub fn from_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        };
        Self { level }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if record.level() <= Level::Warn {
            eprintln!("{}: {}", record.level(), record.args());
        } else {
            eprintln!(
                "[{} {:5} {}] {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
