//! Console logging, optionally teed into a log file.
//!
//! A single [`log::Log`] implementation is installed for the process. It
//! writes every record at [`Level::Info`] and above to stdout and to every file
//! sink currently attached through a [`LogGuard`]. Attaching a sink installs
//! the logger if this has not already happened.

use std::{
    fs::File,
    io::{ BufWriter, Write },
    path::{ Path, PathBuf },
    sync::{ Mutex, MutexGuard, atomic::{ AtomicUsize, Ordering } },
};
use log::{ Level, LevelFilter, Log, Metadata, Record };
use crate::error::LogError;

struct TeeLogger {
    sinks: Mutex<Vec<(usize, BufWriter<File>)>>,
}

static LOGGER: TeeLogger = TeeLogger { sinks: Mutex::new(Vec::new()) };

static NEXT_SINK: AtomicUsize = AtomicUsize::new(0);

impl TeeLogger {
    // a panic while holding the lock leaves the sinks usable
    fn sinks(&self) -> MutexGuard<'_, Vec<(usize, BufWriter<File>)>> {
        self.sinks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Log for TeeLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) { return; }
        let line = match record.level() {
            Level::Info => format!("{}", record.args()),
            level => format!("{}: {}", level, record.args()),
        };
        println!("{}", line);
        self.sinks().iter_mut()
            .for_each(|(_, sink)| { writeln!(sink, "{}", line).ok(); });
    }

    fn flush(&self) {
        self.sinks().iter_mut()
            .for_each(|(_, sink)| { sink.flush().ok(); });
    }
}

/// Install the console logger.
///
/// Calling this more than once is harmless. If some other logger was installed
/// first, it is left in place and file sinks receive nothing.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

/// Keeps a log file attached to the console logger.
///
/// The file is created (or truncated) on [`acquire`][Self::acquire] and
/// flushed and detached when the guard is dropped, so holding a guard for the
/// length of a run releases the file on every exit path.
///
/// Sinks belong to the process, not to the thread or run that attached them:
/// while several guards are held at once, each of their files receives every
/// record from every thread. Runs that need separate logs must not overlap.
#[derive(Debug)]
pub struct LogGuard {
    id: usize,
    path: PathBuf,
}

impl LogGuard {
    /// Start teeing log output into `path`.
    pub fn acquire<P>(path: P) -> Result<Self, LogError>
    where P: AsRef<Path>
    {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .map_err(|err| LogError(path.clone(), err))?;
        init();
        let id = NEXT_SINK.fetch_add(1, Ordering::Relaxed);
        LOGGER.sinks().push((id, BufWriter::new(file)));
        log::info!("logging to {}", path.display());
        Ok(Self { id, path })
    }

    /// Path of the attached log file.
    pub fn path(&self) -> &Path { &self.path }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        let mut sinks = LOGGER.sinks();
        if let Some(k) = sinks.iter().position(|(id, _)| *id == self.id) {
            let (_, mut sink) = sinks.swap_remove(k);
            sink.flush().ok();
        }
    }
}
