use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex},
};

use tracing_subscriber::EnvFilter;

/// Bounded in-memory log sink. The dashboard owns the terminal, so log
/// lines are kept here and shown in the debug panel instead.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Snapshot of the buffered lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        let lines = self
            .lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        lines.iter().cloned().collect()
    }

    fn push(&self, line: &str) -> io::Result<()> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| io::Error::other("log buffer has been poisoned"))?;
        lines.push_back(line.to_string());
        while lines.len() > self.capacity {
            lines.pop_front();
        }
        Ok(())
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        for line in text.lines().map(str::trim_end).filter(|line| !line.is_empty()) {
            self.push(line)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Installs the global subscriber, honouring `RUST_LOG` (default `info`).
pub fn init_tracing(buffer: LogBuffer) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .with_writer(move || buffer.clone())
        .try_init();
}
