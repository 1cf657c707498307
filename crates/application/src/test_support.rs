//! Log capture shared by service tests.

use std::io::Write;
use std::sync::{Arc, Mutex as StdMutex};

#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<StdMutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        let writer = self.clone();
        tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::INFO)
            .finish()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.0
            .lock()
            .map(|bytes| {
                String::from_utf8_lossy(bytes.as_slice())
                    .lines()
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn contains(&self, level: &str, fragments: &[&str]) -> bool {
        self.lines().iter().any(|line| {
            line.contains(level) && fragments.iter().all(|fragment| line.contains(fragment))
        })
    }
}
