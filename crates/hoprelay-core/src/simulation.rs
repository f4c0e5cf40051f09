//! Synthetic disk load
//!
//! A simulated node can be made to write and delete a file of random bytes
//! on each rule application and each ping that reaches a rule lookup. The
//! outcome of the request never depends on it.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::RngCore;
use tracing::{debug, warn};

#[derive(Clone, Debug, Default)]
pub struct DiskLoadSimulator {
    bytes: usize,
    dir: PathBuf,
    // Shared between clones
    written: Arc<AtomicU64>,
}

impl DiskLoadSimulator {
    pub fn new(bytes: usize, dir: impl Into<PathBuf>) -> Self {
        Self {
            bytes,
            dir: dir.into(),
            written: Arc::default(),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.bytes > 0
    }

    /// Total bytes written and removed again by this simulator and its clones
    pub fn bytes_written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Write `bytes` of random data under a file tagged with `seed`, then remove it
    ///
    /// Returns the number of bytes written, 0 when disabled or when the write
    /// failed.
    pub async fn run(&self, seed: &str) -> usize {
        if !self.is_enabled() {
            return 0;
        }

        let path = self.dir.join(format!(
            "hoprelay_load_{}_{}",
            seed,
            uuid::Uuid::new_v4().simple()
        ));
        let data = {
            let mut buf = vec![0u8; self.bytes];
            rand::rng().fill_bytes(&mut buf);
            buf
        };

        if let Err(e) = tokio::fs::write(&path, data).await {
            warn!(path = %path.display(), error = %e, "disk load write failed");
            return 0;
        }
        self.written.fetch_add(self.bytes as u64, Ordering::Relaxed);

        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "disk load cleanup failed");
        } else {
            debug!(seed, bytes = self.bytes, "disk load simulated");
        }
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_is_noop() {
        let sim = DiskLoadSimulator::disabled();
        assert!(!sim.is_enabled());
        assert_eq!(sim.run("ping").await, 0);
        assert_eq!(sim.bytes_written(), 0);
    }

    #[tokio::test]
    async fn test_run_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let sim = DiskLoadSimulator::new(4096, dir.path());
        assert!(sim.is_enabled());

        assert_eq!(sim.run("rule").await, 4096);
        assert_eq!(sim.clone().run("ping").await, 4096);
        assert_eq!(sim.bytes_written(), 8192);

        let remaining = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_missing_directory_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let sim = DiskLoadSimulator::new(16, dir.path().join("does-not-exist"));
        assert_eq!(sim.run("ping").await, 0);
        assert_eq!(sim.bytes_written(), 0);
    }
}
