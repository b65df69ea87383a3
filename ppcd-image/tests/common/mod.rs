use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Write `bytes` to a fresh file under the system temp directory.
pub fn temp_file(bytes: &[u8]) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!("ppcd-image-{}-{n}.bin", std::process::id()));
    std::fs::write(&path, bytes).unwrap();
    path
}
