//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::sync::Arc;

use tenantflow::adapters::memory::InMemoryPublisher;
use tenantflow::services::{MessageCodec, NotificationDispatcher};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// In-process bus plus a dispatcher publishing on it.
#[allow(dead_code)]
pub fn memory_dispatcher() -> (
    Arc<InMemoryPublisher>,
    NotificationDispatcher<InMemoryPublisher>,
) {
    let bus = Arc::new(InMemoryPublisher::new());
    let dispatcher = NotificationDispatcher::new(Arc::clone(&bus), MessageCodec::default());
    (bus, dispatcher)
}

/// Write `contents` to a config file inside a fresh temp directory.
#[allow(dead_code)]
pub fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, contents).expect("Failed to write config");
    (dir, path)
}
