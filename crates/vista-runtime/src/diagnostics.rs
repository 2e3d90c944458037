//! Diagnostics handed to the host's observability layer
//!
//! Degraded paths (media that fails to decode, bindings that fail closed)
//! are logged and also recorded here so the host can surface them. The
//! log is shared with the host and may be written from a media thread, so
//! it sits behind a lock.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use vista_core::{FrameTime, VistaError};

/// Buffered diagnostics when the configuration does not say otherwise
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 256;

/// A recorded degradation
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub at: FrameTime,
    pub error: VistaError,
}

impl Diagnostic {
    pub fn new(at: FrameTime, error: VistaError) -> Self {
        Diagnostic { at, error }
    }

    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

/// Receiver of diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

/// Bounded in-memory diagnostic log; clones share the same buffer
#[derive(Clone, Debug)]
pub struct Diagnostics {
    inner: Arc<Mutex<VecDeque<Diagnostic>>>,
    capacity: usize,
}

impl Diagnostics {
    pub fn new(capacity: usize) -> Self {
        Diagnostics {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of every buffered diagnostic, oldest first
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.inner.lock().iter().cloned().collect()
    }

    /// Take every buffered diagnostic
    pub fn drain(&self) -> Vec<Diagnostic> {
        self.inner.lock().drain(..).collect()
    }

    pub fn count_kind(&self, kind: &str) -> usize {
        self.inner.lock().iter().filter(|d| d.kind() == kind).count()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIAGNOSTICS)
    }
}

impl DiagnosticSink for Diagnostics {
    fn record(&self, diagnostic: Diagnostic) {
        let mut log = self.inner.lock();
        if log.len() == self.capacity {
            log.pop_front();
        }
        log.push_back(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use vista_core::MediaUri;

    fn media_failure(uri: &str) -> VistaError {
        VistaError::MediaLoadFailure {
            uri: MediaUri::new(uri),
            reason: "decode error".into(),
        }
    }

    #[test]
    fn test_bounded_log_drops_oldest() {
        let log = Diagnostics::new(2);
        for (i, uri) in ["/a.mp4", "/b.mp4", "/c.mp4"].iter().enumerate() {
            log.record(Diagnostic::new(FrameTime::from_millis(i as u64), media_failure(uri)));
        }
        let kept = log.snapshot();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].at, FrameTime::from_millis(1));
    }

    #[test]
    fn test_shared_across_threads() {
        let log = Diagnostics::default();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let log = log.clone();
                thread::spawn(move || {
                    log.record(Diagnostic::new(
                        FrameTime::from_millis(i),
                        media_failure("/videos/game.mp4"),
                    ));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(log.count_kind("media_load_failure"), 4);
        assert_eq!(log.drain().len(), 4);
        assert!(log.is_empty());
    }
}
