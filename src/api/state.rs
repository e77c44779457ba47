//! Shared application state.
//!
//! Sessions themselves are never shared: each lives on its connection task.
//! The shared state only carries what every connection needs to start one
//! (source factory, session configuration) plus lock-free service counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::session::{Session, SessionConfig};
use crate::source::SourceFactory;

/// Shared state handed to every handler.
///
/// Cloning is cheap; all fields live behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Produces one landmark source per new session.
    source_factory: SourceFactory,
    /// Configuration applied to every new session.
    session_config: SessionConfig,
    /// Process start, for uptime reporting.
    started_at: Instant,
    /// Currently open sessions.
    active_sessions: AtomicU64,
    /// Sessions opened since startup.
    total_sessions: AtomicU64,
    /// Frames processed across all sessions since startup.
    frames_processed: AtomicU64,
}

impl AppState {
    /// Create the shared state around a source factory.
    pub fn new(source_factory: SourceFactory, session_config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                source_factory,
                session_config,
                started_at: Instant::now(),
                active_sessions: AtomicU64::new(0),
                total_sessions: AtomicU64::new(0),
                frames_processed: AtomicU64::new(0),
            }),
        }
    }

    /// Build a fresh session with its own landmark source. Registers the
    /// session in the service counters.
    pub fn new_session(&self) -> Session {
        self.inner.active_sessions.fetch_add(1, Ordering::Relaxed);
        self.inner.total_sessions.fetch_add(1, Ordering::Relaxed);
        Session::new(
            self.inner.session_config.clone(),
            (self.inner.source_factory)(),
        )
    }

    /// Record one session ending, with its final frame count.
    pub fn session_closed(&self, frames: u64) {
        self.inner.active_sessions.fetch_sub(1, Ordering::Relaxed);
        self.inner.frames_processed.fetch_add(frames, Ordering::Relaxed);
    }

    /// Seconds since the state was created.
    pub fn uptime_secs(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }

    /// Currently open sessions.
    pub fn active_sessions(&self) -> u64 {
        self.inner.active_sessions.load(Ordering::Relaxed)
    }

    /// Sessions opened since startup.
    pub fn total_sessions(&self) -> u64 {
        self.inner.total_sessions.load(Ordering::Relaxed)
    }

    /// Frames processed by closed sessions since startup.
    pub fn frames_processed(&self) -> u64 {
        self.inner.frames_processed.load(Ordering::Relaxed)
    }
}
