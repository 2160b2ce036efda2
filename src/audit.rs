//! Audit sink
//!
//! User actions are recorded as [`AuditEvent`]s and delivered to an
//! [`AuditWriter`] by a background task. Recording never blocks and never
//! fails the operation being audited: when the queue is full the event is
//! dropped and counted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Audited user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    List,
    Read,
    Members,
    Delete,
    Save,
    Format,
    Clusters,
}

impl AuditAction {
    pub fn all() -> &'static [AuditAction] {
        &[
            AuditAction::List,
            AuditAction::Read,
            AuditAction::Members,
            AuditAction::Delete,
            AuditAction::Save,
            AuditAction::Format,
            AuditAction::Clusters,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuditAction::List => "list",
            AuditAction::Read => "read",
            AuditAction::Members => "members",
            AuditAction::Delete => "delete",
            AuditAction::Save => "save",
            AuditAction::Format => "format",
            AuditAction::Clusters => "clusters",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub role: String,
    pub cluster: Option<String>,
    pub action: AuditAction,
    pub path: Option<String>,
    pub success: bool,
}

impl AuditEvent {
    pub fn new(user: impl Into<String>, role: impl Into<String>, action: AuditAction) -> Self {
        Self {
            timestamp: Utc::now(),
            user: user.into(),
            role: role.into(),
            cluster: None,
            action,
            path: None,
            success: true,
        }
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }
}

/// Destination for delivered audit events
pub trait AuditWriter: Send + Sync + 'static {
    fn write(&self, event: &AuditEvent);
}

/// Emits each event as a structured log record under the `kvdir::audit` target
pub struct TracingAuditWriter;

impl AuditWriter for TracingAuditWriter {
    fn write(&self, event: &AuditEvent) {
        info!(
            target: "kvdir::audit",
            timestamp = %event.timestamp.to_rfc3339(),
            user = %event.user,
            role = %event.role,
            cluster = event.cluster.as_deref().unwrap_or("-"),
            action = event.action.label(),
            path = event.path.as_deref().unwrap_or("-"),
            success = event.success,
            "audit"
        );
    }
}

/// Cheap handle for submitting events; clones share one queue.
#[derive(Clone)]
pub struct AuditRecorder {
    sender: Option<mpsc::Sender<AuditEvent>>,
    dropped: Arc<AtomicUsize>,
}

impl AuditRecorder {
    /// Recorder that discards every event.
    pub fn disabled() -> Self {
        Self {
            sender: None,
            dropped: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    pub fn record(&self, event: AuditEvent) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(action = event.action.label(), "Audit queue full, event dropped");
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                debug!(action = event.action.label(), "Audit sink closed, event dropped");
            }
        }
    }

    /// Events lost to a full or closed queue.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Background delivery task and its queue
pub struct AuditSink {
    recorder: AuditRecorder,
    handle: JoinHandle<usize>,
}

impl AuditSink {
    /// Start the delivery task. Must be called from within a tokio runtime.
    pub fn spawn(writer: Arc<dyn AuditWriter>, capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<AuditEvent>(capacity.max(1));
        let handle = tokio::spawn(async move {
            let mut delivered = 0;
            while let Some(event) = receiver.recv().await {
                writer.write(&event);
                delivered += 1;
            }
            delivered
        });
        Self {
            recorder: AuditRecorder {
                sender: Some(sender),
                dropped: Arc::new(AtomicUsize::new(0)),
            },
            handle,
        }
    }

    pub fn recorder(&self) -> AuditRecorder {
        self.recorder.clone()
    }

    /// Close the queue and wait for pending events to be written.
    ///
    /// Completes once every recorder handed out has been dropped. Returns the
    /// number of events delivered.
    pub async fn shutdown(self) -> usize {
        let dropped = self.recorder.dropped();
        drop(self.recorder);
        match self.handle.await {
            Ok(delivered) => {
                debug!(delivered, dropped, "Audit sink drained");
                delivered
            }
            Err(e) => {
                warn!("Audit delivery task failed: {}", e);
                0
            }
        }
    }
}
