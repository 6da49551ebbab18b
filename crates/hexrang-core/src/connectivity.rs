//! Network reachability monitoring
//!
//! Publishes a boolean online/offline signal over a watch channel. The
//! monitor polls a probe on an interval but only notifies subscribers when
//! the state actually transitions, so N identical probe results produce at
//! most one event. A probe that cannot determine the status reports offline.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

/// A reachability check
///
/// Implementations answer "are we online right now?". Returning `false`
/// covers both "definitely offline" and "could not determine".
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn check(&self) -> bool;
}

/// Probe that attempts a TCP connection to a well-known address
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn check(&self) -> bool {
        matches!(
            tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr)).await,
            Ok(Ok(_))
        )
    }
}

/// Commands sent to the monitor task
#[derive(Debug)]
pub enum MonitorCommand {
    /// Shutdown the monitor task
    Shutdown,
}

/// Handle for the background connectivity monitor
pub struct MonitorHandle {
    status_rx: watch::Receiver<bool>,
    command_tx: mpsc::Sender<MonitorCommand>,
}

impl MonitorHandle {
    /// Current connectivity state
    pub fn is_online(&self) -> bool {
        *self.status_rx.borrow()
    }

    /// Subscribe to connectivity transitions
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.status_rx.clone()
    }

    /// Stop the monitor task
    pub async fn shutdown(&self) {
        let _ = self.command_tx.send(MonitorCommand::Shutdown).await;
    }
}

/// Spawn a background task that probes reachability on an interval
///
/// The returned handle's watch channel starts at `false` and flips on each
/// true transition; a device that starts online therefore produces one
/// offline-to-online event shortly after spawn, which retries anything
/// left unsynced by a previous session.
pub fn spawn_monitor(
    probe: impl ConnectivityProbe + 'static,
    poll_interval: Duration,
) -> MonitorHandle {
    let (status_tx, status_rx) = watch::channel(false);
    let (command_tx, command_rx) = mpsc::channel(16);

    tokio::spawn(monitor_task(
        Box::new(probe),
        poll_interval,
        status_tx,
        command_rx,
    ));

    MonitorHandle {
        status_rx,
        command_tx,
    }
}

async fn monitor_task(
    probe: Box<dyn ConnectivityProbe>,
    poll_interval: Duration,
    status_tx: watch::Sender<bool>,
    mut command_rx: mpsc::Receiver<MonitorCommand>,
) {
    loop {
        let online = probe.check().await;
        trace!(online, "reachability probe");
        publish(&status_tx, online);

        tokio::select! {
            _ = tokio::time::sleep(poll_interval) => {}
            cmd = command_rx.recv() => {
                if matches!(cmd, Some(MonitorCommand::Shutdown) | None) {
                    break;
                }
            }
        }
    }
}

/// Publish a state, suppressing consecutive duplicates
fn publish(status_tx: &watch::Sender<bool>, online: bool) {
    status_tx.send_if_modified(|state| {
        if *state == online {
            false
        } else {
            debug!(online, "connectivity changed");
            *state = online;
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::net::TcpListener;

    /// Probe that replays a fixed sequence, then repeats the last state
    struct ScriptedProbe {
        states: Mutex<VecDeque<bool>>,
        last: Mutex<bool>,
    }

    impl ScriptedProbe {
        fn new(states: &[bool]) -> Self {
            Self {
                states: Mutex::new(states.iter().copied().collect()),
                last: Mutex::new(false),
            }
        }
    }

    #[async_trait]
    impl ConnectivityProbe for ScriptedProbe {
        async fn check(&self) -> bool {
            match self.states.lock().unwrap().pop_front() {
                Some(state) => {
                    *self.last.lock().unwrap() = state;
                    state
                }
                None => *self.last.lock().unwrap(),
            }
        }
    }

    #[test]
    fn test_publish_deduplicates() {
        let (tx, mut rx) = watch::channel(false);
        rx.borrow_and_update();

        // Three identical reports produce at most one notification
        publish(&tx, true);
        publish(&tx, true);
        publish(&tx, true);

        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
        assert!(!rx.has_changed().unwrap());

        // Same state again: no new notification
        publish(&tx, true);
        assert!(!rx.has_changed().unwrap());

        // A real transition notifies
        publish(&tx, false);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_monitor_emits_one_event_per_transition() {
        let probe = ScriptedProbe::new(&[false, false, false, true, true]);
        let handle = spawn_monitor(probe, Duration::from_millis(10));
        let mut rx = handle.subscribe();

        // Offline reports are duplicates of the initial state; the first
        // notification is the offline-to-online transition.
        tokio::time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(*rx.borrow_and_update());

        // Trailing identical reports produce no further events
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!rx.has_changed().unwrap());
        assert!(handle.is_online());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_tcp_probe_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let probe = TcpProbe::new(addr.to_string(), Duration::from_secs(1));
        assert!(probe.check().await);
    }

    #[tokio::test]
    async fn test_tcp_probe_unreachable_is_offline() {
        // Grab a port and release it so the connection is refused
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = TcpProbe::new(addr.to_string(), Duration::from_millis(200));
        assert!(!probe.check().await);
    }

    #[tokio::test]
    async fn test_tcp_probe_bad_address_is_offline() {
        // Failure to determine status counts as offline
        let probe = TcpProbe::new("not-a-real-host.invalid:1", Duration::from_millis(200));
        assert!(!probe.check().await);
    }
}
