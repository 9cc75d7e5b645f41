//! Wraps [`Manager`] as a single-threaded cooperative actor: one mailbox,
//! messages processed strictly in arrival order, blocking file I/O
//! delegated to `tokio::task::spawn_blocking` so the actor's own task never
//! stalls on disk access.

use crate::{Manager, ManagerConfig};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

enum Command {
    Put {
        key: String,
        value: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Get {
        key: String,
        reply: oneshot::Sender<Result<Option<String>>>,
    },
}

/// A cloneable handle to a running persistence-manager actor task.
///
/// Cloning a handle does not spawn a new actor; every clone shares the same
/// mailbox, so PUTs to the same key still preserve arrival order across
/// callers, matching the ordering guarantee the manager's mailbox provides.
#[derive(Clone)]
pub struct ManagerHandle {
    tx: mpsc::Sender<Command>,
}

impl ManagerHandle {
    /// Recovers (or creates) a persistence manager over `dir` and spawns its
    /// actor task on the current `tokio` runtime.
    pub async fn spawn(dir: PathBuf, cfg: ManagerConfig) -> Result<Self> {
        let manager = tokio::task::spawn_blocking(move || Manager::recover(&dir, &cfg)).await??;
        let state = Arc::new(Mutex::new(manager));
        let (tx, rx) = mpsc::channel(1024);
        tokio::spawn(run(state, rx));
        Ok(Self { tx })
    }

    /// Appends `key`/`value` through the Active table, rolling and
    /// compacting as needed. Resolves once the write is reflected on disk
    /// (the index sidecar may lag; see [`sstable`]'s write contract).
    pub async fn put(&self, key: String, value: String) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Put { key, value, reply })
            .await
            .map_err(|_| anyhow::anyhow!("persistence manager actor is gone"))?;
        rx.await
            .map_err(|_| anyhow::anyhow!("persistence manager dropped the reply"))?
    }

    /// Looks up `key` across every table, newest-first.
    pub async fn get(&self, key: String) -> Result<Option<String>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Get { key, reply })
            .await
            .map_err(|_| anyhow::anyhow!("persistence manager actor is gone"))?;
        rx.await
            .map_err(|_| anyhow::anyhow!("persistence manager dropped the reply"))?
    }
}

async fn run(state: Arc<Mutex<Manager>>, mut rx: mpsc::Receiver<Command>) {
    while let Some(cmd) = rx.recv().await {
        let state = Arc::clone(&state);
        match cmd {
            Command::Put { key, value, reply } => {
                let result = tokio::task::spawn_blocking(move || {
                    let mut manager = state.lock().expect("persistence manager mutex poisoned");
                    manager.put(&key, &value)
                })
                .await
                .unwrap_or_else(|join_err| Err(anyhow::anyhow!("persistence worker panicked: {join_err}")));
                let _ = reply.send(result);
            }
            Command::Get { key, reply } => {
                let result = tokio::task::spawn_blocking(move || {
                    let manager = state.lock().expect("persistence manager mutex poisoned");
                    manager.get(&key)
                })
                .await
                .unwrap_or_else(|join_err| Err(anyhow::anyhow!("persistence worker panicked: {join_err}")));
                let _ = reply.send(result);
            }
        }
    }
}
