//! A task queue drained by one designated thread.
//!
//! Notifiers configured for dispatch-thread delivery post their work here
//! when they are fired from any other thread.

use crate::error::DispatchError;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};
use tracing::debug;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Clone)]
pub struct DispatchQueue {
    tx: Sender<Task>,
    owner: Arc<OnceLock<ThreadId>>,
}

pub struct DispatchLoop {
    rx: Receiver<Task>,
    owner: Arc<OnceLock<ThreadId>>,
}

pub fn channel() -> (DispatchQueue, DispatchLoop) {
    let (tx, rx) = mpsc::channel();
    let owner = Arc::new(OnceLock::new());
    (
        DispatchQueue {
            tx,
            owner: Arc::clone(&owner),
        },
        DispatchLoop { rx, owner },
    )
}

impl DispatchQueue {
    /// Queues `task` for the dispatch thread. Returns false once the loop is gone.
    pub fn post(&self, task: Task) -> bool {
        if self.tx.send(task).is_err() {
            debug!("dispatch loop closed, dropping task");
            return false;
        }
        true
    }

    pub fn is_dispatch_thread(&self) -> bool {
        self.owner
            .get()
            .is_some_and(|owner| *owner == thread::current().id())
    }
}

impl std::fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchQueue")
            .field("owner", &self.owner.get())
            .finish()
    }
}

impl DispatchLoop {
    pub fn bind(&self) -> Result<(), DispatchError> {
        let current = thread::current().id();
        let owner = *self.owner.get_or_init(|| current);
        if owner == current {
            Ok(())
        } else {
            Err(DispatchError::WrongThread)
        }
    }

    pub fn run_pending(&self) -> Result<usize, DispatchError> {
        self.bind()?;
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        Ok(ran)
    }

    /// Runs tasks until every queue handle has been dropped.
    pub fn run(self) -> Result<(), DispatchError> {
        self.bind()?;
        while let Ok(task) = self.rx.recv() {
            task();
        }
        debug!("dispatch loop drained");
        Ok(())
    }

    pub fn spawn(self, name: &str) -> io::Result<JoinHandle<()>> {
        thread::Builder::new().name(name.to_string()).spawn(move || {
            if let Err(err) = self.run() {
                tracing::error!("dispatch worker failed to start: {err}");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn unbound_queue_reports_no_dispatch_thread() {
        let (queue, _loop) = channel();
        assert!(!queue.is_dispatch_thread());
    }

    #[test]
    fn tasks_run_in_post_order_on_drain() {
        let (queue, dispatch) = channel();
        let log = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let log = Arc::clone(&log);
            assert!(queue.post(Box::new(move || log.lock().expect("lock").push(n))));
        }
        assert_eq!(dispatch.run_pending().expect("drain"), 3);
        assert_eq!(*log.lock().expect("lock"), vec![0, 1, 2]);
        assert!(queue.is_dispatch_thread());
    }

    #[test]
    fn loop_rejects_second_thread() {
        let (_queue, dispatch) = channel();
        dispatch.bind().expect("bind");
        let result = thread::spawn(move || dispatch.run_pending())
            .join()
            .expect("join");
        assert_eq!(result, Err(DispatchError::WrongThread));
    }

    #[test]
    fn spawned_worker_drains_until_queues_drop() {
        let (queue, dispatch) = channel();
        let (tx, rx) = mpsc::channel();
        let handle = dispatch.spawn("dispatch-test").expect("spawn");
        let probe = queue.clone();
        queue.post(Box::new(move || {
            tx.send(probe.is_dispatch_thread()).expect("send");
        }));
        assert!(rx.recv().expect("recv"));
        drop(queue);
        handle.join().expect("join");
    }

    #[test]
    fn post_after_loop_dropped_fails() {
        let (queue, dispatch) = channel();
        drop(dispatch);
        assert!(!queue.post(Box::new(|| {})));
    }
}
