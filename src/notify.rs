//! Listener registries with optional dispatch-thread delivery.

use crate::dispatch::DispatchQueue;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub enum Delivery {
    #[default]
    Immediate,
    /// Deliver on the queue's thread, posting when fired from elsewhere.
    DispatchThread(DispatchQueue),
}

/// Change-suppression policy: equal known values are not worth announcing.
pub fn should_fire<T: PartialEq + ?Sized>(old: Option<&T>, new: Option<&T>) -> bool {
    match (old, new) {
        (Some(old), Some(new)) => old != new,
        _ => true,
    }
}

pub struct Notifier<L: ?Sized> {
    listeners: Mutex<Vec<Arc<L>>>,
    delivery: Delivery,
}

impl<L: ?Sized + Send + Sync + 'static> Notifier<L> {
    pub fn new() -> Self {
        Self::with_delivery(Delivery::Immediate)
    }

    pub fn with_delivery(delivery: Delivery) -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            delivery,
        }
    }

    pub fn subscribe(&self, listener: Arc<L>) {
        self.listeners.lock().push(listener);
    }

    /// Drops the most recent registration of `listener`.
    pub fn unsubscribe(&self, listener: &Arc<L>) -> bool {
        let mut listeners = self.listeners.lock();
        match listeners.iter().rposition(|l| Arc::ptr_eq(l, listener)) {
            Some(pos) => {
                listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, listener: &Arc<L>) -> bool {
        self.listeners.lock().iter().any(|l| Arc::ptr_eq(l, listener))
    }

    pub fn listeners(&self) -> Vec<Arc<L>> {
        self.listeners.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    pub fn clear(&self) {
        self.listeners.lock().clear();
    }

    /// Calls `deliver` once per registration, in registration order.
    ///
    /// The registry is snapshotted first, so listeners may subscribe or
    /// unsubscribe from inside a callback. A panicking listener is not
    /// caught and the listeners after it do not run.
    pub fn fire<F>(&self, deliver: F)
    where
        F: Fn(&L) + Send + 'static,
    {
        let snapshot = self.listeners();
        if snapshot.is_empty() {
            return;
        }

        match &self.delivery {
            Delivery::DispatchThread(queue) if !queue.is_dispatch_thread() => {
                queue.post(Box::new(move || deliver_all(&snapshot, &deliver)));
            }
            _ => deliver_all(&snapshot, &deliver),
        }
    }

    /// Fires unless both values are known and equal. Returns whether it fired.
    pub fn fire_change<T, F>(&self, old: Option<&T>, new: Option<&T>, deliver: F) -> bool
    where
        T: PartialEq + ?Sized,
        F: Fn(&L) + Send + 'static,
    {
        if !should_fire(old, new) {
            return false;
        }
        self.fire(deliver);
        true
    }
}

fn deliver_all<L: ?Sized, F: Fn(&L)>(listeners: &[Arc<L>], deliver: &F) {
    for listener in listeners {
        deliver(listener.as_ref());
    }
}

impl<L: ?Sized + Send + Sync + 'static> Default for Notifier<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> std::fmt::Debug for Notifier<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.lock().len())
            .field("delivery", &self.delivery)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    trait Probe: Send + Sync {
        fn hit(&self, value: u32);
    }

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<(&'static str, u32)>>>,
    }

    impl Probe for Recorder {
        fn hit(&self, value: u32) {
            self.log.lock().push((self.name, value));
        }
    }

    struct Exploder;

    impl Probe for Exploder {
        fn hit(&self, _value: u32) {
            panic!("listener failure");
        }
    }

    fn recorder(name: &'static str, log: &Arc<Mutex<Vec<(&'static str, u32)>>>) -> Arc<dyn Probe> {
        Arc::new(Recorder {
            name,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn delivers_in_registration_order_per_registration() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let notifier: Notifier<dyn Probe> = Notifier::new();
        let a = recorder("a", &log);
        let b = recorder("b", &log);
        notifier.subscribe(Arc::clone(&a));
        notifier.subscribe(Arc::clone(&b));
        notifier.subscribe(Arc::clone(&a));

        notifier.fire(|l| l.hit(7));

        assert_eq!(*log.lock(), vec![("a", 7), ("b", 7), ("a", 7)]);
    }

    #[test]
    fn unsubscribe_removes_one_registration_by_identity() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let notifier: Notifier<dyn Probe> = Notifier::new();
        let a = recorder("a", &log);
        let twin = recorder("a", &log);
        notifier.subscribe(Arc::clone(&a));
        notifier.subscribe(Arc::clone(&a));

        assert!(!notifier.unsubscribe(&twin));
        assert!(notifier.unsubscribe(&a));
        assert!(notifier.contains(&a));
        assert_eq!(notifier.len(), 1);
        assert!(notifier.unsubscribe(&a));
        assert!(notifier.is_empty());
    }

    #[test]
    fn equal_known_values_are_suppressed() {
        assert!(!should_fire(Some(&1), Some(&1)));
        assert!(should_fire(Some(&1), Some(&2)));
        assert!(should_fire::<i32>(None, Some(&2)));
        assert!(should_fire::<i32>(Some(&1), None));
        assert!(should_fire::<i32>(None, None));

        let log = Arc::new(Mutex::new(Vec::new()));
        let notifier: Notifier<dyn Probe> = Notifier::new();
        notifier.subscribe(recorder("a", &log));
        assert!(!notifier.fire_change(Some(&true), Some(&true), |l| l.hit(1)));
        assert!(notifier.fire_change(Some(&true), Some(&false), |l| l.hit(2)));
        assert_eq!(*log.lock(), vec![("a", 2)]);
    }

    #[test]
    fn off_thread_fire_is_queued_for_dispatch_thread() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (queue, dispatch) = dispatch::channel();
        dispatch.bind().expect("bind");
        let notifier: Arc<Notifier<dyn Probe>> =
            Arc::new(Notifier::with_delivery(Delivery::DispatchThread(queue)));
        notifier.subscribe(recorder("a", &log));

        notifier.fire(|l| l.hit(1));
        assert_eq!(log.lock().len(), 1, "dispatch thread delivers synchronously");

        let remote = Arc::clone(&notifier);
        std::thread::spawn(move || remote.fire(|l| l.hit(2)))
            .join()
            .expect("join");
        assert_eq!(log.lock().len(), 1, "off-thread fire is deferred");

        assert_eq!(dispatch.run_pending().expect("drain"), 1);
        assert_eq!(*log.lock(), vec![("a", 1), ("a", 2)]);
    }

    #[test]
    fn listener_panic_propagates_and_skips_the_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let notifier: Notifier<dyn Probe> = Notifier::new();
        notifier.subscribe(Arc::new(Exploder));
        notifier.subscribe(recorder("after", &log));

        let result = catch_unwind(AssertUnwindSafe(|| notifier.fire(|l| l.hit(3))));

        assert!(result.is_err());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn listener_may_unsubscribe_itself_while_firing() {
        struct OneShot {
            notifier: Arc<Notifier<dyn Probe>>,
            me: Mutex<Option<Arc<dyn Probe>>>,
            hits: Mutex<u32>,
        }
        impl Probe for OneShot {
            fn hit(&self, _value: u32) {
                *self.hits.lock() += 1;
                if let Some(me) = self.me.lock().take() {
                    self.notifier.unsubscribe(&me);
                }
            }
        }

        let notifier: Arc<Notifier<dyn Probe>> = Arc::new(Notifier::new());
        let shot = Arc::new(OneShot {
            notifier: Arc::clone(&notifier),
            me: Mutex::new(None),
            hits: Mutex::new(0),
        });
        let as_probe: Arc<dyn Probe> = shot.clone();
        *shot.me.lock() = Some(Arc::clone(&as_probe));
        notifier.subscribe(as_probe);

        notifier.fire(|l| l.hit(0));
        notifier.fire(|l| l.hit(0));

        assert_eq!(*shot.hits.lock(), 1);
        assert!(notifier.is_empty());
    }
}
