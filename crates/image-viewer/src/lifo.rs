//! Single-slot channel: a send replaces whatever is still pending, so the
//! receiver always gets the newest request and never works through stale ones.

use std::sync::{
    Arc, Condvar, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

struct Inner<T> {
    slot: Mutex<Option<T>>,
    cond_var: Condvar,
    disconnect: AtomicBool,
}

impl<T> Inner<T> {
    fn slot(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn disconnect(&self) {
        // under the lock, so a receiver between its check and its wait cannot miss it
        let _slot = self.slot();
        self.disconnect.store(true, Ordering::SeqCst);
        self.cond_var.notify_all();
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct DisconnectError;

pub struct Sender<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Sender<T> {
    /// Returns the request that got replaced, if the receiver had not picked it up yet.
    pub fn send(&self, t: T) -> Result<Option<T>, DisconnectError> {
        if self.inner.disconnect.load(Ordering::SeqCst) {
            return Err(DisconnectError);
        }

        let replaced = self.inner.slot().replace(t);
        self.inner.cond_var.notify_one();

        Ok(replaced)
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        self.inner.disconnect();
    }
}

pub struct Receiver<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Receiver<T> {
    /// Blocks until a request arrives. Fails once the sender is gone.
    pub fn recv(&self) -> Result<T, DisconnectError> {
        let mut slot = self.inner.slot();
        loop {
            if self.inner.disconnect.load(Ordering::SeqCst) {
                return Err(DisconnectError);
            }
            if let Some(t) = slot.take() {
                return Ok(t);
            }
            slot = self
                .inner
                .cond_var
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        self.inner.disconnect();
    }
}

pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let inner = Arc::new(Inner {
        slot: Mutex::new(None),
        cond_var: Condvar::new(),
        disconnect: AtomicBool::new(false),
    });

    let sender = Sender {
        inner: inner.clone(),
    };

    (sender, Receiver { inner })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_request_wins() {
        let (sender, receiver) = channel();
        assert_eq!(sender.send("a.png"), Ok(None));
        assert_eq!(sender.send("b.png"), Ok(Some("a.png")));
        assert_eq!(receiver.recv(), Ok("b.png"));
    }

    #[test]
    fn dropped_sender_wakes_receiver() {
        let (sender, receiver) = channel::<u32>();
        let handle = std::thread::spawn(move || receiver.recv());
        std::thread::sleep(std::time::Duration::from_millis(20));
        drop(sender);
        assert_eq!(handle.join().unwrap(), Err(DisconnectError));
    }

    #[test]
    fn send_after_receiver_dropped_fails() {
        let (sender, receiver) = channel();
        drop(receiver);
        assert_eq!(sender.send(1), Err(DisconnectError));
    }

    #[test]
    fn blocked_receiver_gets_request() {
        let (sender, receiver) = channel();
        let handle = std::thread::spawn(move || receiver.recv());
        sender.send(7).unwrap();
        assert_eq!(handle.join().unwrap(), Ok(7));
    }
}
