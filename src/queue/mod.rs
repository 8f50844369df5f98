//! BlockingQueue - An unbounded FIFO queue with a blocking dequeue
//!
//! The queue is a single `Mutex` over a `VecDeque`, paired with a `Condvar`
//! that is only ever waited on with that same mutex. Every operation takes the
//! lock, so operations are mutually exclusive and observe a single consistent
//! order of elements.
//!
//! `dequeue` on an empty queue suspends the calling thread until an element is
//! enqueued. Each `enqueue` wakes *all* waiting dequeuers. Only one of them can
//! take the new element, the others find the queue empty again and go back to
//! waiting.
//!
//! Threads in Rust can not be interrupted from outside, so a waiting dequeuer
//! is cancelled through an [`Interrupt`] that it passes to `dequeue`. While it
//! waits, the dequeuer parks a handle to the queue's monitor in the interrupt,
//! so [`Interrupt::raise`] can wake it without knowing which queue it waits
//! on. The suspended dequeue then returns [`QueueError::Interrupted`] without
//! consuming an element.
//!
//! `len` and `is_empty` are point-in-time values. With other threads active
//! they may be stale as soon as they are returned.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::error::QueueError;

// Type erased access to a queue's monitor, so an interrupt can wake the
// waiters of whichever queue its thread is parked on.
trait Wake: Send + Sync {
    fn wake_all(&self);
}

struct Monitor<E> {
    items: Mutex<VecDeque<E>>,
    available: Condvar,
}

impl<E: Send> Wake for Monitor<E> {
    fn wake_all(&self) {
        // Taking the lock orders this wakeup after any waiter that checked
        // the interrupt flag and is about to wait.
        let _items = self.items.lock();
        self.available.notify_all();
    }
}

#[derive(Debug, Default)]
struct InterruptInner {
    raised: AtomicBool,
    // Lock order: a dequeuer takes the queue lock, then this one. `raise`
    // releases this lock before it takes a queue lock.
    parked: Mutex<Option<Weak<dyn Wake>>>,
}

/// An interrupt flag for a thread that may wait in [`BlockingQueue::dequeue`].
///
/// Clones share the same flag, so one clone can be handed to the waiting
/// thread and another kept by whoever may need to cancel it. An interrupt
/// should only be used by one dequeuing thread at a time.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    inner: Arc<InterruptInner>,
}

impl Interrupt {
    /// Create a new, lowered, interrupt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the interrupt. If the owning thread is waiting in a dequeue it is
    /// woken and the dequeue fails with `QueueError::Interrupted`. Otherwise
    /// the interrupt stays pending until a dequeue finds its queue empty.
    pub fn raise(&self) {
        self.inner.raised.store(true, Ordering::Release);
        let parked = self.inner.parked.lock().as_ref().and_then(Weak::upgrade);
        if let Some(monitor) = parked {
            tracing::debug!("waking interrupted dequeuer");
            monitor.wake_all();
        }
    }

    /// Returns true if the interrupt is raised and has not yet been consumed by
    /// a dequeue.
    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::Acquire)
    }

    /// Lower the interrupt without delivering it.
    pub fn clear(&self) {
        self.inner.raised.store(false, Ordering::Release);
    }

    fn take(&self) -> bool {
        self.inner.raised.swap(false, Ordering::AcqRel)
    }

    fn park(&self, monitor: Weak<dyn Wake>) -> Parked<'_> {
        *self.inner.parked.lock() = Some(monitor);
        Parked { interrupt: self }
    }
}

// Removes the parked monitor from the interrupt when the dequeue returns.
struct Parked<'a> {
    interrupt: &'a Interrupt,
}

impl Drop for Parked<'_> {
    fn drop(&mut self) {
        *self.interrupt.inner.parked.lock() = None;
    }
}

/// An unbounded, thread safe FIFO queue where removal blocks until an element
/// is available.
///
/// # Examples
/// ```
/// use lockbucket::queue::{BlockingQueue, Interrupt};
/// use std::thread::scope;
///
/// let queue = BlockingQueue::new();
/// let interrupt = Interrupt::new();
///
/// scope(|scope| {
///     let consumer = scope.spawn(|| queue.dequeue(&interrupt));
///     queue.enqueue(1);
///     assert_eq!(consumer.join().unwrap(), Ok(1));
/// });
/// assert!(queue.is_empty());
/// ```
pub struct BlockingQueue<E> {
    monitor: Arc<Monitor<E>>,
}

impl<E> Default for BlockingQueue<E> {
    fn default() -> Self {
        BlockingQueue {
            monitor: Arc::new(Monitor {
                items: Mutex::new(VecDeque::new()),
                available: Condvar::new(),
            }),
        }
    }
}

impl<E> BlockingQueue<E> {
    /// Create a new empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `element` to the tail of the queue and wake all waiting
    /// dequeuers. This never blocks beyond acquiring the lock.
    pub fn enqueue(&self, element: E) {
        let mut items = self.monitor.items.lock();
        items.push_back(element);
        self.monitor.available.notify_all();
    }

    /// Remove and return the head of the queue. If the queue is empty the
    /// calling thread waits until an element is enqueued.
    ///
    /// If `interrupt` is raised while the queue is empty, the interrupt is
    /// consumed and `QueueError::Interrupted` is returned. No element is
    /// removed in that case. An interrupt raised while an element is available
    /// stays pending, and the element is returned.
    pub fn dequeue(&self, interrupt: &Interrupt) -> Result<E, QueueError>
    where
        E: Send + 'static,
    {
        let mut items = self.monitor.items.lock();
        if let Some(element) = items.pop_front() {
            return Ok(element);
        }

        let monitor: Weak<dyn Wake> = Arc::downgrade(&self.monitor) as Weak<Monitor<E>>;
        let _parked = interrupt.park(monitor);
        loop {
            // Parked before this check, so a raise either is seen here or
            // wakes the wait below.
            if interrupt.take() {
                tracing::debug!("dequeue interrupted");
                return Err(QueueError::Interrupted);
            }
            tracing::trace!("dequeue waiting on empty queue");
            // Releases the lock while suspended, and holds it again on wake.
            self.monitor.available.wait(&mut items);
            tracing::trace!(len = items.len(), "dequeue woken");
            if let Some(element) = items.pop_front() {
                return Ok(element);
            }
        }
    }

    /// Return a clone of the head element without removing it, or `None` if
    /// the queue is empty.
    pub fn peek(&self) -> Option<E>
    where
        E: Clone,
    {
        self.monitor.items.lock().front().cloned()
    }

    /// Returns true if the queue held no elements at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.monitor.items.lock().is_empty()
    }

    /// The number of elements in the queue at the time of the call.
    pub fn len(&self) -> usize {
        self.monitor.items.lock().len()
    }

    /// Alias of [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.len()
    }
}

impl<E: fmt::Debug> fmt::Debug for BlockingQueue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.monitor.items.lock();
        f.debug_list().entries(items.iter()).finish()
    }
}

impl<E: fmt::Display> fmt::Display for BlockingQueue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.monitor.items.lock();
        write!(f, "[")?;
        for (idx, item) in items.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}
