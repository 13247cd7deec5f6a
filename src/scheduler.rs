//! Deferred work for the session
//!
//! The assistant panel is the only part of the session that suspends: a
//! reply is scheduled after a delay and may be withdrawn before it lands.
//! Scheduling is a capability handed to the conversation store so that the
//! same store runs against real tokio timers or against virtual time that
//! tests advance by hand.
//!
//! A scheduler never runs store code itself. It only reports which timers
//! are due; the session applies them on its own event loop.

use crate::message::{InternalMessage, Message};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

/// Identifier of one scheduled timer, unique per scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Handle returned when a timer is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    /// Timer this handle refers to
    pub id: TimerId,

    /// When the timer is expected to fire
    pub fire_at: DateTime<Utc>,
}

/// Schedule-after and cancel, plus the clock the schedule is measured on
pub trait Scheduler: Send {
    /// Arrange for a timer to come due after `delay`
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Withdraw a timer; unknown or already fired timers are ignored
    fn cancel(&mut self, id: TimerId);

    /// Current time on this scheduler's clock
    fn now(&self) -> DateTime<Utc>;
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        (**self).schedule(delay)
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id)
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[derive(Debug)]
struct VirtualQueue {
    epoch: DateTime<Utc>,
    elapsed: Duration,
    next_id: u64,
    /// Ordered by deadline, then by scheduling order
    queue: BTreeMap<(Duration, TimerId), ()>,
    deadlines: HashMap<TimerId, Duration>,
}

/// Deterministic scheduler driven by explicit time advancement
///
/// Clones share one queue, so a test can keep a clone and advance the clock
/// while the session owns another.
#[derive(Debug, Clone)]
pub struct VirtualScheduler {
    inner: Arc<Mutex<VirtualQueue>>,
}

impl VirtualScheduler {
    /// Create a virtual clock starting at `epoch`
    pub fn new(epoch: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VirtualQueue {
                epoch,
                elapsed: Duration::ZERO,
                next_id: 0,
                queue: BTreeMap::new(),
                deadlines: HashMap::new(),
            })),
        }
    }

    /// Move the clock forward and return every timer that came due, in
    /// deadline order
    pub fn advance(&self, by: Duration) -> Vec<TimerId> {
        let mut state = lock_unpoisoned(&self.inner);
        state.elapsed += by;
        let now = state.elapsed;

        let mut due = Vec::new();
        loop {
            let Some((deadline, id)) = state.queue.keys().next().copied() else {
                break;
            };
            if deadline > now {
                break;
            }
            state.queue.remove(&(deadline, id));
            state.deadlines.remove(&id);
            due.push(id);
        }
        due
    }

    /// Time until the earliest pending timer, if any
    pub fn next_deadline(&self) -> Option<Duration> {
        let state = lock_unpoisoned(&self.inner);
        state
            .queue
            .keys()
            .next()
            .map(|(deadline, _)| deadline.saturating_sub(state.elapsed))
    }

    /// Number of timers not yet fired or cancelled
    pub fn pending(&self) -> usize {
        lock_unpoisoned(&self.inner).queue.len()
    }
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::default())
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        let mut state = lock_unpoisoned(&self.inner);
        let id = TimerId(state.next_id);
        state.next_id += 1;

        let deadline = state.elapsed + delay;
        state.queue.insert((deadline, id), ());
        state.deadlines.insert(id, deadline);

        TimerHandle {
            id,
            fire_at: offset(state.epoch, deadline),
        }
    }

    fn cancel(&mut self, id: TimerId) {
        let mut state = lock_unpoisoned(&self.inner);
        if let Some(deadline) = state.deadlines.remove(&id) {
            state.queue.remove(&(deadline, id));
        }
    }

    fn now(&self) -> DateTime<Utc> {
        let state = lock_unpoisoned(&self.inner);
        offset(state.epoch, state.elapsed)
    }
}

/// Scheduler backed by tokio timers
///
/// Each timer is a task that sleeps and then posts
/// `InternalMessage::ReplyDue` to the session's event channel. Cancelling
/// aborts the task; the session additionally ignores deliveries for timers it
/// no longer tracks, which covers a task that fired just before the abort.
#[derive(Debug)]
pub struct TokioScheduler {
    runtime: Handle,
    events: UnboundedSender<Message>,
    next_id: u64,
    tasks: HashMap<TimerId, AbortHandle>,
}

impl TokioScheduler {
    /// Create a scheduler that spawns on `runtime` and reports to `events`
    pub fn new(runtime: Handle, events: UnboundedSender<Message>) -> Self {
        Self {
            runtime,
            events,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        let id = TimerId(self.next_id);
        self.next_id += 1;

        let events = self.events.clone();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if events
                .send(Message::Internal(InternalMessage::ReplyDue(id)))
                .is_err()
            {
                log::debug!("Session gone before {} fired", id);
            }
        });
        self.tasks.insert(id, task.abort_handle());

        TimerHandle {
            id,
            fire_at: self.now() + chrono_duration(delay),
        }
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
        }
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

fn offset(epoch: DateTime<Utc>, elapsed: Duration) -> DateTime<Utc> {
    epoch + chrono_duration(elapsed)
}

fn chrono_duration(d: Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or_else(|_| chrono::Duration::zero())
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_fires_in_deadline_order() {
        let mut scheduler = VirtualScheduler::default();
        let slow = scheduler.schedule(Duration::from_millis(3000));
        let fast = scheduler.schedule(Duration::from_millis(1000));

        assert!(scheduler.advance(Duration::from_millis(999)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![fast.id]);
        assert_eq!(scheduler.advance(Duration::from_secs(5)), vec![slow.id]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_virtual_ties_keep_scheduling_order() {
        let mut scheduler = VirtualScheduler::default();
        let a = scheduler.schedule(Duration::from_secs(1));
        let b = scheduler.schedule(Duration::from_secs(1));

        assert_eq!(scheduler.advance(Duration::from_secs(1)), vec![a.id, b.id]);
    }

    #[test]
    fn test_virtual_cancel_never_fires() {
        let mut scheduler = VirtualScheduler::default();
        let handle = scheduler.schedule(Duration::from_secs(1));
        scheduler.cancel(handle.id);

        assert_eq!(scheduler.pending(), 0);
        assert!(scheduler.advance(Duration::from_secs(10)).is_empty());

        // Cancelling twice is harmless
        scheduler.cancel(handle.id);
    }

    #[test]
    fn test_virtual_clock_and_fire_time() {
        let epoch = DateTime::<Utc>::default();
        let mut scheduler = VirtualScheduler::new(epoch);
        scheduler.advance(Duration::from_secs(2));

        let handle = scheduler.schedule(Duration::from_secs(3));
        assert_eq!(handle.fire_at, epoch + chrono::Duration::seconds(5));
        assert_eq!(scheduler.now(), epoch + chrono::Duration::seconds(2));
        assert_eq!(scheduler.next_deadline(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_clones_share_queue() {
        let observer = VirtualScheduler::default();
        let mut owner = observer.clone();
        let handle = owner.schedule(Duration::from_millis(10));

        assert_eq!(observer.pending(), 1);
        assert_eq!(observer.advance(Duration::from_millis(10)), vec![handle.id]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_delivers_and_cancels() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(Handle::current(), tx);

        let kept = scheduler.schedule(Duration::from_millis(500));
        let dropped = scheduler.schedule(Duration::from_millis(100));
        scheduler.cancel(dropped.id);

        tokio::time::sleep(Duration::from_millis(600)).await;

        match rx.try_recv() {
            Ok(Message::Internal(InternalMessage::ReplyDue(id))) => assert_eq!(id, kept.id),
            other => panic!("unexpected delivery: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}
