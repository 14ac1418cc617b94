use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::event::Event;

pub struct IntervalTimer {
    interval: Duration,
    last_tick: Instant,
    thread_name: String,
}

impl IntervalTimer {
    pub fn new(interval: Duration) -> IntervalTimer {
        let cur_thread = thread::current();
        let thread_name = if let Some(name) = cur_thread.name() {
            name
        } else {
            "unnamed"
        };

        IntervalTimer {
            interval,
            last_tick: Instant::now(),
            thread_name: thread_name.to_string(),
        }
    }

    pub fn sleep_until_next_tick(&mut self) {
        let now = Instant::now();
        let next_tick = if self.last_tick + self.interval > now {
            self.last_tick + self.interval
        } else {
            log::debug!("{} skipped a tick", self.thread_name);
            now + self.interval
        };

        thread::sleep(next_tick.saturating_duration_since(Instant::now()));
        self.last_tick = next_tick
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(id: u64) -> TimerId {
        TimerId(id)
    }
}

/// Periodic callback registrations. Every registration delivers
/// `Event::Tick` with its id until cancelled.
pub trait Scheduler {
    fn schedule(&mut self, period: Duration) -> Result<TimerId>;
    fn cancel(&mut self, id: TimerId);
}

pub struct ThreadScheduler {
    events: Sender<Event>,
    next_id: u64,
    running: HashMap<TimerId, Arc<AtomicBool>>,
}

impl ThreadScheduler {
    pub fn new(events: Sender<Event>) -> ThreadScheduler {
        ThreadScheduler {
            events,
            next_id: 0,
            running: HashMap::new(),
        }
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&mut self, period: Duration) -> Result<TimerId> {
        let id = TimerId::new(self.next_id);
        self.next_id += 1;

        let cancelled = Arc::new(AtomicBool::new(false));
        let thread_cancelled = Arc::clone(&cancelled);
        let events = self.events.clone();

        thread::Builder::new()
            .name(format!("Sequencer {}", id.0))
            .spawn(move || {
                let mut timer = IntervalTimer::new(period);
                loop {
                    timer.sleep_until_next_tick();
                    if thread_cancelled.load(Ordering::Acquire) {
                        break;
                    }
                    if events.send(Event::Tick(id)).is_err() {
                        break;
                    }
                }
            })
            .map_err(Error::Spawn)?;

        log::debug!("Scheduled sequencer {} every {:?}", id.0, period);
        self.running.insert(id, cancelled);
        Ok(id)
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(cancelled) = self.running.remove(&id) {
            cancelled.store(true, Ordering::Release);
            log::debug!("Cancelled sequencer {}", id.0);
        }
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        for cancelled in self.running.values() {
            cancelled.store(true, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn delivers_ticks_with_its_id() {
        let (tx, rx) = mpsc::channel();
        let mut scheduler = ThreadScheduler::new(tx);
        let id = scheduler.schedule(Duration::from_millis(5)).unwrap();

        for _ in 0..3 {
            let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(event, Event::Tick(id));
        }

        scheduler.cancel(id);
    }

    #[test]
    fn cancelled_registration_goes_quiet() {
        let (tx, rx) = mpsc::channel();
        let mut scheduler = ThreadScheduler::new(tx);
        let id = scheduler.schedule(Duration::from_millis(5)).unwrap();
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        scheduler.cancel(id);
        // A tick may already be in flight when cancelling.
        thread::sleep(Duration::from_millis(50));
        while rx.try_recv().is_ok() {}

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn ids_are_unique() {
        let (tx, _rx) = mpsc::channel();
        let mut scheduler = ThreadScheduler::new(tx);
        let a = scheduler.schedule(Duration::from_millis(50)).unwrap();
        let b = scheduler.schedule(Duration::from_millis(50)).unwrap();
        assert_ne!(a, b);
    }
}
