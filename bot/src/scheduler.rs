use std::time::{Duration, Instant};

/// How the loop waits for timers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep the thread until a timer is due.
    RealTime,
    /// Jump a virtual clock forward instead of sleeping.
    Instant,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    due: Duration,
    task: T,
}

/// Single-threaded loop of fire-once timers.
#[derive(Debug)]
pub struct EventLoop<T> {
    pacing: Pacing,
    started: Instant,
    virtual_now: Duration,
    timers: Vec<Timer<T>>,
    next_id: u64,
    stopped: bool,
}

impl<T> EventLoop<T> {
    pub fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            started: Instant::now(),
            virtual_now: Duration::ZERO,
            timers: Vec::new(),
            next_id: 0,
            stopped: false,
        }
    }

    /// Time elapsed since the loop was created.
    pub fn now(&self) -> Duration {
        match self.pacing {
            Pacing::RealTime => self.started.elapsed(),
            Pacing::Instant => self.virtual_now,
        }
    }

    /// Schedules `task` to run once, `delay` from now.
    pub fn after(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now() + delay,
            task,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn stop(&mut self) {
        self.stopped = true;
        self.timers.clear();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Blocks the loop for `duration`; timers keep their due times.
    pub fn pause(&mut self, duration: Duration) {
        match self.pacing {
            Pacing::RealTime => std::thread::sleep(duration),
            Pacing::Instant => self.virtual_now += duration,
        }
    }

    /// Waits for the earliest timer and hands out its task. `None` once the
    /// loop is stopped or nothing is scheduled.
    pub fn next_task(&mut self) -> Option<T> {
        if self.stopped {
            return None;
        }
        // ties go to the timer scheduled first
        let index = self
            .timers
            .iter()
            .enumerate()
            .min_by_key(|(_, timer)| (timer.due, timer.id.0))
            .map(|(index, _)| index)?;
        let timer = self.timers.remove(index);

        let now = self.now();
        if timer.due > now {
            self.pause(timer.due - now);
        }
        Some(timer.task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_fire_in_due_order() {
        let mut events = EventLoop::new(Pacing::Instant);
        events.after(Duration::from_millis(30), "c");
        events.after(Duration::from_millis(10), "a");
        events.after(Duration::from_millis(10), "b");

        assert_eq!(events.next_task(), Some("a"));
        assert_eq!(events.next_task(), Some("b"));
        assert_eq!(events.now(), Duration::from_millis(10));
        assert_eq!(events.next_task(), Some("c"));
        assert_eq!(events.now(), Duration::from_millis(30));
        assert_eq!(events.next_task(), None);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut events = EventLoop::new(Pacing::Instant);
        let first = events.after(Duration::ZERO, 1);
        events.after(Duration::ZERO, 2);

        assert!(events.cancel(first));
        assert!(!events.cancel(first));
        assert_eq!(events.next_task(), Some(2));

        events.after(Duration::ZERO, 3);
        events.cancel_all();
        assert_eq!(events.next_task(), None);
    }

    #[test]
    fn stop_ends_the_loop() {
        let mut events = EventLoop::new(Pacing::Instant);
        events.after(Duration::from_secs(1), ());
        events.stop();

        assert!(events.is_stopped());
        assert_eq!(events.pending(), 0);
        assert_eq!(events.next_task(), None);
    }

    #[test]
    fn pause_advances_virtual_clock() {
        let mut events = EventLoop::new(Pacing::Instant);
        events.after(Duration::from_millis(100), ());
        events.pause(Duration::from_millis(250));

        assert_eq!(events.next_task(), Some(()));
        assert_eq!(events.now(), Duration::from_millis(250));
    }
}
