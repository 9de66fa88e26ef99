//! Trailing-edge debounce
//!
//! Re-rendering on every keystroke is wasteful; edits are coalesced until
//! the user pauses for `delay_ms`.

/// Deferred execution (`setTimeout` in the browser)
pub trait Timer {
    type Handle;

    /// Run `task` after `delay_ms`; `None` if it could not be scheduled
    fn schedule(&mut self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Option<Self::Handle>;

    /// Cancel a scheduled task and release it; a task that already ran is
    /// ignored
    fn cancel(&mut self, handle: Self::Handle);
}

pub struct Debounce<T: Timer> {
    timer: T,
    delay_ms: u32,
    pending: Option<T::Handle>,
}

impl<T: Timer> Debounce<T> {
    pub fn new(timer: T, delay_ms: u32) -> Self {
        Self {
            timer,
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Schedule `task`, dropping any task still waiting
    pub fn trigger(&mut self, task: impl FnOnce() + 'static) {
        if let Some(handle) = self.pending.take() {
            self.timer.cancel(handle);
        }
        self.pending = self.timer.schedule(self.delay_ms, Box::new(task));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct ManualTimer {
        next: u32,
        queued: Vec<(u32, u32, Box<dyn FnOnce()>)>,
    }

    impl ManualTimer {
        fn fire_all(&mut self) {
            for (_, _, task) in self.queued.drain(..) {
                task();
            }
        }
    }

    impl Timer for ManualTimer {
        type Handle = u32;

        fn schedule(&mut self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Option<u32> {
            self.next += 1;
            self.queued.push((self.next, delay_ms, task));
            Some(self.next)
        }

        fn cancel(&mut self, handle: u32) {
            self.queued.retain(|(id, _, _)| *id != handle);
        }
    }

    #[test]
    fn test_only_last_trigger_runs() {
        let ran = Rc::new(RefCell::new(Vec::new()));
        let mut debounce = Debounce::new(ManualTimer::default(), 300);

        for edit in ["X:1", "X:1\nK", "X:1\nK:C"] {
            let ran = Rc::clone(&ran);
            debounce.trigger(move || ran.borrow_mut().push(edit));
        }

        assert_eq!(debounce.timer().queued.len(), 1);
        assert_eq!(debounce.timer().queued[0].1, 300);

        debounce.timer.fire_all();
        assert_eq!(*ran.borrow(), vec!["X:1\nK:C"]);
    }

    #[test]
    fn test_trigger_after_fire_schedules_again() {
        let count = Rc::new(RefCell::new(0));
        let mut debounce = Debounce::new(ManualTimer::default(), 50);

        let c = Rc::clone(&count);
        debounce.trigger(move || *c.borrow_mut() += 1);
        debounce.timer.fire_all();

        let c = Rc::clone(&count);
        debounce.trigger(move || *c.borrow_mut() += 1);
        debounce.timer.fire_all();

        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_superseded_tasks_are_released() {
        let score = Rc::new(String::from("X:1\nK:C"));
        let mut debounce = Debounce::new(ManualTimer::default(), 300);

        for _ in 0..5 {
            let score = Rc::clone(&score);
            debounce.trigger(move || drop(score));
        }

        // Only the pending task still holds a reference
        assert_eq!(Rc::strong_count(&score), 2);

        debounce.timer.fire_all();
        assert_eq!(Rc::strong_count(&score), 1);
    }
}
