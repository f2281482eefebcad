use chrono::{DateTime, Local};

/// Source of the current wall-clock time
///
/// Injected into the tracker so tests can drive simulated time instead of
/// reading the system clock.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

/// System clock used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Manually-advanced clock for tests
#[cfg(test)]
pub struct ManualClock {
    now: std::cell::Cell<DateTime<Local>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn starting_at(now: DateTime<Local>) -> Self {
        Self {
            now: std::cell::Cell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        self.now.set(now);
    }

    pub fn advance(&self, duration: chrono::Duration) {
        self.now.set(self.now.get() + duration);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}
