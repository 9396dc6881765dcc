/// A callback-free timer driven by the frame clock.
///
/// Callers check `poll(now)` once per tick and run the timer's action when it
/// returns true. Rearming replaces any previous schedule.
#[derive(Debug, Default, Clone)]
pub struct Timer {
    deadline: Option<f64>,
    interval: Option<f64>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_after(&mut self, now: f64, delay_secs: f64) {
        self.deadline = Some(now + delay_secs);
        self.interval = None;
    }

    pub fn tick_every(&mut self, now: f64, interval_secs: f64) {
        self.deadline = Some(now + interval_secs);
        self.interval = Some(interval_secs);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
        self.interval = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Fires at most once per call, even if several intervals elapsed.
    pub fn poll(&mut self, now: f64) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.deadline = self.interval.map(|interval| now + interval);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once_at_deadline() {
        let mut t = Timer::new();
        t.tick_after(1.0, 0.25);
        assert!(!t.poll(1.2));
        assert!(t.poll(1.25));
        assert!(!t.poll(2.0));
        assert!(!t.is_armed());
    }

    #[test]
    fn rearming_pushes_deadline_back() {
        let mut t = Timer::new();
        t.tick_after(0.0, 0.125);
        t.tick_after(0.1, 0.125);
        assert!(!t.poll(0.2));
        assert!(t.poll(0.225));
    }

    #[test]
    fn repeating_timer_rearms_until_stopped() {
        let mut t = Timer::new();
        t.tick_every(0.0, 0.25);
        assert!(t.poll(0.25));
        assert!(t.is_armed());
        assert!(!t.poll(0.4));
        assert!(t.poll(0.5));
        t.stop();
        assert!(!t.poll(10.0));
    }
}
