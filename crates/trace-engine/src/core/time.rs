/// Opaque handle for one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u32);

/// The host's "call me back after a delay" primitive.
///
/// The scheduler only hands out handles; the host is responsible for routing
/// a fired handle back into `Sequencer::on_timer`.
pub trait Scheduler {
    /// Schedule a callback `delay_ms` from now.
    fn after(&mut self, delay_ms: u32) -> TimerHandle;

    /// Cancel a scheduled callback. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    deadline: u64,
}

/// Deterministic virtual-clock scheduler.
///
/// Time only moves when the host says so, one frame delta at a time, which
/// makes playback reproducible in tests and lets a render loop drive it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    /// Fractional milliseconds carried over between frames.
    remainder: f32,
    /// In scheduling order; ties on deadline fire in this order.
    pending: Vec<PendingTimer>,
    next_id: u32,
    scheduled: usize,
    /// Only filled when built with [`ManualScheduler::recording`].
    delays: Option<Vec<u32>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scheduler that also keeps the delay of every `after` call.
    pub fn recording() -> Self {
        Self {
            delays: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Add a (possibly fractional) frame delta. Returns the time the clock
    /// should reach this frame.
    pub fn accumulate(&mut self, frame_ms: f32) -> u64 {
        self.remainder += frame_ms.max(0.0);
        let whole = self.remainder.floor();
        self.remainder -= whole;
        self.now_ms + whole as u64
    }

    /// Remove and return the earliest callback due at or before `until`,
    /// moving the clock to its deadline.
    pub fn pop_due(&mut self, until: u64) -> Option<TimerHandle> {
        let (idx, timer) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(i, t)| (t.deadline, *i))
            .map(|(i, t)| (i, *t))?;
        self.pending.remove(idx);
        self.now_ms = self.now_ms.max(timer.deadline);
        Some(timer.handle)
    }

    /// Move the clock forward (never backward).
    pub fn advance_to(&mut self, t: u64) {
        self.now_ms = self.now_ms.max(t);
    }

    /// Deadline of the next callback, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|t| t.deadline).min()
    }

    /// Number of callbacks waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total callbacks ever scheduled, including cancelled ones.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    /// Delay requested by every `after` call, in call order. Empty unless
    /// the scheduler is recording.
    pub fn scheduled_delays(&self) -> &[u32] {
        self.delays.as_deref().unwrap_or(&[])
    }
}

impl Scheduler for ManualScheduler {
    fn after(&mut self, delay_ms: u32) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(PendingTimer {
            handle,
            deadline: self.now_ms + delay_ms as u64,
        });
        self.scheduled += 1;
        if let Some(delays) = &mut self.delays {
            delays.push(delay_ms);
        }
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|t| t.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut s = ManualScheduler::new();
        let late = s.after(200);
        let early = s.after(50);
        assert_eq!(s.next_deadline(), Some(50));

        assert_eq!(s.pop_due(100), Some(early));
        assert_eq!(s.now_ms(), 50);
        assert_eq!(s.pop_due(100), None);
        assert_eq!(s.pop_due(200), Some(late));
        assert!(s.is_idle());
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut s = ManualScheduler::new();
        let a = s.after(0);
        let b = s.after(0);
        assert_eq!(s.pop_due(0), Some(a));
        assert_eq!(s.pop_due(0), Some(b));
    }

    #[test]
    fn cancelled_never_fires() {
        let mut s = ManualScheduler::new();
        let h = s.after(10);
        s.cancel(h);
        s.cancel(h); // second cancel is harmless
        assert_eq!(s.pop_due(1_000), None);
        assert_eq!(s.scheduled_count(), 1);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn delays_are_relative_to_virtual_now() {
        let mut s = ManualScheduler::recording();
        s.advance_to(500);
        s.after(90);
        assert_eq!(s.next_deadline(), Some(590));
        assert_eq!(s.scheduled_delays(), &[90]);
    }

    #[test]
    fn default_scheduler_only_counts() {
        let mut s = ManualScheduler::new();
        for _ in 0..1_000 {
            let h = s.after(90);
            s.cancel(h);
        }
        assert_eq!(s.scheduled_count(), 1_000);
        assert!(s.scheduled_delays().is_empty());
    }

    #[test]
    fn accumulates_partial_frames() {
        let mut s = ManualScheduler::new();
        assert_eq!(s.accumulate(0.6), 0);
        assert_eq!(s.accumulate(0.6), 1);
        s.advance_to(1);
        assert_eq!(s.accumulate(16.5), 17);
    }

    #[test]
    fn clock_never_moves_backward() {
        let mut s = ManualScheduler::new();
        s.advance_to(100);
        s.advance_to(40);
        assert_eq!(s.now_ms(), 100);
    }
}
