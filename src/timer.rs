use std::time::{Duration, Instant};

/// How long the play/pause glyph stays on screen after a toggle.
pub const TOGGLE_PULSE: Duration = Duration::from_millis(800);

/// Estimates a playback position between sparse reports from a remote player.
///
/// The anchor is the last observed position; while playing, elapsed monotonic
/// time since the anchor instant is added on top.
#[derive(Debug, PartialEq, Default)]
pub struct PlaybackTimer {
    /// Anchor position in seconds (finite, >= 0).
    anchor_position: f64,
    /// Monotonic instant corresponding to `anchor_position`, set only while playing.
    anchor_instant: Option<Instant>,
}

impl PlaybackTimer {
    /// Record an observed position. The running anchor is refreshed only if
    /// the timer was already running, so a paused timer stays paused.
    pub fn set_position(&mut self, position: f64, now: Instant) {
        self.anchor_position = sanitize_position(position);
        if self.anchor_instant.is_some() {
            self.anchor_instant = Some(now);
        }
    }

    pub fn mark_playing(&mut self, now: Instant) {
        if self.anchor_instant.is_none() {
            self.anchor_instant = Some(now);
        }
    }

    pub fn mark_paused(&mut self, now: Instant) {
        // Fold the elapsed time into the anchor so a later resume continues
        // from where playback actually stopped.
        self.anchor_position = self.estimate(now);
        self.anchor_instant = None;
    }

    pub fn estimate(&self, now: Instant) -> f64 {
        let base = self.anchor_position;
        match self.anchor_instant {
            Some(inst) => {
                let val = base + now.saturating_duration_since(inst).as_secs_f64();
                if val.is_finite() { val } else { base }
            }
            None => base,
        }
    }
}

/// Single-shot deadline for a transient indicator.
///
/// Restarting replaces the pending deadline instead of queuing a second one,
/// so at most one hide is ever scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct PulseTimer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Default for PulseTimer {
    fn default() -> Self {
        Self::new(TOGGLE_PULSE)
    }
}

impl PulseTimer {
    pub fn new(window: Duration) -> Self {
        Self { window, deadline: None }
    }

    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now < d)
    }

    /// Clear the deadline if it has passed. Returns true when the pulse
    /// was hidden by this call.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

pub fn sanitize_position(p: f64) -> f64 {
    if !p.is_finite() || p < 0.0 { 0.0 } else { p }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_timer_only_advances_while_playing() {
        let t0 = Instant::now();
        let mut timer = PlaybackTimer::default();
        timer.set_position(10.0, t0);
        assert_eq!(timer.estimate(t0 + Duration::from_secs(3)), 10.0);

        timer.mark_playing(t0);
        assert_eq!(timer.estimate(t0 + Duration::from_secs(3)), 13.0);

        timer.mark_paused(t0 + Duration::from_secs(4));
        assert_eq!(timer.estimate(t0 + Duration::from_secs(60)), 14.0);
    }

    #[test]
    fn playback_timer_reanchors_on_report() {
        let t0 = Instant::now();
        let mut timer = PlaybackTimer::default();
        timer.mark_playing(t0);
        timer.set_position(30.0, t0 + Duration::from_secs(5));
        assert_eq!(timer.estimate(t0 + Duration::from_secs(6)), 31.0);
    }

    #[test]
    fn playback_timer_sanitizes_reports() {
        let t0 = Instant::now();
        let mut timer = PlaybackTimer::default();
        timer.set_position(f64::NAN, t0);
        assert_eq!(timer.estimate(t0), 0.0);
        timer.set_position(-3.0, t0);
        assert_eq!(timer.estimate(t0), 0.0);
    }

    #[test]
    fn pulse_restart_replaces_deadline() {
        let t0 = Instant::now();
        let mut pulse = PulseTimer::default();
        pulse.restart(t0);
        pulse.restart(t0 + Duration::from_millis(300));

        assert_eq!(pulse.deadline(), Some(t0 + Duration::from_millis(1100)));
        assert!(!pulse.expire(t0 + Duration::from_millis(800)));
        assert!(pulse.is_active(t0 + Duration::from_millis(800)));
        assert!(pulse.expire(t0 + Duration::from_millis(1100)));
        assert!(!pulse.is_active(t0 + Duration::from_millis(1100)));
        assert_eq!(pulse.deadline(), None);
    }

    #[test]
    fn pulse_cancel_clears_pending_hide() {
        let t0 = Instant::now();
        let mut pulse = PulseTimer::default();
        pulse.restart(t0);
        pulse.cancel();
        assert!(!pulse.is_active(t0));
        assert!(!pulse.expire(t0 + TOGGLE_PULSE));
    }
}
