use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use crate::policy::LoadingPolicy;

const GATE_LOCK_POISONED: &str = "loading gate lock poisoned";

/// Identifies one load observed by a [`LoadingGate`].
///
/// Returned by [`LoadingGate::begin`] and consumed by
/// [`LoadingGate::finish`]. A token from a superseded load is stale and its
/// `finish` is ignored, so late settlements cannot hide the indicator of a
/// newer load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingToken {
    generation: u64,
}

/// Indicator visibility, evaluated lazily against the clock.
///
/// `shown_since` is the instant the indicator became visible; the minimum
/// visible duration counts from there, not from when the load finished.
#[derive(Debug, Clone, Copy)]
enum GateState {
    /// No load in flight, nothing visible.
    Idle,
    /// A load is running but the indicator is still inside its grace
    /// period.
    Waiting { load_started: Instant },
    /// A load is running and the indicator is visible.
    Showing { shown_since: Instant },
    /// The load finished but the indicator has not been visible for the
    /// minimum duration yet.
    Cooling { shown_since: Instant },
}

#[derive(Debug)]
struct GateInner {
    policy: LoadingPolicy,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    gate: GateState,
    generation: u64,
}

/// Tracks whether a busy indicator should be visible right now.
///
/// The gate solves the two classic indicator problems at once:
///
/// - **flicker in**: a load that finishes within `busy_delay` never shows
///   an indicator at all
/// - **flicker out**: once shown, the indicator stays visible for at least
///   `busy_min_duration`, even when the load finishes earlier
///
/// The gate needs no background task. Every call evaluates the pending
/// time-based transitions against the current [`tokio::time::Instant`], so
/// it behaves correctly under Tokio's paused test clock.
///
/// Clones share state, letting the loading side `begin`/`finish` while the
/// rendering side polls [`is_busy`](Self::is_busy).
#[derive(Debug, Clone)]
pub struct LoadingGate {
    inner: Arc<GateInner>,
}

impl LoadingGate {
    /// Creates a gate with the given timing policy.
    pub fn new(policy: LoadingPolicy) -> Self {
        Self {
            inner: Arc::new(GateInner {
                policy,
                state: Mutex::new(State {
                    gate: GateState::Idle,
                    generation: 0,
                }),
            }),
        }
    }

    /// The timing policy this gate applies.
    pub fn policy(&self) -> LoadingPolicy {
        self.inner.policy
    }

    /// Records that a load started and returns its token.
    ///
    /// Starting a new load supersedes the previous one: the older token
    /// goes stale. An indicator that is already visible stays visible
    /// seamlessly; an indicator still in its grace period has the grace
    /// restarted for the new load.
    pub fn begin(&self) -> LoadingToken {
        let now = Instant::now();
        let mut state = self.inner.state.lock().expect(GATE_LOCK_POISONED);
        self.normalize(&mut state, now);
        state.gate = match state.gate {
            GateState::Idle | GateState::Waiting { .. } => GateState::Waiting { load_started: now },
            GateState::Showing { shown_since } | GateState::Cooling { shown_since } => {
                GateState::Showing { shown_since }
            }
        };
        state.generation += 1;
        LoadingToken {
            generation: state.generation,
        }
    }

    /// Records that the load identified by `token` settled.
    ///
    /// Ignored when `token` is stale. Finishing inside the grace period
    /// hides the gate immediately; finishing while the indicator is
    /// visible starts the minimum-duration cooldown.
    pub fn finish(&self, token: LoadingToken) {
        let now = Instant::now();
        let mut state = self.inner.state.lock().expect(GATE_LOCK_POISONED);
        self.normalize(&mut state, now);
        if token.generation != state.generation {
            return;
        }
        state.gate = match state.gate {
            GateState::Idle => GateState::Idle,
            GateState::Waiting { .. } => GateState::Idle,
            GateState::Showing { shown_since } | GateState::Cooling { shown_since } => {
                GateState::Cooling { shown_since }
            }
        };
        // A cooldown that is already over collapses to idle on the next
        // observation.
        self.normalize(&mut state, now);
    }

    /// Whether a busy indicator should be visible at this instant.
    pub fn is_busy(&self) -> bool {
        let now = Instant::now();
        let mut state = self.inner.state.lock().expect(GATE_LOCK_POISONED);
        self.normalize(&mut state, now);
        matches!(
            state.gate,
            GateState::Showing { .. } | GateState::Cooling { .. }
        )
    }

    /// Applies the time-based transitions that are due at `now`.
    fn normalize(&self, state: &mut State, now: Instant) {
        if let GateState::Waiting { load_started } = state.gate
            && now >= load_started + self.inner.policy.busy_delay
        {
            state.gate = GateState::Showing {
                shown_since: load_started + self.inner.policy.busy_delay,
            };
        }
        if let GateState::Cooling { shown_since } = state.gate
            && now >= shown_since + self.inner.policy.busy_min_duration
        {
            state.gate = GateState::Idle;
        }
    }
}

impl Default for LoadingGate {
    fn default() -> Self {
        Self::new(LoadingPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_idle_gate_is_not_busy() {
        let gate = LoadingGate::default();
        assert!(!gate.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_load_never_shows() {
        let gate = LoadingGate::default();
        let token = gate.begin();
        assert!(!gate.is_busy());
        advance(Duration::from_millis(100)).await;
        gate.finish(token);
        assert!(!gate.is_busy());
        advance(Duration::from_secs(5)).await;
        assert!(!gate.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_indicator_appears_after_grace_period() {
        let gate = LoadingGate::default();
        let _token = gate.begin();
        advance(Duration::from_millis(299)).await;
        assert!(!gate.is_busy());
        advance(Duration::from_millis(2)).await;
        assert!(gate.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_indicator_stays_for_minimum_duration() {
        let gate = LoadingGate::default();
        let token = gate.begin();
        advance(Duration::from_millis(400)).await;
        assert!(gate.is_busy());
        gate.finish(token);
        // Shown at 300ms, so it stays up until 1000ms.
        assert!(gate.is_busy());
        advance(Duration::from_millis(500)).await;
        assert!(gate.is_busy());
        advance(Duration::from_millis(150)).await;
        assert!(!gate.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_finish_is_ignored() {
        let gate = LoadingGate::default();
        let first = gate.begin();
        advance(Duration::from_millis(350)).await;
        assert!(gate.is_busy());
        let _second = gate.begin();
        gate.finish(first);
        assert!(gate.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_begin_during_cooldown_keeps_showing() {
        let gate = LoadingGate::default();
        let token = gate.begin();
        advance(Duration::from_millis(350)).await;
        gate.finish(token);
        let second = gate.begin();
        assert!(gate.is_busy());
        advance(Duration::from_millis(700)).await;
        // The second load is still running; visibility carries over.
        assert!(gate.is_busy());
        gate.finish(second);
        // Visible since 300ms, far past the minimum by now.
        assert!(!gate.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_load_restarts_grace_period() {
        let gate = LoadingGate::default();
        let _first = gate.begin();
        advance(Duration::from_millis(200)).await;
        let _second = gate.begin();
        advance(Duration::from_millis(200)).await;
        // 400ms after the first begin, 200ms after the second: the second
        // load's grace period governs.
        assert!(!gate.is_busy());
        advance(Duration::from_millis(150)).await;
        assert!(gate.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_policy_timing() {
        let gate = LoadingGate::new(LoadingPolicy {
            busy_delay: Duration::from_millis(10),
            busy_min_duration: Duration::from_millis(50),
        });
        let token = gate.begin();
        advance(Duration::from_millis(20)).await;
        assert!(gate.is_busy());
        gate.finish(token);
        advance(Duration::from_millis(20)).await;
        assert!(gate.is_busy());
        advance(Duration::from_millis(30)).await;
        assert!(!gate.is_busy());
    }
}
