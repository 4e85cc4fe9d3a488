//! Drift-corrected session timer.
//!
//! # States
//! - Stopped: initial state, and after stop or timeout
//! - Running: anchored at the instant `start` was called
//!
//! # State Transitions
//! ```text
//! Stopped → Running: start() (on_start fires with the anchor)
//! Running → Running: tick, elapsed >= warning target (on_warning, once per run)
//! Running → Stopped: tick, elapsed >= timeout (on_timeout)
//! Running → Stopped: stop()
//! any     → Running: reset() (re-anchored, warning re-armed)
//! ```
//!
//! # Design Decisions
//! - Elapsed time is always `now - anchor`; ticks are only a cadence, never counted
//! - Warning and timeout share the anchor, so a stalled scheduler cannot reorder them
//! - Misuse (double start, double stop) is logged, never returned as an error
//! - Callbacks run outside the state lock and may call back into the timer

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::schema::MAX_TIMEOUT_MINUTES;
use crate::config::TimerSettings;
use crate::observability::metrics;

type StartCallback = Box<dyn Fn(Instant) + Send + Sync>;
type ThresholdCallback = Box<dyn Fn(Duration) + Send + Sync>;
type TickCallback = Box<dyn Fn(TickSnapshot) + Send + Sync>;

/// What the tick observer sees on every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSnapshot {
    pub elapsed: Duration,
    pub timeout_target: Duration,
    pub warning_target: Duration,
}

struct ActiveRun {
    anchor: Instant,
    warning_fired: bool,
    generation: u64,
    ticker: JoinHandle<()>,
}

enum Decision {
    Continue,
    Warn,
    Expire,
}

struct Shared {
    timeout: Duration,
    warning_target: Duration,
    tick: Duration,
    on_start: StartCallback,
    on_warning: ThresholdCallback,
    on_timeout: ThresholdCallback,
    on_tick: Option<TickCallback>,
    run: Mutex<Option<ActiveRun>>,
    generations: AtomicU64,
}

impl Shared {
    fn lock_run(&self) -> MutexGuard<'_, Option<ActiveRun>> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One periodic check. Returns false when the ticker should exit.
    fn check(&self, generation: u64) -> bool {
        let (elapsed, decision) = {
            let mut run = self.lock_run();
            let outcome = match run.as_mut() {
                Some(active) if active.generation == generation => {
                    let elapsed = active.anchor.elapsed();
                    if elapsed >= self.timeout {
                        (elapsed, Decision::Expire)
                    } else if elapsed >= self.warning_target && !active.warning_fired {
                        active.warning_fired = true;
                        (elapsed, Decision::Warn)
                    } else {
                        (elapsed, Decision::Continue)
                    }
                }
                _ => return false,
            };
            if matches!(outcome.1, Decision::Expire) {
                // Dropping our own handle only detaches the task.
                run.take();
            }
            outcome
        };

        if let Some(on_tick) = &self.on_tick {
            on_tick(TickSnapshot {
                elapsed,
                timeout_target: self.timeout,
                warning_target: self.warning_target,
            });
        }

        match decision {
            Decision::Continue => true,
            Decision::Warn => {
                metrics::record_timer_event("warning");
                tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "Session timer warning reached");
                (self.on_warning)(self.warning_target);
                true
            }
            Decision::Expire => {
                metrics::record_timer_event("timeout");
                tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "Session timer expired");
                (self.on_timeout)(self.timeout);
                false
            }
        }
    }
}

async fn tick_loop(shared: Weak<Shared>, anchor: Instant, period: Duration, generation: u64) {
    let Some(first) = anchor.checked_add(period) else {
        tracing::error!(period_ms = period.as_millis() as u64, "Tick period overflows the clock");
        return;
    };
    let mut ticker = time::interval_at(first, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let Some(shared) = shared.upgrade() else {
            return;
        };
        if !shared.check(generation) {
            return;
        }
    }
}

/// Countdown that warns shortly before expiry and then times out.
///
/// `start` and `reset` spawn a ticker task and must be called from within a
/// Tokio runtime.
pub struct SessionTimer {
    shared: Arc<Shared>,
}

impl SessionTimer {
    pub fn builder() -> SessionTimerBuilder {
        SessionTimerBuilder::default()
    }

    /// Builder preloaded with configured durations.
    pub fn from_settings(settings: &TimerSettings) -> SessionTimerBuilder {
        SessionTimerBuilder::default().settings(settings)
    }

    /// Start the countdown. Logs and does nothing if already running.
    pub fn start(&self) {
        let anchor = {
            let mut run = self.shared.lock_run();
            if run.is_some() {
                tracing::error!("Timer is already running");
                return;
            }

            let anchor = Instant::now();
            let generation = self.shared.generations.fetch_add(1, Ordering::SeqCst) + 1;
            let ticker = tokio::spawn(tick_loop(
                Arc::downgrade(&self.shared),
                anchor,
                self.shared.tick,
                generation,
            ));
            *run = Some(ActiveRun {
                anchor,
                warning_fired: false,
                generation,
                ticker,
            });
            anchor
        };

        metrics::record_timer_event("start");
        tracing::debug!(
            timeout_ms = self.shared.timeout.as_millis() as u64,
            warning_ms = self.shared.warning_target.as_millis() as u64,
            "Session timer started"
        );
        (self.shared.on_start)(anchor);
    }

    /// Stop the countdown silently. Logs and does nothing if not running.
    pub fn stop(&self) {
        match self.shared.lock_run().take() {
            Some(run) => {
                run.ticker.abort();
                metrics::record_timer_event("stop");
                tracing::debug!("Session timer stopped");
            }
            None => tracing::error!("Timer is already stopped"),
        }
    }

    /// Clear any run and start again from now.
    pub fn reset(&self) {
        if let Some(run) = self.shared.lock_run().take() {
            run.ticker.abort();
        }
        self.start();
    }

    /// Time since the anchor; zero when not running.
    pub fn elapsed(&self) -> Duration {
        self.shared
            .lock_run()
            .as_ref()
            .map(|run| run.anchor.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock_run().is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.shared.timeout
    }

    /// Elapsed time at which the warning fires.
    pub fn warning_target(&self) -> Duration {
        self.shared.warning_target
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        if let Some(run) = self.shared.lock_run().take() {
            run.ticker.abort();
        }
    }
}

/// Builder for [`SessionTimer`]. Defaults: 240 minutes, warning 30 seconds
/// before expiry, one check per second, no-op callbacks.
pub struct SessionTimerBuilder {
    timeout: Duration,
    warning_lead: Duration,
    tick: Duration,
    on_start: StartCallback,
    on_warning: ThresholdCallback,
    on_timeout: ThresholdCallback,
    on_tick: Option<TickCallback>,
}

impl Default for SessionTimerBuilder {
    fn default() -> Self {
        let settings = TimerSettings::default();
        Self {
            timeout: settings.timeout(),
            warning_lead: settings.warning_lead(),
            tick: settings.tick_interval(),
            on_start: Box::new(|_| {}),
            on_warning: Box::new(|_| {}),
            on_timeout: Box::new(|_| {}),
            on_tick: None,
        }
    }
}

impl SessionTimerBuilder {
    pub fn settings(mut self, settings: &TimerSettings) -> Self {
        self.timeout = settings.timeout();
        self.warning_lead = settings.warning_lead();
        self.tick = settings.tick_interval();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// How long before the timeout the warning fires.
    pub fn warning_lead(mut self, lead: Duration) -> Self {
        self.warning_lead = lead;
        self
    }

    pub fn tick_interval(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn on_start(mut self, f: impl Fn(Instant) + Send + Sync + 'static) -> Self {
        self.on_start = Box::new(f);
        self
    }

    pub fn on_warning(mut self, f: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.on_warning = Box::new(f);
        self
    }

    pub fn on_timeout(mut self, f: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.on_timeout = Box::new(f);
        self
    }

    pub fn on_tick(mut self, f: impl Fn(TickSnapshot) + Send + Sync + 'static) -> Self {
        self.on_tick = Some(Box::new(f));
        self
    }

    /// The timeout is capped at one leap year and the check cadence is kept
    /// between 1 ms and the timeout.
    pub fn build(self) -> SessionTimer {
        let max_timeout = Duration::from_secs((MAX_TIMEOUT_MINUTES * 60.0) as u64);
        let timeout = self.timeout.min(max_timeout);
        let min_tick = Duration::from_millis(1);
        let tick = self.tick.clamp(min_tick, timeout.max(min_tick));

        SessionTimer {
            shared: Arc::new(Shared {
                timeout,
                warning_target: timeout.saturating_sub(self.warning_lead),
                tick,
                on_start: self.on_start,
                on_warning: self.on_warning,
                on_timeout: self.on_timeout,
                on_tick: self.on_tick,
                run: Mutex::new(None),
                generations: AtomicU64::new(0),
            }),
        }
    }
}
