//! 1 Hz driver for an urge countdown
//!
//! A [`Ticker`] drives either a bare [`UrgeSession`] or the countdown inside
//! an [`UrgeFlow`]. At most one tick task exists per ticker. Each tick runs
//! and publishes its snapshot under the lock, so a pause or reset that
//! follows always publishes last. The task ends on its own once nothing
//! needs ticking; pause, reset and drop cancel it.

use breaker_api::SessionSnapshot;
use breaker_util::Result;
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::{FlowEvent, FlowSignal, UrgeFlow, UrgeSession};

/// Tick period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Something that owns an urge countdown
pub trait Countdown: Send + 'static {
    fn countdown(&self) -> &UrgeSession;

    fn countdown_mut(&mut self) -> &mut UrgeSession;

    /// One second passed
    fn advance(&mut self) -> Option<FlowEvent>;

    /// React to a countdown that expired outside a tick
    fn settle(&mut self) -> Option<FlowEvent> {
        None
    }

    /// Whether the tick task should keep running
    fn wants_ticks(&self) -> bool {
        self.countdown().is_running()
    }
}

impl Countdown for UrgeSession {
    fn countdown(&self) -> &UrgeSession {
        self
    }

    fn countdown_mut(&mut self) -> &mut UrgeSession {
        self
    }

    fn advance(&mut self) -> Option<FlowEvent> {
        self.tick();
        None
    }
}

impl Countdown for UrgeFlow {
    fn countdown(&self) -> &UrgeSession {
        self.timer()
    }

    fn countdown_mut(&mut self) -> &mut UrgeSession {
        self.timer_mut()
    }

    fn advance(&mut self) -> Option<FlowEvent> {
        self.tick()
    }

    fn settle(&mut self) -> Option<FlowEvent> {
        self.poll_timer()
    }

    fn wants_ticks(&self) -> bool {
        self.on_timer_step() && self.timer().is_running()
    }
}

/// Drives a [`Countdown`] from a tokio interval
pub struct Ticker<T: Countdown> {
    inner: Arc<Mutex<T>>,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
    events: Option<mpsc::UnboundedSender<FlowEvent>>,
    task: Option<JoinHandle<()>>,
}

/// Stand-alone countdown
pub type SessionTicker = Ticker<UrgeSession>;

/// Countdown step of a guided or session flow
pub type FlowTicker = Ticker<UrgeFlow>;

impl Ticker<UrgeSession> {
    pub fn new(session: UrgeSession) -> Self {
        Self::build(session, None)
    }
}

impl Ticker<UrgeFlow> {
    /// The receiver gets the step changes caused by the countdown itself:
    /// expiry during a tick or on return from the background.
    pub fn new(flow: UrgeFlow) -> (Self, mpsc::UnboundedReceiver<FlowEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::build(flow, Some(tx)), rx)
    }

    /// Shared handle for reading the flow and submitting the outcome.
    /// Signals should go through [`FlowTicker::handle`] so ticking follows
    /// the countdown.
    pub fn flow(&self) -> Arc<Mutex<UrgeFlow>> {
        Arc::clone(&self.inner)
    }

    /// Apply a shell signal, then start or stop ticking to match
    pub async fn handle(&mut self, signal: FlowSignal) -> Result<FlowEvent> {
        let (result, live) = self.update(|flow| flow.handle(signal)).await;
        self.follow(live);
        result
    }

    /// Back to the first step with a fresh countdown
    pub async fn restart(&mut self) {
        self.cancel();
        self.update(|flow| flow.restart()).await;
    }
}

impl<T: Countdown> Ticker<T> {
    fn build(inner: T, events: Option<mpsc::UnboundedSender<FlowEvent>>) -> Self {
        let (tx, _rx) = watch::channel(inner.countdown().snapshot());
        Self {
            inner: Arc::new(Mutex::new(inner)),
            snapshots: Arc::new(tx),
            events,
            task: None,
        }
    }

    /// Observe the countdown
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        *self.snapshots.borrow()
    }

    /// Whether a tick task is currently alive
    pub fn is_ticking(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Start or resume the countdown. Must be called within a tokio runtime.
    pub async fn start(&mut self) {
        self.cancel();
        let ((), live) = self.update(|c| c.countdown_mut().start()).await;
        self.follow(live);
    }

    pub async fn pause(&mut self) {
        self.cancel();
        self.update(|c| c.countdown_mut().pause()).await;
    }

    pub async fn reset(&mut self) {
        self.cancel();
        self.update(|c| c.countdown_mut().reset()).await;
    }

    pub async fn went_background(&mut self, now: DateTime<Local>) {
        self.update(|c| c.countdown_mut().went_background(now)).await;
    }

    /// Catch up on time spent suspended. Stops ticking if that expired the
    /// countdown.
    pub async fn became_active(&mut self, now: DateTime<Local>) {
        let ((), live) = self.update(|c| c.countdown_mut().became_active(now)).await;
        self.follow(live);
    }

    /// Run `f`, then publish under the same lock
    async fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> (R, bool) {
        let mut inner = self.inner.lock().await;
        let result = f(&mut *inner);
        let event = inner.settle();
        self.snapshots.send_replace(inner.countdown().snapshot());
        emit(self.events.as_ref(), event);
        (result, inner.wants_ticks())
    }

    fn follow(&mut self, live: bool) {
        if !live {
            self.cancel();
        } else if !self.is_ticking() {
            let inner = Arc::clone(&self.inner);
            let snapshots = Arc::clone(&self.snapshots);
            let events = self.events.clone();
            self.task = Some(tokio::spawn(run_ticks(inner, snapshots, events)));
        }
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T: Countdown> Drop for Ticker<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn emit(events: Option<&mpsc::UnboundedSender<FlowEvent>>, event: Option<FlowEvent>) {
    if let (Some(tx), Some(event)) = (events, event)
        && tx.send(event).is_err()
    {
        debug!("Flow event receiver dropped");
    }
}

async fn run_ticks<T: Countdown>(
    inner: Arc<Mutex<T>>,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
    events: Option<mpsc::UnboundedSender<FlowEvent>>,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    // Suspended time is reconciled by `became_active`, never by a burst
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let mut guard = inner.lock().await;
        let event = guard.advance();
        let snapshot = guard.countdown().snapshot();
        snapshots.send_replace(snapshot);
        emit(events.as_ref(), event);

        if !guard.wants_ticks() {
            debug!(state = ?snapshot.state, "Tick task finished");
            break;
        }
    }
}
