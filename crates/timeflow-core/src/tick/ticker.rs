//! The single scheduler that drives a [`TickEngine`].
//!
//! A `Ticker` owns one tokio task. That task owns the engine and `select!`s
//! between the tick interval and a command channel, so ticks and user
//! commands are applied one at a time, each to a settled collection.
//! Dropping the `Ticker` aborts the task; [`Ticker::stop`] ends it cleanly
//! and returns the engine.

use std::time::Duration;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::{TickEngine, TickMode};
use crate::error::TickerError;
use crate::events::Event;
use crate::notify::NotificationPermission;
use crate::storage::TickerConfig;
use crate::timer::Timer;

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// A request applied by the ticker task between ticks.
///
/// Ids may be given in full or as a unique prefix.
#[derive(Debug)]
pub enum Command {
    Add(Timer),
    Toggle(String),
    Reset(String),
    Delete(String),
    ClearCompleted,
    SetPermission(NotificationPermission),
    Snapshot(oneshot::Sender<Vec<Timer>>),
}

/// Tick period and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCadence {
    pub period: Duration,
    pub mode: TickMode,
}

impl Default for TickCadence {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            mode: TickMode::Fixed,
        }
    }
}

impl TickCadence {
    pub fn from_config(config: &TickerConfig) -> Self {
        Self {
            period: Duration::from_millis(config.period_ms.max(1)),
            mode: config.mode,
        }
    }
}

/// Handle to the running tick task.
pub struct Ticker {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<Event>,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<TickEngine>>,
}

impl Ticker {
    /// Spawn the tick task. Must be called from within a tokio runtime.
    ///
    /// The first tick fires one period after start.
    pub fn start(engine: TickEngine, cadence: TickCadence) -> Self {
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let (stop, stop_rx) = oneshot::channel();
        let task = tokio::spawn(run(engine, cadence, command_rx, stop_rx, events.clone()));
        info!(period_ms = cadence.period.as_millis() as u64, mode = ?cadence.mode, "ticker started");
        Self {
            commands,
            events,
            stop: Some(stop),
            task: Some(task),
        }
    }

    /// Receive every event produced from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub async fn send(&self, command: Command) -> Result<(), TickerError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| TickerError::Stopped)
    }

    /// Current collection, newest first.
    pub async fn snapshot(&self) -> Result<Vec<Timer>, TickerError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx)).await?;
        rx.await.map_err(|_| TickerError::Stopped)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop ticking and take the engine back.
    pub async fn stop(mut self) -> Result<TickEngine, TickerError> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let task = self.task.take().ok_or(TickerError::Stopped)?;
        let engine = task.await?;
        info!("ticker stopped");
        Ok(engine)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("ticker dropped without stop; aborting task");
            task.abort();
        }
    }
}

async fn run(
    mut engine: TickEngine,
    cadence: TickCadence,
    mut commands: mpsc::Receiver<Command>,
    mut stop: oneshot::Receiver<()>,
    events: broadcast::Sender<Event>,
) -> TickEngine {
    let mut interval = time::interval_at(Instant::now() + cadence.period, cadence.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut clock = WallClock::new(Instant::now());

    loop {
        tokio::select! {
            biased;
            _ = &mut stop => break,
            _ = interval.tick() => {
                let seconds = match cadence.mode {
                    TickMode::Fixed => 1,
                    TickMode::WallClock => clock.elapsed_seconds(Instant::now()),
                };
                let report = blocking(|| engine.tick_by(seconds));
                publish(&events, report.events());
            }
            command = commands.recv() => match command {
                Some(command) => {
                    if let Some(event) = blocking(|| apply(&mut engine, command)) {
                        publish(&events, vec![event]);
                    }
                }
                None => break,
            },
        }
    }

    engine
}

fn apply(engine: &mut TickEngine, command: Command) -> Option<Event> {
    match command {
        Command::Add(timer) => Some(engine.store_mut().add(timer)),
        Command::Toggle(id) => {
            let id = resolve(engine, &id)?;
            engine.store_mut().toggle_by_id(&id)
        }
        Command::Reset(id) => {
            let id = resolve(engine, &id)?;
            engine.store_mut().reset_by_id(&id)
        }
        Command::Delete(id) => {
            let id = resolve(engine, &id)?;
            engine.store_mut().delete_by_id(&id)
        }
        Command::ClearCompleted => engine.store_mut().clear_completed(),
        Command::SetPermission(permission) => {
            engine.dispatcher_mut().set_permission(permission);
            None
        }
        Command::Snapshot(reply) => {
            let _ = reply.send(engine.store().timers().to_vec());
            None
        }
    }
}

/// Run `f` off the async scheduler when the runtime allows it.
///
/// Ticks and commands write to SQLite and may wait on the notification
/// service. On a multi-threaded runtime `block_in_place` lets other tasks
/// keep running meanwhile; the current-thread runtime has no such escape.
fn blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current().map(|h| h.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(f),
        _ => f(),
    }
}

fn resolve(engine: &TickEngine, id: &str) -> Option<String> {
    let resolved = engine.store().resolve_id(id).map(str::to_string);
    if resolved.is_none() {
        debug!(id, "no timer matches id");
    }
    resolved
}

fn publish(events: &broadcast::Sender<Event>, batch: Vec<Event>) {
    for event in batch {
        // No subscribers is fine.
        let _ = events.send(event);
    }
}

/// Converts real elapsed time into whole seconds, carrying the remainder.
#[derive(Debug)]
struct WallClock {
    last: Instant,
    carry: Duration,
}

impl WallClock {
    fn new(now: Instant) -> Self {
        Self {
            last: now,
            carry: Duration::ZERO,
        }
    }

    fn elapsed_seconds(&mut self, now: Instant) -> u64 {
        let total = self.carry + now.saturating_duration_since(self.last);
        self.last = now;
        let seconds = total.as_secs();
        self.carry = total - Duration::from_secs(seconds);
        seconds
    }
}
