/*!
 * Timed playback of validated subtitle entries.
 *
 * Three disciplines are supported:
 * - `Sequential`: fixed 500 ms pauses, embedded timing ignored
 * - `RealTime`: waits anchored to the first entry's start time
 * - `Accelerated`: like `RealTime` with every wait divided by a speed factor
 *
 * Timed modes compute every DISPLAY wait against one anchor captured at the
 * start of `execute`, never against the previous wake-up, so sleep overshoot
 * does not accumulate. Once shown, an entry stays up for its own scaled
 * duration. Time is read and spent through the `Clock` trait.
 */

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use parking_lot::{Condvar, Mutex};

use crate::errors::ExecutionError;
use crate::formatting;
use crate::subtitle::{SubtitleEntry, TimeStamp};

/// Pause used between emissions in sequential mode
pub const SEQUENTIAL_INTERVAL: Duration = Duration::from_millis(500);

/// Playback discipline, chosen once per `execute` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    Sequential,
    RealTime,
    Accelerated,
}

impl PlaybackMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::RealTime => "real_time",
            Self::Accelerated => "accelerated",
        }
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaybackMode {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "real_time" => Ok(Self::RealTime),
            "accelerated" => Ok(Self::Accelerated),
            _ => Err(ExecutionError::UnknownMode(s.to_string())),
        }
    }
}

/// The two events emitted per entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Display,
    Clear,
}

/// A DISPLAY or CLEAR event for one entry
#[derive(Debug, Clone, Copy)]
pub struct PlaybackEvent<'a> {
    pub kind: EventKind,
    pub entry: &'a SubtitleEntry,
    /// Clock time since the start of `execute`
    pub elapsed: Duration,
}

impl PlaybackEvent<'_> {
    /// Content time of the event: start for DISPLAY, end for CLEAR
    pub fn timestamp(&self) -> TimeStamp {
        match self.kind {
            EventKind::Display => self.entry.start(),
            EventKind::Clear => self.entry.end(),
        }
    }
}

/// Source of time and the only suspension point of the scheduler
pub trait Clock {
    /// Monotonic time since the clock was created
    fn now(&self) -> Duration;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration) -> Result<(), ExecutionError>;
}

/// Wall clock backed by `Instant` and `thread::sleep`
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) -> Result<(), ExecutionError> {
        thread::sleep(duration);
        Ok(())
    }
}

/// Wall clock whose waits can be cut short from another thread
#[derive(Debug, Clone)]
pub struct InterruptibleClock {
    origin: Instant,
    state: Arc<(Mutex<bool>, Condvar)>,
}

/// Handle used to abort an `InterruptibleClock` wait
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl InterruptHandle {
    /// Wake any pending wait and make all later waits fail
    pub fn interrupt(&self) {
        let (flag, condvar) = &*self.state;
        *flag.lock() = true;
        condvar.notify_all();
    }

    pub fn is_interrupted(&self) -> bool {
        *self.state.0.lock()
    }
}

impl InterruptibleClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    pub fn handle(&self) -> InterruptHandle {
        InterruptHandle {
            state: self.state.clone(),
        }
    }
}

impl Default for InterruptibleClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InterruptibleClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) -> Result<(), ExecutionError> {
        let deadline = Instant::now() + duration;
        let (flag, condvar) = &*self.state;
        let mut interrupted = flag.lock();

        // Loop covers spurious wake-ups.
        while !*interrupted {
            if condvar.wait_until(&mut interrupted, deadline).timed_out() {
                break;
            }
        }

        if *interrupted {
            return Err(ExecutionError::Interrupted);
        }
        Ok(())
    }
}

/// Simulated clock: sleeping advances time instantly
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
    interrupt: Option<InterruptHandle>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every `sleep` once `handle` has been interrupted
    pub fn with_interrupt(mut self, handle: InterruptHandle) -> Self {
        self.interrupt = Some(handle);
        self
    }

    /// Move time forward without going through `sleep`
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }

    fn sleep(&self, duration: Duration) -> Result<(), ExecutionError> {
        if self.interrupt.as_ref().is_some_and(InterruptHandle::is_interrupted) {
            return Err(ExecutionError::Interrupted);
        }
        self.advance(duration);
        Ok(())
    }
}

/// Receiver of playback events
pub trait EventSink {
    fn emit(&mut self, event: PlaybackEvent<'_>);
}

/// Prints events as `[HH:MM:SS.mmm] DISPLAY: "text"` / `[HH:MM:SS.mmm] CLEAR`
pub struct TerminalSink<W: Write> {
    out: W,
    enable_formatting: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, enable_formatting: bool) -> Self {
        Self { out, enable_formatting }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalSink<std::io::Stdout> {
    pub fn stdout(enable_formatting: bool) -> Self {
        Self::new(std::io::stdout(), enable_formatting)
    }
}

impl<W: Write> EventSink for TerminalSink<W> {
    fn emit(&mut self, event: PlaybackEvent<'_>) {
        let stamp = event.timestamp().display_form();
        // A closed stdout must not abort playback.
        let _ = match event.kind {
            EventKind::Display => {
                let text = formatting::format_subtitle_text(&event.entry.text(), self.enable_formatting);
                writeln!(self.out, "[{}] DISPLAY: \"{}\"", stamp, text)
            }
            EventKind::Clear => writeln!(self.out, "[{}] CLEAR", stamp),
        };
        let _ = self.out.flush();
    }
}

/// An event captured by `RecordingSink`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub kind: EventKind,
    pub index: usize,
    pub elapsed: Duration,
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<RecordedEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: PlaybackEvent<'_>) {
        self.events.push(RecordedEvent {
            kind: event.kind,
            index: event.entry.index(),
            elapsed: event.elapsed,
        });
    }
}

/// Drives DISPLAY/CLEAR events for an entry sequence
pub struct Scheduler<C: Clock, S: EventSink> {
    clock: C,
    sink: S,
}

impl<C: Clock, S: EventSink> Scheduler<C, S> {
    pub fn new(clock: C, sink: S) -> Self {
        Self { clock, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Play `entries` in order under `mode`.
    ///
    /// `speed_factor` must be positive for every mode, though only
    /// `Accelerated` uses it.
    pub fn execute(&mut self, entries: &[SubtitleEntry], mode: PlaybackMode, speed_factor: f64) -> Result<(), ExecutionError> {
        if entries.is_empty() {
            return Err(ExecutionError::NoEntries);
        }
        if !(speed_factor > 0.0) || !speed_factor.is_finite() {
            return Err(ExecutionError::InvalidSpeedFactor(speed_factor));
        }

        info!("Playing {} subtitles in {} mode", entries.len(), mode);
        let anchor = self.clock.now();

        match mode {
            PlaybackMode::Sequential => self.run_sequential(entries, anchor),
            PlaybackMode::RealTime => self.run_timed(entries, anchor, 1.0),
            PlaybackMode::Accelerated => self.run_timed(entries, anchor, speed_factor),
        }
    }

    fn run_sequential(&mut self, entries: &[SubtitleEntry], anchor: Duration) -> Result<(), ExecutionError> {
        for entry in entries {
            self.emit(EventKind::Display, entry, anchor);
            self.clock.sleep(SEQUENTIAL_INTERVAL)?;
            self.emit(EventKind::Clear, entry, anchor);
            self.clock.sleep(SEQUENTIAL_INTERVAL)?;
        }
        Ok(())
    }

    fn run_timed(&mut self, entries: &[SubtitleEntry], anchor: Duration, speed_factor: f64) -> Result<(), ExecutionError> {
        let content_anchor = entries[0].start().to_millis();

        // No single wait exceeds the furthest end offset. Reject the factor
        // up front when that offset does not fit a Duration.
        let span = entries
            .iter()
            .map(|e| e.end().to_millis().saturating_sub(content_anchor))
            .max()
            .unwrap_or(0);
        scaled(span, speed_factor)?;

        for entry in entries {
            let offset = entry.start().to_millis().saturating_sub(content_anchor);
            self.wait_until(anchor, scaled(offset, speed_factor)?)?;
            self.emit(EventKind::Display, entry, anchor);

            let shown = scaled(entry.duration_ms(), speed_factor)?;
            if !shown.is_zero() {
                self.clock.sleep(shown)?;
            }
            self.emit(EventKind::Clear, entry, anchor);
        }
        Ok(())
    }

    /// Sleep until `target` has passed since `anchor`; never sleeps when already late
    fn wait_until(&self, anchor: Duration, target: Duration) -> Result<(), ExecutionError> {
        let elapsed = self.clock.now().saturating_sub(anchor);
        if let Some(remaining) = target.checked_sub(elapsed).filter(|d| !d.is_zero()) {
            debug!("Waiting {:?} (target {:?}, elapsed {:?})", remaining, target, elapsed);
            self.clock.sleep(remaining)?;
        }
        Ok(())
    }

    fn emit(&mut self, kind: EventKind, entry: &SubtitleEntry, anchor: Duration) {
        let elapsed = self.clock.now().saturating_sub(anchor);
        self.sink.emit(PlaybackEvent { kind, entry, elapsed });
    }
}

/// Content milliseconds scaled to wall time
fn scaled(ms: u64, speed_factor: f64) -> Result<Duration, ExecutionError> {
    Duration::try_from_secs_f64(ms as f64 / 1000.0 / speed_factor).map_err(|_| ExecutionError::WaitOverflow(speed_factor))
}

/// Play `entries` on the wall clock, printing to stdout
pub fn execute(entries: &[SubtitleEntry], mode: PlaybackMode, speed_factor: f64) -> Result<(), ExecutionError> {
    Scheduler::new(SystemClock::new(), TerminalSink::stdout(true)).execute(entries, mode, speed_factor)
}
