//! Event Sinks
//!
//! The engine never logs on its own; it hands every event to an
//! [`EventSink`] supplied by its owner.

use pps_events::{EngineEvent, EventType};
use std::io::{BufWriter, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// Receiver for engine events
pub trait EventSink: Send + Sync {
    fn record(&mut self, event: &EngineEvent);

    /// Push buffered output, if any.
    fn flush(&mut self) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: &EngineEvent) {}
}

/// Forwards events to `tracing`.
///
/// Lifecycle and target changes log at info, population adjustments at
/// debug, and completed ticks at debug every `tick_interval` ticks.
#[derive(Debug, Clone)]
pub struct TracingSink {
    tick_interval: u64,
}

impl TracingSink {
    pub fn new(tick_interval: u64) -> Self {
        Self {
            tick_interval: tick_interval.max(1),
        }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(100)
    }
}

impl EventSink for TracingSink {
    fn record(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::StateChanged { tick, from, to } => {
                tracing::info!(tick, ?from, ?to, "engine state changed");
            }
            EngineEvent::TargetChanged {
                tick,
                previous,
                target,
            } => {
                tracing::info!(tick, previous, target, "population target changed");
            }
            EngineEvent::PopulationAdjusted {
                tick,
                spawned,
                culled,
                population,
                target,
            } => {
                tracing::debug!(tick, spawned, culled, population, target, "population adjusted");
            }
            EngineEvent::TickCompleted(summary) => {
                if summary.tick % self.tick_interval == 0 {
                    tracing::debug!(
                        tick = summary.tick,
                        population = summary.population,
                        mean_neighbors = summary.mean_neighbors(),
                        max_neighbors = summary.max_neighbors,
                        "tick completed"
                    );
                }
            }
        }
    }
}

/// Writes events as JSON lines, skipping per-tick events unless asked for.
pub struct JsonLinesSink<W: Write + Send + Sync> {
    writer: BufWriter<W>,
    include_ticks: bool,
    written: u64,
    failed: u64,
}

impl<W: Write + Send + Sync> JsonLinesSink<W> {
    pub fn new(writer: W, include_ticks: bool) -> Self {
        Self {
            writer: BufWriter::new(writer),
            include_ticks,
            written: 0,
            failed: 0,
        }
    }

    /// Events successfully written
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Events that could not be written
    pub fn failed(&self) -> u64 {
        self.failed
    }

    fn write_event(&mut self, event: &EngineEvent) -> std::io::Result<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.writer, "{}", json)
    }
}

impl<W: Write + Send + Sync> EventSink for JsonLinesSink<W> {
    fn record(&mut self, event: &EngineEvent) {
        if !self.include_ticks && event.event_type() == EventType::Tick {
            return;
        }
        match self.write_event(event) {
            Ok(()) => self.written += 1,
            Err(e) => {
                if self.failed == 0 {
                    tracing::warn!("Failed to write event: {}", e);
                }
                self.failed += 1;
            }
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!("Failed to flush event log: {}", e);
        }
    }
}

impl<W: Write + Send + Sync> Drop for JsonLinesSink<W> {
    fn drop(&mut self) {
        EventSink::flush(self);
    }
}

/// In-memory event log whose handle can be cloned and read while the
/// engine owns the sink
#[derive(Debug, Clone, Default)]
pub struct SharedEventLog {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl SharedEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EngineEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of every recorded event
    pub fn events(&self) -> Vec<EngineEvent> {
        self.lock().clone()
    }

    /// Recorded events of one category
    pub fn of_type(&self, event_type: EventType) -> Vec<EngineEvent> {
        self.lock()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl EventSink for SharedEventLog {
    fn record(&mut self, event: &EngineEvent) {
        self.lock().push(event.clone());
    }
}

/// Fans each event out to several sinks
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<Box<dyn EventSink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for SinkSet {
    fn record(&mut self, event: &EngineEvent) {
        for sink in &mut self.sinks {
            sink.record(event);
        }
    }

    fn flush(&mut self) {
        for sink in &mut self.sinks {
            sink.flush();
        }
    }
}
