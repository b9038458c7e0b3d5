//! Change-signal bus.
//!
//! Writers fire a payload-free signal after each successful store write. The
//! bus is a FIFO task queue: signals fired while a pass is running are queued
//! behind it instead of being handled recursively.

use std::collections::VecDeque;

use tracing::{debug, warn};

/// "Something changed, re-check everything."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeSignal;

/// Handle passed to a running pass so it can queue follow-up signals.
pub struct SignalEmitter<'a> {
    queue: &'a mut VecDeque<ChangeSignal>,
}

impl SignalEmitter<'_> {
    pub fn fire(&mut self) {
        self.queue.push_back(ChangeSignal);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Handler invocations.
    pub passes: usize,
    /// Signals fired by the closing pass and never handled.
    pub dropped: usize,
}

#[derive(Debug)]
pub struct ChangeSignalBus {
    queue: VecDeque<ChangeSignal>,
    max_passes: usize,
}

impl ChangeSignalBus {
    pub fn new(max_passes: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max_passes: max_passes.max(1),
        }
    }

    pub fn fire(&mut self) {
        self.queue.push_back(ChangeSignal);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Handle queued signals one at a time, in fire order.
    ///
    /// After `max_passes` passes, whatever is still queued collapses into one
    /// closing pass, so the latest write is always handled. Signals fired by
    /// the closing pass itself are discarded and counted in `dropped`.
    /// A handler error stops the drain; signals still queued stay queued.
    pub fn drain<E>(
        &mut self,
        mut handler: impl FnMut(&mut SignalEmitter<'_>) -> Result<(), E>,
    ) -> Result<DrainReport, E> {
        let mut report = DrainReport::default();

        while self.queue.pop_front().is_some() {
            let closing = report.passes == self.max_passes;
            let coalesced = if closing { self.queue.len() } else { 0 };
            if closing {
                debug!(limit = self.max_passes, coalesced, "pass limit reached, running closing pass");
            }

            let mut emitter = SignalEmitter {
                queue: &mut self.queue,
            };
            handler(&mut emitter)?;
            report.passes += 1;

            if closing {
                report.dropped = self.queue.len() - coalesced;
                self.queue.clear();
                if report.dropped > 0 {
                    warn!(
                        limit = self.max_passes,
                        dropped = report.dropped,
                        "closing pass fired again, discarding change signals"
                    );
                }
                break;
            }
        }

        debug!(passes = report.passes, "change signals drained");
        Ok(report)
    }
}

impl Default for ChangeSignalBus {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reentrant_fire_queues_followup_pass() {
        let mut bus = ChangeSignalBus::default();
        bus.fire();

        let mut order = Vec::new();
        let report = bus
            .drain(|emitter| {
                order.push(order.len());
                if order.len() == 1 {
                    emitter.fire();
                }
                Ok::<_, ()>(())
            })
            .unwrap();

        assert_eq!(report, DrainReport { passes: 2, dropped: 0 });
        assert_eq!(order, vec![0, 1]);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_drain_is_bounded() {
        let mut bus = ChangeSignalBus::new(3);
        bus.fire();
        let report = bus
            .drain(|emitter| {
                emitter.fire();
                Ok::<_, ()>(())
            })
            .unwrap();
        assert_eq!(report.passes, 4);
        assert_eq!(report.dropped, 1);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_signals_past_the_limit_share_one_closing_pass() {
        let mut bus = ChangeSignalBus::new(1);
        bus.fire();
        let mut calls = 0;
        let report = bus
            .drain(|emitter| {
                calls += 1;
                if calls == 1 {
                    emitter.fire();
                    emitter.fire();
                    emitter.fire();
                }
                Ok::<_, ()>(())
            })
            .unwrap();
        assert_eq!(calls, 2);
        assert_eq!(report, DrainReport { passes: 2, dropped: 0 });
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_handler_error_stops_drain() {
        let mut bus = ChangeSignalBus::default();
        bus.fire();
        bus.fire();
        let result = bus.drain(|_| Err("disk full"));
        assert_eq!(result, Err("disk full"));
        assert_eq!(bus.pending(), 1);
    }
}
