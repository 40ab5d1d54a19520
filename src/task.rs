/*
 *  task.rs
 *
 *  ledmarquee - queue-driven LED marquee scroller
 *  (c) 2025-26 ledmarquee authors
 *
 *  One-shot cancellable scroll animation task
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::scrolltext::ScrollEngine;
use crate::sink::MarqueeSink;

/// One pending display request, queued until the manager turns it into a
/// [`ScrollTask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub text: String,
    /// `None` (or zero) means scroll until killed.
    pub duration: Option<Duration>,
}

impl ScrollRequest {
    pub fn new(text: impl Into<String>, duration: Option<Duration>) -> Self {
        Self {
            text: text.into(),
            // a zero duration is "indefinite" by policy, not an error
            duration: duration.filter(|d| !d.is_zero()),
        }
    }

    pub fn indefinite(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }
}

/// Task lifecycle. `Killed` and `Completed` are absorbing; a terminal task is
/// discarded, never restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskState {
    Created = 0,
    Running = 1,
    Killed = 2,
    Completed = 3,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Killed | TaskState::Completed)
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => TaskState::Created,
            1 => TaskState::Running,
            2 => TaskState::Killed,
            _ => TaskState::Completed,
        }
    }
}

/// First terminal transition wins; later attempts are no-ops. Returns whether
/// this call performed the transition.
fn try_finish(state: &AtomicU8, terminal: TaskState) -> bool {
    state
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |s| {
            if TaskState::from_u8(s).is_terminal() {
                None
            } else {
                Some(terminal as u8)
            }
        })
        .is_ok()
}

/// A single scroll animation run against the display sink.
///
/// Wraps a [`ScrollEngine`] in a timed tokio loop: one engine tick per
/// `tick_interval`, writing the computed window to the sink. Cancellation is
/// cooperative through the atomic state word, observed at tick boundaries, so
/// the worst-case latency of `kill()` is one tick interval.
pub struct ScrollTask {
    request: ScrollRequest,
    tick_interval: Duration,
    sink: Arc<dyn MarqueeSink>,
    state: Arc<AtomicU8>,
    task_handle: Option<JoinHandle<()>>,
}

impl ScrollTask {
    pub fn new(request: ScrollRequest, sink: Arc<dyn MarqueeSink>, tick_interval: Duration) -> Self {
        Self {
            request,
            tick_interval,
            sink,
            state: Arc::new(AtomicU8::new(TaskState::Created as u8)),
            task_handle: None,
        }
    }

    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Bounded runs execute exactly `floor(duration / tick_interval)` ticks
    /// before self-completing; indefinite runs have no budget. Integer
    /// nanosecond arithmetic: a float ratio truncates one tick short for
    /// values like 300ms/100ms.
    fn tick_budget(&self) -> Option<u64> {
        self.request.duration.map(|d| {
            let tick = self.tick_interval.as_nanos().max(1);
            (d.as_nanos() / tick) as u64
        })
    }

    /// Spawn the animation loop. A task killed before it was ever scheduled
    /// stays dead; the loop is never spawned for it.
    pub fn start(&mut self) {
        if self.task_handle.is_some() {
            debug!("scroll task already running, not spawning again");
            return;
        }
        if self
            .state
            .compare_exchange(
                TaskState::Created as u8,
                TaskState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            debug!("scroll task killed before start; not spawning");
            return;
        }

        let engine = ScrollEngine::new(self.request.text.clone());
        let budget = self.tick_budget();
        let tick_interval = self.tick_interval;
        let sink = self.sink.clone();
        let state = self.state.clone();

        let handle = tokio::spawn(async move {
            let mut offset: i64 = 0;
            let mut ticks: u64 = 0;
            loop {
                // kill flag is checked before every tick: exit without writing
                if TaskState::from_u8(state.load(Ordering::Acquire)).is_terminal() {
                    debug!("scroll task observed kill, exiting");
                    return;
                }
                if let Some(budget) = budget {
                    if ticks >= budget {
                        if try_finish(&state, TaskState::Completed) {
                            debug!("scroll task completed after {} ticks", ticks);
                        }
                        return;
                    }
                }
                // display going away mid-loop is teardown, not a fault
                if !sink.is_available() {
                    if try_finish(&state, TaskState::Killed) {
                        debug!("display sink gone, scroll task exiting");
                    }
                    return;
                }

                let (window, next) = engine.tick(sink.width(), offset);
                sink.set_text(&window);
                sink.request_repaint();
                offset = next;
                ticks += 1;

                sleep(tick_interval).await;
            }
        });

        self.task_handle = Some(handle);
    }

    /// Request cancellation. Idempotent, non-blocking, callable from any
    /// thread; the loop observes it at the next tick boundary.
    pub fn kill(&self) {
        if try_finish(&self.state, TaskState::Killed) {
            debug!("scroll task killed");
        }
    }
}

impl Drop for ScrollTask {
    fn drop(&mut self) {
        // belt and braces: the loop exits on its own once the state word is
        // terminal, but a dropped task must not keep writing to the sink
        self.kill();
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}
