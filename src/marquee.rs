/*
 *  marquee.rs
 *
 *  ledmarquee - queue-driven LED marquee scroller
 *  (c) 2025-26 ledmarquee authors
 *
 *  Facade tying together the display sink, request queue and manager loop
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
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::config::MarqueeTuning;
use crate::sink::MarqueeSink;
use crate::task::ScrollRequest;
use crate::taskqueue::{Shared, TaskQueueManager};

/// Entry point for producers (UI handlers, preset switches).
///
/// Owns the scheduler state and the spawned manager loop. All methods are
/// safe to call concurrently with the manager's consumption; none of them
/// block on the animation. There is no error surface here: every failure
/// mode degrades to "the animation stops".
pub struct MarqueeController {
    shared: Arc<Shared>,
    grace_delay: Duration,
    manager_handle: Mutex<Option<JoinHandle<()>>>,
}

impl MarqueeController {
    /// Build the scheduler and spawn the manager loop on the current tokio
    /// runtime. Call [`register_display`](Self::register_display) before
    /// enqueueing anything that should actually run.
    pub fn start(tuning: &MarqueeTuning) -> Self {
        let shared = Arc::new(Shared::new());
        let manager =
            TaskQueueManager::new(shared.clone(), tuning.poll_interval, tuning.tick_interval);
        let handle = tokio::spawn(manager.run());
        info!(
            "marquee controller started (tick {:?}, poll {:?})",
            tuning.tick_interval, tuning.poll_interval
        );
        Self {
            shared,
            grace_delay: tuning.grace_delay,
            manager_handle: Mutex::new(Some(handle)),
        }
    }

    /// Bind the single display target. Re-registration replaces the sink,
    /// which is almost always a caller bug, hence the warning.
    pub fn register_display(&self, sink: Arc<dyn MarqueeSink>) {
        let mut slot = self.shared.sink.lock().unwrap();
        if slot.is_some() {
            warn!("display sink already registered, replacing it");
        }
        *slot = Some(sink);
    }

    /// Append a scroll request. Never blocks, never fails; the queue is
    /// unbounded and accepts requests regardless of manager state.
    pub fn enqueue(&self, text: impl Into<String>, duration: Option<Duration>) {
        let request = ScrollRequest::new(text, duration);
        debug!("enqueue scroll request: {:?}", request.text);
        self.shared.queue.lock().unwrap().push_back(request);
    }

    /// Number of requests waiting to be dequeued (the running task excluded).
    pub fn pending(&self) -> usize {
        self.shared.pending_len()
    }

    /// The preset-change protocol: kill the running animation, flush the
    /// queue, then show the preset name indefinitely.
    ///
    /// Ordering matters. Clearing after the enqueue would discard the new
    /// request; killing after it risks the replacement starting and being
    /// killed straight away. The grace sleep gives the manager one poll to
    /// observe the clear before the new request lands.
    pub async fn interrupt_with_preset(&self, name: &str) {
        info!("preset change, interrupting marquee: {}", name);
        self.shared.kill_current();
        self.shared.request_clear();
        sleep(self.grace_delay).await;
        self.enqueue(name, None);
    }

    /// Tear everything down: flush the queue, stop the manager loop, kill
    /// the running task. Idempotent; every step is a no-op on absent or
    /// terminal state.
    pub fn shutdown(&self) {
        debug!("marquee controller shutting down");
        self.shared.drain_pending();
        self.shared.stopped.store(true, Ordering::Release);
        self.shared.kill_current();
    }
}

impl Drop for MarqueeController {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.manager_handle.lock().unwrap().take() {
            handle.abort();
        }
    }
}
