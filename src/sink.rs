/*
 *  sink.rs
 *
 *  ledmarquee - queue-driven LED marquee scroller
 *  (c) 2025-26 ledmarquee authors
 *
 *  Display sink abstraction plus a mock sink for testing without hardware
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
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// The single-line character display the scroller writes into.
///
/// Implemented by the rendering layer (LED panel widget, OLED driver,
/// terminal emulator). Writes come from at most one scroll task at a time;
/// implementations still need interior mutability because the sink is shared
/// behind an `Arc` and killed/replaced tasks overlap briefly.
pub trait MarqueeSink: Send + Sync {
    /// Replace the visible content with `window`.
    fn set_text(&self, window: &str);

    /// Fixed display capacity in characters.
    fn width(&self) -> usize;

    /// Hint to redraw; may be a no-op if rendering is automatic.
    fn request_repaint(&self) {}

    /// False once the display has been torn down; a running task observing
    /// this self-terminates without treating it as a fault.
    fn is_available(&self) -> bool {
        true
    }
}

/// Mock sink for tests and CI.
///
/// Records every write and repaint so tests can verify exactly what reached
/// the display, and lets tests simulate the display going away mid-animation.
#[derive(Clone)]
pub struct MockSink {
    width: usize,
    available: Arc<AtomicBool>,
    state: Arc<Mutex<MockSinkState>>,
}

/// Internal state of the mock sink (shared for inspection in tests).
#[derive(Debug, Default)]
pub struct MockSinkState {
    /// Every window written via `set_text`, in order.
    pub writes: Vec<String>,
    /// Number of times `request_repaint` was called.
    pub repaint_count: usize,
}

impl MockSink {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            available: Arc::new(AtomicBool::new(true)),
            state: Arc::new(Mutex::new(MockSinkState::default())),
        }
    }

    /// Simulate display teardown; subsequent `is_available` calls return false.
    pub fn tear_down(&self) {
        self.available.store(false, Ordering::Release);
    }

    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes.len()
    }

    pub fn last_write(&self) -> Option<String> {
        self.state.lock().unwrap().writes.last().cloned()
    }

    pub fn writes(&self) -> Vec<String> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn repaint_count(&self) -> usize {
        self.state.lock().unwrap().repaint_count
    }
}

impl MarqueeSink for MockSink {
    fn set_text(&self, window: &str) {
        self.state.lock().unwrap().writes.push(window.to_string());
    }

    fn width(&self) -> usize {
        self.width
    }

    fn request_repaint(&self) {
        self.state.lock().unwrap().repaint_count += 1;
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }
}
