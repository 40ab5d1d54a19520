/*
 *  lib.rs
 *
 *  ledmarquee - queue-driven LED marquee scroller
 *  (c) 2025-26 ledmarquee authors
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

//! Drives a single-line scrolling marquee from a queue of text requests.
//!
//! Producers push [`ScrollRequest`]s through the [`MarqueeController`]
//! facade; a manager loop serves them one at a time as cancellable scroll
//! tasks against the registered [`MarqueeSink`]. A preset switch interrupts
//! the running animation, flushes the queue and shows the preset name.

pub mod config;
pub mod constants;
pub mod marquee;
pub mod scrolltext;
pub mod sink;
pub mod task;
pub mod taskqueue;

pub use config::{Config, MarqueeTuning, Preset};
pub use marquee::MarqueeController;
pub use scrolltext::ScrollEngine;
pub use sink::{MarqueeSink, MockSink};
pub use task::{ScrollRequest, TaskState};
pub use taskqueue::TaskQueueManager;
