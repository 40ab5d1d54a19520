/*
 *  constants.rs
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
use std::time::Duration;

/// One scroll step per tick; this is the animation speed.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Wake-up period of the queue manager loop, independent of the tick rate.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Delay between requesting a queue clear and enqueueing the replacement
/// request during a preset interrupt. Long enough for the manager to observe
/// the clear on its next poll.
pub const DEFAULT_GRACE_DELAY: Duration = Duration::from_millis(100);

/// Character capacity of the demo display.
pub const DEFAULT_DISPLAY_WIDTH: usize = 16;
