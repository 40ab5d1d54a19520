/*
 *  scrolltext.rs
 *
 *  ledmarquee - queue-driven LED marquee scroller
 *  (c) 2025-26 ledmarquee authors
 *
 *  Per-tick scroll/wrap algorithm for a fixed-width single-line display
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

/// Pure per-tick scroll algorithm over a fixed source text.
///
/// The only animation state is the signed `offset` threaded through
/// [`ScrollEngine::tick`] by the caller:
///
/// - `0..=len`: the text slides leftward off the display; the window is
///   `text[offset..]` truncated to the display width. The window is always
///   resliced from the full source string so a tick is idempotent for a
///   given offset.
/// - negative: blank lead-in, `abs(offset) - 1` spaces ahead of the text.
/// - past `len`: wrap; the offset is reseeded to `-width` so a full blank
///   display precedes the text re-entering.
///
/// A zero display width degenerates to an empty window every tick.
pub struct ScrollEngine {
    text: String,
}

impl ScrollEngine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Compute the visible window for `offset` and the offset for the next
    /// tick. Offsets are in characters, not bytes.
    pub fn tick(&self, width: usize, offset: i64) -> (String, i64) {
        let len = self.text.chars().count() as i64;
        let mut off = offset;

        let window: String = if (0..=len).contains(&off) {
            self.text.chars().skip(off as usize).take(width).collect()
        } else {
            if off > len {
                off = -(width as i64);
            }
            let blanks = (off.unsigned_abs() as usize).saturating_sub(1);
            " ".repeat(blanks)
                .chars()
                .chain(self.text.chars())
                .take(width)
                .collect()
        };

        (window, off + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run `n` ticks from `offset`, collecting windows.
    fn run(engine: &ScrollEngine, width: usize, mut offset: i64, n: usize) -> Vec<String> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            let (window, next) = engine.tick(width, offset);
            out.push(window);
            offset = next;
        }
        out
    }

    #[test]
    fn test_short_text_scroll_sequence() {
        let engine = ScrollEngine::new("HI");
        let mut offset = 0;
        let mut windows = Vec::new();
        let mut offsets = Vec::new();
        for _ in 0..6 {
            let (window, next) = engine.tick(4, offset);
            windows.push(window);
            // next is always produced from the effective (post-reset) offset
            offsets.push(next - 1);
            offset = next;
        }
        assert_eq!(windows, vec!["HI", "I", "", "   H", "  HI", " HI"]);
        assert_eq!(offsets, vec![0, 1, 2, -4, -3, -2]);
    }

    #[test]
    fn test_wrap_reseeds_full_blank_lead_in() {
        let engine = ScrollEngine::new("AB");
        // offset just past the end triggers the reseed to -width
        let (window, next) = engine.tick(3, 5);
        assert_eq!(window, "  A");
        assert_eq!(next, -2);
    }

    #[test]
    fn test_cycle_returns_to_lead_in_state() {
        let engine = ScrollEngine::new("HI");
        let width = 4;
        let mut offset = 0;
        let mut seen = Vec::new();
        for _ in 0..20 {
            let (window, next) = engine.tick(width, offset);
            seen.push((window, offset));
            offset = next;
        }
        // the full cycle repeats: the window at the top of cycle two matches
        // the window produced for the same logical lead-in position earlier
        let first_cycle = &seen[3..9];
        let second_cycle = &seen[10..16];
        let w1: Vec<&String> = first_cycle.iter().map(|(w, _)| w).collect();
        let w2: Vec<&String> = second_cycle.iter().map(|(w, _)| w).collect();
        assert_eq!(w1, w2);
    }

    #[test]
    fn test_long_text_truncated_to_width() {
        let engine = ScrollEngine::new("HELLO WORLD");
        let (window, next) = engine.tick(4, 0);
        assert_eq!(window, "HELL");
        assert_eq!(next, 1);
        let (window, _) = engine.tick(4, 6);
        assert_eq!(window, "WORL");
    }

    #[test]
    fn test_zero_width_always_empty() {
        let engine = ScrollEngine::new("TEXT");
        let mut offset = 0;
        for _ in 0..12 {
            let (window, next) = engine.tick(0, offset);
            assert_eq!(window, "");
            offset = next;
        }
    }

    #[test]
    fn test_empty_text_cycles_blanks() {
        let engine = ScrollEngine::new("");
        let windows = run(&engine, 3, 0, 6);
        // len == 0: offset 0 is in range (empty), then wrap to -3
        assert_eq!(windows, vec!["", "  ", " ", "", "", "  "]);
    }

    #[test]
    fn test_offsets_are_character_based() {
        let engine = ScrollEngine::new("héllo");
        let (window, _) = engine.tick(3, 1);
        assert_eq!(window, "éll");
    }
}
