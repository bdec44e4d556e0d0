/// Number of characters visible at once.
pub(crate) const WINDOW_CHARS: usize = 17;
pub(crate) const TICK_MS: u64 = 300;
/// Delay between attaching and the first marquee tick.
pub(crate) const ACTIVATION_DELAY_MS: u64 = 100;
/// Dwell at the start of the title, before scrolling forward again.
const START_PAUSE_TICKS: u32 = 16;
/// Dwell at the end of the title, before scrolling back.
const END_PAUSE_TICKS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Bouncing scroll over a title that is wider than the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marquee {
    title: Vec<char>,
    pub cursor: usize,
    pub direction: Direction,
    pub pause_ticks: u32,
    visible: String,
}

/// Whether `title` needs scrolling at all.
pub fn overflows(title: &str) -> bool {
    title.chars().count() > WINDOW_CHARS
}

impl Marquee {
    pub fn new(title: &str) -> Self {
        let mut marquee = Self {
            title: title.chars().collect(),
            cursor: 0,
            direction: Direction::Forward,
            pause_ticks: 0,
            visible: String::new(),
        };
        marquee.visible = marquee.window();
        marquee
    }

    /// The text currently on screen.
    pub fn visible(&self) -> &str {
        &self.visible
    }

    fn max_index(&self) -> usize {
        self.title.len().saturating_sub(WINDOW_CHARS)
    }

    fn window(&self) -> String {
        self.title
            .iter()
            .skip(self.cursor)
            .take(WINDOW_CHARS)
            .collect()
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if self.pause_ticks > 0 {
            self.pause_ticks -= 1;
            return;
        }

        self.visible = self.window();

        let at_end = match self.direction {
            Direction::Forward => self.cursor >= self.max_index(),
            Direction::Backward => self.cursor == 0,
        };
        if at_end {
            self.direction = match self.direction {
                Direction::Forward => Direction::Backward,
                Direction::Backward => Direction::Forward,
            };
            self.pause_ticks = match self.direction {
                Direction::Forward => START_PAUSE_TICKS,
                Direction::Backward => END_PAUSE_TICKS,
            };
            return;
        }

        match self.direction {
            Direction::Forward => self.cursor += 1,
            Direction::Backward => self.cursor -= 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE_25: &str = "ABCDEFGHIJKLMNOPQRSTUVWXY";

    #[test]
    fn overflow_threshold() {
        assert!(!overflows("exactly 17 chars!"));
        assert!(overflows("eighteen chars!!!!"));
        // counted in chars, not bytes
        assert!(!overflows("ÄÖÜäöüÄÖÜäöüÄÖÜäö"));
    }

    #[test]
    fn starts_at_the_beginning() {
        let m = Marquee::new(TITLE_25);
        assert_eq!(m.cursor, 0);
        assert_eq!(m.direction, Direction::Forward);
        assert_eq!(m.visible(), "ABCDEFGHIJKLMNOPQ");
    }

    #[test]
    fn forward_ticks_advance_the_window() {
        let mut m = Marquee::new(TITLE_25);
        m.tick();
        assert_eq!(m.visible(), "ABCDEFGHIJKLMNOPQ");
        assert_eq!(m.cursor, 1);
        m.tick();
        assert_eq!(m.visible(), "BCDEFGHIJKLMNOPQR");
        assert_eq!(m.cursor, 2);
    }

    #[test]
    fn end_of_title_reverses_with_short_pause() {
        let mut m = Marquee::new(TITLE_25);
        m.cursor = 8;
        m.tick();
        assert_eq!(m.direction, Direction::Backward);
        assert_eq!(m.pause_ticks, 8);
        assert_eq!(m.cursor, 8);
        assert_eq!(m.visible(), "IJKLMNOPQRSTUVWXY");
    }

    #[test]
    fn start_of_title_reverses_with_long_pause() {
        let mut m = Marquee::new(TITLE_25);
        m.direction = Direction::Backward;
        m.cursor = 0;
        m.tick();
        assert_eq!(m.direction, Direction::Forward);
        assert_eq!(m.pause_ticks, 16);
        assert_eq!(m.cursor, 0);
    }

    #[test]
    fn paused_ticks_change_nothing_but_the_counter() {
        let mut m = Marquee::new(TITLE_25);
        m.cursor = 8;
        m.tick();
        let before = m.visible().to_string();
        for remaining in (0..8).rev() {
            m.tick();
            assert_eq!(m.pause_ticks, remaining);
            assert_eq!(m.cursor, 8);
            assert_eq!(m.visible(), before);
        }
        m.tick();
        assert_eq!(m.cursor, 7);
    }

    #[test]
    fn full_bounce_cycle_returns_to_start() {
        let mut m = Marquee::new(TITLE_25);
        // 8 moves + reverse, 8 pause, 8 moves back + reverse, 16 pause
        for _ in 0..(9 + 8 + 9 + 16) {
            m.tick();
        }
        assert_eq!(m.cursor, 0);
        assert_eq!(m.direction, Direction::Forward);
        assert_eq!(m.pause_ticks, 0);
        m.tick();
        assert_eq!(m.cursor, 1);
    }

    #[test]
    fn multibyte_titles_slice_on_char_boundaries() {
        let mut m = Marquee::new("日本語のタイトルがとても長い場合のテスト");
        for _ in 0..40 {
            m.tick();
            assert!(m.visible().chars().count() <= WINDOW_CHARS);
        }
    }
}
