use std::fmt::Write as _;

pub(crate) const BAR_WIDTH: f32 = 3.0;
pub(crate) const BAR_GAP: f32 = 2.0;
pub(crate) const VIEW_HEIGHT: f32 = 10.0;
pub(crate) const MIN_BAR_HEIGHT: f32 = 2.0;
/// Threshold of the first-paint scale.
pub(crate) const SOFT_MINIMUM: f32 = 5.0;

const CORNER_RADIUS: f32 = 1.0;

/// How sample values map to bar heights.
///
/// The first paint uses `SoftMinimum`, every render after the first live
/// event uses `Linear`. The two disagree about what a tall bar means; both
/// are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Linear from `MIN_BAR_HEIGHT` to `VIEW_HEIGHT` over `[0, SOFT_MINIMUM]`,
    /// then inverted: the largest sample (at least `SOFT_MINIMUM`) gets height
    /// 0 and `SOFT_MINIMUM` gets the full height.
    SoftMinimum,
    /// `max(MIN_BAR_HEIGHT, VIEW_HEIGHT * v / max(1, max))`.
    Linear,
}

impl Scale {
    fn bar_height(self, value: u64, peak: u64) -> f32 {
        let v = value as f32;
        match self {
            Scale::SoftMinimum => {
                if v <= SOFT_MINIMUM {
                    MIN_BAR_HEIGHT + (VIEW_HEIGHT - MIN_BAR_HEIGHT) * v / SOFT_MINIMUM
                } else {
                    let top = (peak as f32).max(SOFT_MINIMUM);
                    // v > SOFT_MINIMUM implies top > SOFT_MINIMUM
                    VIEW_HEIGHT * (top - v) / (top - SOFT_MINIMUM)
                }
            }
            Scale::Linear => {
                let top = peak.max(1) as f32;
                (VIEW_HEIGHT * v / top).max(MIN_BAR_HEIGHT)
            }
        }
    }
}

/// One rounded bar, in viewport units. `y` grows downward from the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A fully rendered sparkline. Every render produces a new value; nothing
/// is patched incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkline {
    pub width: f32,
    pub height: f32,
    pub bars: Vec<Bar>,
}

/// Surface width for `n` bars.
pub fn surface_width(n: usize) -> f32 {
    if n == 0 {
        return 0.0;
    }
    BAR_WIDTH * n as f32 + BAR_GAP * (n - 1) as f32
}

/// Lay out `history` (oldest first) as bars growing up from the baseline.
pub fn render(history: &[u64], scale: Scale) -> Sparkline {
    let peak = history.iter().copied().max().unwrap_or(0);
    let bars = history
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let height = scale.bar_height(value, peak);
            Bar {
                x: i as f32 * (BAR_WIDTH + BAR_GAP),
                y: VIEW_HEIGHT - height,
                width: BAR_WIDTH,
                height,
            }
        })
        .collect();
    Sparkline {
        width: surface_width(history.len()),
        height: VIEW_HEIGHT,
        bars,
    }
}

impl Sparkline {
    /// Serialize to a standalone SVG document filled with `fill`
    /// (any SVG color, e.g. `#33ff66`).
    pub fn to_svg(&self, fill: &str) -> String {
        let mut out = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );
        for bar in &self.bars {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{CORNER_RADIUS}" fill="{fill}"/>"#,
                bar.x, bar.y, bar.width, bar.height
            );
        }
        out.push_str("</svg>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heights(s: &Sparkline) -> Vec<f32> {
        s.bars.iter().map(|b| b.height).collect()
    }

    #[test]
    fn width_follows_bar_count() {
        assert_eq!(surface_width(8), 3.0 * 8.0 + 2.0 * 7.0);
        assert_eq!(surface_width(1), 3.0);
        assert_eq!(surface_width(0), 0.0);
        assert_eq!(render(&[1, 2, 3], Scale::Linear).width, 13.0);
    }

    #[test]
    fn bars_are_laid_out_left_to_right_on_the_baseline() {
        let s = render(&[0, 5, 10], Scale::Linear);
        let xs: Vec<f32> = s.bars.iter().map(|b| b.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0]);
        for bar in &s.bars {
            assert_eq!(bar.y + bar.height, VIEW_HEIGHT);
            assert_eq!(bar.width, BAR_WIDTH);
        }
    }

    #[test]
    fn linear_heights_stay_within_bounds() {
        let histories: [&[u64]; 5] = [
            &[0; 8],
            &[1, 2, 3, 4, 5, 6, 7, 8],
            &[100, 0, 0, 0, 0, 0, 0, 1],
            &[7; 8],
            &[u64::from(u32::MAX), 3, 9, 0, 12, 1, 1, 2],
        ];
        for h in histories {
            let s = render(h, Scale::Linear);
            assert_eq!(s.bars.len(), h.len());
            for height in heights(&s) {
                assert!(height >= MIN_BAR_HEIGHT, "{height} below floor for {h:?}");
                assert!(height <= VIEW_HEIGHT, "{height} above viewport for {h:?}");
            }
        }
    }

    #[test]
    fn linear_scale_grows_with_value() {
        let s = render(&[0, 5, 10], Scale::Linear);
        assert_eq!(heights(&s), vec![2.0, 5.0, 10.0]);
    }

    #[test]
    fn soft_minimum_is_linear_up_to_threshold() {
        let s = render(&[0, 5], Scale::SoftMinimum);
        assert_eq!(heights(&s), vec![MIN_BAR_HEIGHT, VIEW_HEIGHT]);
        let mid = render(&[2], Scale::SoftMinimum);
        assert!((mid.bars[0].height - 5.2).abs() < 1e-5);
    }

    #[test]
    fn soft_minimum_inverts_above_threshold() {
        let s = render(&[5, 10, 15], Scale::SoftMinimum);
        assert_eq!(heights(&s), vec![10.0, 5.0, 0.0]);
    }

    #[test]
    fn to_svg_emits_one_rect_per_bar() {
        let svg = render(&[1, 2, 3, 4], Scale::Linear).to_svg("#33ff66");
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 4);
        assert!(svg.contains(r##"fill="#33ff66""##));
        assert!(svg.contains(r#"viewBox="0 0 18 10""#));
    }
}
