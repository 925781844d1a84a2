use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: f64,
}

impl Hsl {
    pub const fn new(hue: u16, saturation: u8, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

impl Serialize for Hsl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub const ROOT_COLOR: Hsl = Hsl::new(0, 0, 100.0);

pub const GROUP_PALETTE: [Hsl; 15] = [
    Hsl::new(217, 91, 50.0),
    Hsl::new(142, 71, 40.0),
    Hsl::new(32, 95, 50.0),
    Hsl::new(270, 60, 55.0),
    Hsl::new(340, 80, 50.0),
    Hsl::new(180, 80, 35.0),
    Hsl::new(45, 95, 45.0),
    Hsl::new(0, 75, 50.0),
    Hsl::new(195, 85, 45.0),
    Hsl::new(240, 50, 50.0),
    Hsl::new(80, 70, 40.0),
    Hsl::new(300, 60, 40.0),
    Hsl::new(20, 80, 45.0),
    Hsl::new(160, 60, 40.0),
    Hsl::new(200, 30, 40.0),
];

const CHILD_LIGHTEN: f64 = 10.0;
const CHILD_LIGHTNESS_CEILING: f64 = 92.0;

/// Color of the group at `position` in sorted order; wraps around.
pub fn group_color(position: usize) -> Hsl {
    GROUP_PALETTE[position % GROUP_PALETTE.len()]
}

/// Shades of `base` for `count` children, lightest last.
pub fn child_shades(base: Hsl, count: usize) -> Vec<Hsl> {
    let first = (base.lightness + CHILD_LIGHTEN).min(CHILD_LIGHTNESS_CEILING);
    if count <= 1 {
        return vec![Hsl { lightness: first, ..base }; count];
    }

    let step = (CHILD_LIGHTNESS_CEILING - first) / (count - 1) as f64;
    (0..count)
        .map(|index| Hsl {
            lightness: round_hundredths(first + step * index as f64),
            ..base
        })
        .collect()
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub const TREND_PALETTE: [&str; 15] = [
    "#3b82f6", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#14b8a6", "#eab308", "#ef4444",
    "#06b6d4", "#6366f1", "#84cc16", "#d946ef", "#f97316", "#10b981", "#64748b",
];

/// Stable color for a trend series, derived from a 32-bit string hash so the
/// same group keeps its color across periods and files.
pub fn trend_color(name: &str) -> &'static str {
    let mut hash: i64 = 0;
    for unit in name.encode_utf16() {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        hash = i64::from(unit) + (shifted - hash);
    }
    let index = (hash.unsigned_abs() % TREND_PALETTE.len() as u64) as usize;
    TREND_PALETTE[index]
}
