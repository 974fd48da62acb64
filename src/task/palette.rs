#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TodoError;

/// One of the seven fixed tag colors a task can carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskColor {
    CoralRed,
    Turquoise,
    SkyBlue,
    SoftYellow,
    Purple,
    MintGreen,
    Pink,
}

/// Palette in picker order. The first entry is the default for new tasks.
pub const PALETTE: [TaskColor; 7] = [
    TaskColor::CoralRed,
    TaskColor::Turquoise,
    TaskColor::SkyBlue,
    TaskColor::SoftYellow,
    TaskColor::Purple,
    TaskColor::MintGreen,
    TaskColor::Pink,
];

impl Default for TaskColor {
    fn default() -> Self {
        PALETTE[0]
    }
}

impl TaskColor {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TaskColor::CoralRed => "coral-red",
            TaskColor::Turquoise => "turquoise",
            TaskColor::SkyBlue => "sky-blue",
            TaskColor::SoftYellow => "soft-yellow",
            TaskColor::Purple => "purple",
            TaskColor::MintGreen => "mint-green",
            TaskColor::Pink => "pink",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TaskColor::CoralRed => "Coral Red",
            TaskColor::Turquoise => "Turquoise",
            TaskColor::SkyBlue => "Sky Blue",
            TaskColor::SoftYellow => "Soft Yellow",
            TaskColor::Purple => "Purple",
            TaskColor::MintGreen => "Mint Green",
            TaskColor::Pink => "Pink",
        }
    }

    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            TaskColor::CoralRed => "#FF6B6B",
            TaskColor::Turquoise => "#4ECDC4",
            TaskColor::SkyBlue => "#45B7D1",
            TaskColor::SoftYellow => "#FDCB6E",
            TaskColor::Purple => "#6C5CE7",
            TaskColor::MintGreen => "#A8E6CF",
            TaskColor::Pink => "#FF8ED4",
        }
    }

    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            TaskColor::CoralRed => (0xFF, 0x6B, 0x6B),
            TaskColor::Turquoise => (0x4E, 0xCD, 0xC4),
            TaskColor::SkyBlue => (0x45, 0xB7, 0xD1),
            TaskColor::SoftYellow => (0xFD, 0xCB, 0x6E),
            TaskColor::Purple => (0x6C, 0x5C, 0xE7),
            TaskColor::MintGreen => (0xA8, 0xE6, 0xCF),
            TaskColor::Pink => (0xFF, 0x8E, 0xD4),
        }
    }

    /// Zero-based position in [`PALETTE`].
    #[must_use]
    pub fn index(self) -> usize {
        PALETTE.iter().position(|c| *c == self).unwrap_or(0)
    }

    #[must_use]
    pub fn from_index(idx: usize) -> Option<Self> {
        PALETTE.get(idx).copied()
    }

    /// Light swatches read better with dark text on top.
    #[must_use]
    pub fn is_light(self) -> bool {
        let (r, g, b) = self.rgb();
        let luma = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
        luma > 160_000
    }
}

impl fmt::Display for TaskColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskColor {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let lower = raw.to_ascii_lowercase().replace(['_', ' '], "-");

        if let Ok(pos) = lower.parse::<usize>() {
            return pos
                .checked_sub(1)
                .and_then(Self::from_index)
                .ok_or_else(|| TodoError::UnknownColor(raw.to_owned()));
        }

        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        PALETTE
            .iter()
            .copied()
            .find(|c| c.name() == lower || c.hex()[1..].eq_ignore_ascii_case(hex))
            .ok_or_else(|| TodoError::UnknownColor(raw.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn palette_order_matches_picker() {
        assert_eq!(PALETTE.len(), 7);
        assert_eq!(TaskColor::default(), TaskColor::CoralRed);
        for (i, c) in PALETTE.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(TaskColor::from_index(i), Some(*c));
        }
        assert_eq!(TaskColor::from_index(7), None);
    }

    #[rstest]
    #[case("coral-red", TaskColor::CoralRed)]
    #[case("Sky Blue", TaskColor::SkyBlue)]
    #[case("mint_green", TaskColor::MintGreen)]
    #[case("#FDCB6E", TaskColor::SoftYellow)]
    #[case("6c5ce7", TaskColor::Purple)]
    #[case("2", TaskColor::Turquoise)]
    #[case(" 7 ", TaskColor::Pink)]
    fn parses_names_hex_and_positions(#[case] input: &str, #[case] expected: TaskColor) {
        assert_eq!(input.parse::<TaskColor>().unwrap(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("8")]
    #[case("magenta")]
    #[case("#000000")]
    #[case("")]
    fn rejects_colors_outside_the_palette(#[case] input: &str) {
        assert!(matches!(
            input.parse::<TaskColor>(),
            Err(TodoError::UnknownColor(_))
        ));
    }

    #[test]
    fn hex_and_rgb_agree() {
        for c in PALETTE {
            let (r, g, b) = c.rgb();
            assert_eq!(format!("#{r:02X}{g:02X}{b:02X}"), c.hex());
        }
    }

    #[test]
    fn serde_uses_kebab_names() {
        let json = serde_json::to_string(&TaskColor::SoftYellow).unwrap();
        assert_eq!(json, "\"soft-yellow\"");
        let back: TaskColor = serde_json::from_str("\"mint-green\"").unwrap();
        assert_eq!(back, TaskColor::MintGreen);
    }
}
