//! Output rotation/flip states as reported by the display server.

use std::f64::consts::{FRAC_PI_2, PI};

/// Rotation (counter-clockwise, in quarter turns) combined with an optional horizontal flip.
///
/// Discriminants match the `wl_output.transform` protocol values.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum OutputTransform {
    /// No transform.
    #[default]
    #[serde(rename = "normal")]
    Normal = 0,
    /// 90 degrees.
    #[serde(rename = "90")]
    Rotate90 = 1,
    /// 180 degrees.
    #[serde(rename = "180")]
    Rotate180 = 2,
    /// 270 degrees.
    #[serde(rename = "270")]
    Rotate270 = 3,
    /// Horizontal flip.
    #[serde(rename = "flipped")]
    Flipped = 4,
    /// Flip, then 90 degrees.
    #[serde(rename = "flipped-90")]
    Flipped90 = 5,
    /// Flip, then 180 degrees.
    #[serde(rename = "flipped-180")]
    Flipped180 = 6,
    /// Flip, then 270 degrees.
    #[serde(rename = "flipped-270")]
    Flipped270 = 7,
}

impl OutputTransform {
    const ALL: [OutputTransform; 8] = [
        Self::Normal,
        Self::Rotate90,
        Self::Rotate180,
        Self::Rotate270,
        Self::Flipped,
        Self::Flipped90,
        Self::Flipped180,
        Self::Flipped270,
    ];

    /// Decode a protocol value, `None` outside `0..=7`.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Protocol value.
    pub fn raw(self) -> u32 {
        self as u32
    }

    /// Rotation in quarter turns, `0..=3`.
    pub fn quarter_turns(self) -> u8 {
        (self as u8) & 0b11
    }

    /// Whether the flip bit is set.
    pub fn is_flipped(self) -> bool {
        (self as u8) & 0b100 != 0
    }

    /// Swap `w` and `h` for 90 and 270 degree rotations.
    pub fn apply_to_dimensions<T>(self, w: T, h: T) -> (T, T) {
        if self.quarter_turns() % 2 == 1 {
            (h, w)
        } else {
            (w, h)
        }
    }

    /// Rotation angle ignoring the flip bit.
    pub fn rotation_radians(self) -> f64 {
        match self.quarter_turns() {
            1 => FRAC_PI_2,
            2 => PI,
            3 => 3.0 * FRAC_PI_2,
            _ => 0.0,
        }
    }

    /// `-1.0` when flipped, `1.0` otherwise.
    pub fn flip_sign(self) -> f64 {
        if self.is_flipped() { -1.0 } else { 1.0 }
    }

    /// The transform that undoes `self`.
    ///
    /// Flipped states are reflections and therefore their own inverse.
    pub fn inverse(self) -> Self {
        match self {
            Self::Rotate90 => Self::Rotate270,
            Self::Rotate270 => Self::Rotate90,
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/output.rs"]
mod tests;
