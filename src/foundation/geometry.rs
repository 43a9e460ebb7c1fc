use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{MosaicError, MosaicResult};

/// Axis-aligned integer rectangle in compositor (logical) or buffer (physical) space.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Region {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width, `>= 0` once validated.
    pub width: i32,
    /// Height, `>= 0` once validated.
    pub height: i32,
}

impl Region {
    /// Create a region from its position and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Parse `"<x>,<y> <w>x<h>"`, e.g. `"100,50 800x600"`.
    ///
    /// Separators must appear verbatim and the whole string must be consumed.
    pub fn parse(s: &str) -> MosaicResult<Self> {
        let malformed = || MosaicError::malformed_geometry(format!("'{s}'"));

        let (x, rest) = take_int(s).ok_or_else(malformed)?;
        let rest = rest.strip_prefix(',').ok_or_else(malformed)?;
        let (y, rest) = take_int(rest).ok_or_else(malformed)?;
        let rest = rest.strip_prefix(' ').ok_or_else(malformed)?;
        let (width, rest) = take_int(rest).ok_or_else(malformed)?;
        let rest = rest.strip_prefix('x').ok_or_else(malformed)?;
        let (height, rest) = take_int(rest).ok_or_else(malformed)?;
        if !rest.is_empty() {
            return Err(malformed());
        }
        if width < 0 || height < 0 {
            return Err(MosaicError::malformed_geometry(format!(
                "'{s}': width and height must not be negative"
            )));
        }

        Ok(Self::new(x, y, width, height))
    }

    /// Return `true` when the region covers no area.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Return `true` when both regions share a non-zero area.
    ///
    /// Touching edges do not count.
    pub fn intersects(self, other: Region) -> bool {
        let (ax, ay, bx, by) = (
            i64::from(self.x),
            i64::from(self.y),
            i64::from(other.x),
            i64::from(other.y),
        );
        ax < bx + i64::from(other.width)
            && bx < ax + i64::from(self.width)
            && ay < by + i64::from(other.height)
            && by < ay + i64::from(self.height)
    }

    /// Exclusive right edge.
    pub fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }
}

/// Smallest region containing every input region, `None` for an empty collection.
pub fn union_extents<I>(regions: I) -> Option<Region>
where
    I: IntoIterator<Item = Region>,
{
    let mut iter = regions.into_iter();
    let first = iter.next()?;
    let (mut x1, mut y1, mut x2, mut y2) = (first.x, first.y, first.right(), first.bottom());
    for r in iter {
        x1 = x1.min(r.x);
        y1 = y1.min(r.y);
        x2 = x2.max(r.right());
        y2 = y2.max(r.bottom());
    }
    Some(Region::new(
        x1,
        y1,
        x2.saturating_sub(x1),
        y2.saturating_sub(y1),
    ))
}

fn take_int(s: &str) -> Option<(i32, &str)> {
    let bytes = s.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let end = sign_len + digits;
    let value = s[..end].parse::<i32>().ok()?;
    Some((value, &s[end..]))
}

impl FromStr for Region {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
