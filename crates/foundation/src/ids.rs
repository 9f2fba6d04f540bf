use std::fmt;
use std::str::FromStr;

/// Address of a map tile in the `z/x/y` pyramid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    pub const fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// `2^z` as a float, the number of tiles along one axis at this zoom.
    pub fn world_tiles(&self) -> f32 {
        f32::from(self.z).exp2()
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTileIdError {
    Format(String),
    OutOfRange { z: u8, x: u32, y: u32 },
}

impl fmt::Display for ParseTileIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseTileIdError::Format(s) => write!(f, "expected z/x/y, got {s:?}"),
            ParseTileIdError::OutOfRange { z, x, y } => {
                write!(f, "tile {x}/{y} does not exist at zoom {z}")
            }
        }
    }
}

impl std::error::Error for ParseTileIdError {}

impl FromStr for TileId {
    type Err = ParseTileIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || ParseTileIdError::Format(s.to_string());
        let mut parts = s.split('/');
        let (Some(z), Some(x), Some(y), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format_err());
        };
        let z: u8 = z.trim().parse().map_err(|_| format_err())?;
        let x: u32 = x.trim().parse().map_err(|_| format_err())?;
        let y: u32 = y.trim().parse().map_err(|_| format_err())?;
        if z > 31 || u64::from(x) >= (1u64 << z) || u64::from(y) >= (1u64 << z) {
            return Err(ParseTileIdError::OutOfRange { z, x, y });
        }
        Ok(Self { z, x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseTileIdError, TileId};

    #[test]
    fn parses_and_displays() {
        let id: TileId = "3/2/5".parse().expect("parse");
        assert_eq!(id, TileId::new(3, 2, 5));
        assert_eq!(id.to_string(), "3/2/5");
        assert_eq!(id.world_tiles(), 8.0);
    }

    #[test]
    fn world_tiles_handles_any_zoom() {
        assert_eq!(TileId::new(0, 0, 0).world_tiles(), 1.0);
        assert_eq!(TileId::new(64, 0, 0).world_tiles(), 2f32.powi(64));
        assert!(TileId::new(255, 0, 0).world_tiles().is_infinite());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            "3/2".parse::<TileId>(),
            Err(ParseTileIdError::Format(_))
        ));
        assert_eq!(
            "1/2/0".parse::<TileId>(),
            Err(ParseTileIdError::OutOfRange { z: 1, x: 2, y: 0 })
        );
    }
}
