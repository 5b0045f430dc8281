use core::{fmt::Display, str::FromStr};

/// Palette colour selectable over the wire.
///
/// [Color::Background] is not a colour but a sentinel: pixels painted with it
/// keep whatever the panel already shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
    Red = 2,
    Blue = 3,
    Yellow = 4,
    Green = 5,
    Brown = 6,
    Background = 7,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Black,
        Color::White,
        Color::Red,
        Color::Blue,
        Color::Yellow,
        Color::Green,
        Color::Brown,
        Color::Background,
    ];

    /// Wire index of the colour
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Brown => "brown",
            Color::Background => "background",
        }
    }
}

impl TryFrom<u8> for Color {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Color::ALL.get(value as usize).copied().ok_or(value)
    }
}

/// The name does not match any palette colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownColor;

impl Display for UnknownColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("unknown colour, expected one of")?;
        for color in Color::ALL {
            write!(f, " {}", color.name())?;
        }
        Ok(())
    }
}

impl core::error::Error for UnknownColor {}

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .iter()
            .copied()
            .find(|color| color.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownColor)
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_index_round_trip() {
        for color in Color::ALL {
            assert_eq!(Color::try_from(color.index()), Ok(color));
        }
        assert_eq!(Color::try_from(8), Err(8));
        assert_eq!(Color::try_from(255), Err(255));
    }

    #[test]
    fn test_color_from_str() {
        assert_eq!("white".parse::<Color>(), Ok(Color::White));
        assert_eq!("Brown".parse::<Color>(), Ok(Color::Brown));
        assert_eq!("background".parse::<Color>(), Ok(Color::Background));
        assert_eq!("purple".parse::<Color>(), Err(UnknownColor));
    }
}
