//! Colors in RGB or CMYK representation
//!
//! A color is either empty, an ARGB value packed in 32 bits, or a CMYK
//! value with an alpha channel (all channels in percent). Each
//! representation can be read through the other one. A CMYK-backed color
//! rejects writes through its RGB channels.

use crate::{DomError, Result};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
enum ColorRepr {
    #[default]
    Empty,
    Rgb(u32),
    Cmyk {
        alpha: f64,
        cyan: f64,
        magenta: f64,
        yellow: f64,
        black: f64,
    },
}

/// A color value. `Color::EMPTY` differs from transparent black.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Color {
    repr: ColorRepr,
}

const NAMED_COLORS: &[(&str, u32)] = &[
    ("Black", 0xFF00_0000),
    ("White", 0xFFFF_FFFF),
    ("Red", 0xFFFF_0000),
    ("Green", 0xFF00_8000),
    ("Lime", 0xFF00_FF00),
    ("Blue", 0xFF00_00FF),
    ("Yellow", 0xFFFF_FF00),
    ("Cyan", 0xFF00_FFFF),
    ("Magenta", 0xFFFF_00FF),
    ("Gray", 0xFF80_8080),
    ("DarkGray", 0xFFA9_A9A9),
    ("LightGray", 0xFFD3_D3D3),
    ("Silver", 0xFFC0_C0C0),
    ("Maroon", 0xFF80_0000),
    ("Olive", 0xFF80_8000),
    ("Navy", 0xFF00_0080),
    ("Purple", 0xFF80_0080),
    ("Teal", 0xFF00_8080),
    ("Orange", 0xFFFF_A500),
    ("Brown", 0xFFA5_2A2A),
    ("Pink", 0xFFFF_C0CB),
];

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn rgb_to_cmyk(argb: u32) -> (f64, f64, f64, f64) {
    let r = f64::from((argb >> 16) & 0xFF) / 255.0;
    let g = f64::from((argb >> 8) & 0xFF) / 255.0;
    let b = f64::from(argb & 0xFF) / 255.0;
    let (c, m, y) = (1.0 - r, 1.0 - g, 1.0 - b);
    let k = c.min(m).min(y);
    if k >= 1.0 {
        return (0.0, 0.0, 0.0, 100.0);
    }
    (
        (c - k) / (1.0 - k) * 100.0,
        (m - k) / (1.0 - k) * 100.0,
        (y - k) / (1.0 - k) * 100.0,
        k * 100.0,
    )
}

fn cmyk_to_argb(alpha: f64, c: f64, m: f64, y: f64, k: f64) -> u32 {
    let remaining = 1.0 - k / 100.0;
    let channel = |ink: f64| (255.0 * (1.0 - ink / 100.0) * remaining).round() as u32;
    let a = (alpha * 2.55).round() as u32;
    (a << 24) | (channel(c) << 16) | (channel(m) << 8) | channel(y)
}

impl Color {
    /// The empty color
    pub const EMPTY: Color = Color {
        repr: ColorRepr::Empty,
    };

    pub const BLACK: Color = Color {
        repr: ColorRepr::Rgb(0xFF00_0000),
    };
    pub const WHITE: Color = Color {
        repr: ColorRepr::Rgb(0xFFFF_FFFF),
    };
    pub const RED: Color = Color {
        repr: ColorRepr::Rgb(0xFFFF_0000),
    };
    pub const BLUE: Color = Color {
        repr: ColorRepr::Rgb(0xFF00_00FF),
    };

    pub fn from_argb_u32(argb: u32) -> Self {
        Self {
            repr: ColorRepr::Rgb(argb),
        }
    }

    pub fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self::from_argb_u32(
            (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b),
        )
    }

    /// Opaque RGB color
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(0xFF, r, g, b)
    }

    /// Opaque CMYK color; channels in percent, clamped to 0..=100
    pub fn from_cmyk(cyan: f64, magenta: f64, yellow: f64, black: f64) -> Self {
        Self::from_acmyk(100.0, cyan, magenta, yellow, black)
    }

    /// CMYK color with alpha; all channels in percent, clamped to 0..=100
    pub fn from_acmyk(alpha: f64, cyan: f64, magenta: f64, yellow: f64, black: f64) -> Self {
        Self {
            repr: ColorRepr::Cmyk {
                alpha: clamp_percent(alpha),
                cyan: clamp_percent(cyan),
                magenta: clamp_percent(magenta),
                yellow: clamp_percent(yellow),
                black: clamp_percent(black),
            },
        }
    }

    /// Look up a named color (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, argb)| Self::from_argb_u32(argb))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.repr, ColorRepr::Empty)
    }

    pub fn is_cmyk(&self) -> bool {
        matches!(self.repr, ColorRepr::Cmyk { .. })
    }

    /// Packed ARGB value; CMYK colors are converted, the empty color is 0
    pub fn argb(&self) -> u32 {
        match self.repr {
            ColorRepr::Empty => 0,
            ColorRepr::Rgb(argb) => argb,
            ColorRepr::Cmyk {
                alpha,
                cyan,
                magenta,
                yellow,
                black,
            } => cmyk_to_argb(alpha, cyan, magenta, yellow, black),
        }
    }

    pub fn a(&self) -> u8 {
        (self.argb() >> 24) as u8
    }

    pub fn r(&self) -> u8 {
        (self.argb() >> 16) as u8
    }

    pub fn g(&self) -> u8 {
        (self.argb() >> 8) as u8
    }

    pub fn b(&self) -> u8 {
        self.argb() as u8
    }

    fn cmyk(&self) -> (f64, f64, f64, f64) {
        match self.repr {
            ColorRepr::Cmyk {
                cyan,
                magenta,
                yellow,
                black,
                ..
            } => (cyan, magenta, yellow, black),
            _ => rgb_to_cmyk(self.argb()),
        }
    }

    /// Alpha in percent
    pub fn alpha(&self) -> f64 {
        match self.repr {
            ColorRepr::Cmyk { alpha, .. } => alpha,
            _ => f64::from(self.a()) / 2.55,
        }
    }

    pub fn c(&self) -> f64 {
        self.cmyk().0
    }

    pub fn m(&self) -> f64 {
        self.cmyk().1
    }

    pub fn y(&self) -> f64 {
        self.cmyk().2
    }

    pub fn k(&self) -> f64 {
        self.cmyk().3
    }

    /// Replace the ARGB value. Fails on CMYK colors.
    pub fn set_argb(&mut self, argb: u32) -> Result<()> {
        if self.is_cmyk() {
            return Err(DomError::CmykColorIsReadOnly);
        }
        self.repr = ColorRepr::Rgb(argb);
        Ok(())
    }

    /// Replace the RGB channels, keeping alpha (opaque for the empty color).
    /// Fails on CMYK colors.
    pub fn set_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<()> {
        if self.is_cmyk() {
            return Err(DomError::CmykColorIsReadOnly);
        }
        let alpha = if self.is_empty() { 0xFF } else { self.a() };
        *self = Self::from_argb(alpha, r, g, b);
        Ok(())
    }

    fn name(&self) -> Option<&'static str> {
        if self.is_cmyk() {
            return None;
        }
        let argb = self.argb();
        NAMED_COLORS
            .iter()
            .find(|&&(_, value)| value == argb)
            .map(|&(name, _)| name)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        match (self.repr, other.repr) {
            (ColorRepr::Empty, ColorRepr::Empty) => true,
            (ColorRepr::Empty, _) | (_, ColorRepr::Empty) => false,
            (ColorRepr::Cmyk { .. }, ColorRepr::Cmyk { .. }) => {
                let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
                close(self.alpha(), other.alpha())
                    && close(self.c(), other.c())
                    && close(self.m(), other.m())
                    && close(self.y(), other.y())
                    && close(self.k(), other.k())
            }
            _ => self.argb() == other.argb(),
        }
    }
}

fn function_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^(rgb|cmyk)\s*\(([^)]*)\)$").ok())
        .as_ref()
}

fn parse_hex(digits: &str, original: &str) -> Result<Color> {
    let invalid = || DomError::InvalidColor(original.to_string());
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
    match digits.len() {
        6 => Ok(Color::from_argb_u32(0xFF00_0000 | value)),
        8 => Ok(Color::from_argb_u32(value)),
        _ => Err(invalid()),
    }
}

impl FromStr for Color {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = || DomError::InvalidColor(s.to_string());
        if text.is_empty() {
            return Ok(Color::EMPTY);
        }
        if let Some(digits) = text.strip_prefix('#') {
            return parse_hex(digits, s);
        }
        if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            return parse_hex(digits, s);
        }
        if let Some(caps) = function_pattern().and_then(|re| re.captures(text)) {
            let args: Vec<f64> = caps[2]
                .split(',')
                .map(|part| part.trim().parse::<f64>())
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| invalid())?;
            let byte = |v: f64| -> Result<u8> {
                if (0.0..=255.0).contains(&v) && v.fract() == 0.0 {
                    Ok(v as u8)
                } else {
                    Err(invalid())
                }
            };
            return match (caps[1].to_ascii_lowercase().as_str(), args.as_slice()) {
                ("rgb", &[r, g, b]) => Ok(Color::from_rgb(byte(r)?, byte(g)?, byte(b)?)),
                ("cmyk", &[c, m, y, k]) => Ok(Color::from_cmyk(c, m, y, k)),
                ("cmyk", &[a, c, m, y, k]) => Ok(Color::from_acmyk(a, c, m, y, k)),
                _ => Err(invalid()),
            };
        }
        Color::from_name(text).ok_or_else(invalid)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            ColorRepr::Empty => Ok(()),
            ColorRepr::Cmyk {
                alpha,
                cyan,
                magenta,
                yellow,
                black,
            } => {
                if alpha >= 100.0 {
                    write!(f, "CMYK({}, {}, {}, {})", cyan, magenta, yellow, black)
                } else {
                    write!(
                        f,
                        "CMYK({}, {}, {}, {}, {})",
                        alpha, cyan, magenta, yellow, black
                    )
                }
            }
            ColorRepr::Rgb(argb) => {
                if let Some(name) = self.name() {
                    f.write_str(name)
                } else if self.a() == 0xFF {
                    write!(f, "RGB({}, {}, {})", self.r(), self.g(), self.b())
                } else {
                    write!(f, "0x{:08X}", argb)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_differs_from_transparent_black() {
        let transparent_black = Color::from_argb(0, 0, 0, 0);
        assert!(Color::EMPTY.is_empty());
        assert!(!transparent_black.is_empty());
        assert_ne!(Color::EMPTY, transparent_black);
        assert_eq!(Color::EMPTY.argb(), transparent_black.argb());
    }

    #[test]
    fn test_cmyk_of_primaries() {
        let red = Color::from_rgb(255, 0, 0);
        assert!((red.c() - 0.0).abs() < 1e-9);
        assert!((red.m() - 100.0).abs() < 1e-9);
        assert!((red.y() - 100.0).abs() < 1e-9);
        assert!((red.k() - 0.0).abs() < 1e-9);

        let black = Color::from_rgb(0, 0, 0);
        assert_eq!((black.c(), black.m(), black.y(), black.k()), (0.0, 0.0, 0.0, 100.0));
    }

    #[test]
    fn test_cmyk_is_read_only_for_rgb_writes() {
        let mut color = Color::from_cmyk(10.0, 20.0, 30.0, 40.0);
        assert!(matches!(color.set_argb(0xFF00_0000), Err(DomError::CmykColorIsReadOnly)));
        assert!(matches!(color.set_rgb(1, 2, 3), Err(DomError::CmykColorIsReadOnly)));
        assert!(color.is_cmyk());

        let mut rgb = Color::from_rgb(1, 2, 3);
        rgb.set_rgb(4, 5, 6).unwrap();
        assert_eq!(rgb, Color::from_rgb(4, 5, 6));
        let mut empty = Color::EMPTY;
        empty.set_rgb(4, 5, 6).unwrap();
        assert_eq!(empty.a(), 0xFF);
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!("#FF0000".parse::<Color>().unwrap(), Color::from_rgb(255, 0, 0));
        assert_eq!("#80FF0000".parse::<Color>().unwrap().a(), 0x80);
        assert_eq!("0xFF00FF00".parse::<Color>().unwrap(), Color::from_rgb(0, 255, 0));
        assert_eq!("rgb(1, 2, 3)".parse::<Color>().unwrap(), Color::from_rgb(1, 2, 3));
        assert_eq!("navy".parse::<Color>().unwrap(), Color::from_rgb(0, 0, 128));
        let cmyk: Color = "CMYK(10, 20, 30, 40)".parse().unwrap();
        assert!(cmyk.is_cmyk());
        assert!((cmyk.k() - 40.0).abs() < 1e-9);
        let translucent: Color = "CMYK(50, 10, 20, 30, 40)".parse().unwrap();
        assert!((translucent.alpha() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_errors_carry_input() {
        for input in ["#12345", "RGB(1,2)", "RGB(300, 0, 0)", "chartreuse-ish", "0xZZ"] {
            match input.parse::<Color>() {
                Err(DomError::InvalidColor(text)) => assert_eq!(text, input),
                other => panic!("unexpected result for {}: {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::from_rgb(0, 0, 0).to_string(), "Black");
        assert_eq!(Color::from_rgb(1, 2, 3).to_string(), "RGB(1, 2, 3)");
        assert_eq!(Color::from_argb(0x80, 1, 2, 3).to_string(), "0x80010203");
        assert_eq!(Color::from_cmyk(10.0, 20.0, 30.0, 40.0).to_string(), "CMYK(10, 20, 30, 40)");
        assert_eq!(Color::EMPTY.to_string(), "");
    }

    proptest! {
        #[test]
        fn prop_rgb_cmyk_round_trip(a in 0u8..=255, r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let original = Color::from_argb(a, r, g, b);
            let rebuilt = Color::from_acmyk(
                original.alpha(),
                original.c(),
                original.m(),
                original.y(),
                original.k(),
            );
            prop_assert!((i32::from(rebuilt.r()) - i32::from(r)).abs() <= 1);
            prop_assert!((i32::from(rebuilt.g()) - i32::from(g)).abs() <= 1);
            prop_assert!((i32::from(rebuilt.b()) - i32::from(b)).abs() <= 1);
            prop_assert!((i32::from(rebuilt.a()) - i32::from(a)).abs() <= 1);
        }

        #[test]
        fn prop_display_parse_round_trip(a in 0u8..=255, r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let original = Color::from_argb(a, r, g, b);
            let parsed: Color = original.to_string().parse().unwrap();
            prop_assert_eq!(parsed, original);
        }
    }
}
