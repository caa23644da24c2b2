//! Length values with a unit of measure
//!
//! A [`Unit`] keeps the number and the unit it was given in, so that a
//! value created as `2.5cm` serializes back as `2.5cm`. Conversions go
//! through points: 72 pt per inch, 2.54 cm per inch, 25.4 mm per inch and
//! 12 pt per pica.

use crate::{DomError, Result};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Unit of measure of a [`Unit`] value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    Point,
    Centimeter,
    Millimeter,
    Inch,
    Pica,
}

impl UnitType {
    /// All unit types, in declaration order
    pub const ALL: [UnitType; 5] = [
        UnitType::Point,
        UnitType::Centimeter,
        UnitType::Millimeter,
        UnitType::Inch,
        UnitType::Pica,
    ];

    /// Suffix used in DDL (`pt`, `cm`, `mm`, `in`, `pc`)
    pub fn suffix(self) -> &'static str {
        match self {
            UnitType::Point => "pt",
            UnitType::Centimeter => "cm",
            UnitType::Millimeter => "mm",
            UnitType::Inch => "in",
            UnitType::Pica => "pc",
        }
    }

    /// Number of points in one of this unit
    pub fn points_per_unit(self) -> f64 {
        match self {
            UnitType::Point => 1.0,
            UnitType::Centimeter => 72.0 / 2.54,
            UnitType::Millimeter => 72.0 / 25.4,
            UnitType::Inch => 72.0,
            UnitType::Pica => 12.0,
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "" | "pt" => Some(UnitType::Point),
            "cm" => Some(UnitType::Centimeter),
            "mm" => Some(UnitType::Millimeter),
            "in" => Some(UnitType::Inch),
            "pc" => Some(UnitType::Pica),
            _ => None,
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitType::Point => "Point",
            UnitType::Centimeter => "Centimeter",
            UnitType::Millimeter => "Millimeter",
            UnitType::Inch => "Inch",
            UnitType::Pica => "Pica",
        };
        f.write_str(name)
    }
}

/// A length. `Unit::EMPTY` is a distinct state, not zero points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Unit {
    value: f64,
    unit_type: Option<UnitType>,
}

impl Unit {
    /// The empty unit
    pub const EMPTY: Unit = Unit {
        value: 0.0,
        unit_type: None,
    };

    /// Zero points
    pub const ZERO: Unit = Unit {
        value: 0.0,
        unit_type: Some(UnitType::Point),
    };

    pub fn new(value: f64, unit_type: UnitType) -> Self {
        Self {
            value,
            unit_type: Some(unit_type),
        }
    }

    pub fn from_point(value: f64) -> Self {
        Self::new(value, UnitType::Point)
    }

    pub fn from_centimeter(value: f64) -> Self {
        Self::new(value, UnitType::Centimeter)
    }

    pub fn from_millimeter(value: f64) -> Self {
        Self::new(value, UnitType::Millimeter)
    }

    pub fn from_inch(value: f64) -> Self {
        Self::new(value, UnitType::Inch)
    }

    pub fn from_pica(value: f64) -> Self {
        Self::new(value, UnitType::Pica)
    }

    /// True for `Unit::EMPTY`
    pub fn is_empty(&self) -> bool {
        self.unit_type.is_none()
    }

    /// The number in this value's own unit (0 when empty)
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The unit this value was given in (`None` when empty)
    pub fn unit_type(&self) -> Option<UnitType> {
        self.unit_type
    }

    /// Value expressed in `target` units (0 when empty)
    pub fn value_in(&self, target: UnitType) -> f64 {
        match self.unit_type {
            None => 0.0,
            Some(own) if own == target => self.value,
            Some(own) => self.value * own.points_per_unit() / target.points_per_unit(),
        }
    }

    pub fn point(&self) -> f64 {
        self.value_in(UnitType::Point)
    }

    pub fn centimeter(&self) -> f64 {
        self.value_in(UnitType::Centimeter)
    }

    pub fn millimeter(&self) -> f64 {
        self.value_in(UnitType::Millimeter)
    }

    pub fn inch(&self) -> f64 {
        self.value_in(UnitType::Inch)
    }

    pub fn pica(&self) -> f64 {
        self.value_in(UnitType::Pica)
    }

    /// Same length expressed in another unit. The empty unit stays empty.
    pub fn convert_to(&self, target: UnitType) -> Unit {
        if self.is_empty() {
            return Unit::EMPTY;
        }
        Unit::new(self.value_in(target), target)
    }
}

impl PartialEq for Unit {
    /// Lengths compare by their point value, so `1in == 72pt`.
    fn eq(&self, other: &Self) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => true,
            (false, false) => {
                let a = self.point();
                let b = other.point();
                (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
            }
            _ => false,
        }
    }
}

impl From<f64> for Unit {
    fn from(points: f64) -> Self {
        Unit::from_point(points)
    }
}

impl From<i32> for Unit {
    fn from(points: i32) -> Self {
        Unit::from_point(f64::from(points))
    }
}

fn unit_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^\s*([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+))\s*([A-Za-z]{0,2})\s*$").ok()
        })
        .as_ref()
}

impl FromStr for Unit {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Unit::EMPTY);
        }
        let caps = unit_pattern()
            .and_then(|re| re.captures(s))
            .ok_or_else(|| DomError::InvalidUnit(s.to_string()))?;
        let value: f64 = caps[1]
            .parse()
            .map_err(|_| DomError::InvalidUnit(s.to_string()))?;
        let suffix = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let unit_type =
            UnitType::from_suffix(suffix).ok_or_else(|| DomError::InvalidUnit(s.to_string()))?;
        Ok(Unit::new(value, unit_type))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit_type {
            None => Ok(()),
            Some(unit_type) => write!(f, "{}{}", self.value, unit_type.suffix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_is_not_zero() {
        assert!(Unit::EMPTY.is_empty());
        assert!(!Unit::ZERO.is_empty());
        assert_ne!(Unit::EMPTY, Unit::ZERO);
        assert_eq!(Unit::default(), Unit::EMPTY);
    }

    #[test]
    fn test_conversion_constants() {
        assert!((Unit::from_inch(1.0).point() - 72.0).abs() < 1e-9);
        assert!((Unit::from_inch(1.0).centimeter() - 2.54).abs() < 1e-9);
        assert!((Unit::from_inch(1.0).millimeter() - 25.4).abs() < 1e-9);
        assert!((Unit::from_pica(1.0).point() - 12.0).abs() < 1e-9);
        assert_eq!(Unit::from_centimeter(1.0), Unit::from_millimeter(10.0));
    }

    #[test]
    fn test_parse() {
        assert_eq!("2.5cm".parse::<Unit>().unwrap(), Unit::from_centimeter(2.5));
        assert_eq!("12".parse::<Unit>().unwrap().unit_type(), Some(UnitType::Point));
        assert_eq!("12pt".parse::<Unit>().unwrap(), Unit::from_point(12.0));
        assert_eq!(" 1 in ".parse::<Unit>().unwrap(), Unit::from_inch(1.0));
        assert_eq!("3PC".parse::<Unit>().unwrap(), Unit::from_pica(3.0));
        assert_eq!("-.5mm".parse::<Unit>().unwrap(), Unit::from_millimeter(-0.5));
        assert!("".parse::<Unit>().unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors_carry_input() {
        match "12furlongs".parse::<Unit>() {
            Err(DomError::InvalidUnit(text)) => assert_eq!(text, "12furlongs"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!("cm".parse::<Unit>().is_err());
        assert!("1.2.3cm".parse::<Unit>().is_err());
    }

    #[test]
    fn test_display_keeps_unit() {
        assert_eq!(Unit::from_centimeter(2.5).to_string(), "2.5cm");
        assert_eq!(Unit::from_point(12.0).to_string(), "12pt");
        assert_eq!(Unit::EMPTY.to_string(), "");
    }

    #[test]
    fn test_convert_empty_stays_empty() {
        assert!(Unit::EMPTY.convert_to(UnitType::Inch).is_empty());
        assert_eq!(Unit::EMPTY.point(), 0.0);
    }

    fn unit_type_strategy() -> impl Strategy<Value = UnitType> {
        prop::sample::select(UnitType::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_conversion_round_trip(
            value in -10_000.0f64..10_000.0,
            start in unit_type_strategy(),
            t1 in unit_type_strategy(),
            t2 in unit_type_strategy(),
        ) {
            let original = Unit::new(value, start);
            let first = original.convert_to(t1);
            let back = first.convert_to(t2).convert_to(t1);
            prop_assert_eq!(back.unit_type(), Some(t1));
            prop_assert!((back.point() - first.point()).abs() < 1e-5);
            prop_assert!((back.value() - first.value()).abs() < 1e-5);
            prop_assert!((first.point() - original.point()).abs() < 1e-5);
        }

        #[test]
        fn prop_display_parse_round_trip(value in -1000.0f64..1000.0, unit in unit_type_strategy()) {
            let original = Unit::new(value, unit);
            let parsed: Unit = original.to_string().parse().unwrap();
            prop_assert_eq!(parsed.unit_type(), Some(unit));
            prop_assert!((parsed.value() - value).abs() < 1e-9);
        }
    }
}
