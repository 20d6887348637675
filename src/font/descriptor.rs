//! Font descriptors
//!
//! A font taking part in the atlas: display name, weight and source file.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Canonical font weight names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Thin,
    Hairline,
    UltraLight,
    ExtraLight,
    Light,
    Normal,
    Regular,
    Medium,
    SemiBold,
    DemiBold,
    Bold,
    ExtraBold,
    UltraBold,
    Black,
    Heavy,
}

impl FontWeight {
    /// Every accepted weight, in ascending order
    pub const ALL: [FontWeight; 15] = [
        Self::Thin,
        Self::Hairline,
        Self::UltraLight,
        Self::ExtraLight,
        Self::Light,
        Self::Normal,
        Self::Regular,
        Self::Medium,
        Self::SemiBold,
        Self::DemiBold,
        Self::Bold,
        Self::ExtraBold,
        Self::UltraBold,
        Self::Black,
        Self::Heavy,
    ];

    /// Lowercase name used in manifest keys
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thin => "thin",
            Self::Hairline => "hairline",
            Self::UltraLight => "ultralight",
            Self::ExtraLight => "extralight",
            Self::Light => "light",
            Self::Normal => "normal",
            Self::Regular => "regular",
            Self::Medium => "medium",
            Self::SemiBold => "semibold",
            Self::DemiBold => "demibold",
            Self::Bold => "bold",
            Self::ExtraBold => "extrabold",
            Self::UltraBold => "ultrabold",
            Self::Black => "black",
            Self::Heavy => "heavy",
        }
    }

    /// Comma-separated list of accepted names (for error messages)
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|w| w.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for FontWeight {
    type Err = ();

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.as_str() == lower)
            .ok_or(())
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated font entry
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Display name as configured (e.g. "Roboto")
    pub name: String,
    pub weight: FontWeight,
    /// Font file
    pub source_path: PathBuf,
}

impl FontDescriptor {
    /// Manifest key: `"{name}_{weight}"`, lowercase
    pub fn key(&self) -> String {
        format!("{}_{}", self.name.to_lowercase(), self.weight.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_case_insensitive() {
        assert_eq!("Bold".parse::<FontWeight>(), Ok(FontWeight::Bold));
        assert_eq!("SEMIBOLD".parse::<FontWeight>(), Ok(FontWeight::SemiBold));
        assert_eq!(" regular ".parse::<FontWeight>(), Ok(FontWeight::Regular));
        assert!("book".parse::<FontWeight>().is_err());
    }

    #[test]
    fn test_normal_and_regular_stay_distinct() {
        assert_ne!(
            "normal".parse::<FontWeight>().unwrap().as_str(),
            "regular".parse::<FontWeight>().unwrap().as_str()
        );
    }

    #[test]
    fn test_descriptor_key() {
        let font = FontDescriptor {
            name: "Roboto".to_string(),
            weight: FontWeight::Bold,
            source_path: PathBuf::from("./Roboto-Bold.ttf"),
        };
        assert_eq!(font.key(), "roboto_bold");
    }
}
