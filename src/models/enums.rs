use serde::{Deserialize, Serialize};

use super::patient::FieldError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form is the exact level name the classifier was trained on.
macro_rules! str_enum {
    ($name:ident, $field:literal { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            /// Every level, in form display order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Position in `ALL`, used as the raw numeric code.
            pub fn index(&self) -> usize {
                Self::ALL.iter().position(|v| v == self).unwrap_or(0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = FieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(FieldError::UnknownCategory {
                        field: $field,
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Region, "region" {
    SouthSouth => "South_South",
    SouthWest => "South_West",
    SouthEast => "South_East",
    NorthCentral => "North_Central",
    NorthWest => "North_West",
    NorthEast => "North_East",
});

str_enum!(Season, "season" {
    DrySeason => "Dry_Season",
    RainySeason => "Rainy_Season",
});

impl Region {
    /// Human label for form options ("South_West" → "South West").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl Season {
    pub fn label(&self) -> &'static str {
        match self {
            Season::DrySeason => "Dry season",
            Season::RainySeason => "Rainy season",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_round_trips_through_str() {
        for region in Region::ALL {
            let parsed: Region = region.as_str().parse().unwrap();
            assert_eq!(&parsed, region);
        }
        assert_eq!(Region::ALL.len(), 6);
    }

    #[test]
    fn unknown_region_is_field_error() {
        let err = "Lagos".parse::<Region>().unwrap_err();
        assert!(matches!(
            err,
            FieldError::UnknownCategory { field: "region", .. }
        ));
    }

    #[test]
    fn season_serializes_as_training_level() {
        let json = serde_json::to_string(&Season::RainySeason).unwrap();
        assert_eq!(json, "\"Rainy_Season\"");
        let back: Season = serde_json::from_str("\"Dry_Season\"").unwrap();
        assert_eq!(back, Season::DrySeason);
    }

    #[test]
    fn index_follows_display_order() {
        assert_eq!(Region::SouthSouth.index(), 0);
        assert_eq!(Region::NorthEast.index(), 5);
        assert_eq!(Season::RainySeason.index(), 1);
    }

    #[test]
    fn region_label_replaces_underscores() {
        assert_eq!(Region::NorthCentral.label(), "North Central");
    }
}
