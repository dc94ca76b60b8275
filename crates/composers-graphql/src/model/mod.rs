//! The composers catalog domain: composers, the compositions they own,
//! and the input shapes mutations accept.

use serde::Deserialize;
use serde::Serialize;
use std::fmt;

mod composer;
mod composition;
mod input;

pub use self::composer::Composer;
pub use self::composer::ComposerFilter;
pub use self::composer::ComposerId;
pub use self::composition::Composition;
pub use self::composition::CompositionError;
pub use self::composition::CompositionFilter;
pub use self::composition::CompositionKind;
pub use self::composition::Concerto;
pub use self::composition::Piece;
pub use self::composition::Song;
pub use self::input::ComposerInput;
pub use self::input::CompositionInput;
pub use self::input::InstrumentInput;
pub use self::input::LocationInput;

/// A period of music history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Period {
    Renaissance,
    Baroque,
    Classical,
    Romantic,
    Modern,
    PostModern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentType {
    Keyboard,
    String,
    Woodwind,
    Brass,
    Percussion,
    Vocal,
}

/// Equal when both city and country are
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub city: String,
    pub country: String,
}

/// Equal when both name and type are
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instrument {
    pub name: String,
    pub ty: InstrumentType,
}

impl Period {
    /// The GraphQL enum value name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Renaissance => "RENAISSANCE",
            Self::Baroque => "BAROQUE",
            Self::Classical => "CLASSICAL",
            Self::Romantic => "ROMANTIC",
            Self::Modern => "MODERN",
            Self::PostModern => "POST_MODERN",
        }
    }
}

impl InstrumentType {
    /// The GraphQL enum value name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyboard => "KEYBOARD",
            Self::String => "STRING",
            Self::Woodwind => "WOODWIND",
            Self::Brass => "BRASS",
            Self::Percussion => "PERCUSSION",
            Self::Vocal => "VOCAL",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Location {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }
}

impl Instrument {
    pub fn new(name: impl Into<String>, ty: InstrumentType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
