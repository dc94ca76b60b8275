use crate::model::Instrument;
use crate::model::InstrumentType;
use crate::model::Location;
use crate::model::Period;
use chrono::NaiveDate;
use serde::Deserialize;

/// `ComposerInput`: every field may be omitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComposerInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub location: Option<LocationInput>,
    pub primary_instrument: Option<InstrumentInput>,
    pub period: Option<Period>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LocationInput {
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstrumentInput {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: Option<InstrumentType>,
}

/// `CompositionInput`: `subtype` picks the variant.
///
/// Fields the chosen variant has no use for are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionInput {
    pub subtype: String,
    pub title: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub solo_instrument: Option<InstrumentInput>,
    #[serde(default)]
    pub lyrics: Option<String>,
}

impl LocationInput {
    /// `Some` if both fields are given
    pub fn complete(self) -> Option<Location> {
        Some(Location {
            city: self.city?,
            country: self.country?,
        })
    }

    /// Given fields replace those of `existing`
    pub fn merge_over(self, existing: &Location) -> Location {
        Location {
            city: self.city.unwrap_or_else(|| existing.city.clone()),
            country: self.country.unwrap_or_else(|| existing.country.clone()),
        }
    }
}

impl InstrumentInput {
    /// `Some` if both fields are given
    pub fn complete(self) -> Option<Instrument> {
        Some(Instrument {
            name: self.name?,
            ty: self.ty?,
        })
    }

    /// Given fields replace those of `existing`
    pub fn merge_over(self, existing: &Instrument) -> Instrument {
        Instrument {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            ty: self.ty.unwrap_or(existing.ty),
        }
    }
}
