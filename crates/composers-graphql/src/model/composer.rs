use crate::model::Composition;
use crate::model::CompositionFilter;
use crate::model::Instrument;
use crate::model::Location;
use crate::model::Period;
use chrono::NaiveDate;
use serde::Deserialize;
use triomphe::Arc;

pub type ComposerId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct Composer {
    pub id: ComposerId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Write-once: may be filled in when absent, never overwritten
    pub date_of_birth: Option<NaiveDate>,
    pub location: Option<Arc<Location>>,
    pub primary_instrument: Option<Arc<Instrument>>,
    pub period: Option<Period>,
    /// In insertion order
    pub compositions: Vec<Composition>,
}

/// Arguments of `Query.composers`.
///
/// Every criterion that is given and not blank must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComposerFilter {
    pub period: Option<Period>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub instrument: Option<String>,
    pub last_name: Option<String>,
}

impl Composer {
    pub fn new(id: ComposerId) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            date_of_birth: None,
            location: None,
            primary_instrument: None,
            period: None,
            compositions: Vec::new(),
        }
    }

    pub fn compositions_matching<'a>(
        &'a self,
        filter: &'a CompositionFilter,
    ) -> impl Iterator<Item = &'a Composition> + 'a {
        self.compositions
            .iter()
            .filter(move |composition| filter.matches(composition))
    }
}

impl ComposerFilter {
    pub fn matches(&self, composer: &Composer) -> bool {
        let location = composer.location.as_deref();
        let instrument = composer.primary_instrument.as_deref();
        self.period.is_none_or(|period| composer.period == Some(period))
            && matches_if_given(&self.country, location.map(|l| l.country.as_str()))
            && matches_if_given(&self.city, location.map(|l| l.city.as_str()))
            && matches_if_given(&self.instrument, instrument.map(|i| i.name.as_str()))
            && matches_if_given(&self.last_name, composer.last_name.as_deref())
    }
}

/// A missing or blank criterion matches anything
pub(crate) fn matches_if_given(expected: &Option<String>, actual: Option<&str>) -> bool {
    match expected.as_deref() {
        None => true,
        Some(expected) if expected.trim().is_empty() => true,
        Some(expected) => actual == Some(expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InstrumentType;

    fn ravel() -> Composer {
        Composer {
            first_name: Some("Maurice".into()),
            last_name: Some("Ravel".into()),
            location: Some(Arc::new(Location::new("Paris", "France"))),
            primary_instrument: Some(Arc::new(Instrument::new(
                "Piano",
                InstrumentType::Keyboard,
            ))),
            period: Some(Period::Modern),
            ..Composer::new(7)
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(ComposerFilter::default().matches(&ravel()));
        assert!(ComposerFilter::default().matches(&Composer::new(1)));
    }

    #[test]
    fn blank_criteria_are_ignored() {
        let filter = ComposerFilter {
            city: Some("  ".into()),
            last_name: Some(String::new()),
            ..Default::default()
        };
        assert!(filter.matches(&ravel()));
    }

    #[test]
    fn criteria_are_a_conjunction() {
        let filter = ComposerFilter {
            period: Some(Period::Modern),
            country: Some("France".into()),
            instrument: Some("Piano".into()),
            ..Default::default()
        };
        assert!(filter.matches(&ravel()));
        let filter = ComposerFilter {
            city: Some("Paris".into()),
            instrument: Some("Organ".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&ravel()));
    }

    #[test]
    fn missing_location_does_not_match_a_city() {
        let filter = ComposerFilter {
            city: Some("Paris".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&Composer::new(1)));
    }
}
