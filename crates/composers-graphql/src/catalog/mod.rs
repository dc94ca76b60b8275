//! Storage of composers behind [`ComposerRepository`]

use crate::model::Composer;
use crate::model::ComposerId;
use crate::model::ComposerInput;
use crate::model::Composition;
use crate::model::CompositionError;
use crate::model::CompositionInput;
use crate::model::Instrument;
use crate::model::InstrumentInput;
use crate::model::Location;
use crate::model::LocationInput;
use chrono::NaiveDate;
use indexmap::IndexSet;
use triomphe::Arc;

mod seed;

/// Read and write access to the composers of a catalog
pub trait ComposerRepository {
    /// Every composer, in catalog order
    fn all_composers(&self) -> &[Composer];

    fn composer(&self, id: ComposerId) -> Result<&Composer, CatalogError> {
        self.all_composers()
            .iter()
            .find(|composer| composer.id == id)
            .ok_or(CatalogError::ComposerNotFound(id))
    }

    /// Append a composer with a fresh id
    fn add_composer(&mut self, input: ComposerInput) -> Result<Composer, CatalogError>;

    /// Merge the given fields of `input` over the stored composer
    fn update_composer(
        &mut self,
        id: ComposerId,
        input: ComposerInput,
    ) -> Result<ComposerUpdate, CatalogError>;

    /// Append compositions to a composer, all or nothing
    fn add_compositions(
        &mut self,
        composer_id: ComposerId,
        inputs: Vec<CompositionInput>,
    ) -> Result<Vec<Composition>, CatalogError>;

    /// Returns whether any composition with that title was removed
    fn delete_composition(
        &mut self,
        composer_id: ComposerId,
        title: &str,
    ) -> Result<bool, CatalogError>;
}

/// Outcome of [`ComposerRepository::update_composer`]
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerUpdate {
    pub composer: Composer,
    /// Set when the input tried to replace an existing date of birth.
    /// The stored date is kept.
    pub rejected_date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("No composer found with id '{0}'.")]
    ComposerNotFound(ComposerId),
    /// Composer ids are integers, so no composer has this id
    #[error("No composer found with id '{0}'.")]
    InvalidId(String),
    #[error("No composer id is left after '{0}'.")]
    IdsExhausted(ComposerId),
    #[error("A new location requires both a city and a country.")]
    IncompleteLocation,
    #[error("A new primary instrument requires both a name and a type.")]
    IncompletePrimaryInstrument,
    #[error(transparent)]
    Composition(#[from] CompositionError),
}

/// An in-memory catalog.
///
/// Locations and instruments are interned:
/// an equal value persisted twice is shared.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    composers: Vec<Composer>,
    locations: IndexSet<Arc<Location>>,
    instruments: IndexSet<Arc<Instrument>>,
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ComposerNotFound(_) | Self::InvalidId(_))
    }
}

impl Catalog {
    pub fn new(composers: impl IntoIterator<Item = Composer>) -> Self {
        let mut catalog = Self::default();
        for mut composer in composers {
            composer.location = composer
                .location
                .map(|location| catalog.intern_location(location));
            composer.primary_instrument = composer
                .primary_instrument
                .map(|instrument| catalog.intern_instrument(instrument));
            for composition in &mut composer.compositions {
                catalog.intern_solo_instrument(composition);
            }
            catalog.composers.push(composer);
        }
        catalog
    }

    /// The eight seed composers
    pub fn seeded() -> Self {
        Self::new(seed::composers())
    }

    /// Every location known to the catalog, in registration order
    pub fn locations(&self) -> impl Iterator<Item = &Arc<Location>> {
        self.locations.iter()
    }

    /// Every instrument known to the catalog, in registration order
    pub fn instruments(&self) -> impl Iterator<Item = &Arc<Instrument>> {
        self.instruments.iter()
    }

    fn next_id(&self) -> Result<ComposerId, CatalogError> {
        match self.composers.iter().map(|composer| composer.id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(CatalogError::IdsExhausted(max)),
        }
    }

    fn position(&self, id: ComposerId) -> Result<usize, CatalogError> {
        self.composers
            .iter()
            .position(|composer| composer.id == id)
            .ok_or(CatalogError::ComposerNotFound(id))
    }

    /// Look up an equal location, or register this one
    fn intern_location(&mut self, location: Arc<Location>) -> Arc<Location> {
        let (index, _) = self.locations.insert_full(location);
        self.locations[index].clone()
    }

    /// Look up an equal instrument, or register this one
    fn intern_instrument(&mut self, instrument: Arc<Instrument>) -> Arc<Instrument> {
        let (index, _) = self.instruments.insert_full(instrument);
        self.instruments[index].clone()
    }

    fn intern_solo_instrument(&mut self, composition: &mut Composition) {
        if let Composition::Concerto(concerto) = composition {
            concerto.solo_instrument = self.intern_instrument(concerto.solo_instrument.clone());
        }
    }

    fn merge_location(
        &mut self,
        input: Option<LocationInput>,
        existing: Option<Arc<Location>>,
    ) -> Result<Option<Arc<Location>>, CatalogError> {
        let location = match (input, existing) {
            (None, existing) => return Ok(existing),
            (Some(input), Some(existing)) => input.merge_over(&existing),
            (Some(input), None) => input.complete().ok_or(CatalogError::IncompleteLocation)?,
        };
        Ok(Some(self.intern_location(Arc::new(location))))
    }

    fn merge_instrument(
        &mut self,
        input: Option<InstrumentInput>,
        existing: Option<Arc<Instrument>>,
    ) -> Result<Option<Arc<Instrument>>, CatalogError> {
        let instrument = match (input, existing) {
            (None, existing) => return Ok(existing),
            (Some(input), Some(existing)) => input.merge_over(&existing),
            (Some(input), None) => input
                .complete()
                .ok_or(CatalogError::IncompletePrimaryInstrument)?,
        };
        Ok(Some(self.intern_instrument(Arc::new(instrument))))
    }
}

impl ComposerRepository for Catalog {
    fn all_composers(&self) -> &[Composer] {
        &self.composers
    }

    fn add_composer(&mut self, input: ComposerInput) -> Result<Composer, CatalogError> {
        let id = self.next_id()?;
        let location = self.merge_location(input.location, None)?;
        let primary_instrument = self.merge_instrument(input.primary_instrument, None)?;
        let composer = Composer {
            first_name: input.first_name,
            last_name: input.last_name,
            date_of_birth: input.date_of_birth,
            location,
            primary_instrument,
            period: input.period,
            ..Composer::new(id)
        };
        tracing::info!(id = composer.id, "created composer");
        self.composers.push(composer.clone());
        Ok(composer)
    }

    fn update_composer(
        &mut self,
        id: ComposerId,
        input: ComposerInput,
    ) -> Result<ComposerUpdate, CatalogError> {
        let index = self.position(id)?;
        let existing = &self.composers[index];
        let (existing_location, existing_instrument) = (
            existing.location.clone(),
            existing.primary_instrument.clone(),
        );
        let location = self.merge_location(input.location, existing_location)?;
        let primary_instrument =
            self.merge_instrument(input.primary_instrument, existing_instrument)?;

        let composer = &mut self.composers[index];
        let rejected_date_of_birth = match (composer.date_of_birth, input.date_of_birth) {
            (Some(existing), Some(update)) if existing != update => Some(update),
            _ => None,
        };
        if let Some(first_name) = input.first_name {
            composer.first_name = Some(first_name);
        }
        if let Some(last_name) = input.last_name {
            composer.last_name = Some(last_name);
        }
        composer.date_of_birth = composer.date_of_birth.or(input.date_of_birth);
        composer.location = location;
        composer.primary_instrument = primary_instrument;
        composer.period = input.period.or(composer.period);
        if let Some(rejected) = rejected_date_of_birth {
            tracing::warn!(id, %rejected, "kept existing date of birth");
        }
        tracing::info!(id, "updated composer");
        Ok(ComposerUpdate {
            composer: composer.clone(),
            rejected_date_of_birth,
        })
    }

    fn add_compositions(
        &mut self,
        composer_id: ComposerId,
        inputs: Vec<CompositionInput>,
    ) -> Result<Vec<Composition>, CatalogError> {
        let index = self.position(composer_id)?;
        let mut compositions = inputs
            .into_iter()
            .map(Composition::from_input)
            .collect::<Result<Vec<_>, _>>()?;
        for composition in &mut compositions {
            self.intern_solo_instrument(composition);
        }
        tracing::info!(
            composer_id,
            count = compositions.len(),
            "added compositions"
        );
        self.composers[index]
            .compositions
            .extend(compositions.iter().cloned());
        Ok(compositions)
    }

    fn delete_composition(
        &mut self,
        composer_id: ComposerId,
        title: &str,
    ) -> Result<bool, CatalogError> {
        let index = self.position(composer_id)?;
        let compositions = &mut self.composers[index].compositions;
        let before = compositions.len();
        compositions.retain(|composition| composition.title() != title);
        let deleted = compositions.len() != before;
        tracing::info!(composer_id, title, deleted, "deleted composition");
        Ok(deleted)
    }
}
