//! [`ObjectValue`] implementations for the types of the composers schema

use crate::catalog::CatalogError;
use crate::catalog::ComposerRepository;
use crate::execution::ObjectValue;
use crate::execution::ResolveError;
use crate::execution::ResolveInfo;
use crate::execution::ResolvedValue;
use crate::model::Composer;
use crate::model::ComposerFilter;
use crate::model::ComposerId;
use crate::model::ComposerInput;
use crate::model::Composition;
use crate::model::CompositionFilter;
use crate::model::CompositionInput;
use crate::model::Instrument;
use crate::model::Location;
use crate::response::ErrorClassification;
use crate::scalars::DateScalar;
use crate::JsonValue;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use triomphe::Arc;

pub(crate) struct QueryRoot<'a, R> {
    pub(crate) catalog: &'a Mutex<R>,
}

pub(crate) struct MutationRoot<'a, R> {
    pub(crate) catalog: &'a Mutex<R>,
}

struct ComposerObject(Composer);

struct CompositionObject(Composition);

struct LocationObject(Arc<Location>);

struct InstrumentObject(Arc<Instrument>);

impl<R: ComposerRepository> ObjectValue for QueryRoot<'_, R> {
    fn type_name(&self) -> &str {
        "Query"
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> Result<ResolvedValue<'a>, ResolveError> {
        match info.field_name() {
            "composer" => {
                let id = composer_id(info, "id")?;
                let composer = self.catalog.lock().composer(id)?.clone();
                Ok(ResolvedValue::object(ComposerObject(composer)))
            }
            "composers" => {
                let filter: ComposerFilter = arguments(info)?;
                let composers: Vec<Composer> = self
                    .catalog
                    .lock()
                    .all_composers()
                    .iter()
                    .filter(|composer| filter.matches(composer))
                    .cloned()
                    .collect();
                Ok(ResolvedValue::list(
                    composers
                        .into_iter()
                        .map(|composer| ResolvedValue::object(ComposerObject(composer))),
                ))
            }
            _ => Err(ResolveError::unknown_field(info.field_name(), self)),
        }
    }
}

impl<R: ComposerRepository> ObjectValue for MutationRoot<'_, R> {
    fn type_name(&self) -> &str {
        "Mutation"
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> Result<ResolvedValue<'a>, ResolveError> {
        match info.field_name() {
            "createComposer" => {
                let input: ComposerInput = argument(info, "composer")?;
                let composer = self.catalog.lock().add_composer(input)?;
                Ok(ResolvedValue::object(ComposerObject(composer)))
            }
            "updateComposer" => {
                let id = composer_id(info, "id")?;
                let input: ComposerInput = argument(info, "composer")?;
                let update = self.catalog.lock().update_composer(id, input)?;
                if update.rejected_date_of_birth.is_some() {
                    info.report(
                        "You cannot change an existing date of birth.",
                        ErrorClassification::ValidationError,
                        info.argument_source("composer"),
                    );
                }
                Ok(ResolvedValue::object(ComposerObject(update.composer)))
            }
            "addCompositions" => {
                let composer_id = composer_id(info, "composerId")?;
                let inputs: Vec<CompositionInput> = argument(info, "compositions")?;
                let added = self.catalog.lock().add_compositions(composer_id, inputs)?;
                Ok(ResolvedValue::list(added.into_iter().map(|composition| {
                    ResolvedValue::object(CompositionObject(composition))
                })))
            }
            "deleteComposition" => {
                let composer_id = composer_id(info, "composerId")?;
                let title: String = argument(info, "title")?;
                let deleted = self
                    .catalog
                    .lock()
                    .delete_composition(composer_id, &title)?;
                Ok(ResolvedValue::leaf(deleted))
            }
            _ => Err(ResolveError::unknown_field(info.field_name(), self)),
        }
    }
}

impl ObjectValue for ComposerObject {
    fn type_name(&self) -> &str {
        "Composer"
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> Result<ResolvedValue<'a>, ResolveError> {
        let composer = &self.0;
        match info.field_name() {
            "id" => Ok(ResolvedValue::leaf(composer.id)),
            "firstName" => Ok(ResolvedValue::opt_leaf(composer.first_name.as_deref())),
            "lastName" => Ok(ResolvedValue::opt_leaf(composer.last_name.as_deref())),
            "dateOfBirth" => Ok(ResolvedValue::opt_leaf(
                composer.date_of_birth.map(DateScalar::format),
            )),
            "location" => Ok(ResolvedValue::opt_object(
                composer.location.clone().map(LocationObject),
            )),
            "primaryInstrument" => Ok(ResolvedValue::opt_object(
                composer.primary_instrument.clone().map(InstrumentObject),
            )),
            "period" => Ok(ResolvedValue::opt_leaf(
                composer.period.map(|period| period.as_str()),
            )),
            "compositions" => {
                let filter: CompositionFilter = arguments(info)?;
                let compositions: Vec<Composition> =
                    composer.compositions_matching(&filter).cloned().collect();
                Ok(ResolvedValue::list(compositions.into_iter().map(
                    |composition| ResolvedValue::object(CompositionObject(composition)),
                )))
            }
            _ => Err(ResolveError::unknown_field(info.field_name(), self)),
        }
    }
}

impl ObjectValue for CompositionObject {
    /// Resolves the `Composition` interface to its concrete object type
    fn type_name(&self) -> &str {
        self.0.type_name()
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> Result<ResolvedValue<'a>, ResolveError> {
        match (info.field_name(), &self.0) {
            ("title", composition) => Ok(ResolvedValue::leaf(composition.title())),
            ("key", composition) => Ok(ResolvedValue::opt_leaf(composition.key())),
            ("soloInstrument", Composition::Concerto(concerto)) => Ok(ResolvedValue::object(
                InstrumentObject(concerto.solo_instrument.clone()),
            )),
            ("lyrics", Composition::Song(song)) => Ok(ResolvedValue::leaf(song.lyrics.as_str())),
            _ => Err(ResolveError::unknown_field(info.field_name(), self)),
        }
    }
}

impl ObjectValue for LocationObject {
    fn type_name(&self) -> &str {
        "Location"
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> Result<ResolvedValue<'a>, ResolveError> {
        match info.field_name() {
            "city" => Ok(ResolvedValue::leaf(self.0.city.as_str())),
            "country" => Ok(ResolvedValue::leaf(self.0.country.as_str())),
            _ => Err(ResolveError::unknown_field(info.field_name(), self)),
        }
    }
}

impl ObjectValue for InstrumentObject {
    fn type_name(&self) -> &str {
        "Instrument"
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> Result<ResolvedValue<'a>, ResolveError> {
        match info.field_name() {
            "name" => Ok(ResolvedValue::leaf(self.0.name.as_str())),
            "type" => Ok(ResolvedValue::leaf(self.0.ty.as_str())),
            _ => Err(ResolveError::unknown_field(info.field_name(), self)),
        }
    }
}

/// A missing composer aborts the operation, broken catalog rules only null the field
impl From<CatalogError> for ResolveError {
    fn from(error: CatalogError) -> Self {
        if error.is_not_found() {
            Self::fatal(error.to_string())
        } else {
            Self::new(error.to_string()).with_classification(ErrorClassification::ValidationError)
        }
    }
}

/// IDs arrive as strings after input coercion
fn composer_id(info: &ResolveInfo<'_>, name: &str) -> Result<ComposerId, ResolveError> {
    let id = info
        .argument(name)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| ResolveError::new(format!("Missing argument '{name}'")))?;
    id.parse()
        .map_err(|_| CatalogError::InvalidId(id.to_owned()).into())
}

fn argument<T: DeserializeOwned>(info: &ResolveInfo<'_>, name: &str) -> Result<T, ResolveError> {
    let value = info.arguments().get(name).cloned().unwrap_or(JsonValue::Null);
    serde_json_bytes::from_value(value).map_err(|err| {
        ResolveError::new(format!("Invalid value for argument '{name}': {err}"))
            .with_classification(ErrorClassification::ValidationError)
    })
}

/// All arguments of the field as one struct
fn arguments<T: DeserializeOwned>(info: &ResolveInfo<'_>) -> Result<T, ResolveError> {
    serde_json_bytes::from_value(JsonValue::Object(info.arguments().clone())).map_err(|err| {
        ResolveError::new(format!("Invalid arguments: {err}"))
            .with_classification(ErrorClassification::ValidationError)
    })
}
