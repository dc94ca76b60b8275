use crate::model::composer::matches_if_given;
use crate::model::CompositionInput;
use crate::model::Instrument;
use serde::Deserialize;
use std::fmt;
use triomphe::Arc;

/// A work owned by exactly one composer.
///
/// The variant is fixed at construction and decides which fields exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composition {
    Piece(Piece),
    Concerto(Concerto),
    Song(Song),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub title: String,
    /// Declared non-null by the schema, but stored data may lack it
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concerto {
    pub title: String,
    pub key: Option<String>,
    pub solo_instrument: Arc<Instrument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub title: String,
    pub key: Option<String>,
    pub lyrics: String,
}

/// The variant tag, named after the GraphQL object type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositionKind {
    Piece,
    Concerto,
    Song,
}

/// Arguments of `Composer.compositions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositionFilter {
    pub subtype: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    #[error("Unknown composition subtype '{0}', expected one of Piece, Concerto, Song")]
    UnknownSubtype(String),
    #[error("The Concerto '{title}' requires a soloInstrument.")]
    MissingSoloInstrument { title: String },
    #[error("The Concerto '{title}' requires a soloInstrument with both a name and a type.")]
    IncompleteSoloInstrument { title: String },
    #[error("The Song '{title}' requires lyrics.")]
    MissingLyrics { title: String },
}

impl CompositionKind {
    pub const ALL: [Self; 3] = [Self::Piece, Self::Concerto, Self::Song];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Piece => "Piece",
            Self::Concerto => "Concerto",
            Self::Song => "Song",
        }
    }

    /// Parse the `subtype` discriminator of a `CompositionInput`
    pub fn from_subtype(subtype: &str) -> Result<Self, CompositionError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == subtype)
            .ok_or_else(|| CompositionError::UnknownSubtype(subtype.to_owned()))
    }
}

impl fmt::Display for CompositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Composition {
    /// Build the variant named by `input.subtype`
    pub fn from_input(input: CompositionInput) -> Result<Self, CompositionError> {
        let CompositionInput {
            subtype,
            title,
            key,
            solo_instrument,
            lyrics,
        } = input;
        Ok(match CompositionKind::from_subtype(&subtype)? {
            CompositionKind::Piece => Self::Piece(Piece { title, key }),
            CompositionKind::Concerto => {
                let Some(solo_instrument) = solo_instrument else {
                    return Err(CompositionError::MissingSoloInstrument { title });
                };
                let Some(solo_instrument) = solo_instrument.complete() else {
                    return Err(CompositionError::IncompleteSoloInstrument { title });
                };
                Self::Concerto(Concerto {
                    title,
                    key,
                    solo_instrument: Arc::new(solo_instrument),
                })
            }
            CompositionKind::Song => {
                let Some(lyrics) = lyrics else {
                    return Err(CompositionError::MissingLyrics { title });
                };
                Self::Song(Song { title, key, lyrics })
            }
        })
    }

    pub fn kind(&self) -> CompositionKind {
        match self {
            Self::Piece(_) => CompositionKind::Piece,
            Self::Concerto(_) => CompositionKind::Concerto,
            Self::Song(_) => CompositionKind::Song,
        }
    }

    /// Name of the concrete object type implementing `Composition`
    pub fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Piece(piece) => &piece.title,
            Self::Concerto(concerto) => &concerto.title,
            Self::Song(song) => &song.title,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Piece(piece) => piece.key.as_deref(),
            Self::Concerto(concerto) => concerto.key.as_deref(),
            Self::Song(song) => song.key.as_deref(),
        }
    }

    pub fn solo_instrument(&self) -> Option<&Arc<Instrument>> {
        match self {
            Self::Concerto(concerto) => Some(&concerto.solo_instrument),
            Self::Piece(_) | Self::Song(_) => None,
        }
    }

    pub fn lyrics(&self) -> Option<&str> {
        match self {
            Self::Song(song) => Some(&song.lyrics),
            Self::Piece(_) | Self::Concerto(_) => None,
        }
    }
}

impl CompositionFilter {
    pub fn matches(&self, composition: &Composition) -> bool {
        matches_if_given(&self.subtype, Some(composition.type_name()))
            && matches_if_given(&self.key, composition.key())
    }
}
