#![doc = "A GraphQL execution engine over an in-memory catalog of classical composers."]
#![doc = ""]
#![doc = "Documents are parsed and validated with `apollo-compiler`,"]
#![doc = "then executed by [`execution::Execution`] over the resolvers in this crate."]

pub mod catalog;
pub mod execution;
pub mod model;
pub mod response;
pub mod scalars;
pub mod schema;
pub mod service;

mod resolvers;

pub use self::catalog::Catalog;
pub use self::catalog::CatalogError;
pub use self::catalog::ComposerRepository;
pub use self::response::ErrorClassification;
pub use self::response::GraphQLError;
pub use self::response::Response;
pub use self::response::ResponseData;
pub use self::service::ComposersService;
pub use self::service::Request;
/// Re-export of the version of the `serde_json_bytes` crate used for [`JsonValue`] and [`JsonMap`]
pub use serde_json_bytes;

/// A JSON-compatible dynamically-typed value.
pub type JsonValue = serde_json_bytes::Value;

/// A JSON-compatible object/map with string keys and dynamically-typed values.
pub type JsonMap = serde_json_bytes::Map<serde_json_bytes::ByteString, JsonValue>;
