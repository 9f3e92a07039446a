pub mod store_parser;
pub mod store_serializer;

pub use store_parser::{SchemaError, parse_store, parse_store_unvalidated};
pub use store_serializer::serialize_store;
