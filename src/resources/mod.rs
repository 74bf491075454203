pub mod catalog;

pub use catalog::{CatalogLookup, ResourceCatalog, ResourceSuggestion, ResourceType};
