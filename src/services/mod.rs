pub mod catalog;
pub mod recommendations;
pub mod statistics;

pub use catalog::{CatalogSource, InMemoryCatalog, PostgresCatalog};
