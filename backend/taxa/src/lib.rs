//! # Taxa
//!
//! Shared species data and the logic that reshapes it.
//!
//! ## Overall Data Structures
//!
//! - Species records (**SpeciesRecord**): One row per species as served by the data source. Classification
//!   (order, family, genus) is free text and may be missing.
//!
//! - Taxonomy tree (**OrderGroup** > **FamilyGroup** > **GenusGroup** > species): Built fresh from a flat list on
//!   every call. Each level carries summary counts over everything below it.
//!
//! - Order cards (**OrderCard**): Flat single-level grouping by order name. Independent of the tree, no summaries.
//!
//! ## Notes
//! - Grouping keys are exact strings and are not scoped to their parent. Two genera with the same name in
//!   different families stay separate only because the family split happens first; the same genus name twice
//!   inside one family is merged.
//!
//! - Nothing here sorts. Callers wanting alphabetical output use [`taxonomy::sort_alphabetically`].
pub mod filter;
pub mod names;
pub mod species;
pub mod taxonomy;

pub use filter::{SpeciesFilter, filter_species};
pub use species::{Catalogs, RedListStatus, SpeciesRecord};
pub use taxonomy::{
    FamilyGroup, GenusGroup, OrderCard, OrderGroup, UNCLASSIFIED, group_by_order, organize,
    sort_alphabetically,
};
