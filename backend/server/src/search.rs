//! # Search
//!
//! Lookups behind the search boxes.
//!
//! ## Species
//! - Substring match on scientific or common name, ignoring case and accents, applied to the flat list after the
//!   data source has returned it.
//!
//! ## Taxon
//! - Quick lookup in the `taxon` table used by the editor and navigation.
//! - All-digit queries look up a taxon id directly, anything else is a partial name match.
//! - Capped at [`TAXON_SEARCH_LIMIT`] rows.
use serde::{Deserialize, Serialize};
use taxa::{SpeciesRecord, names::fold};

pub const TAXON_SEARCH_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaxonQuery {
    ById(i64),
    ByName(String),
}

impl TaxonQuery {
    /// `None` for blank input.
    pub fn parse(query: &str) -> Option<Self> {
        let query = query.trim();

        if query.is_empty() {
            return None;
        }

        if query.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = query.parse() {
                return Some(TaxonQuery::ById(id));
            }
        }

        Some(TaxonQuery::ByName(query.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonMatch {
    pub id_taxon: i64,
    pub taxon: String,
}

pub fn matches_name(species: &SpeciesRecord, query: &str) -> bool {
    let query = query.trim();

    if query.is_empty() {
        return true;
    }

    let query = fold(query);

    fold(&species.nombre_cientifico).contains(&query)
        || species
            .nombre_comun
            .as_deref()
            .is_some_and(|name| fold(name).contains(&query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxon_query() {
        assert_eq!(TaxonQuery::parse("   "), None);
        assert_eq!(TaxonQuery::parse("1042"), Some(TaxonQuery::ById(1042)));
        assert_eq!(
            TaxonQuery::parse(" Atelopus "),
            Some(TaxonQuery::ByName("Atelopus".to_string()))
        );
        assert_eq!(
            TaxonQuery::parse("12a"),
            Some(TaxonQuery::ByName("12a".to_string()))
        );
    }

    #[test]
    fn test_overflowing_id_is_a_name() {
        assert_eq!(
            TaxonQuery::parse("99999999999999999999"),
            Some(TaxonQuery::ByName("99999999999999999999".to_string()))
        );
    }

    #[test]
    fn test_matches_name() {
        let species = SpeciesRecord {
            nombre_cientifico: "Atelopus ignescens".to_string(),
            nombre_comun: Some("Jambato de Quito".to_string()),
            ..Default::default()
        };

        assert!(matches_name(&species, ""));
        assert!(matches_name(&species, "IGNES"));
        assert!(matches_name(&species, "quito"));
        assert!(!matches_name(&species, "Hyla"));
    }

    #[test]
    fn test_matches_name_ignores_accents() {
        let species = SpeciesRecord {
            nombre_cientifico: "Pristimantis unistrigatus".to_string(),
            nombre_comun: Some("Cutín de Quito".to_string()),
            ..Default::default()
        };

        assert!(matches_name(&species, "cutin"));
        assert!(matches_name(&species, "CUTÍN DE"));
        assert!(!matches_name(&species, "cutina"));
    }
}
