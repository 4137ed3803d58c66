//! # Taxonomy Tree
//!
//! Groups a flat species list into Order > Family > Genus > Species.
//!
//! ## Grouping
//! 1. Bucket species by order name, then each order bucket by family, then each family bucket by genus.
//!
//! 2. Missing or empty names go to [`UNCLASSIFIED`] at that level only.
//!
//! 3. Buckets keep first-seen order, species keep input order.
//!
//! 4. Genus summaries are folded over species, family and order summaries are sums of their children.
//!
//! Single pass per level, linear in species plus distinct keys.
use std::{
    cmp::Ordering,
    collections::{HashMap, hash_map::Entry},
};

use serde::{Deserialize, Serialize};

use crate::{
    names::{fold, representative_common_name},
    species::SpeciesRecord,
};

pub const UNCLASSIFIED: &str = "Sin clasificar";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenusSummary {
    pub total_species: usize,
    pub endemic_species: usize,
    pub red_list_species: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilySummary {
    pub total_species: usize,
    pub total_genera: usize,
    pub endemic_species: usize,
    pub red_list_species: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_species: usize,
    pub total_families: usize,
    pub endemic_species: usize,
    pub red_list_species: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenusGroup {
    pub id: String,
    pub name: String,
    pub nombre_comun: Option<String>,
    pub species: Vec<SpeciesRecord>,
    pub summary: GenusSummary,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FamilyGroup {
    pub id: String,
    pub name: String,
    pub nombre_comun: Option<String>,
    pub genera: Vec<GenusGroup>,
    pub summary: FamilySummary,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderGroup {
    pub id: String,
    pub name: String,
    pub families: Vec<FamilyGroup>,
    pub summary: OrderSummary,
}

/// Card view entry. Grouped by order only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderCard {
    pub name: String,
    pub species: Vec<SpeciesRecord>,
}

type Buckets<'a> = Vec<(&'a str, Vec<&'a SpeciesRecord>)>;

pub fn organize(species: &[SpeciesRecord]) -> Vec<OrderGroup> {
    bucket(species.iter(), |s| s.orden.as_deref())
        .into_iter()
        .map(|(name, members)| build_order(name, members))
        .collect()
}

pub fn group_by_order(species: &[SpeciesRecord]) -> Vec<OrderCard> {
    bucket(species.iter(), |s| s.orden.as_deref())
        .into_iter()
        .map(|(name, members)| OrderCard {
            name: name.to_string(),
            species: members.into_iter().cloned().collect(),
        })
        .collect()
}

/// Recursively sorts orders, families and genera by name. Species order is left alone.
pub fn sort_alphabetically(orders: &mut [OrderGroup]) {
    orders.sort_by(|a, b| compare_names(&a.name, &b.name));

    for order in orders.iter_mut() {
        order.families.sort_by(|a, b| compare_names(&a.name, &b.name));

        for family in order.families.iter_mut() {
            family.genera.sort_by(|a, b| compare_names(&a.name, &b.name));
        }
    }
}

fn build_order(name: &str, members: Vec<&SpeciesRecord>) -> OrderGroup {
    let families: Vec<FamilyGroup> = bucket(members, |s| s.familia.as_deref())
        .into_iter()
        .map(|(name, members)| build_family(name, members))
        .collect();

    let mut summary = OrderSummary {
        total_families: families.len(),
        ..Default::default()
    };
    for family in &families {
        summary.total_species += family.summary.total_species;
        summary.endemic_species += family.summary.endemic_species;
        summary.red_list_species += family.summary.red_list_species;
    }

    OrderGroup {
        id: group_id(name),
        name: name.to_string(),
        families,
        summary,
    }
}

fn build_family(name: &str, members: Vec<&SpeciesRecord>) -> FamilyGroup {
    let nombre_comun =
        representative_common_name(members.iter().map(|s| s.nombre_comun.as_deref()));

    let genera: Vec<GenusGroup> = bucket(members, |s| s.genero.as_deref())
        .into_iter()
        .map(|(name, members)| build_genus(name, members))
        .collect();

    let mut summary = FamilySummary {
        total_genera: genera.len(),
        ..Default::default()
    };
    for genus in &genera {
        summary.total_species += genus.summary.total_species;
        summary.endemic_species += genus.summary.endemic_species;
        summary.red_list_species += genus.summary.red_list_species;
    }

    FamilyGroup {
        id: group_id(name),
        name: name.to_string(),
        nombre_comun,
        genera,
        summary,
    }
}

fn build_genus(name: &str, members: Vec<&SpeciesRecord>) -> GenusGroup {
    let summary = members
        .iter()
        .fold(GenusSummary::default(), |mut summary, species| {
            summary.total_species += 1;
            if species.is_endemic() {
                summary.endemic_species += 1;
            }
            if species.is_red_listed() {
                summary.red_list_species += 1;
            }
            summary
        });

    // Taken from the first species only, even when a later one has a name.
    let nombre_comun = members
        .first()
        .and_then(|s| s.nombre_comun.clone())
        .filter(|n| !n.is_empty());

    GenusGroup {
        id: group_id(name),
        name: name.to_string(),
        nombre_comun,
        species: members.into_iter().cloned().collect(),
        summary,
    }
}

fn bucket<'a, I, F>(species: I, rank: F) -> Buckets<'a>
where
    I: IntoIterator<Item = &'a SpeciesRecord>,
    F: Fn(&'a SpeciesRecord) -> Option<&'a str>,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut buckets: Buckets<'a> = Vec::new();

    for record in species {
        let key = match rank(record) {
            Some(name) if !name.is_empty() => name,
            _ => UNCLASSIFIED,
        };

        match positions.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(buckets.len());
                buckets.push((key, vec![record]));
            }
            Entry::Occupied(entry) => {
                buckets[*entry.get()].1.push(record);
            }
        }
    }

    buckets
}

/// Lowercased name with each whitespace run replaced by a single dash.
fn group_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut in_space = false;

    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                id.push('-');
            }
            in_space = true;
        } else {
            id.extend(c.to_lowercase());
            in_space = false;
        }
    }

    id
}

fn compare_names(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}
