use serde::{Deserialize, Serialize};

use crate::species::SpeciesRecord;

pub const DEFAULT_MIN_ALTITUDE: i32 = 0;
pub const DEFAULT_MAX_ALTITUDE: i32 = 4800;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endemism {
    Endemic,
    NonEndemic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    Occidental,
    Oriental,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltitudeRange {
    pub min: i32,
    pub max: i32,
}

impl AltitudeRange {
    fn is_default(&self) -> bool {
        self.min == DEFAULT_MIN_ALTITUDE && self.max == DEFAULT_MAX_ALTITUDE
    }
}

/// Empty criteria match everything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesFilter {
    pub lista_roja: Vec<String>,
    pub endemismo: Vec<Endemism>,
    pub rango_altitudinal: Option<AltitudeRange>,
    pub provincias: Vec<String>,
    pub regiones_biogeograficas: Vec<String>,
    pub ecosistemas: Vec<String>,
    pub reservas_biosfera: Vec<String>,
    pub bosques_protegidos: Vec<String>,
    pub areas_protegidas_estado: Vec<String>,
    pub areas_protegidas_privadas: Vec<String>,
    pub distribucion: Vec<Distribution>,
}

impl SpeciesFilter {
    pub fn matches(&self, species: &SpeciesRecord) -> bool {
        self.matches_red_list(species)
            && self.matches_endemism(species)
            && self.matches_altitude(species)
            && self.matches_catalogs(species)
            && self.matches_distribution(species)
    }

    fn matches_red_list(&self, species: &SpeciesRecord) -> bool {
        if self.lista_roja.is_empty() {
            return true;
        }

        let Some(code) = species.lista_roja_iucn.as_deref() else {
            return false;
        };

        self.lista_roja.iter().any(|wanted| match wanted.as_str() {
            // possibly extinct, flagged inside the code rather than as its own category
            "PE" | "CR (PE)" => code.contains("PE"),
            _ => code == wanted,
        })
    }

    fn matches_endemism(&self, species: &SpeciesRecord) -> bool {
        if self.endemismo.is_empty() {
            return true;
        }

        let wanted = if species.is_endemic() {
            Endemism::Endemic
        } else {
            Endemism::NonEndemic
        };

        self.endemismo.contains(&wanted)
    }

    fn matches_altitude(&self, species: &SpeciesRecord) -> bool {
        let Some(range) = self.rango_altitudinal.filter(|r| !r.is_default()) else {
            return true;
        };

        let min = species.rango_altitudinal_min.unwrap_or(0);
        let max = species.rango_altitudinal_max.unwrap_or(0);

        min <= range.max && max >= range.min
    }

    fn matches_catalogs(&self, species: &SpeciesRecord) -> bool {
        let catalogs = &species.catalogos;

        [
            (&self.provincias, &catalogs.provincias),
            (&self.regiones_biogeograficas, &catalogs.regiones_biogeograficas),
            (&self.ecosistemas, &catalogs.ecosistemas),
            (&self.reservas_biosfera, &catalogs.reservas_biosfera),
            (&self.bosques_protegidos, &catalogs.bosques_protegidos),
            (&self.areas_protegidas_estado, &catalogs.areas_protegidas_estado),
            (&self.areas_protegidas_privadas, &catalogs.areas_protegidas_privadas),
        ]
        .into_iter()
        .all(|(wanted, present)| {
            wanted.is_empty() || wanted.iter().any(|slug| present.contains(slug))
        })
    }

    fn matches_distribution(&self, species: &SpeciesRecord) -> bool {
        self.distribucion.is_empty()
            || self.distribucion.iter().any(|side| match side {
                Distribution::Occidental => species.has_distribucion_occidental,
                Distribution::Oriental => species.has_distribucion_oriental,
            })
    }
}

pub fn filter_species(species: &[SpeciesRecord], filter: &SpeciesFilter) -> Vec<SpeciesRecord> {
    species
        .iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect()
}
