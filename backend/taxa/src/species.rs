use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id_taxon: i64,
    #[serde(default)]
    pub id_ficha_especie: Option<i64>,
    pub nombre_cientifico: String,
    #[serde(default)]
    pub nombre_comun: Option<String>,
    #[serde(default)]
    pub descubridor: Option<String>,
    #[serde(default)]
    pub endemica: Option<bool>,
    #[serde(default)]
    pub en_ecuador: Option<bool>,
    #[serde(default)]
    pub fotografia_ficha: Option<String>,
    #[serde(default)]
    pub orden: Option<String>,
    #[serde(default)]
    pub familia: Option<String>,
    #[serde(default)]
    pub genero: Option<String>,
    #[serde(default)]
    pub rango_altitudinal_min: Option<i32>,
    #[serde(default)]
    pub rango_altitudinal_max: Option<i32>,
    #[serde(default)]
    pub lista_roja_iucn: Option<String>,
    #[serde(default)]
    pub has_distribucion_occidental: bool,
    #[serde(default)]
    pub has_distribucion_oriental: bool,
    #[serde(default)]
    pub catalogos: Catalogs,
}

impl SpeciesRecord {
    pub fn is_endemic(&self) -> bool {
        self.endemica == Some(true)
    }

    /// Any non-empty code counts, including `LC` and codes outside [`RedListStatus`].
    pub fn is_red_listed(&self) -> bool {
        self.lista_roja_iucn
            .as_deref()
            .is_some_and(|code| !code.is_empty())
    }

    pub fn red_list_status(&self) -> Option<RedListStatus> {
        self.lista_roja_iucn.as_deref()?.parse().ok()
    }
}

/// Catalog memberships as slugs, used only for filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalogs {
    pub regiones_biogeograficas: Vec<String>,
    pub ecosistemas: Vec<String>,
    pub reservas_biosfera: Vec<String>,
    pub bosques_protegidos: Vec<String>,
    pub areas_protegidas_estado: Vec<String>,
    pub areas_protegidas_privadas: Vec<String>,
    pub provincias: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RedListStatus {
    Lc,
    Nt,
    Vu,
    En,
    Cr,
    Ew,
    Ex,
    Dd,
}

impl RedListStatus {
    pub const ALL: [RedListStatus; 8] = [
        RedListStatus::Lc,
        RedListStatus::Nt,
        RedListStatus::Vu,
        RedListStatus::En,
        RedListStatus::Cr,
        RedListStatus::Ew,
        RedListStatus::Ex,
        RedListStatus::Dd,
    ];

    pub fn code(self) -> &'static str {
        match self {
            RedListStatus::Lc => "LC",
            RedListStatus::Nt => "NT",
            RedListStatus::Vu => "VU",
            RedListStatus::En => "EN",
            RedListStatus::Cr => "CR",
            RedListStatus::Ew => "EW",
            RedListStatus::Ex => "EX",
            RedListStatus::Dd => "DD",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            RedListStatus::Lc => "Preocupación Menor",
            RedListStatus::Nt => "Casi Amenazada",
            RedListStatus::Vu => "Vulnerable",
            RedListStatus::En => "En Peligro",
            RedListStatus::Cr => "Críticamente Amenazada",
            RedListStatus::Ew => "Extinta en Estado Silvestre",
            RedListStatus::Ex => "Extinta",
            RedListStatus::Dd => "Datos Deficientes",
        }
    }
}

impl fmt::Display for RedListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown red list status: {0}")]
pub struct UnknownRedListStatus(pub String);

impl FromStr for RedListStatus {
    type Err = UnknownRedListStatus;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        RedListStatus::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or_else(|| UnknownRedListStatus(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endemic_flag() {
        let mut species = SpeciesRecord::default();
        assert!(!species.is_endemic());

        species.endemica = Some(false);
        assert!(!species.is_endemic());

        species.endemica = Some(true);
        assert!(species.is_endemic());
    }

    #[test]
    fn test_red_listed() {
        let mut species = SpeciesRecord::default();
        assert!(!species.is_red_listed());

        species.lista_roja_iucn = Some(String::new());
        assert!(!species.is_red_listed());

        species.lista_roja_iucn = Some("LC".to_string());
        assert!(species.is_red_listed());

        species.lista_roja_iucn = Some("CR (PE)".to_string());
        assert!(species.is_red_listed());
        assert_eq!(species.red_list_status(), None);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!("EN".parse::<RedListStatus>(), Ok(RedListStatus::En));
        assert_eq!(
            "en".parse::<RedListStatus>(),
            Err(UnknownRedListStatus("en".to_string()))
        );
        assert_eq!(RedListStatus::Cr.full_name(), "Críticamente Amenazada");
        assert_eq!(RedListStatus::Dd.to_string(), "DD");
    }

    #[test]
    fn test_deserialize_sparse_row() {
        let species: SpeciesRecord = serde_json::from_str(
            r#"{"id_taxon": 7, "nombre_cientifico": "Atelopus ignescens", "orden": null}"#,
        )
        .unwrap();

        assert_eq!(species.id_taxon, 7);
        assert_eq!(species.orden, None);
        assert_eq!(species.catalogos, Catalogs::default());
        assert!(!species.has_distribucion_oriental);
    }

    #[test]
    fn test_status_serializes_as_code() {
        assert_eq!(
            serde_json::to_string(&RedListStatus::Vu).unwrap(),
            r#""VU""#
        );
    }
}
