//! # Data Source
//!
//! Hosted Postgres behind a PostgREST endpoint. Read only.
//!
//! ## Tables
//! - `vw_ficha_especie_completa`: one row per species with classification, flags and comma separated catalogs.
//! - `catalogo_awe`: catalog entries. Type 10 maps red list category names to their codes.
//! - `taxon_geopolitica` + `geopolitica`: provinces per taxon (rank 3).
//! - `taxon_catalogo_awe`: catalog memberships missing from the view (ecosystems, biosphere reserves,
//!   protected forests).
//! - `taxon`: bare taxon names for quick lookups.
//!
//! ## Failure Policy
//! - The species view failing fails the request.
//! - Secondary lookups failing only drop the data they would have added, with a warning.
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use taxa::SpeciesRecord;
use tracing::{debug, warn};

use crate::{
    error::AppError,
    search::{TaxonMatch, TaxonQuery},
    utils::{assemble_species, red_list_code_map},
};

pub const SPECIES_VIEW: &str = "vw_ficha_especie_completa";
pub const CATALOG_TABLE: &str = "catalogo_awe";
pub const TAXON_CATALOG_TABLE: &str = "taxon_catalogo_awe";
pub const TAXON_GEOPOLITICS_TABLE: &str = "taxon_geopolitica";
pub const TAXON_TABLE: &str = "taxon";

pub const RED_LIST_CATALOG: i64 = 10;
pub const ECOSYSTEMS_CATALOG: i64 = 21;
pub const BIOSPHERE_RESERVES_CATALOG: i64 = 22;
pub const PROTECTED_FORESTS_CATALOG: i64 = 23;
pub const PROVINCE_RANK: i64 = 3;

/// Keeps `in.(...)` filters well under URL length limits.
const ID_BATCH: usize = 150;

#[async_trait]
pub trait SpeciesSource: Send + Sync {
    /// Sorted by scientific name ascending.
    async fn list_species(&self, familia: Option<&str>) -> Result<Vec<SpeciesRecord>, AppError>;

    async fn search_taxa(
        &self,
        query: &TaxonQuery,
        limit: usize,
    ) -> Result<Vec<TaxonMatch>, AppError>;
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpeciesViewRow {
    pub especie_taxon_id: Option<i64>,
    pub especie_ficha_especie_id: Option<i64>,
    pub nombre_cientifico: Option<String>,
    pub nombre_comun: Option<String>,
    pub especie_autor: Option<String>,
    pub orden: Option<String>,
    pub familia: Option<String>,
    pub genero: Option<String>,
    pub fotografia_ficha: Option<String>,
    pub en_ecuador: Option<bool>,
    pub endemica: Option<bool>,
    pub rango_altitudinal_min: Option<i32>,
    pub rango_altitudinal_max: Option<i32>,
    pub awe_lista_roja_uicn: Option<String>,
    pub awe_distribucion_altitudinal: Option<String>,
    pub awe_regiones_biogeograficas: Option<String>,
    pub awe_areas_protegidas_estado: Option<String>,
    pub awe_areas_protegidas_privadas: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RedListCodeRow {
    pub nombre: Option<String>,
    pub sigla: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogEntry {
    pub nombre: String,
    pub tipo_catalogo_awe_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TaxonCatalogRow {
    pub taxon_id: i64,
    pub catalogo_awe: Option<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GeopoliticsEntry {
    pub nombre: String,
}

#[derive(Debug, Deserialize)]
pub struct TaxonProvinceRow {
    pub taxon_id: i64,
    pub geopolitica: Option<GeopoliticsEntry>,
}

pub struct PostgrestSource {
    client: Client,
    base_url: String,
    key: String,
}

impl PostgrestSource {
    pub fn new(base_url: &str, key: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, AppError> {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        debug!("Querying {table} with {params:?}");

        let bytes = self
            .client
            .get(&url)
            .query(params)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Red list category name to code, e.g. "En Peligro" to "EN".
    pub async fn red_list_codes(&self) -> Result<HashMap<String, String>, AppError> {
        let rows: Vec<RedListCodeRow> = self
            .select(
                CATALOG_TABLE,
                &[
                    ("select", "nombre,sigla".to_string()),
                    ("tipo_catalogo_awe_id", format!("eq.{RED_LIST_CATALOG}")),
                ],
            )
            .await?;

        Ok(red_list_code_map(rows))
    }

    async fn provinces(&self, taxon_ids: &[i64]) -> Result<Vec<TaxonProvinceRow>, AppError> {
        let mut rows = Vec::new();

        for batch in taxon_ids.chunks(ID_BATCH) {
            let batch_rows: Vec<TaxonProvinceRow> = self
                .select(
                    TAXON_GEOPOLITICS_TABLE,
                    &[
                        (
                            "select",
                            "taxon_id,geopolitica(nombre,rank_geopolitica_id)".to_string(),
                        ),
                        ("taxon_id", in_list(batch)),
                        ("geopolitica.rank_geopolitica_id", format!("eq.{PROVINCE_RANK}")),
                    ],
                )
                .await?;

            rows.extend(batch_rows);
        }

        Ok(rows)
    }

    async fn extra_catalogs(&self, taxon_ids: &[i64]) -> Result<Vec<TaxonCatalogRow>, AppError> {
        let mut rows = Vec::new();
        let catalog_types = in_list(&[
            ECOSYSTEMS_CATALOG,
            BIOSPHERE_RESERVES_CATALOG,
            PROTECTED_FORESTS_CATALOG,
        ]);

        for batch in taxon_ids.chunks(ID_BATCH) {
            let batch_rows: Vec<TaxonCatalogRow> = self
                .select(
                    TAXON_CATALOG_TABLE,
                    &[
                        (
                            "select",
                            "taxon_id,catalogo_awe(nombre,tipo_catalogo_awe_id)".to_string(),
                        ),
                        ("taxon_id", in_list(batch)),
                        ("catalogo_awe.tipo_catalogo_awe_id", catalog_types.clone()),
                    ],
                )
                .await?;

            rows.extend(batch_rows);
        }

        Ok(rows)
    }
}

#[async_trait]
impl SpeciesSource for PostgrestSource {
    async fn list_species(&self, familia: Option<&str>) -> Result<Vec<SpeciesRecord>, AppError> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", "nombre_cientifico.asc".to_string()),
        ];
        if let Some(familia) = familia {
            params.push(("familia", format!("eq.{familia}")));
        }

        let rows: Vec<SpeciesViewRow> = self.select(SPECIES_VIEW, &params).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let taxon_ids: Vec<i64> = rows.iter().filter_map(|r| r.especie_taxon_id).collect();

        let codes = self.red_list_codes().await.unwrap_or_else(|e| {
            warn!("Failed to fetch red list codes: {e}");
            HashMap::new()
        });
        let provinces = self.provinces(&taxon_ids).await.unwrap_or_else(|e| {
            warn!("Failed to fetch provinces: {e}");
            Vec::new()
        });
        let catalogs = self.extra_catalogs(&taxon_ids).await.unwrap_or_else(|e| {
            warn!("Failed to fetch catalogs: {e}");
            Vec::new()
        });

        Ok(assemble_species(rows, &codes, &provinces, &catalogs))
    }

    async fn search_taxa(
        &self,
        query: &TaxonQuery,
        limit: usize,
    ) -> Result<Vec<TaxonMatch>, AppError> {
        let filter = match query {
            TaxonQuery::ById(id) => ("id_taxon", format!("eq.{id}")),
            TaxonQuery::ByName(name) => ("taxon", format!("ilike.*{name}*")),
        };

        self.select(
            TAXON_TABLE,
            &[
                ("select", "id_taxon,taxon".to_string()),
                filter,
                ("limit", limit.to_string()),
            ],
        )
        .await
    }
}

fn in_list(ids: &[i64]) -> String {
    let ids: Vec<String> = ids.iter().map(i64::to_string).collect();

    format!("in.({})", ids.join(","))
}
