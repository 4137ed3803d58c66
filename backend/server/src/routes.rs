use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use taxa::{
    OrderCard, OrderGroup, SpeciesFilter, SpeciesRecord, filter_species, group_by_order, organize,
    sort_alphabetically,
};
use tracing::info;

use crate::{
    error::AppError,
    search::{TAXON_SEARCH_LIMIT, TaxonMatch, TaxonQuery, matches_name},
    state::AppState,
};

const SORT_ALPHA: &str = "alpha";

#[derive(Debug, Default, Deserialize)]
pub struct SpeciesQuery {
    pub q: Option<String>,
    pub familia: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn health_handler() -> &'static str {
    "OK"
}

pub async fn species_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SpeciesQuery>,
) -> Result<Json<Vec<SpeciesRecord>>, AppError> {
    Ok(Json(load_species(&state, &query).await?))
}

pub async fn filter_handler(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<SpeciesFilter>,
) -> Result<Json<Vec<SpeciesRecord>>, AppError> {
    let species = state.source.list_species(None).await?;

    Ok(Json(filter_species(&species, &filter)))
}

pub async fn tree_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SpeciesQuery>,
) -> Result<Json<Vec<OrderGroup>>, AppError> {
    let sort = match query.sort.as_deref() {
        None | Some("") => false,
        Some(SORT_ALPHA) => true,
        Some(other) => return Err(AppError::BadRequest(format!("unknown sort {other}"))),
    };

    let species = load_species(&state, &query).await?;
    let mut orders = organize(&species);

    if sort {
        sort_alphabetically(&mut orders);
    }

    info!("Organized {} species into {} orders", species.len(), orders.len());

    Ok(Json(orders))
}

pub async fn orders_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SpeciesQuery>,
) -> Result<Json<Vec<OrderCard>>, AppError> {
    let species = load_species(&state, &query).await?;

    Ok(Json(group_by_order(&species)))
}

pub async fn search_taxon_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<TaxonMatch>>, AppError> {
    let Some(query) = query.q.as_deref().and_then(TaxonQuery::parse) else {
        return Ok(Json(Vec::new()));
    };

    let matches = state.source.search_taxa(&query, TAXON_SEARCH_LIMIT).await?;

    Ok(Json(matches))
}

async fn load_species(
    state: &AppState,
    query: &SpeciesQuery,
) -> Result<Vec<SpeciesRecord>, AppError> {
    let species = state.source.list_species(query.familia.as_deref()).await?;
    let name = query.q.as_deref().unwrap_or_default();

    Ok(species
        .into_iter()
        .filter(|s| matches_name(s, name))
        .collect())
}
