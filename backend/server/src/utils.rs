use std::collections::HashMap;

use taxa::{
    Catalogs, SpeciesRecord,
    names::{parse_catalog_string, slug},
};
use tracing::warn;

use crate::database::{
    BIOSPHERE_RESERVES_CATALOG, ECOSYSTEMS_CATALOG, PROTECTED_FORESTS_CATALOG, RedListCodeRow,
    SpeciesViewRow, TaxonCatalogRow, TaxonProvinceRow,
};

pub fn red_list_code_map(rows: Vec<RedListCodeRow>) -> HashMap<String, String> {
    rows.into_iter()
        .filter_map(|row| match (row.nombre, row.sigla) {
            (Some(nombre), Some(sigla)) if !nombre.is_empty() && !sigla.is_empty() => {
                Some((nombre, sigla))
            }
            _ => None,
        })
        .collect()
}

/// Joins view rows with the secondary lookups. Rows without a taxon id are dropped.
pub fn assemble_species(
    rows: Vec<SpeciesViewRow>,
    red_list_codes: &HashMap<String, String>,
    provinces: &[TaxonProvinceRow],
    catalogs: &[TaxonCatalogRow],
) -> Vec<SpeciesRecord> {
    let mut extra: HashMap<i64, Catalogs> = HashMap::new();

    for row in provinces {
        if let Some(geopolitica) = &row.geopolitica {
            extra
                .entry(row.taxon_id)
                .or_default()
                .provincias
                .push(slug(&geopolitica.nombre));
        }
    }

    for row in catalogs {
        let Some(catalog) = &row.catalogo_awe else {
            continue;
        };

        let entry = extra.entry(row.taxon_id).or_default();
        let target = match catalog.tipo_catalogo_awe_id {
            ECOSYSTEMS_CATALOG => &mut entry.ecosistemas,
            BIOSPHERE_RESERVES_CATALOG => &mut entry.reservas_biosfera,
            PROTECTED_FORESTS_CATALOG => &mut entry.bosques_protegidos,
            _ => continue,
        };
        target.push(slug(&catalog.nombre));
    }

    rows.into_iter()
        .filter_map(|row| {
            let Some(id_taxon) = row.especie_taxon_id else {
                warn!(
                    "Skipping species row without taxon id: {:?}",
                    row.nombre_cientifico
                );
                return None;
            };

            let lista_roja_iucn = row.awe_lista_roja_uicn.as_deref().and_then(|name| {
                let code = red_list_codes.get(name).cloned();
                if code.is_none() {
                    warn!("No code found for red list category: {name}");
                }
                code
            });

            let distribution = row
                .awe_distribucion_altitudinal
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();

            let mut catalogos = extra.get(&id_taxon).cloned().unwrap_or_default();
            catalogos.regiones_biogeograficas =
                parse_catalog_string(row.awe_regiones_biogeograficas.as_deref());
            catalogos.areas_protegidas_estado =
                parse_catalog_string(row.awe_areas_protegidas_estado.as_deref());
            catalogos.areas_protegidas_privadas =
                parse_catalog_string(row.awe_areas_protegidas_privadas.as_deref());

            Some(SpeciesRecord {
                id_taxon,
                id_ficha_especie: row.especie_ficha_especie_id,
                nombre_cientifico: row.nombre_cientifico.unwrap_or_default(),
                nombre_comun: row.nombre_comun,
                descubridor: row.especie_autor,
                endemica: row.endemica,
                en_ecuador: row.en_ecuador,
                fotografia_ficha: row.fotografia_ficha,
                orden: row.orden,
                familia: row.familia,
                genero: row.genero,
                rango_altitudinal_min: row.rango_altitudinal_min,
                rango_altitudinal_max: row.rango_altitudinal_max,
                lista_roja_iucn,
                has_distribucion_occidental: distribution.contains("occidental"),
                has_distribucion_oriental: distribution.contains("oriental"),
                catalogos,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::database::{CatalogEntry, GeopoliticsEntry};

    fn codes() -> HashMap<String, String> {
        red_list_code_map(vec![
            RedListCodeRow {
                nombre: Some("En Peligro".to_string()),
                sigla: Some("EN".to_string()),
            },
            RedListCodeRow {
                nombre: Some("Sin sigla".to_string()),
                sigla: None,
            },
        ])
    }

    #[test]
    fn test_red_list_code_map() {
        let codes = codes();

        assert_eq!(codes.len(), 1);
        assert_eq!(codes.get("En Peligro").map(String::as_str), Some("EN"));
    }

    #[test]
    fn test_assemble_species() {
        let rows = vec![
            SpeciesViewRow {
                especie_taxon_id: Some(10),
                nombre_cientifico: Some("Atelopus ignescens".to_string()),
                especie_autor: Some("Cornalia, 1849".to_string()),
                orden: Some("Anura".to_string()),
                awe_lista_roja_uicn: Some("En Peligro".to_string()),
                awe_distribucion_altitudinal: Some("Andes Occidental, Andes Oriental".to_string()),
                awe_regiones_biogeograficas: Some("Andes, Chocó".to_string()),
                ..Default::default()
            },
            SpeciesViewRow {
                especie_taxon_id: Some(11),
                nombre_cientifico: Some("Rhinella marina".to_string()),
                awe_lista_roja_uicn: Some("Desconocida".to_string()),
                ..Default::default()
            },
            SpeciesViewRow {
                especie_taxon_id: None,
                nombre_cientifico: Some("Orphan".to_string()),
                ..Default::default()
            },
        ];
        let provinces = vec![
            TaxonProvinceRow {
                taxon_id: 10,
                geopolitica: Some(GeopoliticsEntry {
                    nombre: "Santo Domingo de los Tsáchilas".to_string(),
                }),
            },
            TaxonProvinceRow {
                taxon_id: 10,
                geopolitica: None,
            },
        ];
        let catalogs = vec![
            TaxonCatalogRow {
                taxon_id: 11,
                catalogo_awe: Some(CatalogEntry {
                    nombre: "Bosque Seco".to_string(),
                    tipo_catalogo_awe_id: ECOSYSTEMS_CATALOG,
                }),
            },
            TaxonCatalogRow {
                taxon_id: 11,
                catalogo_awe: Some(CatalogEntry {
                    nombre: "Ignored".to_string(),
                    tipo_catalogo_awe_id: 99,
                }),
            },
        ];

        let species = assemble_species(rows, &codes(), &provinces, &catalogs);

        assert_eq!(species.len(), 2);

        let atelopus = &species[0];
        assert_eq!(atelopus.id_taxon, 10);
        assert_eq!(atelopus.descubridor.as_deref(), Some("Cornalia, 1849"));
        assert_eq!(atelopus.lista_roja_iucn.as_deref(), Some("EN"));
        assert!(atelopus.has_distribucion_occidental);
        assert!(atelopus.has_distribucion_oriental);
        assert_eq!(atelopus.catalogos.regiones_biogeograficas, vec!["andes", "choco"]);
        assert_eq!(
            atelopus.catalogos.provincias,
            vec!["santo-domingo-de-los-tsachilas"]
        );

        let rhinella = &species[1];
        assert_eq!(rhinella.lista_roja_iucn, None);
        assert!(!rhinella.has_distribucion_occidental);
        assert_eq!(rhinella.catalogos.ecosistemas, vec!["bosque-seco"]);
        assert!(rhinella.catalogos.provincias.is_empty());
    }

    #[test]
    fn test_duplicate_rows_share_catalogs() {
        let row = SpeciesViewRow {
            especie_taxon_id: Some(5),
            nombre_cientifico: Some("Pristimantis unistrigatus".to_string()),
            ..Default::default()
        };
        let catalogs = vec![TaxonCatalogRow {
            taxon_id: 5,
            catalogo_awe: Some(CatalogEntry {
                nombre: "Bosque Seco".to_string(),
                tipo_catalogo_awe_id: ECOSYSTEMS_CATALOG,
            }),
        }];

        let species = assemble_species(vec![row.clone(), row], &codes(), &[], &catalogs);

        assert_eq!(species.len(), 2);
        assert_eq!(species[0].catalogos.ecosistemas, vec!["bosque-seco"]);
        assert_eq!(species[1].catalogos.ecosistemas, vec!["bosque-seco"]);
    }
}
