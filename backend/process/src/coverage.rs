use std::{collections::BTreeMap, fmt};

use taxa::{RedListStatus, SpeciesRecord};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RedListCoverage {
    pub total: usize,
    pub with_code: usize,
    pub per_status: BTreeMap<RedListStatus, usize>,
    /// Non-empty codes outside [`RedListStatus`], e.g. "CR (PE)".
    pub unknown: BTreeMap<String, usize>,
}

impl RedListCoverage {
    pub fn from_species(species: &[SpeciesRecord]) -> Self {
        let mut coverage = RedListCoverage {
            total: species.len(),
            ..Default::default()
        };

        for record in species.iter().filter(|s| s.is_red_listed()) {
            coverage.with_code += 1;

            match record.red_list_status() {
                Some(status) => *coverage.per_status.entry(status).or_default() += 1,
                None => {
                    let code = record.lista_roja_iucn.clone().unwrap_or_default();
                    *coverage.unknown.entry(code).or_default() += 1;
                }
            }
        }

        coverage
    }

    pub fn without_code(&self) -> usize {
        self.total - self.with_code
    }
}

impl fmt::Display for RedListCoverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Species: {}", self.total)?;
        writeln!(f, "With Red List Code: {}", self.with_code)?;
        writeln!(f, "Without Red List Code: {}", self.without_code())?;

        for status in RedListStatus::ALL {
            let count = self.per_status.get(&status).copied().unwrap_or(0);
            writeln!(f, "  {} ({}): {count}", status.code(), status.full_name())?;
        }

        for (code, count) in &self.unknown {
            writeln!(f, "  Unknown {code}: {count}")?;
        }

        Ok(())
    }
}
