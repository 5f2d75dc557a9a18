use std::collections::HashMap;

use log::debug;

use crate::config::*;

/// Key of the dimensional cube: one measure and one value per breakdown
/// dimension.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct CubeKey {
    pub measure: String,
    pub age: BreakdownCode,
    pub sex: BreakdownCode,
    pub education: BreakdownCode,
}

impl CubeKey {
    fn of(obs: &Observation) -> CubeKey {
        CubeKey {
            measure: obs.measure.code.clone(),
            age: obs.age.code.clone(),
            sex: obs.sex.code.clone(),
            education: obs.education.code.clone(),
        }
    }

    /// The all-total slice of one measure.
    pub fn total(measure: &str) -> CubeKey {
        CubeKey {
            measure: measure.to_string(),
            age: BreakdownCode::Total,
            sex: BreakdownCode::Total,
            education: BreakdownCode::Total,
        }
    }

    /// The slice of one measure restricted to one sex, with age and
    /// education kept total.
    pub fn sex_slice(measure: &str, sex_code: &str) -> CubeKey {
        CubeKey {
            measure: measure.to_string(),
            age: BreakdownCode::Total,
            sex: BreakdownCode::Coded(sex_code.to_string()),
            education: BreakdownCode::Total,
        }
    }
}

/// The loaded dataset, immutable for the life of the snapshot. The lookup
/// indexes are built once at load time so that per-request slicing does not
/// rescan the table.
pub struct Dataset {
    observations: Vec<Observation>,
    by_economy: HashMap<String, Vec<usize>>,
    cube: HashMap<CubeKey, Vec<usize>>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Dataset {
        let mut by_economy: HashMap<String, Vec<usize>> = HashMap::new();
        let mut cube: HashMap<CubeKey, Vec<usize>> = HashMap::new();
        for (idx, obs) in observations.iter().enumerate() {
            by_economy
                .entry(obs.economy.clone())
                .or_default()
                .push(idx);
            cube.entry(CubeKey::of(obs)).or_default().push(idx);
        }
        debug!(
            "Dataset::new: {} observations, {} economies, {} cube slices",
            observations.len(),
            by_economy.len(),
            cube.len()
        );
        Dataset {
            observations,
            by_economy,
            cube,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct economies, sorted alphabetically (selection-control order).
    pub fn economies(&self) -> Vec<String> {
        let mut res: Vec<String> = self.by_economy.keys().cloned().collect();
        res.sort();
        res
    }

    /// Distinct domains, sorted by their numeric key (selection-control
    /// order).
    pub fn domains(&self) -> Vec<Domain> {
        let mut res: Vec<Domain> = Vec::new();
        for obs in self.observations.iter() {
            if !res.contains(&obs.domain) {
                res.push(obs.domain.clone());
            }
        }
        res.sort_by_key(|d| d.key);
        res
    }

    /// Distinct measures of one domain, in measure code order.
    pub fn measures_in_domain(&self, domain: &str) -> Vec<Measure> {
        let mut res: Vec<Measure> = Vec::new();
        for obs in self.observations.iter() {
            if obs.domain.name == domain && !res.iter().any(|m| m.code == obs.measure.code) {
                res.push(obs.measure.clone());
            }
        }
        res.sort_by(|a, b| a.code.cmp(&b.code));
        res
    }

    /// All the rows of one (economy, domain) selection.
    pub fn economy_domain_rows(&self, economy: &str, domain: &str) -> Vec<Observation> {
        match self.by_economy.get(economy) {
            Some(idxs) => idxs
                .iter()
                .map(|&i| &self.observations[i])
                .filter(|o| o.domain.name == domain)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// One cube slice across all economies.
    pub fn cube_slice(&self, key: &CubeKey) -> Vec<Observation> {
        match self.cube.get(key) {
            Some(idxs) => idxs
                .iter()
                .map(|&i| self.observations[i].clone())
                .collect(),
            None => Vec::new(),
        }
    }
}
