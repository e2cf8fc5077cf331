use crate::model_name::{CutSpec, DiscretizerKind, ModelBase};
use crate::Error;
use serde::{Deserialize, Serialize};

/// Budget d'itérations de l'entraînement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Iterations {
    #[serde(rename = "10it")]
    It10,
    #[serde(rename = "100it")]
    It100,
}

impl Iterations {
    pub const ALL: [Iterations; 2] = [Iterations::It10, Iterations::It100];

    pub fn as_str(&self) -> &'static str {
        match self {
            Iterations::It10 => "10it",
            Iterations::It100 => "100it",
        }
    }
}

impl std::str::FromStr for Iterations {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "10it" => Ok(Iterations::It10),
            "100it" => Ok(Iterations::It100),
            _ => Err(Error::UnknownModelFormat(format!("iterations: {s}"))),
        }
    }
}

impl std::fmt::Display for Iterations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Un résultat d'expérience: une configuration évaluée sur un dataset.
///
/// Les champs dérivés (`improvement_vs_base`, `best_base_model`,
/// `best_base_accuracy`, `best_in_group`) sont relatifs au filtre actif et
/// recalculés sur des copies; les valeurs éventuellement présentes dans le
/// document source ne font pas foi.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub dataset: String,
    pub iterations: Iterations,
    pub cuts: CutSpec,
    pub model: String,
    pub model_base: ModelBase,
    pub discretization_type: DiscretizerKind,
    pub accuracy: f64,
    pub std: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement_vs_base: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_base_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_base_accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_in_group: Option<bool>,
}

impl ResultRecord {
    pub fn cohort_key(&self) -> CohortKey {
        CohortKey {
            dataset: self.dataset.clone(),
            iterations: self.iterations,
            cuts: self.cuts,
            model_base: self.model_base,
        }
    }

    pub fn is_local(&self) -> bool {
        self.discretization_type == DiscretizerKind::Local
    }

    /// Remet à zéro les champs dérivés avant un recalcul
    pub(crate) fn without_derived(&self) -> ResultRecord {
        ResultRecord {
            improvement_vs_base: None,
            best_base_model: None,
            best_base_accuracy: None,
            best_in_group: None,
            ..self.clone()
        }
    }
}

/// Clé de cohorte: l'unité à l'intérieur de laquelle la comparaison
/// local vs base a un sens
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CohortKey {
    pub dataset: String,
    pub iterations: Iterations,
    pub cuts: CutSpec,
    pub model_base: ModelBase,
}

/// Métadonnées du document de résultats
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub iterations_options: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cuts_options: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub model_bases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discretization_types: Vec<String>,
}

/// Dépôt en lecture seule des résultats chargés.
///
/// Peuplé une fois au chargement, immuable ensuite; toutes les structures
/// dérivées sont reconstruites à chaque interaction à partir de `all()`.
#[derive(Debug, Clone, Serialize)]
pub struct ResultSet {
    records: Vec<ResultRecord>,
    metadata: Metadata,
}

impl ResultSet {
    pub fn new(records: Vec<ResultRecord>, metadata: Metadata) -> Self {
        Self { records, metadata }
    }

    pub fn all(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Datasets distincts, triés
    pub fn datasets(&self) -> Vec<String> {
        unique_datasets(&self.records)
    }
}

/// Datasets distincts d'une tranche d'enregistrements, triés
pub fn unique_datasets(records: &[ResultRecord]) -> Vec<String> {
    let mut names: Vec<String> = records.iter().map(|r| r.dataset.clone()).collect();
    names.sort();
    names.dedup();
    names
}
