use crate::model_name::{CutSpec, DiscretizerKind, ModelBase};
use crate::record::{Iterations, ResultRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Filtre d'inclusion sur une dimension.
///
/// `All` signifie "aucune restriction" et se distingue d'un ensemble vide,
/// qui exclut tout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection<T: Ord> {
    All,
    Only(BTreeSet<T>),
}

impl<T: Ord> Selection<T> {
    pub fn only(values: impl IntoIterator<Item = T>) -> Self {
        Selection::Only(values.into_iter().collect())
    }

    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.contains(value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

/// Configuration des filtres actifs.
///
/// `only_improvements` ne fait pas partie du prédicat structurel: il
/// s'applique après le recalcul des améliorations (voir la session), car
/// la valeur qu'il teste dépend de l'ensemble de bases retenu par les
/// autres filtres.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Sous-chaîne recherchée dans le nom du dataset, insensible à la casse
    pub search: String,
    pub iterations: Selection<Iterations>,
    pub cuts: Selection<CutSpec>,
    pub model_base: Selection<ModelBase>,
    pub discretization_type: Selection<DiscretizerKind>,
    pub only_improvements: bool,
}

impl FilterConfig {
    /// Prédicat structurel (conjonction de tous les filtres sauf
    /// `only_improvements`)
    pub fn matches(&self, record: &ResultRecord) -> bool {
        self.matches_with_needle(record, &self.search.to_lowercase())
    }

    fn matches_with_needle(&self, record: &ResultRecord, needle: &str) -> bool {
        if !needle.is_empty() && !record.dataset.to_lowercase().contains(needle) {
            return false;
        }
        self.iterations.admits(&record.iterations)
            && self.cuts.admits(&record.cuts)
            && self.model_base.admits(&record.model_base)
            && self.discretization_type.admits(&record.discretization_type)
    }

    /// Filtre pur: copie les enregistrements retenus, sans toucher à la
    /// collection source. Doit s'exécuter avant l'agrégation — la "meilleure
    /// base" est définie par rapport aux discrétiseurs encore présents ici.
    pub fn apply(&self, records: &[ResultRecord]) -> Vec<ResultRecord> {
        let needle = self.search.to_lowercase();
        records
            .iter()
            .filter(|r| self.matches_with_needle(r, &needle))
            .cloned()
            .collect()
    }
}
