//! Vue de comparaison tête-à-tête: pour une configuration fixée
//! (itérations, discrétiseur adverse, coupes), la discrétisation locale
//! face à sa référence, dataset par dataset et classificateur par
//! classificateur.

use crate::aggregate::WinLossTally;
use crate::model_name::{CutSpec, Discretizer, ModelBase, ModelNameResolver};
use crate::record::{unique_datasets, Iterations, ResultRecord};
use crate::stats::mean;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sélection de la vue: le discrétiseur adverse est comparé au local à
/// configuration égale. Pour PKI, `cuts` doit valoir `Unlimited` (la
/// variante est portée par le discrétiseur); toute autre combinaison
/// produit simplement des cellules vides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompareSelection {
    pub iterations: Iterations,
    pub adversary: Discretizer,
    pub cuts: CutSpec,
}

/// Une cellule: un modèle concret et son accuracy sur le dataset de la
/// ligne, absente quand aucun enregistrement ne correspond
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareCell {
    pub model: String,
    pub accuracy: Option<f64>,
}

/// Le duel local vs base d'un classificateur sur un dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareEntry {
    pub model_base: ModelBase,
    /// Absente quand la combinaison discrétiseur × coupes n'existe pas
    pub baseline: Option<CompareCell>,
    pub local: CompareCell,
    /// local − base, en points de pourcentage, quand les deux cellules
    /// sont présentes
    pub diff_pp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareRow {
    pub dataset: String,
    pub entries: Vec<CompareEntry>,
    /// Modèles à l'accuracy maximale de la ligne (mise en évidence)
    pub best_models: Vec<String>,
}

/// Statistiques par classificateur sur l'ensemble des datasets
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CompareBaseStats {
    pub tally: WinLossTally,
    pub mean_diff_pp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareView {
    pub selection: CompareSelection,
    pub rows: Vec<CompareRow>,
    pub stats: BTreeMap<ModelBase, CompareBaseStats>,
}

/// Construit la vue de comparaison sur l'ensemble d'enregistrements donné
pub fn compare_view(
    records: &[ResultRecord],
    selection: CompareSelection,
    resolver: &ModelNameResolver,
) -> CompareView {
    let datasets = unique_datasets(records);
    let mut rows = Vec::with_capacity(datasets.len());
    let mut diffs: BTreeMap<ModelBase, Vec<f64>> = BTreeMap::new();
    let mut tallies: BTreeMap<ModelBase, WinLossTally> = BTreeMap::new();

    for dataset in datasets {
        let mut entries = Vec::with_capacity(ModelBase::ALL.len());
        let mut best_accuracy = f64::NEG_INFINITY;

        for base in ModelBase::ALL {
            let local_model = match resolver.resolve(base, Discretizer::Local, selection.cuts) {
                Some(model) => model,
                None => continue,
            };
            let local_accuracy = find_accuracy(records, &local_model, &dataset, selection);

            let baseline = resolver
                .resolve(base, selection.adversary, selection.cuts)
                .map(|model| {
                    let accuracy = find_accuracy(records, &model, &dataset, selection);
                    CompareCell { model, accuracy }
                });

            let baseline_accuracy = baseline.as_ref().and_then(|c| c.accuracy);
            let diff_pp = match (local_accuracy, baseline_accuracy) {
                (Some(local), Some(base_acc)) => {
                    let diff = (local - base_acc) * 100.0;
                    diffs.entry(base).or_default().push(diff);
                    tallies.entry(base).or_default().record(diff);
                    Some(diff)
                }
                _ => None,
            };

            for accuracy in [local_accuracy, baseline_accuracy].into_iter().flatten() {
                best_accuracy = best_accuracy.max(accuracy);
            }

            entries.push(CompareEntry {
                model_base: base,
                baseline,
                local: CompareCell {
                    model: local_model,
                    accuracy: local_accuracy,
                },
                diff_pp,
            });
        }

        let best_models = entries
            .iter()
            .flat_map(|e| e.baseline.iter().chain(std::iter::once(&e.local)))
            .filter(|cell| cell.accuracy == Some(best_accuracy))
            .map(|cell| cell.model.clone())
            .collect();

        rows.push(CompareRow {
            dataset,
            entries,
            best_models,
        });
    }

    let stats = ModelBase::ALL
        .into_iter()
        .map(|base| {
            let tally = tallies.get(&base).copied().unwrap_or_default();
            let mean_diff_pp = diffs
                .get(&base)
                .filter(|d| !d.is_empty())
                .map(|d| mean(d));
            (base, CompareBaseStats { tally, mean_diff_pp })
        })
        .collect();

    CompareView {
        selection,
        rows,
        stats,
    }
}

fn find_accuracy(
    records: &[ResultRecord],
    model: &str,
    dataset: &str,
    selection: CompareSelection,
) -> Option<f64> {
    records
        .iter()
        .find(|r| {
            r.model == model
                && r.dataset == dataset
                && r.iterations == selection.iterations
                && r.cuts == selection.cuts
        })
        .map(|r| r.accuracy)
}
