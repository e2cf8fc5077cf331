//! Grille complète des résultats: une colonne par configuration concrète
//! (itérations × classificateur × discrétiseur × coupes), une ligne par
//! dataset. Les colonnes sans aucun résultat sont élaguées.

use crate::model_name::{
    CutSpec, Discretizer, DiscretizerKind, ModelBase, ModelNameResolver, PkiVariant,
};
use crate::record::{unique_datasets, Iterations, ResultRecord};
use crate::stats::mean;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mode d'ordonnancement des colonnes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridSort {
    /// Accuracy moyenne décroissante
    #[default]
    BestDesc,
    /// Accuracy moyenne croissante
    BestAsc,
    /// Nom de colonne croissant
    AlphaAsc,
    /// Nom de colonne décroissant
    AlphaDesc,
}

/// Dimensions retenues pour générer les colonnes candidates
#[derive(Debug, Clone, PartialEq)]
pub struct GridSelection {
    pub iterations: Vec<Iterations>,
    pub model_base: Vec<ModelBase>,
    pub discretization_type: Vec<DiscretizerKind>,
    pub cuts: Vec<CutSpec>,
}

impl Default for GridSelection {
    fn default() -> Self {
        Self {
            iterations: Iterations::ALL.to_vec(),
            model_base: ModelBase::ALL.to_vec(),
            discretization_type: DiscretizerKind::ALL.to_vec(),
            cuts: CutSpec::ALL.to_vec(),
        }
    }
}

/// Une colonne de la grille: une configuration concrète et son accuracy
/// moyenne sur les datasets où elle a des résultats
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridColumn {
    pub iterations: Iterations,
    pub model_base: ModelBase,
    pub discretization_type: DiscretizerKind,
    pub cuts: CutSpec,
    pub model: String,
    pub label: String,
    pub mean_accuracy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridCell {
    pub accuracy: Option<f64>,
    /// Maximum (strict ou à égalité) de la ligne
    pub best: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub dataset: String,
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridView {
    pub columns: Vec<GridColumn>,
    pub rows: Vec<GridRow>,
}

/// Construit la grille sur l'ensemble d'enregistrements donné.
///
/// La colonne PKI expose la variante sqrt; les combinaisons que le
/// résolveur refuse (équi-fréquence/amplitude avec "up", PKI avec un
/// nombre de coupes) ne produisent pas de colonne.
pub fn build_grid(
    records: &[ResultRecord],
    selection: &GridSelection,
    sort: GridSort,
    resolver: &ModelNameResolver,
) -> GridView {
    let datasets = unique_datasets(records);

    // Index (modèle, dataset, itérations, coupes) → accuracy, première
    // occurrence retenue
    let mut index: HashMap<(&str, &str, Iterations, CutSpec), f64> = HashMap::new();
    for record in records {
        index
            .entry((
                record.model.as_str(),
                record.dataset.as_str(),
                record.iterations,
                record.cuts,
            ))
            .or_insert(record.accuracy);
    }

    let mut columns: Vec<GridColumn> = Vec::new();
    for &iterations in &selection.iterations {
        for &base in &selection.model_base {
            for &kind in &selection.discretization_type {
                for &cuts in &selection.cuts {
                    let discretizer = match kind {
                        DiscretizerKind::Local => Discretizer::Local,
                        DiscretizerKind::Mdlp => Discretizer::Mdlp,
                        DiscretizerKind::EqualFreq => Discretizer::EqualFreq,
                        DiscretizerKind::EqualWidth => Discretizer::EqualWidth,
                        DiscretizerKind::Pki => Discretizer::Pki(PkiVariant::Sqrt),
                    };
                    let Some(model) = resolver.resolve(base, discretizer, cuts) else {
                        continue;
                    };

                    let values: Vec<f64> = datasets
                        .iter()
                        .filter_map(|dataset| {
                            index
                                .get(&(model.as_str(), dataset.as_str(), iterations, cuts))
                                .copied()
                        })
                        .collect();
                    if values.is_empty() {
                        continue;
                    }

                    let label = format!(
                        "{}-{}-{}-{}",
                        iterations.as_str(),
                        base.as_str(),
                        kind.as_str(),
                        cuts.as_str()
                    );
                    columns.push(GridColumn {
                        iterations,
                        model_base: base,
                        discretization_type: kind,
                        cuts,
                        model,
                        label,
                        mean_accuracy: mean(&values),
                    });
                }
            }
        }
    }

    sort_columns(&mut columns, sort);

    let rows = datasets
        .iter()
        .map(|dataset| {
            let accuracies: Vec<Option<f64>> = columns
                .iter()
                .map(|col| {
                    index
                        .get(&(
                            col.model.as_str(),
                            dataset.as_str(),
                            col.iterations,
                            col.cuts,
                        ))
                        .copied()
                })
                .collect();
            let best = accuracies
                .iter()
                .flatten()
                .fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
            let cells = accuracies
                .into_iter()
                .map(|accuracy| GridCell {
                    accuracy,
                    best: accuracy == Some(best),
                })
                .collect();
            GridRow {
                dataset: dataset.clone(),
                cells,
            }
        })
        .collect();

    GridView { columns, rows }
}

fn sort_columns(columns: &mut [GridColumn], sort: GridSort) {
    match sort {
        GridSort::BestDesc => columns.sort_by(|a, b| {
            b.mean_accuracy
                .partial_cmp(&a.mean_accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        }),
        GridSort::BestAsc => columns.sort_by(|a, b| {
            a.mean_accuracy
                .partial_cmp(&b.mean_accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        }),
        GridSort::AlphaAsc => columns.sort_by(|a, b| a.label.cmp(&b.label)),
        GridSort::AlphaDesc => columns.sort_by(|a, b| b.label.cmp(&a.label)),
    }
}
