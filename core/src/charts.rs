//! Agrégations alimentant les vues graphiques. Le dessin lui-même est
//! externe: chaque fonction produit les séries prêtes à tracer, accuracy
//! en fraction de [0,1], améliorations déjà en points de pourcentage.

use crate::model_name::{CutSpec, DiscretizerKind, ModelBase};
use crate::record::ResultRecord;
use crate::stats::{fit_log_linear, mean, mean_std, summarize, Summary, TrendFit};
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

/// Accuracy moyenne d'une combinaison classificateur × discrétiseur
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanAccuracyCell {
    pub model_base: ModelBase,
    pub discretization_type: DiscretizerKind,
    pub mean_accuracy: f64,
    pub count: usize,
}

/// Accuracy moyenne par (classificateur × type de discrétisation) sur
/// l'ensemble filtré; les combinaisons sans enregistrement sont omises
pub fn mean_accuracy_by_base_and_kind(records: &[ResultRecord]) -> Vec<MeanAccuracyCell> {
    let mut cells = Vec::new();
    for base in ModelBase::ALL {
        for kind in DiscretizerKind::ALL {
            let values: Vec<f64> = records
                .iter()
                .filter(|r| r.model_base == base && r.discretization_type == kind)
                .map(|r| r.accuracy)
                .collect();
            if values.is_empty() {
                continue;
            }
            cells.push(MeanAccuracyCell {
                model_base: base,
                discretization_type: kind,
                mean_accuracy: mean(&values),
                count: values.len(),
            });
        }
    }
    cells
}

/// Dimension de regroupement des résumés de distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupDimension {
    ModelBase,
    DiscretizationType,
    Dataset,
}

/// Résumés de distribution des accuracies, groupés selon la dimension
/// demandée par la vue active
pub fn accuracy_summaries(
    records: &[ResultRecord],
    dimension: GroupDimension,
) -> BTreeMap<String, Summary> {
    let grouped = records
        .iter()
        .map(|r| {
            let key = match dimension {
                GroupDimension::ModelBase => r.model_base.as_str().to_string(),
                GroupDimension::DiscretizationType => r.discretization_type.as_str().to_string(),
                GroupDimension::Dataset => r.dataset.clone(),
            };
            (key, r.accuracy)
        })
        .into_group_map();

    grouped
        .into_iter()
        .map(|(key, values)| (key, summarize(&values)))
        .collect()
}

/// Un point de la tendance par points de coupe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub cuts: CutSpec,
    pub mean_accuracy: f64,
    pub std_accuracy: f64,
}

/// Une série de la tendance: un classificateur local ou sa référence MDLP
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub label: String,
    pub model_base: ModelBase,
    pub local: bool,
    /// Un point par valeur de `CutSpec::ALL`, None pour les cases vides
    pub points: Vec<Option<TrendPoint>>,
}

/// Tendance de l'accuracy selon la configuration de coupes: pour chaque
/// classificateur, la série locale et la série MDLP correspondante
pub fn trend_by_cuts(records: &[ResultRecord]) -> Vec<TrendSeries> {
    let mut series = Vec::with_capacity(ModelBase::ALL.len() * 2);
    for local in [true, false] {
        for base in ModelBase::ALL {
            let points: Vec<Option<TrendPoint>> = CutSpec::ALL
                .iter()
                .map(|&cuts| {
                    let values: Vec<f64> = records
                        .iter()
                        .filter(|r| {
                            r.model_base == base
                                && r.cuts == cuts
                                && if local {
                                    r.is_local()
                                } else {
                                    r.discretization_type == DiscretizerKind::Mdlp
                                }
                        })
                        .map(|r| r.accuracy)
                        .collect();
                    if values.is_empty() {
                        return None;
                    }
                    let (mean_accuracy, std_accuracy) = mean_std(&values);
                    Some(TrendPoint {
                        cuts,
                        mean_accuracy,
                        std_accuracy,
                    })
                })
                .collect();

            let label = if local {
                format!("{}Ld", base.as_str())
            } else {
                format!("{}-mdlp", base.as_str())
            };
            series.push(TrendSeries {
                label,
                model_base: base,
                local,
                points,
            });
        }
    }
    series
}

/// Amélioration moyenne d'un dataset (enregistrements locaux uniquement)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetImprovement {
    pub dataset: String,
    pub mean_improvement_pp: f64,
    pub count: usize,
}

/// Top-N des datasets par amélioration moyenne recalculée, en ordre
/// décroissant (égalités départagées par nom de dataset)
pub fn top_improvements(records: &[ResultRecord], n: usize) -> Vec<DatasetImprovement> {
    let grouped = records
        .iter()
        .filter_map(|r| {
            r.improvement_vs_base
                .filter(|_| r.is_local())
                .map(|imp| (r.dataset.clone(), imp))
        })
        .into_group_map();

    grouped
        .into_iter()
        .map(|(dataset, improvements)| DatasetImprovement {
            dataset,
            mean_improvement_pp: mean(&improvements),
            count: improvements.len(),
        })
        .sorted_by(|a, b| {
            b.mean_improvement_pp
                .partial_cmp(&a.mean_improvement_pp)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.dataset.cmp(&b.dataset))
        })
        .take(n)
        .collect()
}

/// Matrice des améliorations moyennes: dataset → modèle local → points de
/// pourcentage. Les cases sans enregistrement apparié sont absentes.
pub fn improvement_matrix(records: &[ResultRecord]) -> BTreeMap<String, BTreeMap<String, f64>> {
    let grouped = records
        .iter()
        .filter_map(|r| {
            r.improvement_vs_base
                .filter(|_| r.is_local())
                .map(|imp| ((r.dataset.clone(), r.model.clone()), imp))
        })
        .into_group_map();

    let mut matrix: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for ((dataset, model), improvements) in grouped {
        matrix
            .entry(dataset)
            .or_default()
            .insert(model, mean(&improvements));
    }
    matrix
}

/// Un dataset dans le nuage taille vs amélioration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub dataset: String,
    pub samples: u64,
    pub mean_improvement_pp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLinePoint {
    pub x: f64,
    pub y: f64,
}

/// Nuage taille vs amélioration et sa droite de tendance log-linéaire
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeImprovementView {
    pub points: Vec<ScatterPoint>,
    pub fit: TrendFit,
    /// Points échantillonnés de la droite de tendance; vide quand
    /// l'ajustement est dégénéré
    pub trend: Vec<TrendLinePoint>,
}

/// Nombre de segments d'échantillonnage de la droite de tendance
const TREND_SAMPLES: usize = 50;

/// Relation entre la taille du dataset (échantillons, échelle log) et
/// l'amélioration moyenne de la discrétisation locale
pub fn size_vs_improvement(records: &[ResultRecord]) -> SizeImprovementView {
    let grouped = records
        .iter()
        .filter_map(|r| {
            let improvement = r.improvement_vs_base.filter(|_| r.is_local())?;
            let samples = r.samples?;
            Some((r.dataset.clone(), (samples, improvement)))
        })
        .into_group_map();

    let points: Vec<ScatterPoint> = grouped
        .into_iter()
        .map(|(dataset, entries)| {
            let samples = entries[0].0;
            let improvements: Vec<f64> = entries.iter().map(|(_, imp)| *imp).collect();
            ScatterPoint {
                dataset,
                samples,
                mean_improvement_pp: mean(&improvements),
            }
        })
        .sorted_by(|a, b| a.dataset.cmp(&b.dataset))
        .collect();

    let fit = fit_log_linear(
        &points
            .iter()
            .map(|p| (p.samples as f64, p.mean_improvement_pp))
            .collect::<Vec<_>>(),
    );

    let trend = match fit {
        TrendFit::Fitted { .. } => {
            let min_x = points.iter().map(|p| p.samples as f64).fold(f64::INFINITY, f64::min);
            let max_x = points
                .iter()
                .map(|p| p.samples as f64)
                .fold(f64::NEG_INFINITY, f64::max);
            let step = (max_x - min_x) / TREND_SAMPLES as f64;
            (0..=TREND_SAMPLES)
                .filter_map(|i| {
                    let x = min_x + step * i as f64;
                    fit.eval(x.log10()).map(|y| TrendLinePoint { x, y })
                })
                .collect()
        }
        TrendFit::Insufficient => Vec::new(),
    };

    SizeImprovementView { points, fit, trend }
}

/// Accuracy moyenne d'un modèle concret sur un dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelAccuracy {
    pub model: String,
    pub mean_accuracy: f64,
    pub count: usize,
}

/// Classement des modèles pour un dataset donné, meilleur en tête
pub fn dataset_model_ranking(records: &[ResultRecord], dataset: &str) -> Vec<ModelAccuracy> {
    let grouped = records
        .iter()
        .filter(|r| r.dataset == dataset)
        .map(|r| (r.model.clone(), r.accuracy))
        .into_group_map();

    grouped
        .into_iter()
        .map(|(model, values)| ModelAccuracy {
            mean_accuracy: mean(&values),
            count: values.len(),
            model,
        })
        .sorted_by(|a, b| {
            b.mean_accuracy
                .partial_cmp(&a.mean_accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.model.cmp(&b.model))
        })
        .collect()
}
