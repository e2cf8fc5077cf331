use crate::record::ResultRecord;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Colonne de tri de la table des résultats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Dataset,
    Iterations,
    Cuts,
    Model,
    DiscretizationType,
    Accuracy,
    Std,
    ImprovementVsBase,
    Samples,
    Features,
    Classes,
}

impl std::str::FromStr for SortColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "dataset" => Ok(SortColumn::Dataset),
            "iterations" => Ok(SortColumn::Iterations),
            "cuts" => Ok(SortColumn::Cuts),
            "model" => Ok(SortColumn::Model),
            "discretization_type" => Ok(SortColumn::DiscretizationType),
            "accuracy" => Ok(SortColumn::Accuracy),
            "std" => Ok(SortColumn::Std),
            "improvement_vs_base" => Ok(SortColumn::ImprovementVsBase),
            "samples" => Ok(SortColumn::Samples),
            "features" => Ok(SortColumn::Features),
            "classes" => Ok(SortColumn::Classes),
            _ => Err(Error::UnknownModelFormat(format!("sort column: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Tri stable par colonne.
///
/// Les valeurs numériques absentes comparent comme une sentinelle très
/// négative: elles arrivent donc dernières en ordre décroissant et
/// premières en ordre croissant, quelle que soit la colonne. C'est un
/// choix délibéré, identique pour toutes les colonnes numériques.
pub fn sort_records(records: &mut [ResultRecord], column: SortColumn, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, column);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &ResultRecord, b: &ResultRecord, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Dataset => a.dataset.cmp(&b.dataset),
        SortColumn::Iterations => a.iterations.cmp(&b.iterations),
        SortColumn::Cuts => a.cuts.cmp(&b.cuts),
        SortColumn::Model => a.model.cmp(&b.model),
        SortColumn::DiscretizationType => a.discretization_type.cmp(&b.discretization_type),
        SortColumn::Accuracy => compare_numeric(Some(a.accuracy), Some(b.accuracy)),
        SortColumn::Std => compare_numeric(Some(a.std), Some(b.std)),
        SortColumn::ImprovementVsBase => {
            compare_numeric(a.improvement_vs_base, b.improvement_vs_base)
        }
        SortColumn::Samples => {
            compare_numeric(a.samples.map(|v| v as f64), b.samples.map(|v| v as f64))
        }
        SortColumn::Features => {
            compare_numeric(a.features.map(f64::from), b.features.map(f64::from))
        }
        SortColumn::Classes => compare_numeric(a.classes.map(f64::from), b.classes.map(f64::from)),
    }
}

fn compare_numeric(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.unwrap_or(f64::NEG_INFINITY);
    let b = b.unwrap_or(f64::NEG_INFINITY);
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Tranche paginée. `page` est clampé dans [1, ceil(n / page_size)]; les
/// valeurs hors bornes n'échouent jamais.
pub fn paginate(records: &[ResultRecord], page_size: usize, page: usize) -> &[ResultRecord] {
    if records.is_empty() || page_size == 0 {
        return &[];
    }
    let page_count = records.len().div_ceil(page_size);
    let page = page.clamp(1, page_count);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(records.len());
    &records[start..end]
}

/// Nombre de pages d'un ensemble (au moins 1, comme l'affichage l'attend)
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}
