use crate::model_name::DiscretizerKind;
use crate::record::{CohortKey, ResultRecord};
use crate::stats::round2;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Tolérance de comparaison entre accuracies, en points de pourcentage.
/// En dessous, deux valeurs comptent comme une égalité.
pub const ACCURACY_EPSILON_PP: f64 = 0.01;

/// Regroupe les indices des enregistrements par clé de cohorte, dans
/// l'ordre d'apparition à l'intérieur de chaque cohorte
pub fn cohort_indices(records: &[ResultRecord]) -> BTreeMap<CohortKey, Vec<usize>> {
    let mut groups: BTreeMap<CohortKey, Vec<usize>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        groups.entry(record.cohort_key()).or_default().push(idx);
    }
    groups
}

/// Champs dérivés d'un enregistrement au sein de sa cohorte
struct Derived {
    improvement_vs_base: Option<f64>,
    best_base_model: Option<String>,
    best_base_accuracy: Option<f64>,
    best_in_group: bool,
}

/// Recalcule les métriques dérivées sur l'ensemble filtré.
///
/// Retourne de nouveaux enregistrements, l'entrée n'est jamais modifiée.
/// Au sein de chaque cohorte (dataset, itérations, coupes, classificateur):
/// - la meilleure base est l'enregistrement non-local d'accuracy maximale
///   parmi ceux qui ont survécu au filtre (égalités départagées par ordre
///   d'apparition);
/// - chaque enregistrement local reçoit
///   `improvement_vs_base = round((acc_local - acc_base) · 100, 2)`, ou
///   `None` si la cohorte filtrée ne contient aucune base — jamais 0, qui
///   se lirait comme une égalité;
/// - `best_in_group` vaut vrai pour le ou les enregistrements d'accuracy
///   maximale de la cohorte, tous discrétiseurs confondus.
pub fn recompute_improvements(records: &[ResultRecord]) -> Vec<ResultRecord> {
    let mut out: Vec<ResultRecord> = records.iter().map(|r| r.without_derived()).collect();

    let groups: Vec<Vec<usize>> = cohort_indices(records).into_values().collect();
    // Les cohortes sont indépendantes: le balayage se parallélise sans
    // changer le résultat
    let updates: Vec<(usize, Derived)> = groups
        .par_iter()
        .flat_map_iter(|indices| derive_cohort(records, indices))
        .collect();

    for (idx, derived) in updates {
        let record = &mut out[idx];
        record.improvement_vs_base = derived.improvement_vs_base;
        record.best_base_model = derived.best_base_model;
        record.best_base_accuracy = derived.best_base_accuracy;
        record.best_in_group = Some(derived.best_in_group);
    }

    out
}

fn derive_cohort(records: &[ResultRecord], indices: &[usize]) -> Vec<(usize, Derived)> {
    let best_accuracy = indices
        .iter()
        .map(|&i| records[i].accuracy)
        .fold(f64::NEG_INFINITY, f64::max);

    // Meilleure base: premier maximum rencontré parmi les non-locaux
    let best_baseline: Option<&ResultRecord> = indices
        .iter()
        .map(|&i| &records[i])
        .filter(|r| r.discretization_type.is_baseline())
        .fold(None, |best: Option<&ResultRecord>, candidate| match best {
            Some(b) if candidate.accuracy > b.accuracy => Some(candidate),
            Some(b) => Some(b),
            None => Some(candidate),
        });

    indices
        .iter()
        .map(|&idx| {
            let record = &records[idx];
            let derived = if record.is_local() {
                match best_baseline {
                    Some(base) => Derived {
                        improvement_vs_base: Some(round2((record.accuracy - base.accuracy) * 100.0)),
                        best_base_model: Some(base.model.clone()),
                        best_base_accuracy: Some(base.accuracy),
                        best_in_group: record.accuracy == best_accuracy,
                    },
                    None => Derived {
                        improvement_vs_base: None,
                        best_base_model: None,
                        best_base_accuracy: None,
                        best_in_group: record.accuracy == best_accuracy,
                    },
                }
            } else {
                Derived {
                    improvement_vs_base: None,
                    best_base_model: None,
                    best_base_accuracy: None,
                    best_in_group: record.accuracy == best_accuracy,
                }
            };
            (idx, derived)
        })
        .collect()
}

/// Décompte victoires / défaites / égalités
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WinLossTally {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl WinLossTally {
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Fraction de paires où la stratégie focale l'emporte strictement
    pub fn win_rate(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(f64::from(self.wins) / f64::from(total))
    }

    /// Enregistre une paire comparée, `diff_pp` = focal − adversaire en
    /// points de pourcentage
    pub fn record(&mut self, diff_pp: f64) {
        if diff_pp > ACCURACY_EPSILON_PP {
            self.wins += 1;
        } else if diff_pp < -ACCURACY_EPSILON_PP {
            self.losses += 1;
        } else {
            self.ties += 1;
        }
    }
}

/// Compte victoires/défaites/égalités entre une stratégie focale et une
/// adversaire sur les paires appariées cohorte par cohorte.
///
/// Au sein de chaque cohorte, les enregistrements reconnus par chaque
/// prédicat sont appariés dans l'ordre; `wins + losses + ties` vaut donc
/// le nombre de paires appariées, et échanger focal et adversaire échange
/// les victoires et les défaites sans toucher aux égalités.
pub fn tally<F, A>(records: &[ResultRecord], focal: F, adversary: A) -> WinLossTally
where
    F: Fn(&ResultRecord) -> bool,
    A: Fn(&ResultRecord) -> bool,
{
    let mut result = WinLossTally::default();
    for indices in cohort_indices(records).into_values() {
        let focals = indices.iter().filter(|&&i| focal(&records[i]));
        let adversaries = indices.iter().filter(|&&i| adversary(&records[i]));
        for (&f, &a) in focals.zip(adversaries) {
            result.record((records[f].accuracy - records[a].accuracy) * 100.0);
        }
    }
    result
}

/// Décompte entre deux types de discrétisation (focal vs adversaire)
pub fn tally_by_kind(
    records: &[ResultRecord],
    focal: DiscretizerKind,
    adversary: DiscretizerKind,
) -> WinLossTally {
    tally(
        records,
        |r| r.discretization_type == focal,
        |r| r.discretization_type == adversary,
    )
}
