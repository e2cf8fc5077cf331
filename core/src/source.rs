use crate::model_name::{ModelNameResolver, NamingConvention};
use crate::record::{Metadata, ResultRecord, ResultSet};
use crate::{Error, Result};
use serde::Deserialize;
use tracing::{info, warn};

/// Document externe tel que produit par le générateur de données
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    metadata: Metadata,
    results: Vec<RawRecord>,
}

/// Enregistrement brut: les champs énumérés restent des chaînes pour que
/// les valeurs inconnues puissent être ignorées enregistrement par
/// enregistrement au lieu de faire échouer tout le document
#[derive(Debug, Deserialize)]
struct RawRecord {
    dataset: String,
    iterations: String,
    cuts: String,
    model: String,
    model_base: String,
    discretization_type: String,
    accuracy: f64,
    std: f64,
    #[serde(default)]
    samples: Option<u64>,
    #[serde(default)]
    features: Option<u32>,
    #[serde(default)]
    classes: Option<u32>,
}

/// Charge le document de résultats depuis un fichier JSON.
///
/// Convention de nommage canonique (`-bin{N}{q|u}`); voir
/// `load_results_with` pour les documents hérités.
pub fn load_results(path: &str) -> Result<ResultSet> {
    load_results_with(path, NamingConvention::default())
}

/// Charge le document de résultats avec une convention de nommage explicite
pub fn load_results_with(path: &str, convention: NamingConvention) -> Result<ResultSet> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::DataUnavailable(format!("{path}: {e}")))?;
    parse_results(&contents, convention)
}

/// Analyse un document de résultats déjà en mémoire.
///
/// Un document malformé (JSON invalide, champ requis absent, accuracy hors
/// de [0,1]) échoue avec `DataUnavailable`. Un enregistrement dont
/// l'identifiant de modèle n'est pas reconnu par le résolveur, ou dont les
/// attributs déclarés contredisent l'identifiant, est journalisé puis
/// ignoré sans faire échouer le chargement.
///
/// Les champs dérivés éventuellement présents dans le document
/// (`improvement_vs_base`, `best_in_group`, ...) sont volontairement
/// ignorés: ils sont relatifs au filtre actif et recalculés par le moteur
/// d'agrégation.
pub fn parse_results(contents: &str, convention: NamingConvention) -> Result<ResultSet> {
    let document: RawDocument = serde_json::from_str(contents)
        .map_err(|e| Error::DataUnavailable(format!("invalid results document: {e}")))?;

    let resolver = ModelNameResolver::with_convention(convention);
    let mut records: Vec<ResultRecord> = Vec::with_capacity(document.results.len());
    let mut skipped = 0usize;

    for raw in document.results {
        if !(0.0..=1.0).contains(&raw.accuracy) {
            return Err(Error::DataUnavailable(format!(
                "accuracy out of range for {}/{}: {}",
                raw.dataset, raw.model, raw.accuracy
            )));
        }
        if raw.std < 0.0 {
            return Err(Error::DataUnavailable(format!(
                "negative std for {}/{}: {}",
                raw.dataset, raw.model, raw.std
            )));
        }

        match convert_record(&resolver, raw) {
            Ok(record) => records.push(record),
            Err(Error::UnknownModelFormat(detail)) => {
                warn!(%detail, "record skipped");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if records.is_empty() {
        return Err(Error::DataUnavailable(
            "results document contains no usable record".to_string(),
        ));
    }

    info!(
        loaded = records.len(),
        skipped,
        datasets = crate::record::unique_datasets(&records).len(),
        "results document loaded"
    );

    Ok(ResultSet::new(records, document.metadata))
}

fn convert_record(resolver: &ModelNameResolver, raw: RawRecord) -> Result<ResultRecord> {
    let iterations = raw.iterations.parse()?;
    let cuts = raw.cuts.parse()?;
    let model_base = raw.model_base.parse()?;
    let discretization_type = raw.discretization_type.parse()?;

    let classified = resolver.classify(&raw.model)?;
    // Les attributs déclarés doivent correspondre à l'identifiant
    if classified.base != model_base || classified.discretizer.kind() != discretization_type {
        return Err(Error::UnknownModelFormat(format!(
            "{}: declared {}/{} inconsistent with model name",
            raw.model, raw.model_base, raw.discretization_type
        )));
    }

    Ok(ResultRecord {
        dataset: raw.dataset,
        iterations,
        cuts,
        model: raw.model,
        model_base,
        discretization_type,
        accuracy: raw.accuracy,
        std: raw.std,
        improvement_vs_base: None,
        best_base_model: None,
        best_base_accuracy: None,
        samples: raw.samples,
        features: raw.features,
        classes: raw.classes,
        best_in_group: None,
    })
}
