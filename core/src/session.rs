//! Session d'exploration: remplace l'état global de page par une valeur
//! explicite, reconstruite à chaque interaction. Chaque instantané rejoue
//! le pipeline complet — filtre, recalcul des améliorations, tri,
//! pagination — sur l'ensemble chargé; rien n'est rapiécé en place.

use crate::aggregate::recompute_improvements;
use crate::filter::FilterConfig;
use crate::model_name::NamingConvention;
use crate::record::{ResultRecord, ResultSet};
use crate::sort::{page_count, paginate, sort_records, SortColumn, SortDirection};
use crate::source;
use crate::stats::mean;
use crate::{Error, Result};
use serde::Serialize;

/// État du chargement des données: aucune opération ne s'exécute contre un
/// jeu de données absent
#[derive(Debug, Clone)]
pub enum DataState {
    NotLoaded,
    Loaded(ResultSet),
    LoadFailed(String),
}

impl DataState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, DataState::Loaded(_))
    }

    pub fn result_set(&self) -> Option<&ResultSet> {
        match self {
            DataState::Loaded(set) => Some(set),
            _ => None,
        }
    }
}

/// Statistiques d'en-tête sur l'ensemble filtré
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OverviewStats {
    pub total: usize,
    pub mean_accuracy: f64,
    /// Enregistrements locaux à amélioration strictement positive
    pub positive_improvements: usize,
    pub best_accuracy: f64,
}

impl OverviewStats {
    fn compute(records: &[ResultRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let accuracies: Vec<f64> = records.iter().map(|r| r.accuracy).collect();
        Self {
            total: records.len(),
            mean_accuracy: mean(&accuracies),
            positive_improvements: records
                .iter()
                .filter(|r| r.is_local() && r.improvement_vs_base.is_some_and(|v| v > 0.0))
                .count(),
            best_accuracy: accuracies.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
        }
    }
}

/// Instantané produit pour les adaptateurs de vue
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    /// Ensemble filtré, recalculé et trié au complet — la projection plate
    /// qu'un export consommerait telle quelle
    pub records: Vec<ResultRecord>,
    /// Fenêtre de la page courante
    pub page: Vec<ResultRecord>,
    pub page_number: usize,
    pub page_count: usize,
    pub stats: OverviewStats,
}

/// Session d'exploration des résultats
#[derive(Debug, Clone)]
pub struct Explorer {
    state: DataState,
    convention: NamingConvention,
    filters: FilterConfig,
    sort_column: SortColumn,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
}

impl Explorer {
    pub fn new() -> Self {
        Self {
            state: DataState::NotLoaded,
            convention: NamingConvention::default(),
            filters: FilterConfig::default(),
            sort_column: SortColumn::Accuracy,
            sort_direction: SortDirection::Desc,
            page: 1,
            page_size: 50,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_convention(mut self, convention: NamingConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Charge le document de résultats; un échec est capturé dans l'état,
    /// pas propagé — c'est l'instantané qui le signalera
    pub fn load(&mut self, path: &str) {
        self.attach(source::load_results_with(path, self.convention));
    }

    /// Installe un résultat de chargement obtenu par ailleurs
    pub fn attach(&mut self, loaded: Result<ResultSet>) {
        self.state = match loaded {
            Ok(set) => DataState::Loaded(set),
            Err(e) => DataState::LoadFailed(e.to_string()),
        };
        self.page = 1;
    }

    pub fn data_state(&self) -> &DataState {
        &self.state
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    /// Tout changement de filtre ramène à la première page
    pub fn set_filters(&mut self, filters: FilterConfig) {
        self.filters = filters;
        self.page = 1;
    }

    pub fn set_sort(&mut self, column: SortColumn, direction: SortDirection) {
        self.sort_column = column;
        self.sort_direction = direction;
    }

    /// Clic sur un en-tête de colonne: même colonne inverse le sens, une
    /// nouvelle colonne part en décroissant pour l'accuracy et en
    /// croissant pour le reste
    pub fn click_column(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_direction = match self.sort_direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.sort_column = column;
            self.sort_direction = if column == SortColumn::Accuracy {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Rejoue le pipeline complet et produit l'instantané de vue.
    ///
    /// L'ordre des étapes porte l'invariant central: le filtre structurel
    /// s'applique d'abord, puis les améliorations sont recalculées par
    /// rapport aux bases survivantes, et seulement ensuite le volet
    /// "seulement les améliorations" retient les locaux strictement
    /// positifs.
    pub fn snapshot(&self) -> Result<ViewSnapshot> {
        let set = match &self.state {
            DataState::Loaded(set) => set,
            DataState::NotLoaded => {
                return Err(Error::DataUnavailable("results not loaded".to_string()))
            }
            DataState::LoadFailed(message) => {
                return Err(Error::DataUnavailable(message.clone()))
            }
        };

        let filtered = self.filters.apply(set.all());
        let mut records = recompute_improvements(&filtered);

        if self.filters.only_improvements {
            records.retain(|r| r.is_local() && r.improvement_vs_base.is_some_and(|v| v > 0.0));
        }

        sort_records(&mut records, self.sort_column, self.sort_direction);

        let stats = OverviewStats::compute(&records);
        let page_count = page_count(records.len(), self.page_size);
        let page = paginate(&records, self.page_size, self.page).to_vec();

        Ok(ViewSnapshot {
            stats,
            page,
            page_number: self.page.clamp(1, page_count),
            page_count,
            records,
        })
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new()
    }
}
