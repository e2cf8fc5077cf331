use serde::Serialize;

/// Statistiques de distribution: cinq nombres + moyenne
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub n: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

/// Résume une série de valeurs.
///
/// Série vide: structure à zéro (`n == 0`), jamais de division par zéro.
/// Série singleton: tous les percentiles valent l'unique valeur.
pub fn summarize(values: &[f64]) -> Summary {
    if values.is_empty() {
        return Summary::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Summary {
        n: sorted.len(),
        min: sorted[0],
        q1: percentile(&sorted, 25.0),
        median: percentile(&sorted, 50.0),
        q3: percentile(&sorted, 75.0),
        max: sorted[sorted.len() - 1],
        mean: mean(&sorted),
    }
}

/// Percentile par interpolation linéaire entre statistiques d'ordre:
/// index = p/100 · (n-1), interpolé entre floor(index) et ceil(index).
/// `sorted` doit être trié en ordre croissant.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    sorted[lower] + (sorted[upper] - sorted[lower]) * (index - lower as f64)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Moyenne et écart type (population) d'une série
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    (m, variance.sqrt())
}

/// Arrondi à deux décimales (points de pourcentage des améliorations)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ajustement de tendance par moindres carrés ordinaires
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TrendFit {
    Fitted { slope: f64, intercept: f64 },
    /// Moins de deux abscisses distinctes: pas de droite définissable
    Insufficient,
}

impl TrendFit {
    /// Évalue la droite en `x` (pour l'ajustement log-linéaire, `x` est
    /// déjà log10 de l'abscisse d'origine)
    pub fn eval(&self, x: f64) -> Option<f64> {
        match self {
            TrendFit::Fitted { slope, intercept } => Some(slope * x + intercept),
            TrendFit::Insufficient => None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self, TrendFit::Fitted { .. })
    }
}

/// Régression linéaire y = slope·x + intercept
pub fn fit_linear(points: &[(f64, f64)]) -> TrendFit {
    ols(points.iter().copied())
}

/// Régression log-linéaire y = slope·log10(x) + intercept.
/// Les abscisses non strictement positives sont écartées.
pub fn fit_log_linear(points: &[(f64, f64)]) -> TrendFit {
    ols(points
        .iter()
        .filter(|(x, _)| *x > 0.0)
        .map(|(x, y)| (x.log10(), *y)))
}

fn ols(points: impl Iterator<Item = (f64, f64)>) -> TrendFit {
    let points: Vec<(f64, f64)> = points.collect();
    let n = points.len() as f64;
    if points.len() < 2 {
        return TrendFit::Insufficient;
    }
    // Moins de deux abscisses distinctes: le dénominateur s'annule
    let first_x = points[0].0;
    if points.iter().all(|(x, _)| *x == first_x) {
        return TrendFit::Insufficient;
    }

    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();
    let sum_x2: f64 = points.iter().map(|(x, _)| x * x).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return TrendFit::Insufficient;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    TrendFit::Fitted { slope, intercept }
}
