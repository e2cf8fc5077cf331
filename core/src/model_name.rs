use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Famille de classificateurs de base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelBase {
    #[serde(rename = "TAN")]
    Tan,
    #[serde(rename = "KDB")]
    Kdb,
    #[serde(rename = "AODE")]
    Aode,
}

impl ModelBase {
    pub const ALL: [ModelBase; 3] = [ModelBase::Tan, ModelBase::Kdb, ModelBase::Aode];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelBase::Tan => "TAN",
            ModelBase::Kdb => "KDB",
            ModelBase::Aode => "AODE",
        }
    }

    /// Détache le préfixe de classificateur d'un identifiant de modèle
    fn strip_prefix(name: &str) -> Option<(ModelBase, &str)> {
        for base in ModelBase::ALL {
            if let Some(rest) = name.strip_prefix(base.as_str()) {
                return Some((base, rest));
            }
        }
        None
    }
}

impl std::str::FromStr for ModelBase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "TAN" => Ok(ModelBase::Tan),
            "KDB" => Ok(ModelBase::Kdb),
            "AODE" => Ok(ModelBase::Aode),
            _ => Err(Error::UnknownModelFormat(format!("model base: {s}"))),
        }
    }
}

impl std::fmt::Display for ModelBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration du nombre maximal de points de coupe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CutSpec {
    #[serde(rename = "3p")]
    Three,
    #[serde(rename = "4p")]
    Four,
    #[serde(rename = "5p")]
    Five,
    /// "up" = illimité
    #[serde(rename = "up")]
    Unlimited,
}

impl CutSpec {
    pub const ALL: [CutSpec; 4] = [
        CutSpec::Three,
        CutSpec::Four,
        CutSpec::Five,
        CutSpec::Unlimited,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CutSpec::Three => "3p",
            CutSpec::Four => "4p",
            CutSpec::Five => "5p",
            CutSpec::Unlimited => "up",
        }
    }

    /// Nombre de coupes encodé dans les noms de modèle ("3p" -> 3), None pour "up"
    pub fn cut_number(&self) -> Option<u8> {
        match self {
            CutSpec::Three => Some(3),
            CutSpec::Four => Some(4),
            CutSpec::Five => Some(5),
            CutSpec::Unlimited => None,
        }
    }

    fn from_cut_number(n: u8) -> Option<CutSpec> {
        match n {
            3 => Some(CutSpec::Three),
            4 => Some(CutSpec::Four),
            5 => Some(CutSpec::Five),
            _ => None,
        }
    }
}

impl std::str::FromStr for CutSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "3p" => Ok(CutSpec::Three),
            "4p" => Ok(CutSpec::Four),
            "5p" => Ok(CutSpec::Five),
            "up" => Ok(CutSpec::Unlimited),
            _ => Err(Error::UnknownModelFormat(format!("cut spec: {s}"))),
        }
    }
}

impl std::fmt::Display for CutSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variante du discrétiseur PKI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PkiVariant {
    Sqrt,
    Log,
}

impl PkiVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            PkiVariant::Sqrt => "sqrt",
            PkiVariant::Log => "log",
        }
    }
}

/// Type de discrétisation, sans la variante PKI (tel qu'il apparaît dans
/// le champ `discretization_type` des enregistrements)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscretizerKind {
    Local,
    Mdlp,
    EqualFreq,
    EqualWidth,
    Pki,
}

impl DiscretizerKind {
    pub const ALL: [DiscretizerKind; 5] = [
        DiscretizerKind::Local,
        DiscretizerKind::Mdlp,
        DiscretizerKind::EqualFreq,
        DiscretizerKind::EqualWidth,
        DiscretizerKind::Pki,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscretizerKind::Local => "local",
            DiscretizerKind::Mdlp => "mdlp",
            DiscretizerKind::EqualFreq => "equal_freq",
            DiscretizerKind::EqualWidth => "equal_width",
            DiscretizerKind::Pki => "pki",
        }
    }

    pub fn is_baseline(&self) -> bool {
        !matches!(self, DiscretizerKind::Local)
    }
}

impl std::str::FromStr for DiscretizerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(DiscretizerKind::Local),
            "mdlp" => Ok(DiscretizerKind::Mdlp),
            "equal_freq" => Ok(DiscretizerKind::EqualFreq),
            "equal_width" => Ok(DiscretizerKind::EqualWidth),
            "pki" => Ok(DiscretizerKind::Pki),
            _ => Err(Error::UnknownModelFormat(format!("discretizer kind: {s}"))),
        }
    }
}

impl std::fmt::Display for DiscretizerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrétiseur complet, variante PKI incluse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discretizer {
    Local,
    Mdlp,
    EqualFreq,
    EqualWidth,
    Pki(PkiVariant),
}

impl Discretizer {
    pub fn kind(&self) -> DiscretizerKind {
        match self {
            Discretizer::Local => DiscretizerKind::Local,
            Discretizer::Mdlp => DiscretizerKind::Mdlp,
            Discretizer::EqualFreq => DiscretizerKind::EqualFreq,
            Discretizer::EqualWidth => DiscretizerKind::EqualWidth,
            Discretizer::Pki(_) => DiscretizerKind::Pki,
        }
    }
}

/// Convention d'encodage des suffixes équi-fréquence / équi-amplitude.
///
/// Les données historiques mélangent deux conventions incompatibles; le
/// résolveur n'en reconnaît qu'une à la fois et signale l'autre comme
/// `UnknownModelFormat` plutôt que de risquer une mauvaise classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingConvention {
    /// `-bin3q` / `-bin3u` (convention canonique, révisions récentes)
    #[default]
    BinQU,
    /// `-efd3` / `-ewd3` (convention héritée)
    EfdEwd,
}

/// Attributs logiques extraits d'un identifiant de modèle concret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifiedModel {
    pub base: ModelBase,
    pub discretizer: Discretizer,
    /// Nombre de coupes encodé dans le nom (absent pour local, pki et mdlp "up")
    pub cut_number: Option<u8>,
}

/// Résolveur de noms de modèle: construction et classification des
/// identifiants concrets. Les deux directions partagent la même grammaire,
/// ce qui garantit la cohérence entre les vues.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelNameResolver {
    convention: NamingConvention,
}

impl ModelNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_convention(convention: NamingConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> NamingConvention {
        self.convention
    }

    /// Construit l'identifiant concret d'une configuration logique.
    ///
    /// Retourne `None` pour les combinaisons invalides (équi-fréquence ou
    /// équi-amplitude avec "up", PKI avec un nombre de coupes): ce ne sont
    /// pas des erreurs, simplement des membres de cohorte vides.
    pub fn resolve(&self, base: ModelBase, discretizer: Discretizer, cuts: CutSpec) -> Option<String> {
        match discretizer {
            Discretizer::Local => Some(format!("{}Ld", base.as_str())),
            Discretizer::Mdlp => match cuts.cut_number() {
                Some(n) => Some(format!("{}-mdlp{}", base.as_str(), n)),
                None => Some(format!("{}-mdlp", base.as_str())),
            },
            Discretizer::EqualFreq => {
                let n = cuts.cut_number()?;
                match self.convention {
                    NamingConvention::BinQU => Some(format!("{}-bin{}q", base.as_str(), n)),
                    NamingConvention::EfdEwd => Some(format!("{}-efd{}", base.as_str(), n)),
                }
            }
            Discretizer::EqualWidth => {
                let n = cuts.cut_number()?;
                match self.convention {
                    NamingConvention::BinQU => Some(format!("{}-bin{}u", base.as_str(), n)),
                    NamingConvention::EfdEwd => Some(format!("{}-ewd{}", base.as_str(), n)),
                }
            }
            Discretizer::Pki(variant) => {
                if cuts != CutSpec::Unlimited {
                    return None;
                }
                Some(format!("{}-pki{}", base.as_str(), variant.as_str()))
            }
        }
    }

    /// Classifie un identifiant concret en ses attributs logiques.
    ///
    /// Les identifiants dans la convention non configurée ou hors grammaire
    /// échouent avec `UnknownModelFormat` (à journaliser et ignorer côté
    /// chargement, jamais fatal pour l'ensemble du pipeline).
    pub fn classify(&self, model_name: &str) -> Result<ClassifiedModel> {
        let (base, rest) = ModelBase::strip_prefix(model_name)
            .ok_or_else(|| Error::UnknownModelFormat(model_name.to_string()))?;

        if rest == "Ld" {
            return Ok(ClassifiedModel {
                base,
                discretizer: Discretizer::Local,
                cut_number: None,
            });
        }

        let suffix = match rest.strip_prefix('-') {
            Some(s) => s,
            None => return Err(Error::UnknownModelFormat(model_name.to_string())),
        };

        if let Some(tail) = suffix.strip_prefix("mdlp") {
            let cut_number = match tail {
                "" => None,
                digits => Some(Self::parse_cut_digits(model_name, digits)?),
            };
            return Ok(ClassifiedModel {
                base,
                discretizer: Discretizer::Mdlp,
                cut_number,
            });
        }

        if let Some(tail) = suffix.strip_prefix("pki") {
            let variant = match tail {
                "sqrt" => PkiVariant::Sqrt,
                "log" => PkiVariant::Log,
                _ => return Err(Error::UnknownModelFormat(model_name.to_string())),
            };
            return Ok(ClassifiedModel {
                base,
                discretizer: Discretizer::Pki(variant),
                cut_number: None,
            });
        }

        match self.convention {
            NamingConvention::BinQU => {
                if let Some(tail) = suffix.strip_prefix("bin") {
                    if let Some(digits) = tail.strip_suffix('q') {
                        let n = Self::parse_cut_digits(model_name, digits)?;
                        return Ok(ClassifiedModel {
                            base,
                            discretizer: Discretizer::EqualFreq,
                            cut_number: Some(n),
                        });
                    }
                    if let Some(digits) = tail.strip_suffix('u') {
                        let n = Self::parse_cut_digits(model_name, digits)?;
                        return Ok(ClassifiedModel {
                            base,
                            discretizer: Discretizer::EqualWidth,
                            cut_number: Some(n),
                        });
                    }
                }
            }
            NamingConvention::EfdEwd => {
                if let Some(digits) = suffix.strip_prefix("efd") {
                    let n = Self::parse_cut_digits(model_name, digits)?;
                    return Ok(ClassifiedModel {
                        base,
                        discretizer: Discretizer::EqualFreq,
                        cut_number: Some(n),
                    });
                }
                if let Some(digits) = suffix.strip_prefix("ewd") {
                    let n = Self::parse_cut_digits(model_name, digits)?;
                    return Ok(ClassifiedModel {
                        base,
                        discretizer: Discretizer::EqualWidth,
                        cut_number: Some(n),
                    });
                }
            }
        }

        Err(Error::UnknownModelFormat(model_name.to_string()))
    }

    fn parse_cut_digits(model_name: &str, digits: &str) -> Result<u8> {
        let n: u8 = digits
            .parse()
            .map_err(|_| Error::UnknownModelFormat(model_name.to_string()))?;
        // Seules les valeurs couvertes par CutSpec sont des noms valides
        if CutSpec::from_cut_number(n).is_none() {
            return Err(Error::UnknownModelFormat(model_name.to_string()));
        }
        Ok(n)
    }
}
