use thiserror::Error;

/// Erreurs du générateur. Les erreurs de configuration sont validées une
/// seule fois à la frontière ; les enregistrements invalides sont tolérés
/// individuellement par le normaliseur et ne remontent jamais en cours de
/// simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    /// Un enregistrement d'historique inutilisable (champ non numérique,
    /// doublon, valeur hors limites). Ignoré par le normaliseur.
    #[error("Tirage invalide : {0}")]
    MalformedRecord(String),

    /// Moins de 5 numéros principaux distincts dans l'historique : la
    /// simulation ne peut pas produire de combinaison.
    #[error("Pool insuffisant : {distinct} numéros distincts (minimum 5)")]
    InsufficientPool { distinct: usize },

    /// Paramètres hors limites ou chaîne de biais de date invalide.
    #[error("Configuration invalide : {0}")]
    InvalidConfig(String),

    /// La source d'historique n'a pas pu fournir de tirages.
    #[error("Historique indisponible : {0}")]
    HistoryUnavailable(String),

    /// Annulation coopérative demandée par l'appelant (vérifiée entre les
    /// lots, jamais au milieu d'un tirage).
    #[error("Simulation annulée")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
