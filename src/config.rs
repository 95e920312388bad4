use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

/// Bornes de la boucle de simulation.
pub const MIN_SIMULATIONS: u32 = 100;
pub const MAX_SIMULATIONS: u32 = 200_000;
pub const DEFAULT_SIMULATIONS: u32 = 10_000;
pub const MIN_BATCH_SIZE: u32 = 1_000;
pub const MAX_BATCH_SIZE: u32 = 50_000;
pub const DEFAULT_BATCH_SIZE: u32 = 10_000;

/// Bornes du nombre de tirages historiques consommés.
pub const MIN_DRAW_LIMIT: usize = 1;
pub const MAX_DRAW_LIMIT: usize = 500;
pub const DEFAULT_DRAW_LIMIT: usize = 200;

/// Tailles des classements intermédiaires.
pub const HOT_COLD_COUNT: usize = 10;
pub const TOP_PAIR_COUNT: usize = 20;
pub const TOP_TRIPLET_COUNT: usize = 20;
pub const TOP_COMBINATION_COUNT: usize = 5;

/// Valeurs de repli quand l'historique ne fournit aucun PowerBall.
pub const DEFAULT_HOT_SPECIAL: u8 = 1;
pub const DEFAULT_COLD_SPECIAL: u8 = 20;

/// Seuils de fréquence du PowerBall.
pub const SPECIAL_HOT_THRESHOLD: u32 = 8;
pub const SPECIAL_COLD_THRESHOLD: u32 = 2;

// Poids réglés à la main sur l'historique SA PowerBall 2019-2024 ;
// toute modification change la distribution produite à graine fixée.
pub const BASE_WEIGHT: f64 = 2.0;
pub const HOT_BONUS: f64 = 3.0;
pub const COLD_BONUS: f64 = 1.0;
pub const DATE_BIAS_BONUS: f64 = 1.5;
pub const PAIR_BONUS: f64 = 2.0;
pub const TRIPLET_BONUS: f64 = 3.0;
pub const SPECIAL_HOT_BONUS: f64 = 2.0;
pub const SPECIAL_COLD_PENALTY: f64 = 0.5;

/// Plancher appliqué à chaque poids quand la somme est nulle ou négative.
pub const MIN_WEIGHT: f64 = 1e-6;

/// Jours fétiches par défaut (anniversaires familiaux).
pub const DEFAULT_DATE_BIAS: [u8; 5] = [28, 10, 29, 25, 31];

/// Paramètres d'une passe de génération. `Default` reproduit le
/// comportement historique du service ; `validate` doit être appelée
/// avant de lancer la simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    pub num_simulations: u32,
    pub batch_size: u32,
    pub date_bias: BTreeSet<u8>,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            num_simulations: DEFAULT_SIMULATIONS,
            batch_size: DEFAULT_BATCH_SIZE,
            date_bias: DEFAULT_DATE_BIAS.iter().copied().collect(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_simulations < MIN_SIMULATIONS || self.num_simulations > MAX_SIMULATIONS {
            return Err(GeneratorError::InvalidConfig(format!(
                "Nombre de simulations {} hors limites ({}-{})",
                self.num_simulations, MIN_SIMULATIONS, MAX_SIMULATIONS
            )));
        }
        if self.batch_size < MIN_BATCH_SIZE || self.batch_size > MAX_BATCH_SIZE {
            return Err(GeneratorError::InvalidConfig(format!(
                "Taille de lot {} hors limites ({}-{})",
                self.batch_size, MIN_BATCH_SIZE, MAX_BATCH_SIZE
            )));
        }
        for &day in &self.date_bias {
            if day < 1 || day > 50 {
                return Err(GeneratorError::InvalidConfig(format!(
                    "Jour fétiche {} hors limites (1-50)",
                    day
                )));
            }
        }
        Ok(())
    }
}

/// Analyse une liste de jours fétiches "28,10,29". Une chaîne vide ou
/// blanche rend le jeu par défaut ; toute entrée non numérique ou hors
/// limites est une erreur de configuration, jamais ignorée en silence.
pub fn parse_date_bias(input: &str) -> Result<BTreeSet<u8>> {
    if input.trim().is_empty() {
        return Ok(DEFAULT_DATE_BIAS.iter().copied().collect());
    }
    let mut days = BTreeSet::new();
    for part in input.split(',') {
        let trimmed = part.trim();
        let day: u8 = trimmed.parse().map_err(|_| {
            GeneratorError::InvalidConfig(format!("Jour fétiche invalide : '{}'", trimmed))
        })?;
        if day < 1 || day > 50 {
            return Err(GeneratorError::InvalidConfig(format!(
                "Jour fétiche {} hors limites (1-50)",
                day
            )));
        }
        days.insert(day);
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.num_simulations, 10_000);
        assert_eq!(config.batch_size, 10_000);
        assert_eq!(config.seed, None);
        let expected: BTreeSet<u8> = [28, 10, 29, 25, 31].iter().copied().collect();
        assert_eq!(config.date_bias, expected);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_simulations_bounds() {
        let mut config = GeneratorConfig::default();
        config.num_simulations = 99;
        assert!(config.validate().is_err());
        config.num_simulations = 100;
        assert!(config.validate().is_ok());
        config.num_simulations = 200_000;
        assert!(config.validate().is_ok());
        config.num_simulations = 200_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_batch_bounds() {
        let mut config = GeneratorConfig::default();
        config.batch_size = 999;
        assert!(config.validate().is_err());
        config.batch_size = 1_000;
        assert!(config.validate().is_ok());
        config.batch_size = 50_000;
        assert!(config.validate().is_ok());
        config.batch_size = 50_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_date_bias_bounds() {
        let mut config = GeneratorConfig::default();
        config.date_bias = [0].iter().copied().collect();
        assert!(config.validate().is_err());
        config.date_bias = [51].iter().copied().collect();
        assert!(config.validate().is_err());
        config.date_bias = [1, 50].iter().copied().collect();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_date_bias_empty_gives_default() {
        let expected: BTreeSet<u8> = DEFAULT_DATE_BIAS.iter().copied().collect();
        assert_eq!(parse_date_bias("").unwrap(), expected);
        assert_eq!(parse_date_bias("   ").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_bias_values() {
        let days = parse_date_bias("7, 14,21").unwrap();
        let expected: BTreeSet<u8> = [7, 14, 21].iter().copied().collect();
        assert_eq!(days, expected);
    }

    #[test]
    fn test_parse_date_bias_deduplicates() {
        let days = parse_date_bias("7,7,7").unwrap();
        assert_eq!(days.len(), 1);
        assert!(days.contains(&7));
    }

    #[test]
    fn test_parse_date_bias_rejects_garbage() {
        assert!(parse_date_bias("7,abc").is_err());
        assert!(parse_date_bias("0").is_err());
        assert!(parse_date_bias("51").is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = GeneratorConfig {
            num_simulations: 5_000,
            batch_size: 2_000,
            date_bias: [3, 9].iter().copied().collect(),
            seed: Some(42),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"numSimulations\""), "json: {json}");
        assert!(json.contains("\"batchSize\""), "json: {json}");
        let back: GeneratorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_config_deserialize_partial_uses_defaults() {
        let back: GeneratorConfig = serde_json::from_str(r#"{"numSimulations": 500}"#).unwrap();
        assert_eq!(back.num_simulations, 500);
        assert_eq!(back.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(back.seed, None);
    }
}
