use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

/// Enregistrement brut tel que renvoyé par le site de la loterie : tous les
/// champs numériques arrivent sous forme de chaînes ("05"). Le normaliseur
/// est seul responsable de la conversion explicite en entiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDraw {
    pub draw_number: String,
    pub draw_date: String,
    pub ball1: String,
    pub ball2: String,
    pub ball3: String,
    pub ball4: String,
    pub ball5: String,
    pub powerball: String,
}

/// Tirage normalisé : 5 numéros principaux distincts triés + 1 PowerBall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub main_numbers: [u8; 5],
    pub special: u8,
    pub draw_date: String,
    pub draw_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Main,
    Special,
}

impl Pool {
    pub fn size(&self) -> usize {
        match self {
            Pool::Main => 50,
            Pool::Special => 20,
        }
    }

    pub fn pick_count(&self) -> usize {
        match self {
            Pool::Main => 5,
            Pool::Special => 1,
        }
    }

    pub fn numbers_from<'a>(&self, draw: &'a Draw) -> &'a [u8] {
        match self {
            Pool::Main => &draw.main_numbers,
            Pool::Special => std::slice::from_ref(&draw.special),
        }
    }
}

/// Combinaison produite par un essai : clé canonique de l'agrégation.
/// L'ordre dérivé (numéros principaux puis PowerBall) sert de départage
/// déterministe lors du classement final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    pub main_numbers: [u8; 5],
    pub special: u8,
}

/// Combinaison classée, annotée du nombre d'essais l'ayant produite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCombination {
    pub main_numbers: [u8; 5],
    pub special: u8,
    pub count: u32,
}

/// Sortie complète d'une analyse, consommée telle quelle par le présenteur
/// JSON (d'où le renommage camelCase).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub top_combinations: Vec<RankedCombination>,
    pub hot_main: Vec<u8>,
    pub cold_main: Vec<u8>,
    pub hot_special: u8,
    pub cold_special: u8,
    pub top_pairs: Vec<[u8; 2]>,
    pub top_triplets: Vec<[u8; 3]>,
}

pub fn validate_draw(main_numbers: &[u8; 5], special: u8) -> Result<()> {
    for &n in main_numbers {
        if n < 1 || n > 50 {
            return Err(GeneratorError::MalformedRecord(format!(
                "Numéro {} hors limites (1-50)",
                n
            )));
        }
    }
    if special < 1 || special > 20 {
        return Err(GeneratorError::MalformedRecord(format!(
            "PowerBall {} hors limites (1-20)",
            special
        )));
    }
    for i in 0..main_numbers.len() {
        for j in (i + 1)..main_numbers.len() {
            if main_numbers[i] == main_numbers[j] {
                return Err(GeneratorError::MalformedRecord(format!(
                    "Numéro en double : {}",
                    main_numbers[i]
                )));
            }
        }
    }
    Ok(())
}
