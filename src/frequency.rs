use std::collections::HashMap;

use crate::config::{DEFAULT_COLD_SPECIAL, DEFAULT_HOT_SPECIAL, HOT_COLD_COUNT};
use crate::models::{Draw, Pool};

/// Table de fréquences d'un bassin : seuls les numéros observés au moins une
/// fois y figurent. Un numéro jamais tiré est absent, pas à zéro, ce qui le
/// tient à l'écart des classements chaud/froid.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<u8, u32>,
}

impl FrequencyTable {
    pub fn count(&self, number: u8) -> u32 {
        self.counts.get(&number).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Numéros observés, du plus fréquent au moins fréquent. À fréquence
    /// égale, le plus petit numéro passe devant : le classement est ainsi
    /// indépendant de l'ordre d'itération de la table.
    pub fn ranked(&self) -> Vec<(u8, u32)> {
        let mut entries: Vec<(u8, u32)> = self.counts.iter().map(|(&n, &c)| (n, c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }
}

pub fn count_occurrences(draws: &[Draw], pool: Pool) -> FrequencyTable {
    let mut counts: HashMap<u8, u32> = HashMap::new();
    for draw in draws {
        for &n in pool.numbers_from(draw) {
            *counts.entry(n).or_insert(0) += 1;
        }
    }
    FrequencyTable { counts }
}

/// Numéros chauds et froids du bassin principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotCold {
    pub hot: Vec<u8>,
    pub cold: Vec<u8>,
}

/// Les 10 premiers et 10 derniers du classement. Le jeu froid garde l'ordre
/// du classement (fréquence décroissante) et, quand moins de 10 numéros ont
/// été observés, chaud et froid couvrent tous les deux le classement entier.
pub fn hot_cold_main(table: &FrequencyTable) -> HotCold {
    let ranked = table.ranked();
    let hot: Vec<u8> = ranked.iter().take(HOT_COLD_COUNT).map(|&(n, _)| n).collect();
    let tail_start = ranked.len().saturating_sub(HOT_COLD_COUNT);
    let cold: Vec<u8> = ranked[tail_start..].iter().map(|&(n, _)| n).collect();
    HotCold { hot, cold }
}

/// PowerBall le plus et le moins fréquent. Sur historique vide, repli sur
/// 1 (chaud) et 20 (froid).
pub fn hot_cold_special(table: &FrequencyTable) -> (u8, u8) {
    let ranked = table.ranked();
    let hot = ranked.first().map(|&(n, _)| n).unwrap_or(DEFAULT_HOT_SPECIAL);
    let cold = ranked.last().map(|&(n, _)| n).unwrap_or(DEFAULT_COLD_SPECIAL);
    (hot, cold)
}
