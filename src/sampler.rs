use std::collections::{BTreeSet, HashSet};

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::{
    BASE_WEIGHT, COLD_BONUS, DATE_BIAS_BONUS, HOT_BONUS, MIN_WEIGHT, PAIR_BONUS,
    SPECIAL_COLD_PENALTY, SPECIAL_COLD_THRESHOLD, SPECIAL_HOT_BONUS, SPECIAL_HOT_THRESHOLD,
    TRIPLET_BONUS,
};
use crate::cooccurrence::CooccurrenceIndex;
use crate::frequency::FrequencyTable;
use crate::models::{Combination, Pool};

/// Contexte d'échantillonnage dérivé de l'analyse de l'historique. Immuable
/// pendant toute la simulation, il est partagé en lecture entre les lots.
#[derive(Debug, Clone)]
pub struct SamplingContext {
    pub hot_set: HashSet<u8>,
    pub cold_set: HashSet<u8>,
    pub date_bias: BTreeSet<u8>,
    pub index: CooccurrenceIndex,
    pub special_freq: FrequencyTable,
}

/// Poids d'un candidat du bassin principal, fonction du contexte et des
/// numéros déjà retenus dans la combinaison en cours :
/// base 2, +3 chaud, +1 froid, +1,5 jour fétiche, +2 par retenu formant une
/// paire vedette avec le candidat, +3 (une seule fois) si le candidat
/// complète un triplet vedette avec une paire de retenus.
pub fn main_number_weight(candidate: u8, partial: &[u8], ctx: &SamplingContext) -> f64 {
    let mut weight = BASE_WEIGHT;
    if ctx.hot_set.contains(&candidate) {
        weight += HOT_BONUS;
    }
    if ctx.cold_set.contains(&candidate) {
        weight += COLD_BONUS;
    }
    if ctx.date_bias.contains(&candidate) {
        weight += DATE_BIAS_BONUS;
    }
    for &chosen in partial {
        if ctx.index.completes_pair(candidate, chosen) {
            weight += PAIR_BONUS;
        }
    }
    if partial.len() >= 2 {
        let completes = (0..partial.len()).any(|i| {
            ((i + 1)..partial.len())
                .any(|j| ctx.index.completes_triplet(candidate, [partial[i], partial[j]]))
        });
        if completes {
            weight += TRIPLET_BONUS;
        }
    }
    weight
}

/// Poids d'un PowerBall candidat : base 2, +2 à partir de 8 apparitions,
/// -0,5 à 2 apparitions ou moins.
pub fn special_number_weight(candidate: u8, ctx: &SamplingContext) -> f64 {
    let mut weight = BASE_WEIGHT;
    let freq = ctx.special_freq.count(candidate);
    if freq >= SPECIAL_HOT_THRESHOLD {
        weight += SPECIAL_HOT_BONUS;
    } else if freq <= SPECIAL_COLD_THRESHOLD {
        weight -= SPECIAL_COLD_PENALTY;
    }
    weight
}

/// Tirage pondéré par parcours cumulatif : r est tiré dans [0, somme), puis
/// décrémenté poids par poids ; le premier passage à zéro ou moins désigne
/// l'élu, le dernier élément servant de filet contre les erreurs d'arrondi.
/// Si la somme des poids est nulle ou négative, chaque poids est ramené au
/// plancher et le tirage devient uniforme. Le bassin ne doit pas être vide.
pub fn weighted_pick(pool: &[u8], weights: &[f64], rng: &mut StdRng) -> u8 {
    debug_assert_eq!(pool.len(), weights.len());
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        let floor_total = MIN_WEIGHT * pool.len() as f64;
        let mut r = rng.random::<f64>() * floor_total;
        for &number in pool {
            r -= MIN_WEIGHT;
            if r <= 0.0 {
                return number;
            }
        }
        return pool[pool.len() - 1];
    }
    let mut r = rng.random::<f64>() * total;
    for (i, &number) in pool.iter().enumerate() {
        r -= weights[i];
        if r <= 0.0 {
            return number;
        }
    }
    pool[pool.len() - 1]
}

/// Produit une combinaison complète : 5 numéros principaux distincts par
/// tirages pondérés avec rejet des doublons, puis un PowerBall indépendant.
/// Les poids principaux sont recalculés avant chaque tirage puisque les
/// bonus de paire et de triplet dépendent des numéros déjà retenus. Le
/// bassin principal doit compter au moins 5 valeurs distinctes.
pub fn sample_combination(
    ctx: &SamplingContext,
    main_pool: &[u8],
    special_pool: &[u8],
    rng: &mut StdRng,
) -> Combination {
    let mut chosen: Vec<u8> = Vec::with_capacity(Pool::Main.pick_count());
    let mut weights: Vec<f64> = Vec::with_capacity(main_pool.len());

    while chosen.len() < Pool::Main.pick_count() {
        weights.clear();
        weights.extend(main_pool.iter().map(|&n| main_number_weight(n, &chosen, ctx)));
        let pick = weighted_pick(main_pool, &weights, rng);
        if !chosen.contains(&pick) {
            chosen.push(pick);
        }
    }
    chosen.sort_unstable();

    let mut main_numbers = [0u8; 5];
    main_numbers.copy_from_slice(&chosen);

    let special_weights: Vec<f64> =
        special_pool.iter().map(|&n| special_number_weight(n, ctx)).collect();
    let special = weighted_pick(special_pool, &special_weights, rng);

    Combination { main_numbers, special }
}
