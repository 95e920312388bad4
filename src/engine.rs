use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::{GeneratorConfig, TOP_COMBINATION_COUNT};
use crate::cooccurrence::CooccurrenceIndex;
use crate::error::{GeneratorError, Result};
use crate::frequency::{count_occurrences, hot_cold_main, hot_cold_special};
use crate::history::{HistoryQuery, HistorySource};
use crate::models::{AnalysisResult, Combination, Draw, Pool, RankedCombination};
use crate::normalize::normalize_draws;
use crate::sampler::{sample_combination, SamplingContext};

/// Découpe le nombre d'essais en lots pleins plus un éventuel lot partiel.
fn batch_sizes(num_simulations: u32, batch_size: u32) -> Vec<u32> {
    let mut sizes = Vec::new();
    let mut remaining = num_simulations;
    while remaining > 0 {
        let size = remaining.min(batch_size);
        sizes.push(size);
        remaining -= size;
    }
    sizes
}

/// Graine propre à un lot, dérivée de la graine de base par un mélange
/// SplitMix64. Chaque lot possède ainsi son flux aléatoire, et le résultat
/// ne dépend pas de l'ordre d'exécution des lots.
fn batch_seed(base: u64, batch_index: usize) -> u64 {
    let mut z = base.wrapping_add((batch_index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn run_batch(
    ctx: &SamplingContext,
    main_pool: &[u8],
    special_pool: &[u8],
    iterations: u32,
    seed: u64,
) -> HashMap<Combination, u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut counts: HashMap<Combination, u32> = HashMap::new();
    for _ in 0..iterations {
        let combo = sample_combination(ctx, main_pool, special_pool, &mut rng);
        *counts.entry(combo).or_insert(0) += 1;
    }
    counts
}

/// Exécute tous les lots en parallèle puis fusionne leurs partitions de
/// fréquences. Le drapeau d'annulation est consulté au démarrage de chaque
/// lot : un lot déjà lancé va à son terme, les suivants sont abandonnés.
fn simulate(
    ctx: &SamplingContext,
    main_pool: &[u8],
    special_pool: &[u8],
    config: &GeneratorConfig,
    base_seed: u64,
    cancel: Option<&AtomicBool>,
) -> Result<HashMap<Combination, u32>> {
    let sizes = batch_sizes(config.num_simulations, config.batch_size);
    log::debug!("{} essais répartis en {} lots", config.num_simulations, sizes.len());

    let partials: Vec<HashMap<Combination, u32>> = sizes
        .par_iter()
        .enumerate()
        .map(|(batch_index, &iterations)| {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(GeneratorError::Cancelled);
                }
            }
            let counts =
                run_batch(ctx, main_pool, special_pool, iterations, batch_seed(base_seed, batch_index));
            log::debug!("Lot {} terminé ({} essais)", batch_index, iterations);
            Ok(counts)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut merged: HashMap<Combination, u32> = HashMap::new();
    for partial in partials {
        for (combo, count) in partial {
            *merged.entry(combo).or_insert(0) += count;
        }
    }
    Ok(merged)
}

/// Classe les combinaisons par fréquence décroissante et ne garde que les
/// meilleures. À fréquence égale, l'ordre naturel des combinaisons départage.
fn rank_combinations(counts: HashMap<Combination, u32>) -> Vec<RankedCombination> {
    let mut entries: Vec<(Combination, u32)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    entries.truncate(TOP_COMBINATION_COUNT);
    entries
        .into_iter()
        .map(|(combo, count)| RankedCombination {
            main_numbers: combo.main_numbers,
            special: combo.special,
            count,
        })
        .collect()
}

/// Valeurs distinctes observées dans l'historique pour un bassin, triées.
/// La simulation ne tire que parmi elles, jamais dans le bassin théorique.
fn observed_pool(draws: &[Draw], pool: Pool) -> Vec<u8> {
    let mut values: Vec<u8> = draws
        .iter()
        .flat_map(|draw| pool.numbers_from(draw).iter().copied())
        .collect();
    values.sort_unstable();
    values.dedup();
    values
}

fn generate_with(
    draws: &[Draw],
    config: &GeneratorConfig,
    cancel: Option<&AtomicBool>,
) -> Result<AnalysisResult> {
    config.validate()?;

    let main_pool = observed_pool(draws, Pool::Main);
    if main_pool.len() < Pool::Main.pick_count() {
        return Err(GeneratorError::InsufficientPool { distinct: main_pool.len() });
    }
    let special_pool = observed_pool(draws, Pool::Special);

    let main_freq = count_occurrences(draws, Pool::Main);
    let special_freq = count_occurrences(draws, Pool::Special);
    let hot_cold = hot_cold_main(&main_freq);
    let (hot_special, cold_special) = hot_cold_special(&special_freq);
    let index = CooccurrenceIndex::build(draws);

    let top_pairs: Vec<[u8; 2]> = index.top_pairs().iter().map(|&(pair, _)| pair).collect();
    let top_triplets: Vec<[u8; 3]> =
        index.top_triplets().iter().map(|&(triplet, _)| triplet).collect();

    let ctx = SamplingContext {
        hot_set: hot_cold.hot.iter().copied().collect(),
        cold_set: hot_cold.cold.iter().copied().collect(),
        date_bias: config.date_bias.clone(),
        index,
        special_freq,
    };

    let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let counts = simulate(&ctx, &main_pool, &special_pool, config, base_seed, cancel)?;
    let top_combinations = rank_combinations(counts);

    log::info!(
        "Génération terminée : {} essais sur {} tirages, {} combinaisons retenues",
        config.num_simulations,
        draws.len(),
        top_combinations.len()
    );

    Ok(AnalysisResult {
        top_combinations,
        hot_main: hot_cold.hot,
        cold_main: hot_cold.cold,
        hot_special,
        cold_special,
        top_pairs,
        top_triplets,
    })
}

/// Analyse l'historique puis simule `num_simulations` essais pondérés et
/// rend les combinaisons les plus fréquentes avec les classements qui ont
/// guidé la pondération.
pub fn generate_combinations(draws: &[Draw], config: &GeneratorConfig) -> Result<AnalysisResult> {
    generate_with(draws, config, None)
}

/// Variante annulable : si le drapeau passe à vrai en cours de route, les
/// lots restants sont abandonnés et l'appel rend l'erreur d'annulation.
pub fn generate_combinations_with_cancel(
    draws: &[Draw],
    config: &GeneratorConfig,
    cancel: &AtomicBool,
) -> Result<AnalysisResult> {
    generate_with(draws, config, Some(cancel))
}

/// Chaîne complète : récupération de l'historique, normalisation, analyse
/// et simulation.
pub fn run_generation(
    source: &dyn HistorySource,
    query: &HistoryQuery,
    config: &GeneratorConfig,
) -> Result<AnalysisResult> {
    let records = source.fetch_draws(query)?;
    let report = normalize_draws(&records, query.limit);
    log::info!(
        "Historique {} : {} tirages exploitables, {} ignorés",
        query.game,
        report.draws.len(),
        report.skipped
    );
    generate_combinations(&report.draws, config)
}
