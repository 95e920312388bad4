use std::collections::{HashMap, HashSet};

use crate::config::{TOP_PAIR_COUNT, TOP_TRIPLET_COUNT};
use crate::models::Draw;

/// Index de co-occurrence du bassin principal : paires et triplets les plus
/// fréquents de l'historique, avec des index inversés pour tester en O(1)
/// si un candidat complète une paire ou un triplet vedette.
#[derive(Debug, Clone, Default)]
pub struct CooccurrenceIndex {
    top_pairs: Vec<([u8; 2], u32)>,
    top_triplets: Vec<([u8; 3], u32)>,
    pair_companions: HashMap<u8, HashSet<u8>>,
    triplet_completions: HashMap<u8, HashSet<[u8; 2]>>,
}

fn top_entries<K: Ord + Copy>(counts: HashMap<K, u32>, keep: usize) -> Vec<(K, u32)> {
    let mut entries: Vec<(K, u32)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    entries.truncate(keep);
    entries
}

impl CooccurrenceIndex {
    /// Construit l'index en énumérant les 10 paires et 10 triplets de chaque
    /// tirage. Les numéros principaux d'un `Draw` étant triés, les clés
    /// produites sont déjà canoniques. À fréquence égale, la plus petite clé
    /// passe devant.
    pub fn build(draws: &[Draw]) -> CooccurrenceIndex {
        let mut pair_counts: HashMap<[u8; 2], u32> = HashMap::new();
        let mut triplet_counts: HashMap<[u8; 3], u32> = HashMap::new();

        for draw in draws {
            let nums = &draw.main_numbers;
            for i in 0..nums.len() {
                for j in (i + 1)..nums.len() {
                    *pair_counts.entry([nums[i], nums[j]]).or_insert(0) += 1;
                    for k in (j + 1)..nums.len() {
                        *triplet_counts.entry([nums[i], nums[j], nums[k]]).or_insert(0) += 1;
                    }
                }
            }
        }

        let top_pairs = top_entries(pair_counts, TOP_PAIR_COUNT);
        let top_triplets = top_entries(triplet_counts, TOP_TRIPLET_COUNT);

        let mut pair_companions: HashMap<u8, HashSet<u8>> = HashMap::new();
        for &([x, y], _) in &top_pairs {
            pair_companions.entry(x).or_default().insert(y);
            pair_companions.entry(y).or_default().insert(x);
        }

        // Pour chaque membre d'un triplet vedette, la paire des deux autres
        let mut triplet_completions: HashMap<u8, HashSet<[u8; 2]>> = HashMap::new();
        for &([x, y, z], _) in &top_triplets {
            triplet_completions.entry(x).or_default().insert([y, z]);
            triplet_completions.entry(y).or_default().insert([x, z]);
            triplet_completions.entry(z).or_default().insert([x, y]);
        }

        CooccurrenceIndex { top_pairs, top_triplets, pair_companions, triplet_completions }
    }

    pub fn top_pairs(&self) -> &[([u8; 2], u32)] {
        &self.top_pairs
    }

    pub fn top_triplets(&self) -> &[([u8; 3], u32)] {
        &self.top_triplets
    }

    /// Vrai si {candidate, chosen} est une paire vedette.
    pub fn completes_pair(&self, candidate: u8, chosen: u8) -> bool {
        self.pair_companions
            .get(&candidate)
            .map_or(false, |companions| companions.contains(&chosen))
    }

    /// Vrai si la paire donnée plus `candidate` forme un triplet vedette.
    /// La paire est canonisée ici, l'appelant peut la passer dans n'importe
    /// quel ordre.
    pub fn completes_triplet(&self, candidate: u8, pair: [u8; 2]) -> bool {
        let key = if pair[0] <= pair[1] { pair } else { [pair[1], pair[0]] };
        self.triplet_completions
            .get(&candidate)
            .map_or(false, |pairs| pairs.contains(&key))
    }
}
