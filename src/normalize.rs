use crate::config::MAX_DRAW_LIMIT;
use crate::error::{GeneratorError, Result};
use crate::models::{validate_draw, Draw, RawDraw};

/// Bilan d'une passe de normalisation. Un enregistrement mal formé est
/// ignoré avec un avertissement, jamais fatal : l'historique du fournisseur
/// contient parfois des lignes corrompues.
pub struct NormalizeReport {
    pub draws: Vec<Draw>,
    pub examined: usize,
    pub skipped: usize,
}

fn parse_record(record: &RawDraw) -> Result<([u8; 5], u8)> {
    let parse_ball = |label: &str, value: &str| -> Result<u8> {
        value.trim().parse::<u8>().map_err(|_| {
            GeneratorError::MalformedRecord(format!(
                "Impossible de parser {} : '{}'",
                label, value
            ))
        })
    };

    let mut main_numbers = [
        parse_ball("ball1", &record.ball1)?,
        parse_ball("ball2", &record.ball2)?,
        parse_ball("ball3", &record.ball3)?,
        parse_ball("ball4", &record.ball4)?,
        parse_ball("ball5", &record.ball5)?,
    ];
    let special = parse_ball("powerball", &record.powerball)?;

    main_numbers.sort_unstable();
    validate_draw(&main_numbers, special)?;
    Ok((main_numbers, special))
}

/// Convertit les enregistrements bruts en tirages exploitables, au plus
/// `limit` (plafonné à 500). Les numéros principaux sortent triés et
/// `draw_index` suit l'ordre de l'historique, du plus récent au plus ancien.
pub fn normalize_draws(records: &[RawDraw], limit: usize) -> NormalizeReport {
    let cap = limit.min(MAX_DRAW_LIMIT);
    let mut draws: Vec<Draw> = Vec::new();
    let mut examined = 0;
    let mut skipped = 0;

    for record in records.iter().take(cap) {
        examined += 1;
        match parse_record(record) {
            Ok((main_numbers, special)) => {
                draws.push(Draw {
                    main_numbers,
                    special,
                    draw_date: record.draw_date.trim().to_string(),
                    draw_index: draws.len(),
                });
            }
            Err(e) => {
                log::warn!("Tirage {} ignoré : {}", record.draw_number, e);
                skipped += 1;
            }
        }
    }

    NormalizeReport { draws, examined, skipped }
}
