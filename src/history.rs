use std::fmt;

use chrono::{Local, Months, NaiveDate};
use serde::Deserialize;

use crate::config::{DEFAULT_DRAW_LIMIT, MAX_DRAW_LIMIT, MIN_DRAW_LIMIT};
use crate::error::{GeneratorError, Result};
use crate::models::RawDraw;

/// Étendue maximale d'une plage de dates, en mois.
const MAX_RANGE_MONTHS: u32 = 36;

/// Jeux couverts par le fournisseur d'historique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Game {
    #[default]
    Powerball,
    PowerballPlus,
}

impl Game {
    /// Identifiant attendu par le fournisseur : majuscules, sans tirets.
    pub fn upstream_id(&self) -> &'static str {
        match self {
            Game::Powerball => "POWERBALL",
            Game::PowerballPlus => "POWERBALLPLUS",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Game::Powerball => write!(f, "powerball"),
            Game::PowerballPlus => write!(f, "powerball-plus"),
        }
    }
}

/// Analyse une date en acceptant les trois formats rencontrés en pratique :
/// ISO, JJ/MM/AAAA, et AAAA/MM/JJ (format renvoyé par le fournisseur).
pub fn parse_date_strict(input: &str) -> Result<NaiveDate> {
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date);
        }
    }
    Err(GeneratorError::InvalidConfig(format!(
        "Date invalide : '{}' (formats acceptés : AAAA-MM-JJ, JJ/MM/AAAA, AAAA/MM/JJ)",
        input
    )))
}

/// Requête d'historique résolue : plage de dates bornée et limite validée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub game: Game,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub limit: usize,
}

impl HistoryQuery {
    /// Résout les paramètres optionnels d'une requête. Par défaut la plage
    /// couvre l'année écoulée et la limite vaut 200 tirages.
    pub fn resolve(
        game: Game,
        start: Option<&str>,
        end: Option<&str>,
        limit: Option<usize>,
    ) -> Result<HistoryQuery> {
        let today = Local::now().date_naive();
        let start_date = match start {
            Some(s) => parse_date_strict(s)?,
            None => today.checked_sub_months(Months::new(12)).ok_or_else(|| {
                GeneratorError::InvalidConfig("Date de début par défaut incalculable".to_string())
            })?,
        };
        let end_date = match end {
            Some(s) => parse_date_strict(s)?,
            None => today,
        };
        if end_date < start_date {
            return Err(GeneratorError::InvalidConfig(format!(
                "Date de fin {} antérieure à la date de début {}",
                end_date, start_date
            )));
        }
        let range_cap = start_date
            .checked_add_months(Months::new(MAX_RANGE_MONTHS))
            .ok_or_else(|| {
                GeneratorError::InvalidConfig("Plage de dates incalculable".to_string())
            })?;
        if end_date > range_cap {
            return Err(GeneratorError::InvalidConfig(
                "Plage de dates trop étendue (maximum 3 ans)".to_string(),
            ));
        }
        let limit = limit.unwrap_or(DEFAULT_DRAW_LIMIT);
        if limit < MIN_DRAW_LIMIT || limit > MAX_DRAW_LIMIT {
            return Err(GeneratorError::InvalidConfig(format!(
                "Limite de tirages {} hors limites ({}-{})",
                limit, MIN_DRAW_LIMIT, MAX_DRAW_LIMIT
            )));
        }
        Ok(HistoryQuery { game, start_date, end_date, limit })
    }
}

/// Fournisseur d'historique de tirages. L'implémentation réseau vit hors de
/// cette crate ; la simulation ne dépend que de ce trait.
pub trait HistorySource {
    fn fetch_draws(&self, query: &HistoryQuery) -> Result<Vec<RawDraw>>;
}

#[derive(Debug, Deserialize)]
struct HistoryPayload {
    data: Vec<RawDraw>,
}

/// Décode la réponse JSON du fournisseur : un objet avec un tableau `data`
/// d'enregistrements bruts. Toute réponse d'une autre forme est traitée
/// comme une indisponibilité de l'historique.
pub fn decode_history_payload(body: &str) -> Result<Vec<RawDraw>> {
    let payload: HistoryPayload = serde_json::from_str(body)
        .map_err(|e| GeneratorError::HistoryUnavailable(format!("Réponse illisible : {}", e)))?;
    Ok(payload.data)
}

/// Source en mémoire, utilisée par les tests et les rejeux hors ligne.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    records: Vec<RawDraw>,
}

impl InMemoryHistory {
    pub fn new(records: Vec<RawDraw>) -> Self {
        InMemoryHistory { records }
    }
}

impl HistorySource for InMemoryHistory {
    fn fetch_draws(&self, query: &HistoryQuery) -> Result<Vec<RawDraw>> {
        Ok(self.records.iter().take(query.limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ball1: &str, powerball: &str) -> RawDraw {
        RawDraw {
            draw_number: "1".to_string(),
            draw_date: "2024/01/05".to_string(),
            ball1: ball1.to_string(),
            ball2: "12".to_string(),
            ball3: "23".to_string(),
            ball4: "34".to_string(),
            ball5: "45".to_string(),
            powerball: powerball.to_string(),
        }
    }

    #[test]
    fn test_parse_date_strict_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date_strict("2024-03-15").unwrap(), expected);
        assert_eq!(parse_date_strict("15/03/2024").unwrap(), expected);
        assert_eq!(parse_date_strict("2024/03/15").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_strict_rejects_garbage() {
        assert!(parse_date_strict("hier").is_err());
        assert!(parse_date_strict("2024-13-01").is_err());
        assert!(parse_date_strict("32/01/2024").is_err());
    }

    #[test]
    fn test_resolve_defaults_to_last_year() {
        let query = HistoryQuery::resolve(Game::Powerball, None, None, None).unwrap();
        let today = Local::now().date_naive();
        assert_eq!(query.end_date, today);
        assert_eq!(
            query.start_date,
            today.checked_sub_months(Months::new(12)).unwrap()
        );
        assert_eq!(query.limit, DEFAULT_DRAW_LIMIT);
        assert_eq!(query.game, Game::Powerball);
    }

    #[test]
    fn test_resolve_rejects_inverted_range() {
        let result =
            HistoryQuery::resolve(Game::Powerball, Some("2024-06-01"), Some("2024-01-01"), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_rejects_range_over_three_years() {
        let result =
            HistoryQuery::resolve(Game::Powerball, Some("2020-01-01"), Some("2024-01-01"), None);
        assert!(result.is_err());
        // Exactement 3 ans reste accepté
        let result =
            HistoryQuery::resolve(Game::Powerball, Some("2021-01-01"), Some("2024-01-01"), None);
        assert!(result.is_ok());
    }

    #[test]
    fn test_resolve_limit_bounds() {
        let ok = |limit| {
            HistoryQuery::resolve(Game::Powerball, Some("2024-01-01"), Some("2024-06-01"), limit)
        };
        assert!(ok(Some(0)).is_err());
        assert!(ok(Some(501)).is_err());
        assert_eq!(ok(Some(1)).unwrap().limit, 1);
        assert_eq!(ok(Some(500)).unwrap().limit, 500);
    }

    #[test]
    fn test_game_upstream_id() {
        assert_eq!(Game::Powerball.upstream_id(), "POWERBALL");
        assert_eq!(Game::PowerballPlus.upstream_id(), "POWERBALLPLUS");
        assert_eq!(Game::PowerballPlus.to_string(), "powerball-plus");
    }

    #[test]
    fn test_decode_history_payload() {
        let body = r#"{"data": [{
            "drawNumber": "1499",
            "drawDate": "2024/03/15",
            "ball1": "05",
            "ball2": "12",
            "ball3": "23",
            "ball4": "34",
            "ball5": "45",
            "powerball": "07"
        }]}"#;
        let records = decode_history_payload(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ball1, "05");
    }

    #[test]
    fn test_decode_history_payload_rejects_other_shapes() {
        assert!(matches!(
            decode_history_payload("<html>maintenance</html>"),
            Err(GeneratorError::HistoryUnavailable(_))
        ));
        assert!(decode_history_payload(r#"{"rows": []}"#).is_err());
    }

    #[test]
    fn test_in_memory_history_honors_limit() {
        let source = InMemoryHistory::new(vec![raw("01", "07"), raw("02", "08"), raw("03", "09")]);
        let query =
            HistoryQuery::resolve(Game::Powerball, Some("2024-01-01"), Some("2024-06-01"), Some(2))
                .unwrap();
        let records = source.fetch_draws(&query).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ball1, "01");
        assert_eq!(records[1].ball1, "02");
    }
}
