//! Row collections handed to persistence and reporting.
//!
//! Every collection is in id order. Base events and events start with an
//! id-0 `none` row that parentless references can point at.

use serde::{Deserialize, Serialize};

use crate::country::Country;
use crate::pipeline::{Corpus, Game};

pub const SENTINEL_NAME: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRow {
    pub id: u8,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEventRow {
    pub id: u32,
    pub name: String,
    pub country_id: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRow {
    pub id: u32,
    pub name: String,
    pub number: u32,
    pub base_event_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRow {
    pub id: u32,
    pub name: String,
    pub country_id: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRow {
    pub id: usize,
    pub country_id: u8,
    pub black_id: u32,
    pub black_rank: i32,
    pub white_id: u32,
    pub white_rank: i32,
    pub event_id: u32,
    pub event: String,
    pub round: String,
    pub place: String,
    pub result: String,
    /// 1 black, -1 white, 0 unknown.
    pub winner: i8,
    pub date: Option<String>,
    pub moves: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

impl GameRow {
    fn new(id: usize, game: &Game) -> Self {
        Self {
            id,
            country_id: game.country.id(),
            black_id: game.black.raw(),
            black_rank: game.black_rank,
            white_id: game.white.raw(),
            white_rank: game.white_rank,
            event_id: game.event.raw(),
            event: game.raw_event.clone(),
            round: game.round.clone(),
            place: game.place.clone(),
            result: game.result.clone(),
            winner: game.winner.as_i8(),
            date: game.date.clone(),
            moves: game.moves.clone(),
            rejection: game.rejection.map(|r| r.label().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusExport {
    pub countries: Vec<CountryRow>,
    pub base_events: Vec<BaseEventRow>,
    pub events: Vec<EventRow>,
    pub players: Vec<PlayerRow>,
    pub games: Vec<GameRow>,
}

impl Corpus {
    pub fn export(&self) -> CorpusExport {
        let registry = self.registry();

        let countries = Country::ALL
            .iter()
            .map(|c| CountryRow {
                id: c.id(),
                code: c.abbr().to_string(),
                name: c.name().to_string(),
            })
            .collect();

        let base_events = std::iter::once(BaseEventRow {
            id: 0,
            name: SENTINEL_NAME.to_string(),
            country_id: Country::None.id(),
        })
        .chain(registry.base_events().iter().map(|e| BaseEventRow {
            id: e.id.raw(),
            name: e.name.clone(),
            country_id: e.country.id(),
        }))
        .collect();

        let events = std::iter::once(EventRow {
            id: 0,
            name: SENTINEL_NAME.to_string(),
            number: 0,
            base_event_id: 0,
        })
        .chain(registry.events().iter().map(|e| EventRow {
            id: e.id.raw(),
            name: e.name.clone(),
            number: e.number,
            base_event_id: e.base_event.raw(),
        }))
        .collect();

        let players = registry
            .players()
            .iter()
            .map(|p| PlayerRow {
                id: p.id.raw(),
                name: p.name.clone(),
                country_id: p.country.id(),
            })
            .collect();

        let games = self
            .games()
            .iter()
            .enumerate()
            .map(|(i, g)| GameRow::new(i + 1, g))
            .collect();

        CorpusExport {
            countries,
            base_events,
            events,
            players,
            games,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{run_corpus, ArchiveEntry, PipelineConfig};

    const GAME: &str = "(;SZ[19]EV[2nd Korean Myeongin]DT[1970]PB[Cho Namchul]BC[kr]BR[9p]\
        PW[Kim Insook]WR[4k]RE[B+3.5]\
        ;B[pd];W[dp];B[pp];W[dd];B[fc];W[cf];B[jd];W[qn];B[nq];W[pl]\
        ;B[cn];W[fq];B[dj];W[ch];B[cj];W[ql];B[qf];W[po];B[oo];W[qp]\
        ;B[pn];W[qo];B[on];W[qq];B[pq];W[qr];B[kq];W[pr];B[lp];W[or])";

    #[test]
    fn export_rows_follow_corpus() {
        let entries = vec![ArchiveEntry::new("game.sgf", GAME)];
        let out = run_corpus(&entries, &PipelineConfig::default()).unwrap();
        let export = out.corpus.export();

        assert_eq!(export.countries.len(), 5);
        assert_eq!(export.countries[2].code, "kr");

        assert_eq!(export.base_events[0].name, SENTINEL_NAME);
        assert_eq!(
            export.base_events[1],
            BaseEventRow {
                id: 1,
                name: "Korean Myeongin".to_string(),
                country_id: 2,
            }
        );
        assert_eq!(export.events[1].name, "2nd Korean Myeongin");
        assert_eq!(export.events[1].base_event_id, 1);
        assert_eq!(export.players[1].country_id, 0);

        let game = &export.games[0];
        assert_eq!(game.id, 1);
        assert_eq!(game.winner, 1);
        assert_eq!(game.black_rank, 9);
        assert_eq!(game.white_rank, -4);
        assert_eq!(game.date.as_deref(), Some("1970-01-01"));
        assert_eq!(game.rejection.as_deref(), Some("kyu rank"));
        assert_eq!(game.moves.len(), 60);
    }

    #[test]
    fn export_serializes_to_json() {
        let export = crate::pipeline::Corpus::new().export();
        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["events"][0]["name"], "none");
        assert_eq!(value["countries"][4]["name"], "Taiwan");
        assert!(value["games"].as_array().unwrap().is_empty());
    }
}
