//! Corpus pipeline.
//!
//! Each archive entry goes through a pure decode step ([`decode_entry`]) and
//! then a sequential fold into the [`Corpus`]. Decoding may run in parallel;
//! the fold never does, since surrogate ids follow archive order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::country::{country_from_tournament_keywords, Country};
use crate::decode::{decode_date, decode_event, decode_rank, decode_winner, DecodeError, EventInfo};
use crate::extract::{extract_text, ExtractError};
use crate::moves::{moves_string, Color, Move, Winner};
use crate::registry::{EventId, PlayerId, Registry, RegistryError};
use crate::tags::TagSet;
use crate::validity::{check_validity, Rejection, Verdict};

/// Extension (compared case-insensitively) of entries holding a record.
pub const RECORD_EXTENSION: &str = ".sgf";

/// One named text member of the input archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub text: String,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn is_record(&self) -> bool {
        self.name.to_lowercase().ends_with(RECORD_EXTENSION)
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Leave records failing the validity rules out of the corpus.
    pub exclude_invalid: bool,
    /// Entries between progress log lines; 0 disables them.
    pub progress_interval: usize,
    /// Decode entries on the rayon pool before folding.
    pub parallel_decode: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            exclude_invalid: false,
            progress_interval: 1000,
            parallel_decode: false,
        }
    }
}

// ============================================================================
// Decode step
// ============================================================================

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("not a record file")]
    NotARecord,
    #[error("unparseable record: {0}")]
    Unparseable(#[from] ExtractError),
    #[error("undecodable event: {0}")]
    UndecodableEvent(DecodeError),
}

/// Everything the fold needs from one entry. Built without touching any
/// shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub source: String,
    pub tags: TagSet,
    pub moves: Vec<Move>,
    pub event: EventInfo,
    /// Event country after the keyword fallback.
    pub country: Country,
    pub verdict: Verdict,
    pub black_rank: i32,
    pub white_rank: i32,
    pub winner: Winner,
    /// `None` when the date tag does not decode.
    pub date: Option<String>,
}

/// Host country of an event: the nationality word if there is one, else the
/// tournament keyword table.
pub fn event_country(event: &EventInfo) -> Country {
    if event.country.is_known() {
        event.country
    } else {
        country_from_tournament_keywords(&event.base_name)
    }
}

pub fn decode_entry(entry: &ArchiveEntry) -> Result<DecodedRecord, SkipReason> {
    if !entry.is_record() {
        return Err(SkipReason::NotARecord);
    }

    let record = extract_text(&entry.text)?;
    let event = decode_event(&record.tags.event).map_err(SkipReason::UndecodableEvent)?;
    let country = event_country(&event);
    let verdict = check_validity(&record);

    Ok(DecodedRecord {
        source: entry.name.clone(),
        black_rank: decode_rank(record.tags.player_rank(Color::Black)),
        white_rank: decode_rank(record.tags.player_rank(Color::White)),
        winner: decode_winner(&record.tags.result),
        date: decode_date(&record.tags.date).ok(),
        tags: record.tags,
        moves: record.moves,
        event,
        country,
        verdict,
    })
}

// ============================================================================
// Fold
// ============================================================================

/// One imported game. Entities are referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub source: String,
    pub country: Country,
    pub black: PlayerId,
    pub black_rank: i32,
    pub white: PlayerId,
    pub white_rank: i32,
    pub event: EventId,
    pub raw_event: String,
    pub round: String,
    pub place: String,
    pub result: String,
    pub winner: Winner,
    pub date: Option<String>,
    pub moves: String,
    /// Why the record failed validation, if it did and was imported anyway.
    pub rejection: Option<Rejection>,
}

/// Registry plus the ordered game list for one corpus pass.
#[derive(Debug, Default)]
pub struct Corpus {
    registry: Registry,
    games: Vec<Game>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the record's entities and append its game.
    pub fn absorb(&mut self, record: DecodedRecord) -> Result<&Game, RegistryError> {
        self.registry.ensure_capacity()?;
        let reg = &mut self.registry;
        let base_event = reg.register_base_event(&record.event.base_name, record.country)?;
        let event = reg.register_event(&record.event.event_name, base_event, record.event.number)?;
        let black = reg.register_player(&record.tags.black_name, &record.tags.black_country)?;
        let white = reg.register_player(&record.tags.white_name, &record.tags.white_country)?;

        let moves = moves_string(&record.moves);
        let tags = record.tags;
        self.games.push(Game {
            source: record.source,
            country: record.country,
            black,
            black_rank: record.black_rank,
            white,
            white_rank: record.white_rank,
            event,
            raw_event: tags.event,
            round: tags.round,
            place: tags.place,
            result: tags.result,
            winner: record.winner,
            date: record.date,
            moves,
            rejection: record.verdict.rejection(),
        });
        Ok(&self.games[self.games.len() - 1])
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }
}

// ============================================================================
// Driver
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub entries_seen: usize,
    pub not_records: usize,
    pub unparseable: usize,
    pub undecodable_events: usize,
    pub accepted: usize,
    pub invalid_imported: usize,
    pub invalid_excluded: usize,
    /// Rejection label to count, over imported and excluded records alike.
    pub rejections: BTreeMap<String, usize>,
}

impl PipelineReport {
    pub fn imported(&self) -> usize {
        self.accepted + self.invalid_imported
    }

    pub fn skipped(&self) -> usize {
        self.not_records + self.unparseable + self.undecodable_events
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub struct CorpusOutput {
    pub corpus: Corpus,
    pub report: PipelineReport,
}

/// Stateful single-writer driver; feed entries in archive order.
pub struct Pipeline {
    config: PipelineConfig,
    corpus: Corpus,
    report: PipelineReport,
    last_snapshot: Instant,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            corpus: Corpus::new(),
            report: PipelineReport::default(),
            last_snapshot: Instant::now(),
        }
    }

    pub fn process(&mut self, entry: &ArchiveEntry) -> Result<(), PipelineError> {
        let decoded = decode_entry(entry);
        self.fold(&entry.name, decoded)
    }

    fn fold(
        &mut self,
        name: &str,
        decoded: Result<DecodedRecord, SkipReason>,
    ) -> Result<(), PipelineError> {
        self.report.entries_seen += 1;
        self.progress();

        let record = match decoded {
            Ok(record) => record,
            Err(reason) => {
                match reason {
                    SkipReason::NotARecord => self.report.not_records += 1,
                    SkipReason::Unparseable(_) => self.report.unparseable += 1,
                    SkipReason::UndecodableEvent(_) => self.report.undecodable_events += 1,
                }
                debug!(entry = %name, reason = %reason, "skipping entry");
                return Ok(());
            }
        };

        match record.verdict {
            Verdict::Accept => self.report.accepted += 1,
            Verdict::Reject(rejection) => {
                *self
                    .report
                    .rejections
                    .entry(rejection.label().to_string())
                    .or_default() += 1;
                if self.config.exclude_invalid {
                    self.report.invalid_excluded += 1;
                    warn!(entry = %name, reason = %rejection, "excluding invalid record");
                    return Ok(());
                }
                self.report.invalid_imported += 1;
            }
        }

        self.corpus.absorb(record)?;
        Ok(())
    }

    fn progress(&mut self) {
        let interval = self.config.progress_interval;
        if interval == 0 || self.report.entries_seen % interval != 0 {
            return;
        }
        info!(
            entries = self.report.entries_seen,
            elapsed_ms = self.last_snapshot.elapsed().as_millis() as u64,
            "processed entries"
        );
        self.last_snapshot = Instant::now();
    }

    pub fn finish(self) -> CorpusOutput {
        let report = self.report;
        info!(
            entries = report.entries_seen,
            imported = report.imported(),
            accepted = report.accepted,
            invalid_imported = report.invalid_imported,
            invalid_excluded = report.invalid_excluded,
            skipped = report.skipped(),
            "corpus pass finished"
        );
        CorpusOutput {
            corpus: self.corpus,
            report,
        }
    }
}

/// Run one full pass over `entries` in the order given.
pub fn run_corpus(
    entries: &[ArchiveEntry],
    config: &PipelineConfig,
) -> Result<CorpusOutput, PipelineError> {
    let mut pipeline = Pipeline::new(config.clone());

    if config.parallel_decode {
        let decoded: Vec<Result<DecodedRecord, SkipReason>> =
            entries.par_iter().map(decode_entry).collect();
        for (entry, result) in entries.iter().zip(decoded) {
            pipeline.fold(&entry.name, result)?;
        }
    } else {
        for entry in entries {
            pipeline.process(entry)?;
        }
    }

    Ok(pipeline.finish())
}
