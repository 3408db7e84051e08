//! Game-record ingestion for Kifu
//!
//! Turns a corpus of professional game records into relational rows:
//! - tags and the main-line move list of each record (`extract`)
//! - dates, ranks, results and event names decoded from tag text (`decode`)
//! - an advisory import verdict per record (`validity`)
//! - players, tournament series and editions with stable surrogate ids (`registry`)
//! - the corpus pass tying these together (`pipeline`) and its row export (`export`)
//!
//! The pass is deterministic: the same entries in the same order yield the
//! same ids and the same game list.

pub mod country;
pub mod decode;
pub mod export;
pub mod extract;
pub mod moves;
pub mod pipeline;
pub mod registry;
pub mod source;
pub mod tags;
pub mod validity;

pub use country::Country;
pub use decode::{decode_date, decode_event, decode_rank, decode_winner, DecodeError, EventInfo};
pub use export::CorpusExport;
pub use extract::{extract_record, extract_text, ExtractError, ExtractedRecord};
pub use moves::{moves_string, Color, Move, Winner};
pub use pipeline::{
    decode_entry, event_country, run_corpus, ArchiveEntry, Corpus, CorpusOutput, DecodedRecord,
    Game, Pipeline, PipelineConfig, PipelineError, PipelineReport, SkipReason,
};
pub use registry::{BaseEventId, EventId, PlayerId, Registry, RegistryError};
pub use source::load_directory;
pub use tags::{TagKey, TagSet};
pub use validity::{check_validity, Rejection, Verdict};
