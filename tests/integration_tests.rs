//! Integration tests for the complete Kifu pipeline
//!
//! These tests run across crates:
//! - record text → kifu-sgf tree → extracted tags and moves
//! - record directory → corpus pass → exported rows → JSON
//!
//! Run with: cargo test --test integration_tests

use std::fs;
use std::path::Path;
use tempfile::tempdir;

use kifu_ingest::{load_directory, run_corpus, CorpusExport, PipelineConfig};

const OPENING: &str = ";B[pd];W[dp];B[pp];W[dd];B[fc];W[cf];B[jd];W[qn];B[nq];W[pl]\
;B[cn];W[fq];B[dj];W[ch];B[cj];W[ql];B[qf];W[po];B[oo];W[qp]\
;B[pn];W[qo];B[on];W[qq];B[pq];W[qr];B[kq];W[pr];B[lp];W[or]";

fn write_record(dir: &Path, name: &str, header: &str) {
    fs::write(dir.join(name), format!("(;GM[1]FF[4]{header}{OPENING})")).unwrap();
}

fn sample_archive(dir: &Path) {
    fs::create_dir_all(dir.join("1990")).unwrap();
    fs::create_dir_all(dir.join("2004")).unwrap();
    write_record(
        &dir.join("1990"),
        "a_meijin.sgf",
        "SZ[19]EV[15th Japanese Meijin]DT[1990-09-06,07]PB[Kobayashi Koichi]BC[ja]BR[9d]\
         PW[Otake Hideo]WR[9d]RE[B+R]RO[Game 1]PC[Tokyo]",
    );
    write_record(
        &dir.join("1990"),
        "b_fujitsu.sgf",
        "EV[3rd Fujitsu Cup]DT[1990-04]PB[Cho Hunhyun]BC[kr]BR[9p]PW[Kobayashi Koichi]WC[jp]WR[9p]RE[W+0.5]",
    );
    // Handicap game: imported, reported invalid.
    write_record(
        &dir.join("2004"),
        "c_teaching.sgf",
        "SZ[19]HA[2]EV[1st Teaching Match]DT[2004]PB[Amateur]BR[6d]PW[Cho Hunhyun]WR[9p]RE[W+R]",
    );
    // Undecodable event ordinal.
    write_record(
        &dir.join("2004"),
        "d_exhibition.sgf",
        "SZ[19]EV[Exhibition]DT[2004]PB[X]PW[Y]RE[B+R]",
    );
    fs::write(dir.join("2004").join("index.txt"), "not a record").unwrap();
    fs::write(dir.join("2004").join("e_broken.sgf"), "(;PB[Z];W[aa]").unwrap();
}

#[test]
fn test_record_text_to_extracted_moves() {
    let text = format!("(;PB[Kitani Minoru]PW[Go Seigen]{OPENING}(;B[aa])(;B[bb]))");
    let collection = kifu_sgf::parse_collection(&text).expect("should parse");
    let game = collection.first_game().expect("game");
    assert_eq!(game.variations.len(), 2);

    let record = kifu_ingest::extract_record(game).expect("should extract");
    assert_eq!(record.tags.black_name, "Kitani Minoru");
    // The main line continues into the first variation only.
    assert_eq!(record.moves.len(), 31);
    assert_eq!(record.moves[0].to_string(), "pd");
    assert_eq!(record.moves[30].to_string(), "aa");
}

#[test]
fn test_directory_to_export() {
    let dir = tempdir().unwrap();
    sample_archive(dir.path());

    let entries = load_directory(dir.path()).unwrap();
    assert_eq!(entries.len(), 6);

    let output = run_corpus(&entries, &PipelineConfig::default()).unwrap();
    let report = &output.report;
    assert_eq!(report.entries_seen, 6);
    assert_eq!(report.accepted, 2);
    assert_eq!(report.invalid_imported, 1);
    assert_eq!(report.not_records, 1);
    assert_eq!(report.unparseable, 1);
    assert_eq!(report.undecodable_events, 1);
    assert_eq!(report.rejections.get("handicap game"), Some(&1));

    let export = output.corpus.export();
    let names: Vec<&str> = export.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Kobayashi Koichi", "Otake Hideo", "Cho Hunhyun", "Amateur"]
    );
    // `ja` reads as Japan; Otake never carries a country tag.
    assert_eq!(export.players[0].country_id, 3);
    assert_eq!(export.players[1].country_id, 0);
    assert_eq!(export.players[2].country_id, 2);

    let series: Vec<(&str, u8)> = export
        .base_events
        .iter()
        .map(|b| (b.name.as_str(), b.country_id))
        .collect();
    assert_eq!(
        series,
        vec![
            ("none", 0),
            ("Japanese Meijin", 3),
            ("Fujitsu Cup", 3),
            ("Teaching Match", 0),
        ]
    );

    assert_eq!(export.games.len(), 3);
    let meijin = &export.games[0];
    assert_eq!(meijin.id, 1);
    assert_eq!(meijin.date.as_deref(), Some("1990-09-06"));
    assert_eq!(meijin.winner, 1);
    assert_eq!(meijin.round, "Game 1");
    assert_eq!(meijin.event_id, 1);

    let fujitsu = &export.games[1];
    assert_eq!(fujitsu.date.as_deref(), Some("1990-04-01"));
    assert_eq!(fujitsu.winner, -1);
    assert_eq!(fujitsu.white_id, 1);
    assert_eq!(fujitsu.rejection, None);

    assert_eq!(export.games[2].rejection.as_deref(), Some("handicap game"));
}

#[test]
fn test_export_json_round_trip() {
    let dir = tempdir().unwrap();
    sample_archive(dir.path());
    let entries = load_directory(dir.path()).unwrap();
    let export = run_corpus(&entries, &PipelineConfig::default())
        .unwrap()
        .corpus
        .export();

    let out = dir.path().join("corpus.json");
    fs::write(&out, serde_json::to_string_pretty(&export).unwrap()).unwrap();
    let reloaded: CorpusExport = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(reloaded, export);
}

#[test]
fn test_exclusion_policy_on_directory() {
    let dir = tempdir().unwrap();
    sample_archive(dir.path());
    let entries = load_directory(dir.path()).unwrap();

    let config: PipelineConfig =
        serde_json::from_str(r#"{ "exclude_invalid": true, "parallel_decode": true }"#).unwrap();
    let output = run_corpus(&entries, &config).unwrap();
    assert_eq!(output.report.invalid_excluded, 1);
    assert_eq!(output.corpus.games().len(), 2);
    assert!(output.corpus.registry().player("Amateur").is_none());
    assert!(output.corpus.registry().base_event("Teaching Match").is_none());
}
