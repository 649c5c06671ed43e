// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use tonalcodec::io::formats::silbido::constants::{
    FEAT_CONFIDENCE, FEAT_FREQ, FEAT_RIDGE, FEAT_SCORE, FEAT_SNR, FEAT_TIME, LEGACY_VERSION, MAGIC,
};
use tonalcodec::io::formats::silbido::FieldWriter;
use tonalcodec::{TfNode, TonalReader, TonalRecord, TonalWriter, WriterConfig, GRAPH_ID_NONE};

// ============================================================================
// Records
// ============================================================================

/// Frequencies of the blue whale D call scenario, one per node.
pub const BLUE_WHALE_FREQS: [f64; 7] = [82.0, 80.5, 78.25, 76.0, 73.5, 71.0, 68.75];

/// Times of the blue whale D call scenario: 685.0 to 685.6 in 0.1 s steps.
pub fn blue_whale_times() -> Vec<f64> {
    (0..7).map(|i| 685.0 + f64::from(i) / 10.0).collect()
}

/// One blue whale D call with no graph, zero scores and bare nodes.
pub fn blue_whale_call() -> TonalRecord {
    let nodes = blue_whale_times()
        .into_iter()
        .zip(BLUE_WHALE_FREQS)
        .map(|(time, freq)| TfNode::new(time, freq))
        .collect();
    TonalRecord::new()
        .with_species("Balaenoptera musculus")
        .with_call("D")
        .with_graph_id(GRAPH_ID_NONE)
        .with_confidence(0.0)
        .with_score(0.0)
        .with_nodes(nodes)
}

/// A small mixed set: labelled, unlabelled, empty and attribute-carrying records.
pub fn mixed_records() -> Vec<TonalRecord> {
    vec![
        blue_whale_call(),
        TonalRecord::from_contour(vec![(12.5, 9000.0), (12.51, 9120.0), (12.52, 9300.0)])
            .with_graph_id(3),
        TonalRecord::new().with_species("Delphinus delphis"),
        TonalRecord::new()
            .with_call("upsweep")
            .with_confidence(0.875)
            .with_score(-2.25)
            .with_graph_id(0)
            .with_nodes(vec![
                TfNode::new(40.0, 11000.0).with_snr(14.5).with_ridge(true),
                TfNode::new(40.002, 11050.0).with_phase(-1.5),
                TfNode::new(40.004, 11100.0)
                    .with_snr(9.0)
                    .with_phase(0.25)
                    .with_ridge(true),
            ]),
    ]
}

// ============================================================================
// Encoding helpers
// ============================================================================

/// Encode records in memory with the default configuration.
pub fn encode(records: &[TonalRecord]) -> Vec<u8> {
    encode_with(records, WriterConfig::default())
}

/// Encode records in memory with the given configuration.
pub fn encode_with(records: &[TonalRecord], config: WriterConfig) -> Vec<u8> {
    let mut bytes = Vec::new();
    TonalWriter::with_config(&mut bytes, config)
        .write(records)
        .expect("encode records");
    bytes
}

/// Decode every record of an in-memory file.
pub fn decode(bytes: Vec<u8>) -> tonalcodec::Result<Vec<TonalRecord>> {
    TonalReader::new(Cursor::new(bytes))?.read_all()
}

/// A version 4 file with confidence, score, snr and f64 ridge, built by hand.
///
/// Each record is `(confidence, score, graph_id, [(time, freq, snr, ridge)])`.
pub fn legacy_file(records: &[(f64, f64, u64, Vec<(f64, f64, f64, f64)>)]) -> Vec<u8> {
    let features = FEAT_TIME | FEAT_FREQ | FEAT_SNR | FEAT_RIDGE | FEAT_CONFIDENCE | FEAT_SCORE;
    let mut out = FieldWriter::new(Vec::new());
    out.write_bytes(&MAGIC).unwrap();
    out.write_u16(LEGACY_VERSION).unwrap();
    out.write_u16(features).unwrap();
    out.write_u16(0).unwrap();
    out.write_u32(18).unwrap();
    for (confidence, score, graph_id, nodes) in records {
        out.write_f64(*confidence).unwrap();
        out.write_f64(*score).unwrap();
        out.write_u64(*graph_id).unwrap();
        out.write_u32(nodes.len() as u32).unwrap();
        for (time, freq, snr, ridge) in nodes {
            out.write_f64(*time).unwrap();
            out.write_f64(*freq).unwrap();
            out.write_f64(*snr).unwrap();
            out.write_f64(*ridge).unwrap();
        }
    }
    out.into_inner()
}

// ============================================================================
// Temporary files
// ============================================================================

/// Get a unique temporary directory for test files.
pub fn temp_dir() -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let thread_id = format!("{:?}", std::thread::current().id());
    std::env::temp_dir().join(format!(
        "tonalcodec_test_{}_{}_{}",
        std::process::id(),
        thread_id.replace(|c: char| !c.is_ascii_alphanumeric(), ""),
        random
    ))
}

/// Create a temporary file path with cleanup guard.
pub fn temp_path(name: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir();
    fs::create_dir_all(&dir).ok();
    let path = dir.join(name);
    (path, CleanupGuard(dir))
}

/// Removes a temporary directory on drop.
#[derive(Debug)]
pub struct CleanupGuard(pub PathBuf);

impl CleanupGuard {
    /// Another path inside the guarded directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}
