// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Write-then-read tests over in-memory buffers and real files.

mod common;

use std::io::Cursor;

use common::{blue_whale_call, blue_whale_times, decode, encode, encode_with, mixed_records};
use common::{temp_path, BLUE_WHALE_FREQS};
use tonalcodec::{
    read_contours, read_tonals, write_contours, write_tonals, AnnotationSummary, TfNode,
    TonalReader, TonalRecord, TonalWriter, WriterBuilder, WriterConfig, GRAPH_ID_NONE,
};

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_blue_whale_call_round_trip() {
    let record = blue_whale_call();
    let bytes = encode(std::slice::from_ref(&record));

    let mut reader = TonalReader::new(Cursor::new(bytes)).unwrap();
    let decoded = reader.read_all().unwrap();
    assert_eq!(decoded.len(), 1);

    let tonal = &decoded[0];
    assert_eq!(tonal.species.as_deref(), Some("Balaenoptera musculus"));
    assert_eq!(tonal.call.as_deref(), Some("D"));
    assert_eq!(tonal.graph_id, u64::MAX);
    assert!(!tonal.has_graph());
    assert_eq!(tonal.confidence, 0.0);
    assert_eq!(tonal.score, 0.0);
    assert_eq!(tonal.nodes.len(), 7);
    for (node, (time, freq)) in tonal
        .nodes
        .iter()
        .zip(blue_whale_times().into_iter().zip(BLUE_WHALE_FREQS))
    {
        assert_eq!(node.time.to_bits(), time.to_bits());
        assert_eq!(node.freq.to_bits(), freq.to_bits());
        assert_eq!(node.snr, None);
        assert_eq!(node.phase, None);
        assert!(!node.ridge);
    }
    assert_eq!(tonal, &record);

    reader.rewind().unwrap();
    let contours = reader.time_frequency_contours().unwrap();
    let expected: Vec<(f64, f64)> = blue_whale_times().into_iter().zip(BLUE_WHALE_FREQS).collect();
    assert_eq!(contours, vec![expected]);
}

#[test]
fn test_empty_sequence_round_trip() {
    let bytes = encode(&[]);
    assert_eq!(decode(bytes.clone()).unwrap(), Vec::<TonalRecord>::new());

    let mut reader = TonalReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.next_record().unwrap(), None);
    assert!(reader.time_frequency_contours().unwrap().is_empty());
}

#[test]
fn test_zero_node_records_round_trip() {
    let records = vec![
        TonalRecord::new(),
        TonalRecord::new().with_species("Orcinus orca").with_graph_id(9),
        TonalRecord::new(),
    ];
    let decoded = decode(encode(&records)).unwrap();
    assert_eq!(decoded, records);
    assert!(decoded.iter().all(|r| r.is_empty()));
}

#[test]
fn test_mixed_records_round_trip() {
    let records = mixed_records();
    assert_eq!(decode(encode(&records)).unwrap(), records);
}

#[test]
fn test_optional_attributes_present_and_absent() {
    let records = vec![TonalRecord::new().with_nodes(vec![
        TfNode::new(1.0, 100.0).with_snr(0.0),
        TfNode::new(1.1, 101.0),
        TfNode::new(1.2, 102.0).with_phase(0.0),
        TfNode::new(1.3, 103.0).with_snr(-3.5).with_phase(3.1),
    ])];
    let decoded = decode(encode(&records)).unwrap();

    // Zero is a measurement, not an absence
    let nodes = &decoded[0].nodes;
    assert_eq!(nodes[0].snr, Some(0.0));
    assert_eq!(nodes[0].phase, None);
    assert_eq!(nodes[1].snr, None);
    assert_eq!(nodes[1].phase, None);
    assert_eq!(nodes[2].snr, None);
    assert_eq!(nodes[2].phase, Some(0.0));
    assert_eq!(nodes[3].snr, Some(-3.5));
    assert_eq!(nodes[3].phase, Some(3.1));
}

#[test]
fn test_graph_id_extremes_round_trip() {
    let records: Vec<TonalRecord> = [0, 1, u64::MAX - 1, GRAPH_ID_NONE]
        .into_iter()
        .map(|id| TonalRecord::from_contour(vec![(0.5, 500.0)]).with_graph_id(id))
        .collect();
    let decoded = decode(encode(&records)).unwrap();
    let ids: Vec<u64> = decoded.iter().map(|r| r.graph_id).collect();
    assert_eq!(ids, vec![0, 1, u64::MAX - 1, u64::MAX]);
}

#[test]
fn test_label_edge_cases_round_trip() {
    let records = vec![
        TonalRecord::new().with_species("").with_call(""),
        TonalRecord::new().with_species("Grampus griseus 🐬").with_call("chirp/upsweep"),
        TonalRecord::new().with_call("only a call"),
    ];
    let decoded = decode(encode(&records)).unwrap();
    assert_eq!(decoded, records);
    assert_eq!(decoded[0].species.as_deref(), Some(""));
    assert_eq!(decoded[2].species, None);
}

#[test]
fn test_special_float_values_round_trip() {
    let records = vec![TonalRecord::new()
        .with_confidence(f64::MIN_POSITIVE)
        .with_score(f64::MAX)
        .with_nodes(vec![
            TfNode::new(-0.0, f64::INFINITY).with_snr(f64::NEG_INFINITY),
            TfNode::new(1e-300, 1e300).with_phase(-0.0),
        ])];
    let decoded = decode(encode(&records)).unwrap();
    let node = &decoded[0].nodes[0];
    assert_eq!(node.time.to_bits(), (-0.0f64).to_bits());
    assert_eq!(node.freq, f64::INFINITY);
    assert_eq!(node.snr, Some(f64::NEG_INFINITY));
    assert_eq!(decoded[0].nodes[1].phase.map(f64::to_bits), Some((-0.0f64).to_bits()));
    assert_eq!(decoded[0].score, f64::MAX);
}

#[test]
fn test_nan_measurement_stays_present() {
    let records = vec![TonalRecord::new().with_nodes(vec![TfNode::new(1.0, 2.0).with_snr(f64::NAN)])];
    let decoded = decode(encode(&records)).unwrap();
    let snr = decoded[0].nodes[0].snr;
    assert!(snr.is_some_and(f64::is_nan));
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_projection_matches_full_records() {
    let records = mixed_records();
    let bytes = encode(&records);

    let full = decode(bytes.clone()).unwrap();
    let mut reader = TonalReader::new(Cursor::new(bytes)).unwrap();
    let contours = reader.time_frequency_contours().unwrap();

    assert_eq!(contours.len(), full.len());
    for (contour, record) in contours.iter().zip(&full) {
        assert_eq!(contour.len(), record.nodes.len());
        for ((time, freq), node) in contour.iter().zip(&record.nodes) {
            assert_eq!(time.to_bits(), node.time.to_bits());
            assert_eq!(freq.to_bits(), node.freq.to_bits());
        }
    }
}

#[test]
fn test_write_contours_round_trip() {
    let contours = vec![
        vec![(1.0, 1000.0), (1.01, 1010.0)],
        vec![],
        vec![(2.0, 2000.0)],
    ];
    let mut bytes = Vec::new();
    TonalWriter::new(&mut bytes).write_contours(&contours).unwrap();

    let mut reader = TonalReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.time_frequency_contours().unwrap(), contours);

    reader.rewind().unwrap();
    for record in reader.read_all().unwrap() {
        assert_eq!(record.species, None);
        assert_eq!(record.call, None);
        assert_eq!(record.graph_id, GRAPH_ID_NONE);
    }
}

// ============================================================================
// Header
// ============================================================================

#[test]
fn test_header_text_round_trip() {
    let config = WriterConfig {
        comment: Some("Palmyra 2007, analyst review pass 2".into()),
        timestamp: Some("2007-09-24T20:57:30Z".into()),
        user_version: 12,
    };
    let bytes = encode_with(&mixed_records(), config.clone());

    let mut reader = TonalReader::new(Cursor::new(bytes)).unwrap();
    let header = reader.header().clone();
    assert_eq!(header.comment, config.comment);
    assert_eq!(header.timestamp, config.timestamp);
    assert_eq!(header.user_version, 12);
    assert_eq!(header.header_size as usize, header.parsed_len());
    assert_eq!(reader.read_all().unwrap(), mixed_records());
}

#[test]
fn test_summary_over_round_trip() {
    let bytes = encode(&mixed_records());
    let mut reader = TonalReader::new(Cursor::new(bytes)).unwrap();
    reader.next_record().unwrap();

    // from_reader starts over regardless of the cursor
    let summary = AnnotationSummary::from_reader(&mut reader).unwrap();
    assert_eq!(summary.records, 4);
    assert_eq!(summary.nodes, 13);
    assert_eq!(summary.empty_records, 1);
    assert_eq!(summary.species.get("Balaenoptera musculus"), Some(&1));
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_file_round_trip() {
    let (path, _guard) = temp_path("tonals.bin");
    let records = mixed_records();

    let stats = write_tonals(&path, &records).unwrap();
    assert_eq!(stats.records, 4);
    assert_eq!(stats.bytes, std::fs::metadata(&path).unwrap().len());

    assert_eq!(read_tonals(&path).unwrap(), records);
    assert_eq!(
        read_contours(&path).unwrap(),
        records.iter().map(TonalRecord::contour).collect::<Vec<_>>()
    );
}

#[test]
fn test_file_contours_round_trip() {
    let (path, _guard) = temp_path("contours.bin");
    let contours = vec![vec![(3.0, 300.0), (3.5, 350.0)]];
    write_contours(&path, &contours).unwrap();
    assert_eq!(read_contours(&path).unwrap(), contours);
}

#[test]
fn test_builder_file_round_trip() {
    let (path, _guard) = temp_path("built.bin");
    WriterBuilder::new()
        .path(&path)
        .comment("built")
        .timestamp_now()
        .create()
        .unwrap()
        .write(&[blue_whale_call()])
        .unwrap();

    let reader = TonalReader::open(&path).unwrap();
    assert_eq!(reader.header().comment.as_deref(), Some("built"));
    assert!(reader.header().timestamp.is_some());
}
