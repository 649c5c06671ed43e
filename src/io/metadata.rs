// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! File-level metadata for annotation files.
//!
//! [`AnnotationSummary`] condenses a whole file (header fields, record and
//! node counts, time/frequency extent, species tally) for display and
//! reporting.

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use serde::Serialize;

use crate::io::formats::silbido::TonalReader;
use crate::{Result, TonalRecord};

/// Recognized on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileFormat {
    /// Silbido binary annotation file
    Silbido,
    /// JSON export of annotation records
    Json,
    /// Anything else
    Unknown,
}

impl FileFormat {
    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Silbido => "silbido",
            FileFormat::Json => "json",
            FileFormat::Unknown => "unknown",
        }
    }
}

/// Summary of an annotation file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotationSummary {
    /// Format version
    pub version: u16,
    /// Names of the header feature bits
    pub features: Vec<&'static str>,
    /// Header user version
    pub user_version: u16,
    /// Header comment
    pub comment: Option<String>,
    /// Header timestamp
    pub timestamp: Option<String>,
    /// Number of records
    pub records: u64,
    /// Number of nodes across all records
    pub nodes: u64,
    /// Records with no nodes
    pub empty_records: u64,
    /// Records linked to a detection graph
    pub graph_linked: u64,
    /// Earliest node time
    pub start_time: Option<f64>,
    /// Latest node time
    pub end_time: Option<f64>,
    /// Lowest node frequency
    pub min_freq: Option<f64>,
    /// Highest node frequency
    pub max_freq: Option<f64>,
    /// Record count per species label; unlabeled records are not counted
    pub species: BTreeMap<String, u64>,
}

impl AnnotationSummary {
    /// Scan every record of `reader` from the first record.
    ///
    /// The reader is rewound first and left at end of file.
    pub fn from_reader<R: Read + Seek>(reader: &mut TonalReader<R>) -> Result<Self> {
        reader.rewind()?;
        let header = reader.header();
        let mut summary = Self {
            version: header.version,
            features: header.feature_names(),
            user_version: header.user_version,
            comment: header.comment.clone(),
            timestamp: header.timestamp.clone(),
            ..Self::default()
        };
        while let Some(record) = reader.next_record()? {
            summary.add(&record);
        }
        Ok(summary)
    }

    /// Fold one record into the totals.
    pub fn add(&mut self, record: &TonalRecord) {
        self.records += 1;
        self.nodes += record.nodes.len() as u64;
        if record.is_empty() {
            self.empty_records += 1;
        }
        if record.has_graph() {
            self.graph_linked += 1;
        }
        if let Some(species) = &record.species {
            *self.species.entry(species.clone()).or_default() += 1;
        }
        for node in &record.nodes {
            self.start_time = Some(self.start_time.map_or(node.time, |t| t.min(node.time)));
            self.end_time = Some(self.end_time.map_or(node.time, |t| t.max(node.time)));
            self.min_freq = Some(self.min_freq.map_or(node.freq, |f| f.min(node.freq)));
            self.max_freq = Some(self.max_freq.map_or(node.freq, |f| f.max(node.freq)));
        }
    }

    /// Span between the earliest and latest node, in seconds.
    pub fn duration(&self) -> f64 {
        match (self.start_time, self.end_time) {
            (Some(s), Some(e)) if e > s => e - s,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TfNode, GRAPH_ID_NONE};

    #[test]
    fn test_summary_add() {
        let mut summary = AnnotationSummary::default();
        summary.add(
            &TonalRecord::new()
                .with_species("Tursiops truncatus")
                .with_graph_id(7)
                .with_nodes(vec![TfNode::new(3.0, 9000.0), TfNode::new(3.5, 12000.0)]),
        );
        summary.add(&TonalRecord::new().with_species("Tursiops truncatus"));
        summary.add(
            &TonalRecord::from_contour(vec![(1.0, 4000.0)]).with_graph_id(GRAPH_ID_NONE),
        );

        assert_eq!(summary.records, 3);
        assert_eq!(summary.nodes, 3);
        assert_eq!(summary.empty_records, 1);
        assert_eq!(summary.graph_linked, 1);
        assert_eq!(summary.start_time, Some(1.0));
        assert_eq!(summary.end_time, Some(3.5));
        assert_eq!(summary.min_freq, Some(4000.0));
        assert_eq!(summary.max_freq, Some(12000.0));
        assert_eq!(summary.duration(), 2.5);
        assert_eq!(summary.species.get("Tursiops truncatus"), Some(&2));
    }

    #[test]
    fn test_empty_summary() {
        let summary = AnnotationSummary::default();
        assert_eq!(summary.duration(), 0.0);
        assert!(summary.start_time.is_none());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(FileFormat::Silbido.as_str(), "silbido");
        assert_eq!(FileFormat::Json.as_str(), "json");
        assert_eq!(FileFormat::Unknown.as_str(), "unknown");
    }
}
