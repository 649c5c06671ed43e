// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! In-memory tonal annotation types.
//!
//! A [`TonalRecord`] is one detected whistle or moan: classification metadata
//! plus the ordered contour of [`TfNode`] samples tracing it through
//! time-frequency space. These types are independent of the byte layout and
//! are what rendering, dataset and analysis code consume.

use serde::{Deserialize, Serialize};

/// Graph id meaning "not associated with any detection graph".
pub const GRAPH_ID_NONE: u64 = u64::MAX;

/// One sample along a tonal's contour.
///
/// `snr` and `phase` are `None` when the measurement was not recorded. They
/// are never defaulted to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TfNode {
    /// Time in seconds
    #[serde(with = "json_float")]
    pub time: f64,
    /// Frequency in hertz
    #[serde(with = "json_float")]
    pub freq: f64,
    /// Signal-to-noise measure, if recorded
    #[serde(default, with = "json_float::option")]
    pub snr: Option<f64>,
    /// Phase measure, if recorded
    #[serde(default, with = "json_float::option")]
    pub phase: Option<f64>,
    /// Whether the node lies on a spectral ridge
    #[serde(default)]
    pub ridge: bool,
}

impl TfNode {
    /// Create a node with only time and frequency.
    pub fn new(time: f64, freq: f64) -> Self {
        Self {
            time,
            freq,
            snr: None,
            phase: None,
            ridge: false,
        }
    }

    /// Set the signal-to-noise measure.
    pub fn with_snr(mut self, snr: f64) -> Self {
        self.snr = Some(snr);
        self
    }

    /// Set the phase measure.
    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Set the ridge flag.
    pub fn with_ridge(mut self, ridge: bool) -> Self {
        self.ridge = ridge;
        self
    }

    /// The `(time, freq)` pair of this node.
    #[inline]
    pub fn point(&self) -> (f64, f64) {
        (self.time, self.freq)
    }
}

impl From<(f64, f64)> for TfNode {
    fn from((time, freq): (f64, f64)) -> Self {
        TfNode::new(time, freq)
    }
}

/// One tonal annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TonalRecord {
    /// Species label (scientific name), if any
    #[serde(default)]
    pub species: Option<String>,
    /// Call-type code, if any
    #[serde(default)]
    pub call: Option<String>,
    /// Detection graph id; [`GRAPH_ID_NONE`] when unassociated
    #[serde(default = "default_graph_id")]
    pub graph_id: u64,
    /// Detector confidence (opaque to the codec)
    #[serde(default, with = "json_float")]
    pub confidence: f64,
    /// Detector score (opaque to the codec)
    #[serde(default, with = "json_float")]
    pub score: f64,
    /// Contour samples in order
    #[serde(default)]
    pub nodes: Vec<TfNode>,
}

fn default_graph_id() -> u64 {
    GRAPH_ID_NONE
}

/// Serde helpers for floats that may be non-finite.
///
/// JSON numbers cannot hold NaN or the infinities, and `serde_json` would
/// write them as `null`. Finite values stay plain numbers; the others are
/// written as the strings `"NaN"`, `"inf"` and `"-inf"`.
mod json_float {
    use std::fmt;

    use serde::de::{self, Deserializer, Visitor};
    use serde::{Deserialize, Serialize, Serializer};

    struct JsonFloat(f64);

    impl Serialize for JsonFloat {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let v = self.0;
            if v.is_finite() {
                serializer.serialize_f64(v)
            } else if v.is_nan() {
                serializer.serialize_str("NaN")
            } else if v > 0.0 {
                serializer.serialize_str("inf")
            } else {
                serializer.serialize_str("-inf")
            }
        }
    }

    struct JsonFloatVisitor;

    impl Visitor<'_> for JsonFloatVisitor {
        type Value = JsonFloat;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or one of \"NaN\", \"inf\", \"-inf\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<JsonFloat, E> {
            Ok(JsonFloat(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<JsonFloat, E> {
            Ok(JsonFloat(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<JsonFloat, E> {
            Ok(JsonFloat(v as f64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<JsonFloat, E> {
            match v {
                "NaN" => Ok(JsonFloat(f64::NAN)),
                "inf" => Ok(JsonFloat(f64::INFINITY)),
                "-inf" => Ok(JsonFloat(f64::NEG_INFINITY)),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }

    impl<'de> Deserialize<'de> for JsonFloat {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(JsonFloatVisitor)
        }
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        JsonFloat(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        JsonFloat::deserialize(deserializer).map(|f| f.0)
    }

    pub mod option {
        use super::JsonFloat;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<f64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            value.map(JsonFloat).serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<f64>, D::Error> {
            Ok(Option::<JsonFloat>::deserialize(deserializer)?.map(|f| f.0))
        }
    }
}

impl Default for TonalRecord {
    fn default() -> Self {
        Self {
            species: None,
            call: None,
            graph_id: GRAPH_ID_NONE,
            confidence: 0.0,
            score: 0.0,
            nodes: Vec::new(),
        }
    }
}

impl TonalRecord {
    /// Create an empty record with no metadata and no graph association.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a geometry-only record from `(time, freq)` pairs.
    pub fn from_contour<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self {
            nodes: points.into_iter().map(TfNode::from).collect(),
            ..Self::default()
        }
    }

    /// Set the species label.
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    /// Set the call-type label.
    pub fn with_call(mut self, call: impl Into<String>) -> Self {
        self.call = Some(call.into());
        self
    }

    /// Set the graph id.
    pub fn with_graph_id(mut self, graph_id: u64) -> Self {
        self.graph_id = graph_id;
        self
    }

    /// Set the confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Replace the node sequence.
    pub fn with_nodes(mut self, nodes: Vec<TfNode>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Append a node to the contour.
    pub fn push_node(&mut self, node: TfNode) {
        self.nodes.push(node);
    }

    /// Number of contour nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the contour has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether this tonal is linked to a detection graph.
    pub fn has_graph(&self) -> bool {
        self.graph_id != GRAPH_ID_NONE
    }

    /// Whether any node carries a signal-to-noise value.
    pub fn has_snr(&self) -> bool {
        self.nodes.iter().any(|n| n.snr.is_some())
    }

    /// Whether any node carries a phase value.
    pub fn has_phase(&self) -> bool {
        self.nodes.iter().any(|n| n.phase.is_some())
    }

    /// The contour as ordered `(time, freq)` pairs, without metadata.
    pub fn contour(&self) -> Vec<(f64, f64)> {
        self.nodes.iter().map(TfNode::point).collect()
    }

    /// Time of the first node.
    pub fn start_time(&self) -> Option<f64> {
        self.nodes.first().map(|n| n.time)
    }

    /// Time of the last node.
    pub fn end_time(&self) -> Option<f64> {
        self.nodes.last().map(|n| n.time)
    }

    /// Time between first and last node, 0.0 for fewer than two nodes.
    pub fn duration(&self) -> f64 {
        match (self.start_time(), self.end_time()) {
            (Some(s), Some(e)) => e - s,
            _ => 0.0,
        }
    }

    /// Lowest frequency on the contour.
    pub fn min_freq(&self) -> Option<f64> {
        self.nodes.iter().map(|n| n.freq).reduce(f64::min)
    }

    /// Highest frequency on the contour.
    pub fn max_freq(&self) -> Option<f64> {
        self.nodes.iter().map(|n| n.freq).reduce(f64::max)
    }
}
