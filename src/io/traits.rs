// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Traits shared by record producers and consumers.

use crate::{Result, TonalRecord};

/// Streaming iterator over decoded tonal records.
///
/// Consumers that only need records (rendering, dataset builders) can accept
/// any `impl TonalStream` instead of a concrete reader.
pub trait TonalStream: Iterator<Item = Result<TonalRecord>> {
    /// Project each record onto its `(time, freq)` contour.
    fn contours(self) -> Result<Vec<Vec<(f64, f64)>>>
    where
        Self: Sized,
    {
        self.map(|record| record.map(|r| r.contour())).collect()
    }
}

// Blanket implementation for any matching type
impl<T> TonalStream for T where T: Iterator<Item = Result<TonalRecord>> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodecError;

    #[test]
    fn test_contours_from_any_stream() {
        let records: Vec<Result<TonalRecord>> = vec![
            Ok(TonalRecord::from_contour(vec![(0.0, 1.0)])),
            Ok(TonalRecord::from_contour(vec![(2.0, 3.0), (2.1, 3.1)])),
        ];
        let contours = records.into_iter().contours().unwrap();
        assert_eq!(contours, vec![vec![(0.0, 1.0)], vec![(2.0, 3.0), (2.1, 3.1)]]);
    }

    #[test]
    fn test_contours_propagate_error() {
        let records: Vec<Result<TonalRecord>> = vec![
            Ok(TonalRecord::new()),
            Err(CodecError::corrupt(1, 2, 0, "truncated")),
        ];
        assert!(records.into_iter().contours().is_err());
    }
}
