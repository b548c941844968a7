use std::collections::HashMap;

use crate::models::{FieldSignature, InteractionRecord};

/// Counts how many records carry each field signature.
///
/// Most frequent first; equal counts fall back to signature order so the
/// listing is stable between runs.
pub fn key_combinations(records: &[InteractionRecord]) -> Vec<(FieldSignature, usize)> {
    let mut counts: HashMap<FieldSignature, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.signature()).or_insert(0) += 1;
    }

    let mut combinations: Vec<(FieldSignature, usize)> = counts.into_iter().collect();
    combinations.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    combinations
}
