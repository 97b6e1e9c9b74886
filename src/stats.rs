use crate::document::TokenRecord;
use std::collections::HashMap;

/// Occurrences of each normalized form across the whole document.
pub fn form_tally(records: &[TokenRecord]) -> HashMap<String, usize> {
    let mut tally = HashMap::new();
    for record in records {
        *tally.entry(record.normalized_text.clone()).or_insert(0) += 1;
    }
    tally
}

/// Fill the per-document counters on a fully buffered record sequence.
///
/// Cumulative counts follow document order; the form total is only written
/// once every record has been tallied.
pub fn compute_running_stats(records: &mut [TokenRecord]) {
    let mut form_seen: HashMap<String, usize> = HashMap::new();
    let mut lemma_seen: HashMap<String, usize> = HashMap::new();

    for record in records.iter_mut() {
        let form = form_seen.entry(record.normalized_text.clone()).or_insert(0);
        *form += 1;
        record.form_cumulative_count = *form;

        let lemma = lemma_seen.entry(record.lemma.clone()).or_insert(0);
        *lemma += 1;
        record.lemma_cumulative_count = *lemma;
    }

    // form_seen now holds the final tally
    for record in records.iter_mut() {
        record.form_total_count = form_seen
            .get(&record.normalized_text)
            .copied()
            .unwrap_or(record.form_cumulative_count);
    }
}
