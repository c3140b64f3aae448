use crate::model::Block;
use crate::time::WEEKDAYS;
use std::collections::BTreeMap;

pub(super) fn weekdays_only(blocks: Vec<&Block>) -> Vec<&Block> {
    blocks
        .into_iter()
        .filter(|b| WEEKDAYS.contains(&b.day()))
        .collect()
}

/// Regroupe les blocs par jour (0 = lundi).
pub(super) fn group_by_day<'a>(blocks: &[&'a Block]) -> BTreeMap<u32, Vec<&'a Block>> {
    let mut out: BTreeMap<u32, Vec<&'a Block>> = BTreeMap::new();
    for &block in blocks {
        out.entry(block.day().num_days_from_monday())
            .or_default()
            .push(block);
    }
    out
}

pub(super) fn overlaps(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    a_start < b_end && b_start < a_end
}

/// Vrai s'il reste dans `[window_start, window_end)` un trou libre d'au moins `min_gap`.
pub(super) fn has_free_gap(
    intervals: &[(f64, f64)],
    window_start: f64,
    window_end: f64,
    min_gap: f64,
) -> bool {
    let mut sorted: Vec<(f64, f64)> = intervals
        .iter()
        .map(|&(s, e)| (s.max(window_start), e.min(window_end)))
        .filter(|(s, e)| s < e)
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut cursor = window_start;
    for (start, end) in sorted {
        if start - cursor >= min_gap {
            return true;
        }
        cursor = cursor.max(end);
    }
    window_end - cursor >= min_gap
}
