use super::{util, ConflictOptions, ConflictType, Schedule};
use crate::ids::BlockId;
use crate::model::Block;
use crate::resource::{ResourceKind, Teacher};
use crate::time::TimeSlot;
use std::collections::{BTreeMap, BTreeSet};

type Marks = BTreeMap<BlockId, ConflictType>;

/// Reconstruction complète : efface tous les drapeaux puis rejoue chaque règle.
pub(super) fn calculate_conflicts(schedule: &mut Schedule, opts: &ConflictOptions) {
    for block in schedule.blocks_mut() {
        block.clear_conflicts();
    }

    let marks = collect_marks(schedule, opts);

    let mut flagged = 0usize;
    for block in schedule.blocks_mut() {
        if let Some(kind) = marks.get(&block.id) {
            block.add_conflict(*kind);
            flagged += 1;
        }
    }
    tracing::debug!(flagged, "conflicts recalculated");
}

/// Seuls les jours ouvrables comptent ; les blocs du samedi et du dimanche sont ignorés.
fn collect_marks(schedule: &Schedule, opts: &ConflictOptions) -> Marks {
    let mut marks = Marks::new();

    for teacher in &schedule.teachers {
        let blocks = util::weekdays_only(schedule.blocks_for_teacher(teacher.id));
        time_conflicts(&blocks, ResourceKind::Teacher, &[], opts, &mut marks);
        lunch_conflicts(&blocks, opts, &mut marks);
        minimum_days_conflicts(teacher, &blocks, opts, &mut marks);
        availability_conflicts(&blocks, opts, &mut marks);
    }

    for stream in &schedule.streams {
        let blocks = util::weekdays_only(schedule.blocks_for_stream(stream.id));
        time_conflicts(&blocks, ResourceKind::Stream, &[], opts, &mut marks);
    }

    for lab in &schedule.labs {
        let blocks = util::weekdays_only(schedule.blocks_for_lab(lab.id));
        time_conflicts(&blocks, ResourceKind::Lab, &lab.unavailable, opts, &mut marks);
    }

    marks
}

fn mark(marks: &mut Marks, block: &Block, kind: ConflictType) {
    *marks.entry(block.id).or_default() |= kind;
}

/// Paires de blocs qui se chevauchent, jour par jour, pour une ressource.
/// Les plages indisponibles (locaux) comptent comme des réservations.
fn time_conflicts(
    blocks: &[&Block],
    kind: ResourceKind,
    unavailable: &[TimeSlot],
    opts: &ConflictOptions,
    marks: &mut Marks,
) {
    let flag = ConflictType::TIME | ConflictType::time_for(kind);

    for day_blocks in util::group_by_day(blocks).values() {
        for (idx, a) in day_blocks.iter().enumerate() {
            for b in day_blocks.iter().skip(idx + 1) {
                if a.slot().conflicts_time_within(b.slot(), opts.overlap_tolerance) {
                    mark(marks, a, flag);
                    mark(marks, b, flag);
                }
            }
            if unavailable
                .iter()
                .any(|slot| a.slot().conflicts_time_within(slot, opts.overlap_tolerance))
            {
                mark(marks, a, flag);
            }
        }
    }
}

/// Chaque jour touchant la plage du dîner doit y laisser un trou libre.
fn lunch_conflicts(blocks: &[&Block], opts: &ConflictOptions, marks: &mut Marks) {
    for day_blocks in util::group_by_day(blocks).values() {
        let lunch: Vec<(f64, f64)> = day_blocks
            .iter()
            .filter(|b| util::overlaps(b.start().hours(), b.end(), opts.lunch_start, opts.lunch_end))
            .map(|b| (b.start().hours(), b.end()))
            .collect();
        if lunch.is_empty() {
            continue;
        }
        if !util::has_free_gap(&lunch, opts.lunch_start, opts.lunch_end, opts.lunch_min_gap) {
            for block in day_blocks {
                mark(marks, block, ConflictType::LUNCH);
            }
        }
    }
}

/// Enseignant à tâche complète présent moins de `min_days` jours.
fn minimum_days_conflicts(
    teacher: &Teacher,
    blocks: &[&Block],
    opts: &ConflictOptions,
    marks: &mut Marks,
) {
    if teacher.release != 0.0 || blocks.is_empty() {
        return;
    }
    let days: BTreeSet<u32> = blocks
        .iter()
        .map(|b| b.day().num_days_from_monday())
        .collect();
    if days.len() < opts.min_days {
        for block in blocks {
            mark(marks, block, ConflictType::MINIMUM_DAYS);
        }
    }
}

/// Somme des amplitudes quotidiennes (moins une pause) au-delà du plafond hebdomadaire.
fn availability_conflicts(blocks: &[&Block], opts: &ConflictOptions, marks: &mut Marks) {
    let total: f64 = util::group_by_day(blocks)
        .values()
        .map(|day_blocks| {
            let first = day_blocks
                .iter()
                .map(|b| b.start().hours())
                .fold(f64::INFINITY, f64::min);
            let last = day_blocks
                .iter()
                .map(|b| b.end())
                .fold(f64::NEG_INFINITY, f64::max);
            last - first - opts.assumed_break
        })
        .sum();

    if total > opts.max_availability_hours {
        for block in blocks {
            mark(marks, block, ConflictType::AVAILABILITY);
        }
    }
}
