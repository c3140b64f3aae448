#![forbid(unsafe_code)]
use chrono::Weekday;
use horaire::{
    BlockId, ConflictOptions, ConflictType, ResourceKind, Schedule, ScheduleTime, SectionId,
    TeacherId, TimeSlot,
};

fn at(h: f64) -> ScheduleTime {
    ScheduleTime::from_hours(h)
}

struct Fixture {
    schedule: Schedule,
    teacher: TeacherId,
    section: SectionId,
}

fn fixture(release: f64) -> Fixture {
    let mut schedule = Schedule::new();
    let teacher = schedule.add_update_teacher("Jane", "Doe", release);
    let course = schedule.add_update_course("420-101", "Programmation I");
    let section = schedule.add_section(course, None, "").unwrap();
    Fixture {
        schedule,
        teacher,
        section,
    }
}

impl Fixture {
    fn block(&mut self, day: Weekday, start: f64, duration: f64) -> BlockId {
        let id = self
            .schedule
            .add_block(self.section, day, at(start), duration)
            .unwrap();
        self.schedule.assign_teacher(id, self.teacher).unwrap();
        id
    }

    fn conflicts(&self, id: BlockId) -> ConflictType {
        self.schedule.block(id).unwrap().conflicts()
    }

    /// Bloc de 1 h les jeudi et vendredi matin pour neutraliser la règle des jours.
    fn spread_week(&mut self) {
        self.block(Weekday::Thu, 8.0, 1.0);
        self.block(Weekday::Fri, 8.0, 1.0);
    }
}

#[test]
fn teacher_double_booking_sets_time_bits() {
    let mut f = fixture(0.0);
    let a = f.block(Weekday::Mon, 13.0, 2.0);
    let b = f.block(Weekday::Mon, 14.0, 2.0);
    let c = f.block(Weekday::Tue, 14.0, 2.0);
    f.schedule.calculate_conflicts();

    for id in [a, b] {
        let mask = f.conflicts(id);
        assert!(mask.contains(ConflictType::TIME | ConflictType::TIME_TEACHER));
        assert!(!mask.intersects(ConflictType::TIME_LAB | ConflictType::TIME_STREAM));
    }
    assert!(!f.conflicts(c).contains(ConflictType::TIME));
}

#[test]
fn lab_and_stream_double_booking_use_their_own_bits() {
    let mut s = Schedule::new();
    let lab = s.add_update_lab("B-201", "");
    let stream = s.add_update_stream("1A", "");
    let c1 = s.add_update_course("420-101", "Prog I");
    let c2 = s.add_update_course("201-101", "Maths");
    let s1 = s.add_section(c1, None, "").unwrap();
    let s2 = s.add_section(c2, None, "").unwrap();
    let a = s.add_block(s1, Weekday::Wed, at(9.0), 2.0).unwrap();
    let b = s.add_block(s2, Weekday::Wed, at(10.0), 2.0).unwrap();

    s.assign_lab(a, lab).unwrap();
    s.assign_lab(b, lab).unwrap();
    s.calculate_conflicts();
    assert_eq!(
        s.block(a).unwrap().conflicts(),
        ConflictType::TIME | ConflictType::TIME_LAB
    );

    s.unassign_lab(b, lab).unwrap();
    s.assign_stream(s1, stream).unwrap();
    s.assign_stream(s2, stream).unwrap();
    s.calculate_conflicts();
    assert_eq!(
        s.block(b).unwrap().conflicts(),
        ConflictType::TIME | ConflictType::TIME_STREAM
    );
}

#[test]
fn lab_unavailability_counts_as_booking() {
    let mut s = Schedule::new();
    let lab = s.add_update_lab("B-201", "");
    let course = s.add_update_course("420-101", "Prog I");
    let section = s.add_section(course, None, "").unwrap();
    let a = s.add_block(section, Weekday::Fri, at(13.0), 2.0).unwrap();
    s.assign_lab(a, lab).unwrap();
    s.set_lab_unavailable(lab, TimeSlot::new(Weekday::Fri, at(14.0), 3.0).unwrap())
        .unwrap();

    s.calculate_conflicts();
    assert!(s.block(a).unwrap().conflicts().contains(ConflictType::TIME_LAB));

    s.move_block(a, Weekday::Fri, at(9.0)).unwrap();
    s.calculate_conflicts();
    assert!(!s.block(a).unwrap().is_conflicted());
}

#[test]
fn too_few_days_sets_minimum_days() {
    let mut f = fixture(0.0);
    let a = f.block(Weekday::Mon, 8.0, 2.0);
    let b = f.block(Weekday::Tue, 8.0, 2.0);
    f.schedule.calculate_conflicts();
    assert_eq!(f.conflicts(a), ConflictType::MINIMUM_DAYS);
    assert_eq!(f.conflicts(b), ConflictType::MINIMUM_DAYS);

    f.spread_week();
    f.schedule.calculate_conflicts();
    assert!(f.conflicts(a).is_empty());
}

#[test]
fn released_teacher_skips_minimum_days() {
    let mut f = fixture(0.5);
    let a = f.block(Weekday::Mon, 8.0, 2.0);
    f.schedule.calculate_conflicts();
    assert!(f.conflicts(a).is_empty());
}

#[test]
fn full_day_without_gap_misses_lunch() {
    let mut f = fixture(0.0);
    f.block(Weekday::Tue, 8.0, 1.0);
    f.spread_week();
    let a = f.block(Weekday::Mon, 8.0, 8.0);
    f.schedule.calculate_conflicts();
    assert_eq!(f.conflicts(a), ConflictType::LUNCH);
}

#[test]
fn half_hour_gap_is_enough_for_lunch() {
    let mut f = fixture(0.0);
    f.block(Weekday::Tue, 8.0, 1.0);
    f.spread_week();
    let a = f.block(Weekday::Mon, 8.0, 4.0);
    let b = f.block(Weekday::Mon, 12.5, 3.5);
    f.schedule.calculate_conflicts();
    assert!(f.conflicts(a).is_empty());
    assert!(f.conflicts(b).is_empty());
}

#[test]
fn lunch_marks_every_block_of_the_day() {
    let mut f = fixture(0.0);
    f.block(Weekday::Tue, 8.0, 1.0);
    f.spread_week();
    let early = f.block(Weekday::Mon, 8.0, 1.0);
    let a = f.block(Weekday::Mon, 11.0, 1.5);
    let b = f.block(Weekday::Mon, 12.5, 1.5);
    f.schedule.calculate_conflicts();
    for id in [early, a, b] {
        assert!(f.conflicts(id).contains(ConflictType::LUNCH));
    }
}

#[test]
fn availability_ceiling_sums_daily_spans() {
    let mut f = fixture(0.0);
    // 5 jours de 8:00 à 15:00 : 5 * (7 - 0.5) = 32.5 h
    let ids: Vec<BlockId> = horaire::time::WEEKDAYS
        .iter()
        .flat_map(|&day| [f.block(day, 8.0, 3.0), f.block(day, 12.0, 3.0)])
        .collect();
    f.schedule.calculate_conflicts();
    for id in &ids {
        assert_eq!(f.conflicts(*id), ConflictType::AVAILABILITY);
    }

    let relaxed = ConflictOptions {
        max_availability_hours: 32.5,
        ..ConflictOptions::default()
    };
    f.schedule.calculate_conflicts_with(&relaxed);
    assert!(f.conflicts(ids[0]).is_empty());
}

#[test]
fn recalculation_is_idempotent_and_clears_stale_flags() {
    let mut f = fixture(0.0);
    let a = f.block(Weekday::Mon, 13.0, 2.0);
    let b = f.block(Weekday::Mon, 14.0, 2.0);
    f.schedule.calculate_conflicts();
    let first: Vec<ConflictType> = f.schedule.blocks().map(|b| b.conflicts()).collect();
    f.schedule.calculate_conflicts();
    let second: Vec<ConflictType> = f.schedule.blocks().map(|b| b.conflicts()).collect();
    assert_eq!(first, second);

    f.schedule.move_block(b, Weekday::Mon, at(15.0)).unwrap();
    f.schedule.calculate_conflicts();
    assert!(!f.conflicts(a).contains(ConflictType::TIME));
}

#[test]
fn most_severe_depends_on_view() {
    let mask = ConflictType::TIME
        | ConflictType::TIME_LAB
        | ConflictType::LUNCH
        | ConflictType::AVAILABILITY;
    assert_eq!(mask.most_severe(ResourceKind::Lab), Some(ConflictType::TIME_LAB));
    assert_eq!(mask.most_severe(ResourceKind::Teacher), Some(ConflictType::TIME));

    let soft = ConflictType::MINIMUM_DAYS | ConflictType::AVAILABILITY;
    assert_eq!(soft.most_severe(ResourceKind::Stream), Some(ConflictType::MINIMUM_DAYS));
    assert_eq!(ConflictType::NONE.most_severe(ResourceKind::Teacher), None);
}

#[test]
fn conflict_flags_render_names_and_colours() {
    let mask = ConflictType::TIME | ConflictType::TIME_TEACHER;
    assert_eq!(mask.to_string(), "TIME|TIME_TEACHER");
    assert_eq!(ConflictType::NONE.to_string(), "-");
    assert_eq!(ConflictType::LUNCH.name(), Some("LUNCH"));
    assert_eq!(mask.name(), None);
    assert_eq!(ConflictType::TIME_TEACHER.colour(), "#FF0000");
    assert_eq!(ConflictType::AVAILABILITY.description(), "weekly availability exceeded");
    assert_eq!(ConflictType::from_bits_truncate(0xff).iter().count(), 7);
}

#[test]
fn weekend_blocks_are_ignored_by_conflict_rules() {
    let mut f = fixture(0.0);
    let mon = f.block(Weekday::Mon, 8.0, 1.0);
    f.block(Weekday::Tue, 8.0, 1.0);
    let sat = f.block(Weekday::Sat, 8.0, 1.0);
    let sat_overlap = f.block(Weekday::Sat, 8.5, 1.0);
    f.block(Weekday::Sun, 8.0, 1.0);
    f.schedule.calculate_conflicts();

    assert_eq!(f.conflicts(mon), ConflictType::MINIMUM_DAYS);
    assert!(f.conflicts(sat).is_empty());
    assert!(f.conflicts(sat_overlap).is_empty());
}

#[test]
fn lunch_gap_of_049_hours_is_enough() {
    let mut f = fixture(0.0);
    f.block(Weekday::Tue, 8.0, 1.0);
    f.spread_week();
    let a = f.block(Weekday::Mon, 8.0, 3.0);
    let b = f.block(Weekday::Mon, 11.49, 2.51);
    f.schedule.calculate_conflicts();
    assert!(f.conflicts(a).is_empty());
    assert!(f.conflicts(b).is_empty());
}

#[test]
fn lunch_gap_of_045_hours_is_too_short() {
    let mut f = fixture(0.0);
    f.block(Weekday::Tue, 8.0, 1.0);
    f.spread_week();
    let a = f.block(Weekday::Mon, 8.0, 3.0);
    let b = f.block(Weekday::Mon, 11.45, 2.55);
    f.schedule.calculate_conflicts();
    assert_eq!(f.conflicts(a), ConflictType::LUNCH);
    assert_eq!(f.conflicts(b), ConflictType::LUNCH);
}

#[test]
fn off_grid_lunch_gap_counts() {
    let mut f = fixture(0.0);
    f.block(Weekday::Tue, 8.0, 1.0);
    f.spread_week();
    // libre de 11:15 à 11:45
    let a = f.block(Weekday::Mon, 8.0, 3.25);
    let b = f.block(Weekday::Mon, 11.75, 2.25);
    f.schedule.calculate_conflicts();
    assert!(f.conflicts(a).is_empty());
    assert!(f.conflicts(b).is_empty());
}

#[test]
fn days_outside_lunch_window_never_get_lunch() {
    let mut f = fixture(0.0);
    f.block(Weekday::Tue, 8.0, 1.0);
    f.spread_week();
    let a = f.block(Weekday::Mon, 8.0, 3.0);
    let b = f.block(Weekday::Mon, 14.0, 4.0);
    f.schedule.calculate_conflicts();
    assert!(!f.conflicts(a).contains(ConflictType::LUNCH));
    assert!(!f.conflicts(b).contains(ConflictType::LUNCH));
}
