#![forbid(unsafe_code)]
use chrono::Weekday;
use horaire::{SchedError, ScheduleTime, SnapOptions, TimeSlot};

fn t(raw: &str) -> ScheduleTime {
    raw.parse().unwrap()
}

fn slot(day: Weekday, start: f64, duration: f64) -> TimeSlot {
    TimeSlot::new(day, ScheduleTime::from_hours(start), duration).unwrap()
}

#[test]
fn parse_and_format_times() {
    assert_eq!(t("13:30").hours(), 13.5);
    assert_eq!(t("8:15").hour(), 8);
    assert_eq!(t("8:15").minute(), 15);
    assert_eq!(ScheduleTime::from_hours(9.75).to_string(), "9:45");
    assert_eq!(ScheduleTime::from_hours(8.0).to_string(), "8:00");
}

#[test]
fn parse_format_parse_is_identity() {
    for hour in 0..24 {
        for minute in ["00", "15", "30", "45"] {
            let raw = format!("{hour}:{minute}");
            let parsed = t(&raw);
            assert_eq!(parsed.to_string(), raw);
            assert_eq!(t(&parsed.to_string()), parsed);
        }
    }
}

#[test]
fn equality_ignores_construction_path() {
    assert_eq!(t("14:45"), ScheduleTime::from_hours(14.75));
    assert!(t("9:00") < t("10:30"));
    assert_eq!(t("15:30") - t("13:00"), 2.5);
}

#[test]
fn rejects_malformed_times() {
    for raw in ["", "8", "8:10", "08:00", "31:00", "24:00", "ab:00", "12:5", "12:300"] {
        assert!(
            matches!(raw.parse::<ScheduleTime>(), Err(SchedError::InvalidTimeFormat(_))),
            "{raw:?} should be rejected"
        );
    }
}

#[test]
fn lenient_parse_falls_back_to_default() {
    assert_eq!(ScheduleTime::parse_or_default("nope"), ScheduleTime::from_hours(8.0));
    assert_eq!(ScheduleTime::parse_or_default("11:15"), ScheduleTime::from_hours(11.25));
}

#[test]
fn rejects_invalid_durations() {
    for d in [0.0, -1.0, 8.5, f64::NAN] {
        assert!(matches!(
            TimeSlot::new(Weekday::Mon, t("9:00"), d),
            Err(SchedError::InvalidDurationFormat(_))
        ));
    }
    let mut s = slot(Weekday::Mon, 9.0, 1.5);
    assert!(s.set_duration(0.0).is_err());
    assert_eq!(s.duration(), 1.5);
}

#[test]
fn overlap_is_symmetric_and_same_day_only() {
    let a = slot(Weekday::Mon, 13.0, 2.0);
    let b = slot(Weekday::Mon, 14.0, 2.0);
    let c = slot(Weekday::Tue, 14.0, 2.0);
    let d = slot(Weekday::Mon, 15.0, 1.0);

    assert!(a.conflicts_time(&b));
    assert!(b.conflicts_time(&a));
    assert!(!a.conflicts_time(&c));
    assert!(!c.conflicts_time(&a));
    // bord à bord : pas de conflit
    assert!(!a.conflicts_time(&d));
    assert!(!d.conflicts_time(&a));
}

#[test]
fn overlap_tolerates_small_jitter() {
    let a = slot(Weekday::Wed, 9.0, 2.0);
    let b = slot(Weekday::Wed, 10.96, 1.0);
    assert!(!a.conflicts_time(&b));
    assert!(a.conflicts_time_within(&b, 0.0));
}

#[test]
fn snap_rounds_duration_and_start() {
    let mut s = slot(Weekday::Mon, 9.2, 1.3);
    assert!(s.snap_to_time(&SnapOptions::default()));
    assert_eq!(s.duration(), 1.5);
    assert_eq!(s.start(), t("9:00"));

    // milieu : arrondi vers le haut
    let mut s = slot(Weekday::Mon, 9.25, 1.25);
    assert!(s.snap_to_time(&SnapOptions::default()));
    assert_eq!(s.start(), t("9:30"));
    assert_eq!(s.duration(), 1.5);
}

#[test]
fn snap_respects_day_bounds() {
    let mut early = slot(Weekday::Mon, 6.0, 2.0);
    assert!(early.snap_to_time(&SnapOptions::default()));
    assert_eq!(early.start(), t("8:00"));

    let mut late = slot(Weekday::Mon, 17.0, 3.0);
    assert!(late.snap_to_time(&SnapOptions::default()));
    assert_eq!(late.start(), t("15:00"));
    assert_eq!(late.end(), 18.0);
}

#[test]
fn snap_converges() {
    let opts = SnapOptions {
        round_to_minutes: 60,
        ..SnapOptions::default()
    };
    for (start, duration) in [(9.2, 1.3), (17.4, 1.5), (7.0, 0.2), (12.75, 3.25)] {
        let mut s = slot(Weekday::Thu, start, duration);
        s.snap_to_time(&opts);
        assert!(!s.snap_to_time(&opts), "second snap of {start}/{duration} changed");
    }
}

#[test]
fn snap_to_day_rounds_and_clamps() {
    let mut s = slot(Weekday::Mon, 9.0, 1.0);
    assert!(s.snap_to_day(2.4, Weekday::Mon, Weekday::Fri));
    assert_eq!(s.day(), Weekday::Wed);
    assert!(s.snap_to_day(2.5, Weekday::Mon, Weekday::Fri));
    assert_eq!(s.day(), Weekday::Thu);
    assert!(s.snap_to_day(6.2, Weekday::Mon, Weekday::Fri));
    assert_eq!(s.day(), Weekday::Fri);
    assert!(!s.snap_to_day(4.1, Weekday::Mon, Weekday::Fri));
    assert!(s.snap_to_day(-3.0, Weekday::Mon, Weekday::Fri));
    assert_eq!(s.day(), Weekday::Mon);
}

#[test]
fn fixed_slots_never_snap() {
    let mut s = TimeSlot::fixed(Weekday::Tue, ScheduleTime::from_hours(9.2), 1.3).unwrap();
    let before = s.clone();
    assert!(!s.snap_to_time(&SnapOptions::default()));
    assert!(!s.snap_to_day(3.0, Weekday::Mon, Weekday::Fri));
    assert_eq!(s, before);
}

#[test]
fn snap_to_day_accepts_reversed_bounds() {
    let mut s = slot(Weekday::Mon, 9.0, 1.0);
    assert!(s.snap_to_day(2.2, Weekday::Fri, Weekday::Mon));
    assert_eq!(s.day(), Weekday::Wed);
    s.snap_to_day(6.0, Weekday::Thu, Weekday::Tue);
    assert_eq!(s.day(), Weekday::Thu);
}

#[test]
fn negative_times_display_as_midnight() {
    assert_eq!(ScheduleTime::from_hours(-0.5).to_string(), "0:00");
    assert_eq!(ScheduleTime::from_hours(-0.5).hour(), 0);
    assert_eq!(ScheduleTime::from_hours(-0.5).minute(), 0);
}
