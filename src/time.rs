use crate::schedule::SchedError;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Tolérance par défaut des tests de chevauchement (heures).
pub const DEFAULT_OVERLAP_TOLERANCE: f64 = 0.05;
/// Heure utilisée par [`ScheduleTime::parse_or_default`].
pub const DEFAULT_START_TIME: f64 = 8.0;
pub const MIN_DURATION: f64 = 0.5;
pub const MAX_DURATION: f64 = 8.0;

/// Jours ouvrables, ordre de la grille.
pub const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Heure de la journée en heures décimales (13.5 = 13:30).
///
/// Plage attendue : `[0, 24)`. L'affichage ramène une valeur négative à `0:00`.
///
/// Égalité et ordre se font sur la valeur numérique, quel que soit le mode
/// de construction (nombre ou chaîne `H:MM`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleTime(f64);

impl ScheduleTime {
    pub fn from_hours(hours: f64) -> Self {
        Self(hours)
    }

    pub fn hours(&self) -> f64 {
        self.0
    }

    pub fn hour(&self) -> u32 {
        self.split().0
    }

    pub fn minute(&self) -> u32 {
        self.split().1
    }

    /// Parsing permissif : journalise et retourne `8:00` si la chaîne est invalide.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.parse() {
            Ok(t) => t,
            Err(err) => {
                tracing::warn!(%err, default = DEFAULT_START_TIME, "falling back to default start time");
                Self(DEFAULT_START_TIME)
            }
        }
    }

    // valeurs négatives ramenées à 0:00
    fn split(&self) -> (u32, u32) {
        let value = self.0.max(0.0);
        let hour = value.floor();
        let minute = ((value - hour) * 60.0).round() as u32;
        if minute == 60 {
            (hour as u32 + 1, 0)
        } else {
            (hour as u32, minute)
        }
    }
}

impl Default for ScheduleTime {
    fn default() -> Self {
        Self(DEFAULT_START_TIME)
    }
}

impl PartialEq for ScheduleTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduleTime {}

impl PartialOrd for ScheduleTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduleTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hour, minute) = self.split();
        write!(f, "{hour}:{minute:02}")
    }
}

/// Format accepté : `[1-2]?\d:(00|15|30|45)`, heure 0..=23.
impl FromStr for ScheduleTime {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || SchedError::InvalidTimeFormat(raw.to_string());
        let (h, m) = raw.split_once(':').ok_or_else(invalid)?;

        let hb = h.as_bytes();
        let hour_ok = match hb {
            [d] => d.is_ascii_digit(),
            [t, d] => matches!(t, b'1' | b'2') && d.is_ascii_digit(),
            _ => false,
        };
        if !hour_ok {
            return Err(invalid());
        }
        let minute: u32 = match m {
            "00" => 0,
            "15" => 15,
            "30" => 30,
            "45" => 45,
            _ => return Err(invalid()),
        };
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        if hour > 23 {
            return Err(invalid());
        }
        Ok(Self(f64::from(hour) + f64::from(minute) / 60.0))
    }
}

impl Sub for ScheduleTime {
    type Output = f64;

    fn sub(self, rhs: Self) -> f64 {
        self.0 - rhs.0
    }
}

impl Add<f64> for ScheduleTime {
    type Output = ScheduleTime;

    fn add(self, rhs: f64) -> ScheduleTime {
        ScheduleTime(self.0 + rhs)
    }
}

/// Options d'alignement sur la grille
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOptions {
    pub round_to_minutes: u32,
    pub min_start_time: f64,
    pub max_end_time: f64,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            round_to_minutes: 30,
            min_start_time: 8.0,
            max_end_time: 18.0,
        }
    }
}

/// Créneau hebdomadaire : jour + début + durée.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    day: Weekday,
    start: ScheduleTime,
    duration: f64,
    #[serde(default = "default_movable")]
    movable: bool,
}

fn default_movable() -> bool {
    true
}

impl TimeSlot {
    /// Crée un créneau déplaçable en validant la durée.
    pub fn new(day: Weekday, start: ScheduleTime, duration: f64) -> Result<Self, SchedError> {
        validate_duration(duration)?;
        Ok(Self {
            day,
            start,
            duration,
            movable: true,
        })
    }

    /// Créneau fixe (engagement immuable, indisponibilité).
    pub fn fixed(day: Weekday, start: ScheduleTime, duration: f64) -> Result<Self, SchedError> {
        let mut slot = Self::new(day, start, duration)?;
        slot.movable = false;
        Ok(slot)
    }

    pub fn day(&self) -> Weekday {
        self.day
    }
    pub fn start(&self) -> ScheduleTime {
        self.start
    }
    pub fn duration(&self) -> f64 {
        self.duration
    }
    pub fn end(&self) -> f64 {
        self.start.hours() + self.duration
    }
    pub fn movable(&self) -> bool {
        self.movable
    }

    pub fn set_day(&mut self, day: Weekday) {
        self.day = day;
    }
    pub fn set_start(&mut self, start: ScheduleTime) {
        self.start = start;
    }
    pub fn set_movable(&mut self, movable: bool) {
        self.movable = movable;
    }

    pub fn set_duration(&mut self, duration: f64) -> Result<(), SchedError> {
        validate_duration(duration)?;
        self.duration = duration;
        Ok(())
    }

    /// Chevauchement avec la tolérance par défaut.
    pub fn conflicts_time(&self, other: &TimeSlot) -> bool {
        self.conflicts_time_within(other, DEFAULT_OVERLAP_TOLERANCE)
    }

    /// Même jour et `[start+delta, end-delta)` qui se recoupent.
    pub fn conflicts_time_within(&self, other: &TimeSlot, delta: f64) -> bool {
        if self.day != other.day {
            return false;
        }
        let (a_start, a_end) = (self.start.hours() + delta, self.end() - delta);
        let (b_start, b_end) = (other.start.hours() + delta, other.end() - delta);
        a_start < b_end && b_start < a_end
    }

    /// Aligne durée puis début sur la grille. Retourne `true` si le créneau a changé.
    pub fn snap_to_time(&mut self, opts: &SnapOptions) -> bool {
        if !self.movable {
            return false;
        }
        let duration = round_half_up(self.duration, MIN_DURATION).max(MIN_DURATION);

        let step = f64::from(opts.round_to_minutes.max(1)) / 60.0;
        let mut start = round_half_up(self.start.hours(), step);
        if start < opts.min_start_time {
            start = opts.min_start_time;
        }
        if start + duration > opts.max_end_time {
            start = opts.max_end_time - duration;
        }

        let changed = duration != self.duration || start != self.start.hours();
        self.duration = duration;
        self.start = ScheduleTime(start);
        changed
    }

    /// Arrondit un jour fractionnaire (0.0 = lundi) et le borne à `[min_day, max_day]`.
    /// Des bornes inversées sont permutées.
    pub fn snap_to_day(&mut self, fractional_day: f64, min_day: Weekday, max_day: Weekday) -> bool {
        if !self.movable {
            return false;
        }
        let (a, b) = (min_day.num_days_from_monday(), max_day.num_days_from_monday());
        let lo = f64::from(a.min(b));
        let hi = f64::from(a.max(b));
        let idx = (fractional_day + 0.5).floor().clamp(lo, hi) as u32;
        let day = day_from_index(idx).unwrap_or(min_day);
        let changed = day != self.day;
        self.day = day;
        changed
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            self.start,
            ScheduleTime(self.end())
        )
    }
}

/// Jour à partir de son rang (0 = lundi).
pub fn day_from_index(idx: u32) -> Option<Weekday> {
    Some(match idx {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        6 => Weekday::Sun,
        _ => return None,
    })
}

fn validate_duration(duration: f64) -> Result<(), SchedError> {
    if !duration.is_finite() || duration <= 0.0 || duration > MAX_DURATION {
        return Err(SchedError::InvalidDurationFormat(duration));
    }
    Ok(())
}

// milieu arrondi vers le haut
fn round_half_up(value: f64, step: f64) -> f64 {
    (value / step + 0.5).floor() * step
}
