use crate::resource::ResourceKind;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::path::PathBuf;
use thiserror::Error;

/// Ensemble de drapeaux de conflit porté par un bloc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ConflictType(u8);

impl ConflictType {
    pub const NONE: ConflictType = ConflictType(0);
    pub const TIME: ConflictType = ConflictType(1);
    pub const LUNCH: ConflictType = ConflictType(1 << 1);
    pub const MINIMUM_DAYS: ConflictType = ConflictType(1 << 2);
    pub const AVAILABILITY: ConflictType = ConflictType(1 << 3);
    pub const TIME_TEACHER: ConflictType = ConflictType(1 << 4);
    pub const TIME_LAB: ConflictType = ConflictType(1 << 5);
    pub const TIME_STREAM: ConflictType = ConflictType(1 << 6);

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Ignore les bits inconnus.
    pub fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0x7f)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: ConflictType) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(&self, other: ConflictType) -> bool {
        self.0 & other.0 != 0
    }

    /// Drapeau de chevauchement propre à un type de ressource.
    pub fn time_for(kind: ResourceKind) -> ConflictType {
        match kind {
            ResourceKind::Teacher => Self::TIME_TEACHER,
            ResourceKind::Lab => Self::TIME_LAB,
            ResourceKind::Stream => Self::TIME_STREAM,
        }
    }

    /// Drapeaux individuels présents, dans l'ordre des bits.
    pub fn iter(&self) -> impl Iterator<Item = ConflictType> + '_ {
        FLAGS
            .iter()
            .map(|(flag, _)| *flag)
            .filter(move |flag| self.contains(*flag))
    }

    /// Conflit le plus grave selon la vue (enseignant, local ou groupe) :
    /// `TIME_*` de la vue, puis `TIME`, `LUNCH`, `MINIMUM_DAYS`, `AVAILABILITY`.
    pub fn most_severe(&self, view: ResourceKind) -> Option<ConflictType> {
        [
            Self::time_for(view),
            Self::TIME,
            Self::LUNCH,
            Self::MINIMUM_DAYS,
            Self::AVAILABILITY,
        ]
        .into_iter()
        .find(|flag| self.contains(*flag))
    }

    /// Nom d'un drapeau simple ; `None` pour un ensemble.
    pub fn name(&self) -> Option<&'static str> {
        FLAGS
            .iter()
            .find(|(flag, _)| flag == self)
            .map(|(_, name)| *name)
    }

    pub fn colour(&self) -> &'static str {
        match *self {
            Self::TIME | Self::TIME_TEACHER | Self::TIME_LAB | Self::TIME_STREAM => "#FF0000",
            Self::LUNCH => "#FFA500",
            Self::MINIMUM_DAYS => "#FFD700",
            Self::AVAILABILITY => "#9370DB",
            _ => "#FFFFFF",
        }
    }

    pub fn description(&self) -> &'static str {
        match *self {
            Self::TIME => "time conflict",
            Self::TIME_TEACHER => "teacher double-booked",
            Self::TIME_LAB => "lab double-booked",
            Self::TIME_STREAM => "stream double-booked",
            Self::LUNCH => "no lunch break",
            Self::MINIMUM_DAYS => "too few teaching days",
            Self::AVAILABILITY => "weekly availability exceeded",
            Self::NONE => "no conflict",
            _ => "multiple conflicts",
        }
    }
}

static FLAGS: [(ConflictType, &str); 7] = [
    (ConflictType::TIME, "TIME"),
    (ConflictType::LUNCH, "LUNCH"),
    (ConflictType::MINIMUM_DAYS, "MINIMUM_DAYS"),
    (ConflictType::AVAILABILITY, "AVAILABILITY"),
    (ConflictType::TIME_TEACHER, "TIME_TEACHER"),
    (ConflictType::TIME_LAB, "TIME_LAB"),
    (ConflictType::TIME_STREAM, "TIME_STREAM"),
];

impl BitOr for ConflictType {
    type Output = ConflictType;
    fn bitor(self, rhs: Self) -> Self {
        ConflictType(self.0 | rhs.0)
    }
}

impl BitOrAssign for ConflictType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ConflictType {
    type Output = ConflictType;
    fn bitand(self, rhs: Self) -> Self {
        ConflictType(self.0 & rhs.0)
    }
}

/// `TIME|TIME_TEACHER`, ou `-` si vide.
impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        let names: Vec<&str> = self.iter().filter_map(|flag| flag.name()).collect();
        f.write_str(&names.join("|"))
    }
}

/// Seuils du moteur de conflits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictOptions {
    pub overlap_tolerance: f64,
    pub lunch_start: f64,
    pub lunch_end: f64,
    /// Trou minimal (heures) pour compter comme pause dîner.
    pub lunch_min_gap: f64,
    pub min_days: usize,
    pub max_availability_hours: f64,
    /// Pause retranchée de l'amplitude de chaque journée.
    pub assumed_break: f64,
}

impl Default for ConflictOptions {
    fn default() -> Self {
        Self {
            overlap_tolerance: crate::time::DEFAULT_OVERLAP_TOLERANCE,
            lunch_start: 11.0,
            lunch_end: 14.0,
            lunch_min_gap: 0.49,
            min_days: 4,
            max_availability_hours: 32.0,
            assumed_break: 0.5,
        }
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid hours for section: {0} (must be > 0)")]
    InvalidHoursForSection(f64),
    #[error("duplicate section number {number} in course {course}")]
    DuplicateSectionNumber { course: String, number: String },
    #[error("invalid time format: {0:?} (expected H:MM)")]
    InvalidTimeFormat(String),
    #[error("invalid duration: {0}")]
    InvalidDurationFormat(f64),
    #[error("unknown course: {0}")]
    UnknownCourse(String),
    #[error("unknown section: {0}")]
    UnknownSection(String),
    #[error("unknown block: {0}")]
    UnknownBlock(String),
    #[error("unknown teacher: {0}")]
    UnknownTeacher(String),
    #[error("unknown lab: {0}")]
    UnknownLab(String),
    #[error("unknown stream: {0}")]
    UnknownStream(String),
    #[error("could not read {}", .path.display())]
    CouldNotReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write {}", .path.display())]
    CouldNotWriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
