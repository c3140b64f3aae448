#![forbid(unsafe_code)]
//! Horaire — bibliothèque de construction d'horaires de cours.
//!
//! - Cours → sections → blocs, assignés à des enseignants, locaux et groupes.
//! - Placement manuel sur une grille hebdomadaire (heures décimales, lundi-vendredi).
//! - Détection de conflits recalculée intégralement après chaque changement.
//! - Stockage fichier (JSON), rapports CSV.

pub mod ids;
pub mod io;
pub mod model;
pub mod resource;
pub mod schedule;
pub mod storage;
pub mod time;

pub use ids::{BlockId, CourseId, IdAllocator, LabId, SectionId, StreamId, TeacherId};
pub use model::{Allocation, Block, Course, Section};
pub use resource::{Lab, Resource, ResourceKind, ResourceRef, Stream, Teacher};
pub use schedule::{ConflictOptions, ConflictType, SchedError, Schedule};
pub use storage::{JsonStorage, Storage};
pub use time::{ScheduleTime, SnapOptions, TimeSlot};
