mod conflicts;
mod mutate;
mod queries;
mod types;
mod util;

pub use types::{ConflictOptions, ConflictType, SchedError};

use crate::ids::{BlockId, IdAllocator};
use crate::model::{Block, Course, Section};
use crate::resource::{Lab, Stream, Teacher};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Horaire complet : cours, ressources et liens de synchronisation.
///
/// Après toute mutation, appeler [`Schedule::calculate_conflicts`] avant de
/// lire l'état de conflit d'un bloc.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    ids: IdAllocator,
    #[serde(default)]
    courses: Vec<Course>,
    #[serde(default)]
    teachers: Vec<Teacher>,
    #[serde(default)]
    labs: Vec<Lab>,
    #[serde(default)]
    streams: Vec<Stream>,
    /// Arêtes symétriques, stockées `(min, max)`.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    syncs: BTreeSet<(BlockId, BlockId)>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstruit tous les drapeaux de conflit (seuils par défaut).
    pub fn calculate_conflicts(&mut self) {
        self.calculate_conflicts_with(&ConflictOptions::default());
    }

    pub fn calculate_conflicts_with(&mut self, opts: &ConflictOptions) {
        conflicts::calculate_conflicts(self, opts)
    }

    pub(crate) fn section_mut(&mut self, id: crate::ids::SectionId) -> Option<&mut Section> {
        self.courses.iter_mut().find_map(|c| c.section_mut(id))
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.courses
            .iter_mut()
            .flat_map(|c| c.sections_mut().iter_mut())
            .find_map(|s| s.block_mut(id))
    }

    pub(crate) fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> + '_ {
        self.courses
            .iter_mut()
            .flat_map(|c| c.sections_mut().iter_mut())
            .flat_map(|s| s.blocks_mut().iter_mut())
    }
}
