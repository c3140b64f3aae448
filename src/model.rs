use crate::ids::{BlockId, CourseId, IdAllocator, LabId, SectionId, StreamId, TeacherId};
use crate::schedule::{ConflictType, SchedError};
use crate::time::{ScheduleTime, SnapOptions, TimeSlot};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Bloc d'enseignement : l'unité placée sur la grille.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    /// Section propriétaire (référence arrière).
    pub section: SectionId,
    slot: TimeSlot,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    teachers: BTreeSet<TeacherId>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    labs: BTreeSet<LabId>,
    /// État dérivé, recalculé par le moteur de conflits.
    #[serde(skip)]
    conflicts: ConflictType,
}

impl Block {
    pub(crate) fn new(id: BlockId, section: SectionId, slot: TimeSlot) -> Self {
        Self {
            id,
            section,
            slot,
            teachers: BTreeSet::new(),
            labs: BTreeSet::new(),
            conflicts: ConflictType::NONE,
        }
    }

    pub fn slot(&self) -> &TimeSlot {
        &self.slot
    }
    pub fn day(&self) -> Weekday {
        self.slot.day()
    }
    pub fn start(&self) -> ScheduleTime {
        self.slot.start()
    }
    pub fn duration(&self) -> f64 {
        self.slot.duration()
    }
    pub fn end(&self) -> f64 {
        self.slot.end()
    }
    pub fn movable(&self) -> bool {
        self.slot.movable()
    }

    pub fn set_movable(&mut self, movable: bool) {
        self.slot.set_movable(movable);
    }

    pub fn set_duration(&mut self, duration: f64) -> Result<(), SchedError> {
        self.slot.set_duration(duration)
    }

    /// Déplace ce bloc seulement ; la propagation aux blocs synchronisés
    /// passe par `Schedule::move_block`.
    pub fn move_to(&mut self, day: Weekday, start: ScheduleTime) {
        self.slot.set_day(day);
        self.slot.set_start(start);
    }

    pub fn snap(&mut self, opts: &SnapOptions) -> bool {
        self.slot.snap_to_time(opts)
    }

    pub fn snap_to_day(&mut self, fractional_day: f64) -> bool {
        self.slot
            .snap_to_day(fractional_day, Weekday::Mon, Weekday::Fri)
    }

    pub fn teachers(&self) -> impl Iterator<Item = TeacherId> + '_ {
        self.teachers.iter().copied()
    }
    pub fn add_teacher(&mut self, teacher: TeacherId) {
        self.teachers.insert(teacher);
    }
    pub fn remove_teacher(&mut self, teacher: TeacherId) {
        self.teachers.remove(&teacher);
    }
    pub fn has_teacher(&self, teacher: TeacherId) -> bool {
        self.teachers.contains(&teacher)
    }

    pub fn labs(&self) -> impl Iterator<Item = LabId> + '_ {
        self.labs.iter().copied()
    }
    pub fn add_lab(&mut self, lab: LabId) {
        self.labs.insert(lab);
    }
    pub fn remove_lab(&mut self, lab: LabId) {
        self.labs.remove(&lab);
    }
    pub fn has_lab(&self, lab: LabId) -> bool {
        self.labs.contains(&lab)
    }

    pub fn conflicts(&self) -> ConflictType {
        self.conflicts
    }
    pub fn is_conflicted(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub(crate) fn clear_conflicts(&mut self) {
        self.conflicts = ConflictType::NONE;
    }
    pub(crate) fn add_conflict(&mut self, kind: ConflictType) {
        self.conflicts |= kind;
    }
}

/// Heures d'un enseignant dans une section (charge de travail).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub teacher: TeacherId,
    pub hours: f64,
}

/// Section (groupe-cours) : possède ses blocs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub course: CourseId,
    pub number: String,
    #[serde(default)]
    pub name: String,
    hours: f64,
    #[serde(default)]
    blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    streams: BTreeSet<StreamId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    allocations: Vec<Allocation>,
}

impl Section {
    pub const DEFAULT_HOURS: f64 = 3.0;

    pub(crate) fn new(id: SectionId, course: CourseId, number: String, name: String) -> Self {
        Self {
            id,
            course,
            number,
            name,
            hours: Self::DEFAULT_HOURS,
            blocks: Vec::new(),
            streams: BTreeSet::new(),
            allocations: Vec::new(),
        }
    }

    /// Heures/semaine : somme des durées dès qu'un bloc existe.
    pub fn hours(&self) -> f64 {
        if self.blocks.is_empty() {
            self.hours
        } else {
            self.blocks.iter().map(Block::duration).sum()
        }
    }

    /// Sans effet si la section a déjà des blocs (valeur dérivée).
    pub fn set_hours(&mut self, hours: f64) -> Result<(), SchedError> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(SchedError::InvalidHoursForSection(hours));
        }
        if !self.blocks.is_empty() {
            tracing::debug!(section = %self.id, requested = hours, derived = self.hours(), "section hours derived from blocks");
            return Ok(());
        }
        self.hours = hours;
        Ok(())
    }

    /// Crée un bloc dans cette section.
    pub fn add_block(&mut self, ids: &mut IdAllocator, slot: TimeSlot) -> BlockId {
        let id: BlockId = ids.allocate();
        self.blocks.push(Block::new(id, self.id, slot));
        id
    }

    pub fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let pos = self.blocks.iter().position(|b| b.id == id)?;
        Some(self.blocks.remove(pos))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Ajoute l'enseignant à tous les blocs ; allocation par défaut = heures de la section.
    pub fn add_teacher(&mut self, teacher: TeacherId) {
        for block in &mut self.blocks {
            block.add_teacher(teacher);
        }
        if self.teacher_allocation(teacher).is_none() {
            let hours = self.hours();
            self.allocations.push(Allocation { teacher, hours });
        }
    }

    /// Une allocation nulle retire l'enseignant (équivalent à `remove_teacher`).
    pub fn set_teacher_allocation(&mut self, teacher: TeacherId, hours: f64) -> Result<(), SchedError> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(SchedError::InvalidHoursForSection(hours));
        }
        if hours == 0.0 {
            self.remove_teacher(teacher);
            return Ok(());
        }
        self.add_teacher(teacher);
        if let Some(alloc) = self.allocations.iter_mut().find(|a| a.teacher == teacher) {
            alloc.hours = hours;
        }
        Ok(())
    }

    pub fn teacher_allocation(&self, teacher: TeacherId) -> Option<f64> {
        self.allocations
            .iter()
            .find(|a| a.teacher == teacher)
            .map(|a| a.hours)
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    pub fn remove_teacher(&mut self, teacher: TeacherId) {
        for block in &mut self.blocks {
            block.remove_teacher(teacher);
        }
        self.allocations.retain(|a| a.teacher != teacher);
    }

    pub fn has_teacher(&self, teacher: TeacherId) -> bool {
        self.teacher_allocation(teacher).is_some()
            || self.blocks.iter().any(|b| b.has_teacher(teacher))
    }

    /// Enseignants alloués ou présents sur un bloc, triés.
    pub fn teachers(&self) -> BTreeSet<TeacherId> {
        self.allocations
            .iter()
            .map(|a| a.teacher)
            .chain(self.blocks.iter().flat_map(|b| b.teachers()))
            .collect()
    }

    pub fn add_lab(&mut self, lab: LabId) {
        for block in &mut self.blocks {
            block.add_lab(lab);
        }
    }
    pub fn remove_lab(&mut self, lab: LabId) {
        for block in &mut self.blocks {
            block.remove_lab(lab);
        }
    }
    pub fn has_lab(&self, lab: LabId) -> bool {
        self.blocks.iter().any(|b| b.has_lab(lab))
    }

    pub fn streams(&self) -> impl Iterator<Item = StreamId> + '_ {
        self.streams.iter().copied()
    }
    pub fn add_stream(&mut self, stream: StreamId) {
        self.streams.insert(stream);
    }
    pub fn remove_stream(&mut self, stream: StreamId) {
        self.streams.remove(&stream);
    }
    pub fn has_stream(&self, stream: StreamId) -> bool {
        self.streams.contains(&stream)
    }
}

/// Cours : possède ses sections, numérotées de façon unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub number: String,
    pub name: String,
    #[serde(default)]
    sections: Vec<Section>,
}

impl Course {
    pub fn new<N: Into<String>, D: Into<String>>(id: CourseId, number: N, name: D) -> Self {
        Self {
            id,
            number: number.into(),
            name: name.into(),
            sections: Vec::new(),
        }
    }

    /// Sans numéro fourni, prend le plus petit entier positif libre.
    pub fn add_section(
        &mut self,
        ids: &mut IdAllocator,
        number: Option<&str>,
        name: &str,
    ) -> Result<SectionId, SchedError> {
        let number = match number.map(str::trim) {
            Some(n) if !n.is_empty() => {
                if self.section_by_number(n).is_some() {
                    return Err(SchedError::DuplicateSectionNumber {
                        course: self.number.clone(),
                        number: n.to_string(),
                    });
                }
                n.to_string()
            }
            _ => self.next_section_number(),
        };
        let id: SectionId = ids.allocate();
        self.sections
            .push(Section::new(id, self.id, number, name.to_string()));
        Ok(id)
    }

    fn next_section_number(&self) -> String {
        (1u32..)
            .map(|n| n.to_string())
            .find(|n| self.section_by_number(n).is_none())
            .unwrap_or_default()
    }

    pub fn remove_section(&mut self, id: SectionId) -> Option<Section> {
        let pos = self.sections.iter().position(|s| s.id == id)?;
        Some(self.sections.remove(pos))
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }
    pub fn section_by_number(&self, number: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.number == number)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.sections.iter().flat_map(|s| s.blocks().iter())
    }

    pub fn hours(&self) -> f64 {
        self.sections.iter().map(Section::hours).sum()
    }
}
