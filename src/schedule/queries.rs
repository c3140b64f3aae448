use super::Schedule;
use crate::ids::{BlockId, CourseId, LabId, SectionId, StreamId, TeacherId};
use crate::model::{Block, Course, Section};
use crate::resource::{Lab, Resource, ResourceRef, Stream, Teacher};
use std::collections::BTreeSet;

impl Schedule {
    /// Cours triés par numéro.
    pub fn courses(&self) -> Vec<&Course> {
        let mut out: Vec<&Course> = self.courses.iter().collect();
        out.sort_by(|a, b| a.number.cmp(&b.number));
        out
    }

    /// Enseignants triés par nom puis prénom.
    pub fn teachers(&self) -> Vec<&Teacher> {
        sorted_by_key(&self.teachers)
    }

    pub fn labs(&self) -> Vec<&Lab> {
        sorted_by_key(&self.labs)
    }

    pub fn streams(&self) -> Vec<&Stream> {
        sorted_by_key(&self.streams)
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }
    pub fn course_by_number(&self, number: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.number == number)
    }

    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }
    pub fn teacher_by_name(&self, firstname: &str, lastname: &str) -> Option<&Teacher> {
        self.teachers
            .iter()
            .find(|t| t.firstname == firstname && t.lastname == lastname)
    }

    pub fn lab(&self, id: LabId) -> Option<&Lab> {
        self.labs.iter().find(|l| l.id == id)
    }
    pub fn lab_by_number(&self, number: &str) -> Option<&Lab> {
        self.labs.iter().find(|l| l.number == number)
    }

    pub fn stream(&self, id: StreamId) -> Option<&Stream> {
        self.streams.iter().find(|s| s.id == id)
    }
    pub fn stream_by_number(&self, number: &str) -> Option<&Stream> {
        self.streams.iter().find(|s| s.number == number)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> + '_ {
        self.courses.iter().flat_map(|c| c.sections().iter())
    }
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.courses.iter().find_map(|c| c.section(id))
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.sections().flat_map(|s| s.blocks().iter())
    }
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.sections().find_map(|s| s.block(id))
    }

    pub fn blocks_for_teacher(&self, teacher: TeacherId) -> Vec<&Block> {
        self.blocks().filter(|b| b.has_teacher(teacher)).collect()
    }

    pub fn blocks_for_lab(&self, lab: LabId) -> Vec<&Block> {
        self.blocks().filter(|b| b.has_lab(lab)).collect()
    }

    /// Blocs des sections auxquelles le groupe est inscrit.
    pub fn blocks_for_stream(&self, stream: StreamId) -> Vec<&Block> {
        self.sections()
            .filter(|s| s.has_stream(stream))
            .flat_map(|s| s.blocks().iter())
            .collect()
    }

    pub fn blocks_for(&self, resource: ResourceRef) -> Vec<&Block> {
        match resource {
            ResourceRef::Teacher(id) => self.blocks_for_teacher(id),
            ResourceRef::Lab(id) => self.blocks_for_lab(id),
            ResourceRef::Stream(id) => self.blocks_for_stream(id),
        }
    }

    pub fn sections_for_teacher(&self, teacher: TeacherId) -> Vec<&Section> {
        self.sections().filter(|s| s.has_teacher(teacher)).collect()
    }

    pub fn sections_for_lab(&self, lab: LabId) -> Vec<&Section> {
        self.sections().filter(|s| s.has_lab(lab)).collect()
    }

    pub fn sections_for_stream(&self, stream: StreamId) -> Vec<&Section> {
        self.sections().filter(|s| s.has_stream(stream)).collect()
    }

    pub fn sections_for(&self, resource: ResourceRef) -> Vec<&Section> {
        match resource {
            ResourceRef::Teacher(id) => self.sections_for_teacher(id),
            ResourceRef::Lab(id) => self.sections_for_lab(id),
            ResourceRef::Stream(id) => self.sections_for_stream(id),
        }
    }

    /// Groupe de synchronisation transitif (inclut `block`).
    pub fn synced_with(&self, block: BlockId) -> BTreeSet<BlockId> {
        let mut seen = BTreeSet::from([block]);
        let mut pending = vec![block];
        while let Some(current) = pending.pop() {
            for &(a, b) in &self.syncs {
                let other = if a == current {
                    b
                } else if b == current {
                    a
                } else {
                    continue;
                };
                if seen.insert(other) {
                    pending.push(other);
                }
            }
        }
        seen
    }

    /// Somme des allocations de l'enseignant, toutes sections confondues.
    pub fn allocated_hours(&self, teacher: TeacherId) -> f64 {
        self.sections()
            .filter_map(|s| s.teacher_allocation(teacher))
            .sum()
    }

    pub fn conflicted_blocks(&self) -> Vec<&Block> {
        self.blocks().filter(|b| b.is_conflicted()).collect()
    }
}

fn sorted_by_key<R: Resource>(items: &[R]) -> Vec<&R> {
    let mut out: Vec<&R> = items.iter().collect();
    out.sort_by_cached_key(|r| r.natural_key());
    out
}
