use super::{SchedError, Schedule};
use crate::ids::{BlockId, CourseId, LabId, SectionId, StreamId, TeacherId};
use crate::model::{Block, Course, Section};
use crate::resource::{Lab, Stream, Teacher};
use crate::time::{ScheduleTime, SnapOptions, TimeSlot};
use chrono::Weekday;

impl Schedule {
    /// Upsert par numéro de cours.
    pub fn add_update_course(&mut self, number: &str, name: &str) -> CourseId {
        if let Some(course) = self.courses.iter_mut().find(|c| c.number == number) {
            course.name = name.to_string();
            return course.id;
        }
        let id: CourseId = self.ids.allocate();
        self.courses.push(Course::new(id, number, name));
        id
    }

    /// Upsert par nom + prénom.
    pub fn add_update_teacher(&mut self, firstname: &str, lastname: &str, release: f64) -> TeacherId {
        if let Some(t) = self
            .teachers
            .iter_mut()
            .find(|t| t.firstname == firstname && t.lastname == lastname)
        {
            t.release = release;
            return t.id;
        }
        let id: TeacherId = self.ids.allocate();
        let mut teacher = Teacher::new(id, firstname, lastname);
        teacher.release = release;
        self.teachers.push(teacher);
        id
    }

    pub fn add_update_lab(&mut self, number: &str, descr: &str) -> LabId {
        if let Some(lab) = self.labs.iter_mut().find(|l| l.number == number) {
            lab.descr = descr.to_string();
            return lab.id;
        }
        let id: LabId = self.ids.allocate();
        self.labs.push(Lab::new(id, number, descr));
        id
    }

    pub fn add_update_stream(&mut self, number: &str, descr: &str) -> StreamId {
        if let Some(stream) = self.streams.iter_mut().find(|s| s.number == number) {
            stream.descr = descr.to_string();
            return stream.id;
        }
        let id: StreamId = self.ids.allocate();
        self.streams.push(Stream::new(id, number, descr));
        id
    }

    pub fn add_section(
        &mut self,
        course: CourseId,
        number: Option<&str>,
        name: &str,
    ) -> Result<SectionId, SchedError> {
        let Some(c) = self.courses.iter_mut().find(|c| c.id == course) else {
            return Err(SchedError::UnknownCourse(course.to_string()));
        };
        c.add_section(&mut self.ids, number, name)
    }

    pub fn add_block(
        &mut self,
        section: SectionId,
        day: Weekday,
        start: ScheduleTime,
        duration: f64,
    ) -> Result<BlockId, SchedError> {
        let slot = TimeSlot::new(day, start, duration)?;
        let Some(s) = self.courses.iter_mut().find_map(|c| c.section_mut(section)) else {
            return Err(SchedError::UnknownSection(section.to_string()));
        };
        Ok(s.add_block(&mut self.ids, slot))
    }

    pub fn set_section_hours(&mut self, section: SectionId, hours: f64) -> Result<(), SchedError> {
        self.find_section_mut(section)?.set_hours(hours)
    }

    pub fn assign_teacher(&mut self, block: BlockId, teacher: TeacherId) -> Result<(), SchedError> {
        self.require_teacher(teacher)?;
        self.find_block_mut(block)?.add_teacher(teacher);
        Ok(())
    }

    pub fn unassign_teacher(&mut self, block: BlockId, teacher: TeacherId) -> Result<(), SchedError> {
        self.find_block_mut(block)?.remove_teacher(teacher);
        Ok(())
    }

    pub fn assign_lab(&mut self, block: BlockId, lab: LabId) -> Result<(), SchedError> {
        if self.lab(lab).is_none() {
            return Err(SchedError::UnknownLab(lab.to_string()));
        }
        self.find_block_mut(block)?.add_lab(lab);
        Ok(())
    }

    pub fn unassign_lab(&mut self, block: BlockId, lab: LabId) -> Result<(), SchedError> {
        self.find_block_mut(block)?.remove_lab(lab);
        Ok(())
    }

    /// Ajoute l'enseignant à la section ; `hours` absent = heures de la section.
    pub fn assign_teacher_to_section(
        &mut self,
        section: SectionId,
        teacher: TeacherId,
        hours: Option<f64>,
    ) -> Result<(), SchedError> {
        self.require_teacher(teacher)?;
        let s = self.find_section_mut(section)?;
        match hours {
            Some(h) => s.set_teacher_allocation(teacher, h),
            None => {
                s.add_teacher(teacher);
                Ok(())
            }
        }
    }

    pub fn unassign_teacher_from_section(
        &mut self,
        section: SectionId,
        teacher: TeacherId,
    ) -> Result<(), SchedError> {
        self.find_section_mut(section)?.remove_teacher(teacher);
        Ok(())
    }

    pub fn assign_stream(&mut self, section: SectionId, stream: StreamId) -> Result<(), SchedError> {
        if self.stream(stream).is_none() {
            return Err(SchedError::UnknownStream(stream.to_string()));
        }
        self.find_section_mut(section)?.add_stream(stream);
        Ok(())
    }

    pub fn unassign_stream(&mut self, section: SectionId, stream: StreamId) -> Result<(), SchedError> {
        self.find_section_mut(section)?.remove_stream(stream);
        Ok(())
    }

    pub fn set_lab_unavailable(&mut self, lab: LabId, slot: TimeSlot) -> Result<(), SchedError> {
        let Some(l) = self.labs.iter_mut().find(|l| l.id == lab) else {
            return Err(SchedError::UnknownLab(lab.to_string()));
        };
        l.add_unavailable(slot);
        Ok(())
    }

    pub fn remove_course(&mut self, course: CourseId) -> Result<Course, SchedError> {
        let Some(pos) = self.courses.iter().position(|c| c.id == course) else {
            return Err(SchedError::UnknownCourse(course.to_string()));
        };
        let removed = self.courses.remove(pos);
        for block in removed.blocks() {
            self.drop_syncs(block.id);
        }
        Ok(removed)
    }

    pub fn remove_section(&mut self, section: SectionId) -> Result<Section, SchedError> {
        let removed = self
            .courses
            .iter_mut()
            .find_map(|c| c.remove_section(section))
            .ok_or_else(|| SchedError::UnknownSection(section.to_string()))?;
        for block in removed.blocks() {
            self.drop_syncs(block.id);
        }
        Ok(removed)
    }

    pub fn remove_block(&mut self, block: BlockId) -> Result<Block, SchedError> {
        let removed = self
            .courses
            .iter_mut()
            .flat_map(|c| c.sections_mut().iter_mut())
            .find_map(|s| s.remove_block(block))
            .ok_or_else(|| SchedError::UnknownBlock(block.to_string()))?;
        self.drop_syncs(block);
        Ok(removed)
    }

    /// Retire l'enseignant du registre et de toutes les sections.
    pub fn remove_teacher(&mut self, teacher: TeacherId) -> Result<Teacher, SchedError> {
        let Some(pos) = self.teachers.iter().position(|t| t.id == teacher) else {
            return Err(SchedError::UnknownTeacher(teacher.to_string()));
        };
        for course in &mut self.courses {
            for section in course.sections_mut() {
                section.remove_teacher(teacher);
            }
        }
        Ok(self.teachers.remove(pos))
    }

    pub fn remove_lab(&mut self, lab: LabId) -> Result<Lab, SchedError> {
        let Some(pos) = self.labs.iter().position(|l| l.id == lab) else {
            return Err(SchedError::UnknownLab(lab.to_string()));
        };
        for block in self.blocks_mut() {
            block.remove_lab(lab);
        }
        Ok(self.labs.remove(pos))
    }

    pub fn remove_stream(&mut self, stream: StreamId) -> Result<Stream, SchedError> {
        let Some(pos) = self.streams.iter().position(|s| s.id == stream) else {
            return Err(SchedError::UnknownStream(stream.to_string()));
        };
        for course in &mut self.courses {
            for section in course.sections_mut() {
                section.remove_stream(stream);
            }
        }
        Ok(self.streams.remove(pos))
    }

    /// Lie deux blocs : déplacer l'un déplace l'autre.
    pub fn sync_blocks(&mut self, a: BlockId, b: BlockId) -> Result<(), SchedError> {
        for id in [a, b] {
            if self.block(id).is_none() {
                return Err(SchedError::UnknownBlock(id.to_string()));
            }
        }
        if a != b {
            self.syncs.insert((a.min(b), a.max(b)));
        }
        Ok(())
    }

    pub fn unsync_block(&mut self, block: BlockId) {
        self.drop_syncs(block);
    }

    /// Fige (ou libère) un bloc : un bloc fixe ne bouge ni ne s'aligne.
    pub fn set_block_movable(&mut self, block: BlockId, movable: bool) -> Result<(), SchedError> {
        self.find_block_mut(block)?.set_movable(movable);
        Ok(())
    }

    /// Déplace le bloc et son groupe synchronisé (chaque bloc une seule fois).
    /// Si le bloc visé est fixe, rien ne bouge ; les autres blocs fixes du groupe
    /// restent en place. Retourne les blocs déplacés.
    pub fn move_block(
        &mut self,
        block: BlockId,
        day: Weekday,
        start: ScheduleTime,
    ) -> Result<Vec<BlockId>, SchedError> {
        match self.block(block) {
            None => return Err(SchedError::UnknownBlock(block.to_string())),
            Some(b) if !b.movable() => return Ok(Vec::new()),
            Some(_) => {}
        }
        let mut moved = Vec::new();
        for id in self.synced_with(block) {
            if let Some(b) = self.block_mut(id) {
                if b.movable() {
                    b.move_to(day, start);
                    moved.push(id);
                }
            }
        }
        Ok(moved)
    }

    /// Aligne le bloc sur la grille puis aligne son groupe synchronisé.
    pub fn snap_block(&mut self, block: BlockId, opts: &SnapOptions) -> Result<bool, SchedError> {
        let b = self.find_block_mut(block)?;
        if !b.snap(opts) {
            return Ok(false);
        }
        let (day, start) = (b.day(), b.start());
        self.move_block(block, day, start)?;
        Ok(true)
    }

    fn drop_syncs(&mut self, block: BlockId) {
        self.syncs.retain(|&(a, b)| a != block && b != block);
    }

    fn require_teacher(&self, teacher: TeacherId) -> Result<(), SchedError> {
        match self.teacher(teacher) {
            Some(_) => Ok(()),
            None => Err(SchedError::UnknownTeacher(teacher.to_string())),
        }
    }

    fn find_section_mut(&mut self, section: SectionId) -> Result<&mut Section, SchedError> {
        self.section_mut(section)
            .ok_or_else(|| SchedError::UnknownSection(section.to_string()))
    }

    fn find_block_mut(&mut self, block: BlockId) -> Result<&mut Block, SchedError> {
        self.block_mut(block)
            .ok_or_else(|| SchedError::UnknownBlock(block.to_string()))
    }
}
