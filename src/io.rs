use crate::model::Block;
use crate::resource::Resource;
use crate::schedule::Schedule;
use anyhow::Context;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Rapport CSV des blocs en conflit:
/// header `block_id,course,section,day,start,duration,conflicts`
pub fn write_conflicts_csv<W: Write>(out: W, schedule: &Schedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(out);
    w.write_record(["block_id", "course", "section", "day", "start", "duration", "conflicts"])?;
    for course in schedule.courses() {
        for section in course.sections() {
            for block in section.blocks().iter().filter(|b| b.is_conflicted()) {
                w.write_record(block_row(course.number.as_str(), section.number.as_str(), block))?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

fn block_row(course: &str, section: &str, block: &Block) -> [String; 7] {
    [
        block.id.to_string(),
        course.to_string(),
        section.to_string(),
        block.day().to_string(),
        block.start().to_string(),
        block.duration().to_string(),
        block.conflicts().to_string(),
    ]
}

pub fn export_conflicts_csv<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_conflicts_csv(file, schedule)
}

/// Charge par enseignant: header `teacher,release,allocated_hours,blocks`
pub fn write_teacher_load_csv<W: Write>(out: W, schedule: &Schedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(out);
    w.write_record(["teacher", "release", "allocated_hours", "blocks"])?;
    for teacher in schedule.teachers() {
        let allocated = schedule.allocated_hours(teacher.id);
        let blocks = schedule.blocks_for_teacher(teacher.id).len();
        w.write_record([
            teacher.display_name(),
            teacher.release.to_string(),
            allocated.to_string(),
            blocks.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_teacher_load_csv<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_teacher_load_csv(file, schedule)
}
