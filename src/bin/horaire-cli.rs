#![forbid(unsafe_code)]
use anyhow::{anyhow, Context, Result};
use chrono::Weekday;
use clap::{Parser, Subcommand};
use horaire::{
    io,
    resource::Resource,
    schedule::{ConflictOptions, Schedule},
    storage::{JsonStorage, Storage},
    BlockId, ResourceKind, ScheduleTime, SectionId, SnapOptions,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI d'horaire de cours (fichier JSON, sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de l'horaire
    #[arg(long, global = true, default_value = "schedule.json")]
    schedule: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter ou mettre à jour un enseignant
    AddTeacher {
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(long, default_value_t = 0.0)]
        release: f64,
    },

    /// Ajouter ou mettre à jour un local
    AddLab {
        #[arg(long)]
        number: String,
        #[arg(long, default_value = "")]
        descr: String,
    },

    /// Ajouter ou mettre à jour un groupe
    AddStream {
        #[arg(long)]
        number: String,
        #[arg(long, default_value = "")]
        descr: String,
    },

    /// Ajouter ou mettre à jour un cours
    AddCourse {
        #[arg(long)]
        number: String,
        #[arg(long)]
        name: String,
    },

    /// Ajouter une section (numéro automatique si absent)
    AddSection {
        #[arg(long)]
        course: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Ajouter un bloc à une section
    AddBlock {
        #[arg(long)]
        course: String,
        #[arg(long)]
        section: String,
        /// Mon, Tue, ...
        #[arg(long)]
        day: String,
        /// H:MM
        #[arg(long)]
        start: String,
        #[arg(long)]
        duration: f64,
    },

    /// Assigner un enseignant à un bloc
    AssignTeacher {
        #[arg(long)]
        block: u32,
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
    },

    /// Assigner un local à un bloc
    AssignLab {
        #[arg(long)]
        block: u32,
        #[arg(long)]
        lab: String,
    },

    /// Inscrire un groupe à une section
    AssignStream {
        #[arg(long)]
        course: String,
        #[arg(long)]
        section: String,
        #[arg(long)]
        stream: String,
    },

    /// Déplacer un bloc (et ses blocs synchronisés)
    Move {
        #[arg(long)]
        block: u32,
        #[arg(long)]
        day: String,
        #[arg(long)]
        start: String,
    },

    /// Aligner un bloc sur la grille
    Snap {
        #[arg(long)]
        block: u32,
        #[arg(long, default_value_t = 30)]
        round_to_minutes: u32,
        #[arg(long, default_value_t = 8.0)]
        min_start_time: f64,
        #[arg(long, default_value_t = 18.0)]
        max_end_time: f64,
    },

    /// Synchroniser deux blocs
    Sync {
        #[arg(long)]
        block: u32,
        #[arg(long)]
        with: u32,
    },

    /// Lister l'horaire
    List,

    /// Vérifier les conflits
    Check {
        #[arg(long, default_value_t = 32.0)]
        max_availability_hours: f64,
        #[arg(long, default_value_t = 4)]
        min_days: usize,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Exporter la charge des enseignants (CSV)
    LoadReport {
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.schedule);
    let mut schedule = if storage.path().exists() {
        storage.load()?
    } else {
        Schedule::new()
    };

    let code = match cli.cmd {
        Commands::AddTeacher {
            firstname,
            lastname,
            release,
        } => {
            let id = schedule.add_update_teacher(&firstname, &lastname, release);
            println!("{id}");
            save(&storage, &mut schedule)?
        }
        Commands::AddLab { number, descr } => {
            let id = schedule.add_update_lab(&number, &descr);
            println!("{id}");
            save(&storage, &mut schedule)?
        }
        Commands::AddStream { number, descr } => {
            let id = schedule.add_update_stream(&number, &descr);
            println!("{id}");
            save(&storage, &mut schedule)?
        }
        Commands::AddCourse { number, name } => {
            let id = schedule.add_update_course(&number, &name);
            println!("{id}");
            save(&storage, &mut schedule)?
        }
        Commands::AddSection {
            course,
            number,
            name,
        } => {
            let course_id = schedule
                .course_by_number(&course)
                .map(|c| c.id)
                .ok_or_else(|| anyhow!("unknown course: {course}"))?;
            let id = schedule.add_section(course_id, number.as_deref(), &name)?;
            println!("{id}");
            save(&storage, &mut schedule)?
        }
        Commands::AddBlock {
            course,
            section,
            day,
            start,
            duration,
        } => {
            let section_id = find_section(&schedule, &course, &section)?;
            let id = schedule.add_block(section_id, parse_day(&day)?, start.parse()?, duration)?;
            println!("{}", id.value());
            save(&storage, &mut schedule)?
        }
        Commands::AssignTeacher {
            block,
            firstname,
            lastname,
        } => {
            let teacher = schedule
                .teacher_by_name(&firstname, &lastname)
                .map(|t| t.id)
                .ok_or_else(|| anyhow!("unknown teacher: {firstname} {lastname}"))?;
            schedule.assign_teacher(BlockId::new(block), teacher)?;
            save(&storage, &mut schedule)?
        }
        Commands::AssignLab { block, lab } => {
            let lab_id = schedule
                .lab_by_number(&lab)
                .map(|l| l.id)
                .ok_or_else(|| anyhow!("unknown lab: {lab}"))?;
            schedule.assign_lab(BlockId::new(block), lab_id)?;
            save(&storage, &mut schedule)?
        }
        Commands::AssignStream {
            course,
            section,
            stream,
        } => {
            let section_id = find_section(&schedule, &course, &section)?;
            let stream_id = schedule
                .stream_by_number(&stream)
                .map(|s| s.id)
                .ok_or_else(|| anyhow!("unknown stream: {stream}"))?;
            schedule.assign_stream(section_id, stream_id)?;
            save(&storage, &mut schedule)?
        }
        Commands::Move { block, day, start } => {
            let start: ScheduleTime = start.parse()?;
            let moved = schedule.move_block(BlockId::new(block), parse_day(&day)?, start)?;
            println!("moved {} block(s)", moved.len());
            save(&storage, &mut schedule)?
        }
        Commands::Snap {
            block,
            round_to_minutes,
            min_start_time,
            max_end_time,
        } => {
            let opts = SnapOptions {
                round_to_minutes,
                min_start_time,
                max_end_time,
            };
            let changed = schedule.snap_block(BlockId::new(block), &opts)?;
            println!("{}", if changed { "snapped" } else { "unchanged" });
            save(&storage, &mut schedule)?
        }
        Commands::Sync { block, with } => {
            schedule.sync_blocks(BlockId::new(block), BlockId::new(with))?;
            save(&storage, &mut schedule)?
        }
        Commands::List => {
            schedule.calculate_conflicts();
            print_resources(&schedule.teachers());
            print_resources(&schedule.labs());
            print_resources(&schedule.streams());
            for course in schedule.courses() {
                for section in course.sections() {
                    for block in section.blocks() {
                        println!(
                            "{} | {}.{} | {} | {}",
                            block.id.value(),
                            course.number,
                            section.number,
                            block.slot(),
                            block.conflicts()
                        );
                    }
                }
            }
            0
        }
        Commands::Check {
            max_availability_hours,
            min_days,
            report,
        } => {
            let opts = ConflictOptions {
                max_availability_hours,
                min_days,
                ..ConflictOptions::default()
            };
            schedule.calculate_conflicts_with(&opts);
            let conflicted = schedule.conflicted_blocks();
            if conflicted.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflicted block(s)", conflicted.len());
                for block in &conflicted {
                    let worst = block
                        .conflicts()
                        .most_severe(ResourceKind::Teacher)
                        .map(|c| c.description())
                        .unwrap_or("-");
                    eprintln!("  {} {} : {}", block.id.value(), block.slot(), worst);
                }
                if let Some(path) = report {
                    io::export_conflicts_csv(path, &schedule)?;
                }
                // Code 2 = WARNING
                2
            }
        }
        Commands::LoadReport { out } => {
            io::export_teacher_load_csv(out, &schedule)?;
            0
        }
    };

    std::process::exit(code);
}

fn save(storage: &JsonStorage, schedule: &mut Schedule) -> Result<i32> {
    schedule.calculate_conflicts();
    storage.save(schedule)?;
    Ok(0)
}

fn parse_day(raw: &str) -> Result<Weekday> {
    raw.parse::<Weekday>()
        .map_err(|_| anyhow!("invalid day: {raw}"))
}

fn find_section(schedule: &Schedule, course: &str, section: &str) -> Result<SectionId> {
    schedule
        .course_by_number(course)
        .with_context(|| format!("unknown course: {course}"))?
        .section_by_number(section)
        .map(|s| s.id)
        .with_context(|| format!("unknown section {section} in course {course}"))
}

fn print_resources<R: Resource>(items: &[&R]) {
    for item in items {
        println!("{} | {}", R::KIND, item.display_name());
    }
}
