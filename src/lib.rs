pub mod analysis;
pub mod cli;
pub mod coerce;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod project;
pub mod state;
pub mod time;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use cli::{
    ArchiveCommands, AssetCommands, AssignmentCommands, Cli, Commands, CriterionCommands,
    MissionCommands, PhaseCommands,
};
use commands::{archive, export as export_cmd, import as import_cmd, mission, project as project_cmd};
use config::Config;
use error::AppError;
use project::FileSlot;
use state::AppState;

/// What a command printed and whether the stored project must be rewritten.
#[derive(Debug)]
pub struct Outcome {
    pub output: Output,
    pub mutated: bool,
}

#[derive(Debug)]
pub enum Output {
    Json(Value),
    /// Already-rendered text (an export payload).
    Text(String),
}

impl Outcome {
    fn read<T: Serialize>(payload: &T) -> Result<Self, AppError> {
        Ok(Self {
            output: Output::Json(to_json(payload)?),
            mutated: false,
        })
    }

    fn wrote<T: Serialize>(payload: &T) -> Result<Self, AppError> {
        Ok(Self {
            output: Output::Json(to_json(payload)?),
            mutated: true,
        })
    }
}

fn to_json<T: Serialize>(payload: &T) -> Result<Value, AppError> {
    serde_json::to_value(payload).map_err(|e| AppError::Io(format!("cannot serialize output: {e}")))
}

/// Install the global tracing subscriber.
///
/// Logs go to a single file in the configured log directory:
///   Linux    ~/.local/share/mission-architect/mission-architect.log
///   macOS    ~/Library/Application Support/mission-architect/mission-architect.log
///   Windows  %LOCALAPPDATA%\mission-architect\mission-architect.log
///
/// If that directory cannot be created, logs go to stderr instead; logging
/// never blocks a command. `RUST_LOG` wins over `[logging] filter`. The
/// returned guard flushes the non-blocking writer on drop and must outlive
/// the command.
pub fn init_tracing(cfg: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard, AppError> {
    let (non_blocking, guard) = match log_file_dir(cfg) {
        Some(dir) => tracing_appender::non_blocking(tracing_appender::rolling::never(
            dir,
            "mission-architect.log",
        )),
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.filter)),
        )
        .with_writer(non_blocking)
        .try_init()
        .map_err(|e| AppError::Config(format!("cannot install tracing subscriber: {e}")))?;

    Ok(guard)
}

/// The configured log directory, created if needed, or `None` when it
/// cannot be created.
fn log_file_dir(cfg: &Config) -> Option<std::path::PathBuf> {
    let log_dir = cfg.log_dir();
    match std::fs::create_dir_all(&log_dir) {
        Ok(()) => Some(log_dir),
        Err(e) => {
            eprintln!("cannot create log directory {}: {e}; logging to stderr", log_dir.display());
            None
        }
    }
}

/// Host entry point: load config and the stored project, run one command,
/// save if it changed anything, print the result.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let cfg = config::load(&config_path)?;
    let _tracing_guard = init_tracing(&cfg)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Mission Architect starting");

    let storage = cli.storage.clone().unwrap_or_else(|| cfg.storage_path());
    let state = AppState::load(Box::new(FileSlot::new(storage)));

    let outcome = dispatch(cli.command, &state).await?;
    if outcome.mutated {
        project_cmd::save_project_inner(&state.project, state.slot.as_ref())?;
    }

    match outcome.output {
        Output::Text(text) => println!("{text}"),
        Output::Json(value) => {
            let text = serde_json::to_string_pretty(&value)
                .map_err(|e| AppError::Io(format!("cannot serialize output: {e}")))?;
            println!("{text}");
        }
    }
    Ok(())
}

fn read_input(file: Option<std::path::PathBuf>, text: Option<String>) -> Result<String, AppError> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        (None, None) => Err(AppError::InvalidJson("nothing to import".to_string())),
    }
}

/// Route one parsed command to its handler.
pub async fn dispatch(command: Commands, state: &AppState) -> Result<Outcome, AppError> {
    let lock = &state.project;
    match command {
        Commands::Status => Outcome::read(&project_cmd::get_project_snapshot_inner(lock)?),
        Commands::Dump => Outcome::read(&project_cmd::get_project_inner(lock)?),
        Commands::Reset => Outcome::wrote(&project_cmd::new_project_inner(lock)?),
        Commands::Open { path } => Outcome::wrote(&project_cmd::open_project_file_inner(&path, lock)?),
        Commands::Migrate { path } => {
            let text = std::fs::read_to_string(&path)?;
            let migrated = project::normalize_mission_project(import::parse_json(&text)?);
            Outcome::read(&migrated)
        }
        Commands::Feasibility => Outcome::read(&project_cmd::feasibility_inner(lock)?),

        Commands::Mission { command } => dispatch_mission(command, lock),
        Commands::Phase { command } => dispatch_phase(command, lock),
        Commands::Asset { command } => dispatch_asset(command, lock),
        Commands::Assignment { command } => dispatch_assignment(command, lock),
        Commands::Criterion { command } => dispatch_criterion(command, lock),
        Commands::Archive { command } => dispatch_archive(command, lock),

        Commands::Import { kind, file, text } => match (file, text) {
            (Some(path), None) => Outcome::wrote(&import_cmd::import_file_inner(kind, path, lock).await?),
            (file, text) => {
                let text = read_input(file, text)?;
                Outcome::wrote(&import_cmd::import_text_inner(kind, &text, lock)?)
            }
        },
        Commands::Merge { file, text } => {
            let text = read_input(file, text)?;
            Outcome::wrote(&import_cmd::import_entities_text_inner(&text, lock)?)
        }
        Commands::Export { format, out } => match out {
            Some(out) => {
                let written = export_cmd::export_to_file_inner(format, &out, lock)?;
                Outcome::read(&serde_json::json!({ "written": written.display().to_string() }))
            }
            None => Ok(Outcome {
                output: Output::Text(export_cmd::export_inner(format, lock)?),
                mutated: false,
            }),
        },
    }
}

type ProjectLock = std::sync::RwLock<project::MissionProject>;

fn dispatch_mission(command: MissionCommands, lock: &ProjectLock) -> Result<Outcome, AppError> {
    match command {
        MissionCommands::New => Outcome::wrote(&mission::new_mission_inner(lock)?),
        MissionCommands::Example => Outcome::wrote(&mission::load_example_mission_inner(lock)?),
        MissionCommands::SeedAssets => Outcome::wrote(&mission::seed_demo_assets_inner(lock)?),
        MissionCommands::Meta {
            name,
            banner,
            ao,
            unit,
            created_on,
            created_by,
            mission_type,
            duration_hours,
            altitude_band,
            temperature_band,
        } => {
            let patch = mission::MissionMetaPatch {
                name,
                classification_banner: banner,
                ao,
                unit_or_detachment: unit,
                created_on,
                created_by,
                mission_type,
                duration_hours,
                altitude_band,
                temperature_band,
            };
            Outcome::wrote(&mission::update_meta_inner(patch, lock)?)
        }
        MissionCommands::Constraints {
            time_window,
            environment,
            rf,
            logistics,
            max_sorties,
            min_battery_reserve,
            requires_rf_coverage,
            risk_notes,
        } => {
            let patch = mission::ConstraintsPatch {
                time_window,
                environment,
                rf_constraints: rf,
                logistics_constraints: logistics,
                max_sorties,
                min_battery_reserve_pct: min_battery_reserve,
                requires_rf_coverage,
                risk_notes,
            };
            Outcome::wrote(&mission::update_constraints_inner(patch, lock)?)
        }
    }
}

fn dispatch_phase(command: PhaseCommands, lock: &ProjectLock) -> Result<Outcome, AppError> {
    match command {
        PhaseCommands::Add { name } => Outcome::wrote(&mission::add_phase_inner(name, lock)?),
        PhaseCommands::Update {
            id,
            name,
            description,
            start,
            end,
            tasks,
            emcon,
        } => {
            let patch = mission::PhasePatch {
                name,
                description,
                start_condition: start,
                end_condition: end,
                tasks,
                emcon_considerations: emcon,
            };
            Outcome::wrote(&mission::update_phase_inner(&id, patch, lock)?)
        }
        PhaseCommands::Move { id, direction } => {
            let direction = if direction == "up" {
                mission::MoveDirection::Up
            } else {
                mission::MoveDirection::Down
            };
            Outcome::wrote(&mission::move_phase_inner(&id, direction, lock)?)
        }
        PhaseCommands::Delete { id } => {
            mission::delete_phase_inner(&id, lock)?;
            Outcome::wrote(&serde_json::json!({ "deleted": id }))
        }
        PhaseCommands::Use { phase_id, asset_id, off } => {
            Outcome::wrote(&mission::set_phase_asset_inner(&phase_id, &asset_id, !off, lock)?)
        }
    }
}

fn dispatch_asset(command: AssetCommands, lock: &ProjectLock) -> Result<Outcome, AppError> {
    match command {
        AssetCommands::Add {
            name,
            asset_type,
            source,
            tags,
            owner,
            notes,
        } => {
            let input = mission::AssetInput {
                name,
                asset_type,
                source_tool: source,
                role_tags: tags.as_deref().map(mission::parse_tags).unwrap_or_default(),
                owner_element: owner.unwrap_or_default(),
                notes: notes.unwrap_or_default(),
            };
            Outcome::wrote(&mission::add_asset_inner(input, lock)?)
        }
        AssetCommands::Edit {
            id,
            name,
            asset_type,
            source,
            tags,
            owner,
            notes,
            critical,
            rf_band,
            battery_wh,
            endurance_hours,
            endurance_minutes,
            lat,
            lon,
        } => {
            let patch = mission::AssetPatch {
                name,
                asset_type,
                source_tool: source,
                role_tags: tags.as_deref().map(mission::parse_tags),
                owner_element: owner,
                notes,
                critical,
                rf_band,
                battery_wh,
                endurance_hours,
                endurance_minutes,
                lat,
                lon,
            };
            Outcome::wrote(&mission::edit_asset_inner(&id, patch, lock)?)
        }
        AssetCommands::Duplicate { id } => Outcome::wrote(&mission::duplicate_asset_inner(&id, lock)?),
        AssetCommands::Remove { id } => {
            mission::remove_asset_inner(&id, lock)?;
            Outcome::wrote(&serde_json::json!({ "removed": id }))
        }
    }
}

fn dispatch_assignment(command: AssignmentCommands, lock: &ProjectLock) -> Result<Outcome, AppError> {
    match command {
        AssignmentCommands::Add => Outcome::wrote(&mission::add_assignment_inner(lock)?),
        AssignmentCommands::Update {
            id,
            asset,
            phase,
            team,
            role,
            notes,
            critical,
            requires_comms,
        } => {
            let patch = mission::AssignmentPatch {
                asset_id: asset,
                phase_id: phase,
                team,
                role,
                notes,
                critical,
                requires_comms,
            };
            Outcome::wrote(&mission::update_assignment_inner(&id, patch, lock)?)
        }
        AssignmentCommands::Remove { id } => {
            mission::remove_assignment_inner(&id, lock)?;
            Outcome::wrote(&serde_json::json!({ "removed": id }))
        }
    }
}

fn dispatch_criterion(command: CriterionCommands, lock: &ProjectLock) -> Result<Outcome, AppError> {
    match command {
        CriterionCommands::Add { text } => Outcome::wrote(&mission::add_criterion_inner(&text, lock)?),
        CriterionCommands::Update { index, text } => {
            Outcome::wrote(&mission::update_criterion_inner(index, &text, lock)?)
        }
        CriterionCommands::Remove { index } => {
            Outcome::wrote(&mission::remove_criterion_inner(index, lock)?)
        }
    }
}

fn dispatch_archive(command: ArchiveCommands, lock: &ProjectLock) -> Result<Outcome, AppError> {
    match command {
        ArchiveCommands::Save => Outcome::wrote(&archive::save_to_archive_inner(lock)?),
        ArchiveCommands::List => Outcome::read(&archive::list_saved_missions_inner(lock)?),
        ArchiveCommands::Load { id } => Outcome::wrote(&archive::load_saved_mission_inner(&id, lock)?),
        ArchiveCommands::Delete { id } => {
            Outcome::wrote(&archive::delete_saved_mission_inner(&id, lock)?)
        }
    }
}
