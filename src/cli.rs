//! Command-line definitions for the `mission-architect` host.

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};

use crate::export::ExportFormat;
use crate::import::ImportKind;
use crate::models::mission::{ALTITUDE_BANDS, TEMPERATURE_BANDS};

/// Mission Architect - plan small-unit missions against one local project store.
///
/// Every command loads the stored project, applies its change, saves when
/// something changed and prints the result as JSON.
#[derive(Parser, Debug)]
#[command(name = "mission-architect")]
#[command(author, version, about = "Plan missions against a single local project store", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML). Defaults to the platform config directory.
    #[arg(long, global = true, env = "MISSION_ARCHITECT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Storage slot file, overriding `[storage] path` from the config.
    #[arg(long, global = true, env = "MISSION_ARCHITECT_STORAGE")]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summary of the stored project (start here)
    Status,

    /// Print the full stored project
    Dump,

    /// Replace the stored project with an empty one
    Reset,

    /// Replace the stored project with a project file (any historical shape)
    Open {
        /// Project file to open
        path: PathBuf,
    },

    /// Print a project file migrated and normalized, without touching the store
    Migrate {
        /// Project file to migrate
        path: PathBuf,
    },

    /// Edit the active mission as a whole
    Mission {
        #[command(subcommand)]
        command: MissionCommands,
    },

    /// Phase management commands
    Phase {
        #[command(subcommand)]
        command: PhaseCommands,
    },

    /// Asset inventory commands
    Asset {
        #[command(subcommand)]
        command: AssetCommands,
    },

    /// Role assignment commands
    Assignment {
        #[command(subcommand)]
        command: AssignmentCommands,
    },

    /// Success criteria commands
    Criterion {
        #[command(subcommand)]
        command: CriterionCommands,
    },

    /// Saved-mission archive commands
    Archive {
        #[command(subcommand)]
        command: ArchiveCommands,
    },

    /// Import a planning tool's export (node, uxs, platform, mesh, kit)
    Import {
        /// Tool the payload came from
        kind: ImportKind,

        /// Export file to read
        #[arg(required_unless_present = "text", conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Pasted JSON instead of a file
        #[arg(long)]
        text: Option<String>,
    },

    /// Merge the flat entity lists of a project-shaped payload
    Merge {
        /// Payload file to read
        #[arg(required_unless_present = "text", conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Pasted JSON instead of a file
        #[arg(long)]
        text: Option<String>,
    },

    /// Render an export (project, geojson, unit-list, mission-stub)
    Export {
        /// Export format
        format: ExportFormat,

        /// Write to this file or directory instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Endurance, sustainment and comms-risk summary of the active mission
    Feasibility,
}

#[derive(Subcommand, Debug)]
pub enum MissionCommands {
    /// Start a blank mission with the default phases
    New,

    /// Load the "Fjord Recon Lane" example mission
    Example,

    /// Append the demo asset set
    SeedAssets,

    /// Update mission metadata
    Meta {
        #[arg(long)]
        name: Option<String>,

        /// Classification banner shown on every export
        #[arg(long)]
        banner: Option<String>,

        /// Area of operations
        #[arg(long)]
        ao: Option<String>,

        #[arg(long)]
        unit: Option<String>,

        /// Creation date (YYYY-MM-DD)
        #[arg(long)]
        created_on: Option<String>,

        #[arg(long)]
        created_by: Option<String>,

        #[arg(long)]
        mission_type: Option<String>,

        #[arg(long)]
        duration_hours: Option<f64>,

        #[arg(long, value_parser = PossibleValuesParser::new(ALTITUDE_BANDS))]
        altitude_band: Option<String>,

        #[arg(long, value_parser = PossibleValuesParser::new(TEMPERATURE_BANDS))]
        temperature_band: Option<String>,
    },

    /// Update mission constraints
    Constraints {
        #[arg(long)]
        time_window: Option<String>,

        #[arg(long)]
        environment: Option<String>,

        #[arg(long)]
        rf: Option<String>,

        #[arg(long)]
        logistics: Option<String>,

        #[arg(long)]
        max_sorties: Option<u32>,

        /// Minimum battery reserve, percent
        #[arg(long)]
        min_battery_reserve: Option<f64>,

        #[arg(long)]
        requires_rf_coverage: Option<bool>,

        #[arg(long)]
        risk_notes: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PhaseCommands {
    /// Append a phase (named "New Phase" unless given)
    Add {
        name: Option<String>,
    },

    /// Update a phase
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        /// Replace the task list (repeatable)
        #[arg(long = "task")]
        tasks: Option<Vec<String>>,

        #[arg(long)]
        emcon: Option<String>,
    },

    /// Move a phase one slot up or down
    Move {
        id: String,

        #[arg(value_parser = ["up", "down"])]
        direction: String,
    },

    /// Delete a phase
    Delete {
        id: String,
    },

    /// Mark an asset as used in a phase
    Use {
        phase_id: String,
        asset_id: String,

        /// Remove the asset from the phase instead
        #[arg(long)]
        off: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AssetCommands {
    /// Add an asset
    Add {
        name: String,

        /// NODE, UXS, PLATFORM, MESH_ELEMENT, KIT or OTHER
        #[arg(long = "type")]
        asset_type: Option<String>,

        /// Source tool (defaults to Manual)
        #[arg(long)]
        source: Option<String>,

        /// Comma-separated role tags
        #[arg(long)]
        tags: Option<String>,

        #[arg(long)]
        owner: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Edit an asset
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "type")]
        asset_type: Option<String>,

        #[arg(long)]
        source: Option<String>,

        /// Comma-separated role tags (replaces the list)
        #[arg(long)]
        tags: Option<String>,

        #[arg(long)]
        owner: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        critical: Option<bool>,

        #[arg(long)]
        rf_band: Option<String>,

        #[arg(long)]
        battery_wh: Option<f64>,

        #[arg(long)]
        endurance_hours: Option<f64>,

        #[arg(long)]
        endurance_minutes: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Duplicate an asset under a new id
    Duplicate {
        id: String,
    },

    /// Remove an asset (and its phase usage)
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AssignmentCommands {
    /// Bind the first asset to the first phase
    Add,

    /// Update an assignment
    Update {
        id: String,

        #[arg(long)]
        asset: Option<String>,

        #[arg(long)]
        phase: Option<String>,

        #[arg(long)]
        team: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        critical: Option<bool>,

        #[arg(long)]
        requires_comms: Option<bool>,
    },

    /// Remove an assignment
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CriterionCommands {
    /// Append a success criterion
    Add {
        text: String,
    },

    /// Replace the criterion at INDEX (0-based)
    Update {
        index: usize,
        text: String,
    },

    /// Remove the criterion at INDEX (0-based)
    Remove {
        index: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ArchiveCommands {
    /// Save the active mission into the archive
    Save,

    /// List archived missions
    List,

    /// Replace the active mission with an archived copy
    Load {
        id: String,
    },

    /// Delete an archived mission
    Delete {
        id: String,
    },
}
