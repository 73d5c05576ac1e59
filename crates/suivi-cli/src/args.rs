use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    ActArgs, DefinitionCommands, RecordCommands, UserCommands, WorkshopCommands,
};

/// Quality-control checklist tracking for workshop production runs
///
/// Each production run gets a record (fiche de suivi) that an operator fills
/// in and a controller inspects: the component measurement, the mortar mix,
/// then the checklist steps in order, with incidents, a retrospective and
/// the final sign-off of both participants.
#[derive(Parser)]
#[command(version, about, name = "suivi")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/suivi/suivi.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Without a subcommand, the record list is shown.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage user accounts
    #[command(alias = "u")]
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage workshops
    #[command(alias = "w")]
    Workshop {
        #[command(subcommand)]
        command: WorkshopCommands,
    },
    /// Manage the step template used by new records
    #[command(alias = "d")]
    Definition {
        #[command(subcommand)]
        command: DefinitionCommands,
    },
    /// Open, list, show and export records
    #[command(alias = "r")]
    Record {
        #[command(subcommand)]
        command: RecordCommands,
    },
    /// Act on a record as one of its participants
    #[command(alias = "a")]
    Act(ActArgs),
}
