//! Command-line argument wrappers and their handlers
//!
//! Every argument structure here carries the clap derives and converts into
//! the matching core parameter type with `From`, so core params stay free of
//! CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Tracker
//! ```
//!
//! [`Cli`] owns the tracker and the terminal renderer and runs one parsed
//! command to completion.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use log::debug;
use suivi_core::{
    display::{
        CreateResult, DeleteResult, OperationStatus, RecordSummaries, StepDefinitions,
        UpdateResult, Users, Workshops,
    },
    models::{MixChecklist, Role, StepValidation},
    params::*,
    workflow::{Command, StepAction, TaskCommand, TimerAction},
    Tracker,
};

use crate::renderer::TerminalRenderer;

// ============================================================================
// Shared value enums
// ============================================================================

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    /// Runs the production and fills in the record
    Operator,
    /// Inspects the production and validates it
    Controller,
}

impl From<RoleArg> for Role {
    fn from(val: RoleArg) -> Self {
        match val {
            RoleArg::Operator => Role::Operator,
            RoleArg::Controller => Role::Controller,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TimerActionArg {
    Start,
    Pause,
    Resume,
    Finish,
}

impl From<TimerActionArg> for TimerAction {
    fn from(val: TimerActionArg) -> Self {
        match val {
            TimerActionArg::Start => TimerAction::Start,
            TimerActionArg::Pause => TimerAction::Pause,
            TimerActionArg::Resume => TimerAction::Resume,
            TimerActionArg::Finish => TimerAction::Finish,
        }
    }
}

/// Inspection outcome set on a step with `act <record> step <id> status`
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum StepStatusArg {
    /// Back to not inspected
    Pending,
    /// Passed inspection; the next step unlocks
    Conforming,
    /// Failed inspection; the step stays active
    NonConforming,
}

impl From<StepStatusArg> for StepValidation {
    fn from(val: StepStatusArg) -> Self {
        match val {
            StepStatusArg::Pending => StepValidation::Pending,
            StepStatusArg::Conforming => StepValidation::Conforming,
            StepStatusArg::NonConforming => StepValidation::NonConforming,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ChecklistItemArg {
    VerserEau,
    AjouterFibre,
    #[value(name = "melanger-1min")]
    Melanger1Min,
    VerserCiment,
    AjusterEau,
    MesurerDensite,
}

fn checklist(items: &[ChecklistItemArg]) -> MixChecklist {
    let mut checklist = MixChecklist::default();
    for item in items {
        let field = match item {
            ChecklistItemArg::VerserEau => &mut checklist.verser_eau,
            ChecklistItemArg::AjouterFibre => &mut checklist.ajouter_fibre,
            ChecklistItemArg::Melanger1Min => &mut checklist.melanger_1min,
            ChecklistItemArg::VerserCiment => &mut checklist.verser_ciment,
            ChecklistItemArg::AjusterEau => &mut checklist.ajuster_eau,
            ChecklistItemArg::MesurerDensite => &mut checklist.mesurer_densite,
        };
        *field = true;
    }
    checklist
}

// ============================================================================
// Users
// ============================================================================

/// Request an account
///
/// The account is created inactive and must be activated before its owner
/// can open or act on records.
#[derive(Args)]
pub struct SignupArgs {
    /// Login name, unique across users
    pub username: String,
    #[arg(short, long, help = "Contact email address")]
    pub email: String,
    #[arg(short, long, value_enum, help = "Role the account acts with")]
    pub role: RoleArg,
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
}

impl From<SignupArgs> for SignupRequest {
    fn from(val: SignupArgs) -> Self {
        SignupRequest {
            username: val.username,
            email: val.email,
            first_name: val.first_name,
            last_name: val.last_name,
            role: val.role.into(),
        }
    }
}

#[derive(Args)]
pub struct UserIdArgs {
    #[arg(help = "Unique identifier of the user")]
    pub id: u64,
}

impl From<UserIdArgs> for Id {
    fn from(val: UserIdArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Args)]
pub struct ListUsersArgs {
    /// Only show activated accounts
    #[arg(long)]
    pub active: bool,
}

impl From<ListUsersArgs> for ListUsers {
    fn from(val: ListUsersArgs) -> Self {
        ListUsers {
            active_only: val.active,
        }
    }
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Request an account
    Signup(SignupArgs),
    /// Activate a pending account
    #[command(alias = "a")]
    Activate(UserIdArgs),
    /// Show one account
    #[command(alias = "s")]
    Show(UserIdArgs),
    /// List accounts
    #[command(aliases = ["l", "ls"])]
    List(ListUsersArgs),
}

// ============================================================================
// Workshops and step definitions
// ============================================================================

#[derive(Args)]
pub struct AddWorkshopArgs {
    /// Name of the workshop
    pub name: String,
}

impl From<AddWorkshopArgs> for CreateWorkshop {
    fn from(val: AddWorkshopArgs) -> Self {
        CreateWorkshop { name: val.name }
    }
}

#[derive(Args)]
pub struct RenameWorkshopArgs {
    #[arg(help = "Unique identifier of the workshop to rename")]
    pub id: u64,
    /// New name
    pub name: String,
}

impl From<RenameWorkshopArgs> for RenameWorkshop {
    fn from(val: RenameWorkshopArgs) -> Self {
        RenameWorkshop {
            id: val.id,
            name: val.name,
        }
    }
}

/// Remove a workshop together with every record run in it
#[derive(Args)]
pub struct RemoveWorkshopArgs {
    #[arg(help = "Unique identifier of the workshop to remove")]
    pub id: u64,
    /// Confirm the removal (required, records are deleted too)
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Subcommand)]
pub enum WorkshopCommands {
    /// Add a workshop
    #[command(alias = "a")]
    Add(AddWorkshopArgs),
    /// List workshops
    #[command(aliases = ["l", "ls"])]
    List,
    /// Rename a workshop
    Rename(RenameWorkshopArgs),
    /// Remove a workshop and its records
    #[command(aliases = ["d", "rm"])]
    Remove(RemoveWorkshopArgs),
}

/// Add a step to the checklist template
///
/// Only records opened afterwards get the new step.
#[derive(Args)]
pub struct AddDefinitionArgs {
    #[arg(help = "Position of the step in the checklist, unique")]
    pub order: u32,
    /// Name of the step
    pub name: String,
    #[arg(short, long, help = "What the step is about")]
    pub description: Option<String>,
    #[arg(short, long, help = "Instructions (consignes) shown to the operator")]
    pub instructions: Option<String>,
}

impl From<AddDefinitionArgs> for CreateStepDefinition {
    fn from(val: AddDefinitionArgs) -> Self {
        CreateStepDefinition {
            name: val.name,
            description: val.description,
            instructions: val.instructions,
            order: val.order,
        }
    }
}

#[derive(Subcommand)]
pub enum DefinitionCommands {
    /// Add a step to the checklist template
    #[command(alias = "a")]
    Add(AddDefinitionArgs),
    /// List the checklist template
    #[command(aliases = ["l", "ls"])]
    List,
}

// ============================================================================
// Records
// ============================================================================

/// Open a new record
///
/// Steps are instantiated from the current checklist template.
#[derive(Args)]
pub struct CreateRecordArgs {
    #[arg(long, help = "Active operator running the production")]
    pub operator: u64,
    #[arg(long, help = "Workshop the production runs in")]
    pub workshop: u64,
    #[arg(long, help = "Active controller inspecting the production")]
    pub controller: u64,
}

impl From<CreateRecordArgs> for CreateRecord {
    fn from(val: CreateRecordArgs) -> Self {
        CreateRecord {
            operator_id: val.operator,
            workshop_id: val.workshop,
            controller_id: val.controller,
        }
    }
}

#[derive(Args)]
pub struct ListRecordsArgs {
    #[arg(long, help = "Only show records run by this operator")]
    pub operator: Option<u64>,
}

impl From<ListRecordsArgs> for ListRecords {
    fn from(val: ListRecordsArgs) -> Self {
        ListRecords {
            operator_id: val.operator,
        }
    }
}

#[derive(Args)]
pub struct ShowRecordArgs {
    #[arg(help = "Unique identifier of the record to show")]
    pub id: u64,
}

impl From<ShowRecordArgs> for Id {
    fn from(val: ShowRecordArgs) -> Self {
        Id { id: val.id }
    }
}

/// Export a record as a flat table
#[derive(Args)]
pub struct ExportRecordArgs {
    #[arg(help = "Unique identifier of the record to export")]
    pub id: u64,
    /// Emit JSON instead of a markdown table
    #[arg(long)]
    pub json: bool,
    /// Write the export to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum RecordCommands {
    /// Open a new record
    #[command(alias = "c")]
    Create(CreateRecordArgs),
    /// List records, newest first
    #[command(aliases = ["l", "ls"])]
    List(ListRecordsArgs),
    /// Show a full record
    #[command(alias = "s")]
    Show(ShowRecordArgs),
    /// Export a record
    #[command(alias = "e")]
    Export(ExportRecordArgs),
}

// ============================================================================
// Record actions
// ============================================================================

/// Component measurement form; quantities are given as typed
#[derive(Args)]
pub struct MeasurementFormArgs {
    #[arg(long)]
    pub ciment: Option<String>,
    #[arg(long)]
    pub sable: Option<String>,
    #[arg(long)]
    pub agent_moussant: Option<String>,
    #[arg(long)]
    pub fibre_verre: Option<String>,
    #[arg(long)]
    pub dsp_xl: Option<String>,
    #[arg(long)]
    pub hdr: Option<String>,
    #[arg(long)]
    pub eau: Option<String>,
    #[arg(short, long)]
    pub comments: Option<String>,
}

impl From<MeasurementFormArgs> for MeasurementInput {
    fn from(val: MeasurementFormArgs) -> Self {
        MeasurementInput {
            ciment: val.ciment,
            sable: val.sable,
            agent_moussant: val.agent_moussant,
            fibre_verre: val.fibre_verre,
            dsp_xl: val.dsp_xl,
            hdr: val.hdr,
            eau: val.eau,
            comments: val.comments,
        }
    }
}

/// Mortar mix form; unlisted checklist items are left unticked
#[derive(Args)]
pub struct MixFormArgs {
    #[arg(long)]
    pub density: Option<String>,
    #[arg(short, long)]
    pub comments: Option<String>,
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        help = "Ticked checklist items as comma-separated list"
    )]
    pub checked: Vec<ChecklistItemArg>,
}

impl From<MixFormArgs> for MixInput {
    fn from(val: MixFormArgs) -> Self {
        MixInput {
            density: val.density,
            comments: val.comments,
            checklist: checklist(&val.checked),
        }
    }
}

#[derive(Subcommand)]
pub enum MeasurementCommands {
    /// Drive the measurement timer
    Timer {
        #[arg(value_enum)]
        action: TimerActionArg,
    },
    /// Save the form without validating
    Save(MeasurementFormArgs),
    /// Fill in any given fields, then validate
    Validate(MeasurementFormArgs),
}

impl From<MeasurementCommands> for TaskCommand<MeasurementInput> {
    fn from(val: MeasurementCommands) -> Self {
        match val {
            MeasurementCommands::Timer { action } => TaskCommand::Timer(action.into()),
            MeasurementCommands::Save(form) => TaskCommand::Save(form.into()),
            MeasurementCommands::Validate(form) => TaskCommand::Validate(form.into()),
        }
    }
}

#[derive(Subcommand)]
pub enum MixCommands {
    /// Drive the mix timer
    Timer {
        #[arg(value_enum)]
        action: TimerActionArg,
    },
    /// Save the form without validating
    Save(MixFormArgs),
    /// Fill in the form, then validate
    Validate(MixFormArgs),
}

impl From<MixCommands> for TaskCommand<MixInput> {
    fn from(val: MixCommands) -> Self {
        match val {
            MixCommands::Timer { action } => TaskCommand::Timer(action.into()),
            MixCommands::Save(form) => TaskCommand::Save(form.into()),
            MixCommands::Validate(form) => TaskCommand::Validate(form.into()),
        }
    }
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Replace the step observations
    #[command(alias = "o")]
    Observe { text: String },
    /// Record the inspection outcome (controller)
    Status {
        #[arg(value_enum)]
        status: StepStatusArg,
    },
    /// Sign the step for your role
    Sign,
    /// Drive the step timer (operator)
    Timer {
        #[arg(value_enum)]
        action: TimerActionArg,
    },
}

impl From<StepCommands> for StepAction {
    fn from(val: StepCommands) -> Self {
        match val {
            StepCommands::Observe { text } => StepAction::Observe(text),
            StepCommands::Status { status } => StepAction::SetStatus(status.into()),
            StepCommands::Sign => StepAction::Sign,
            StepCommands::Timer { action } => StepAction::Timer(action.into()),
        }
    }
}

#[derive(Subcommand)]
pub enum ActCommands {
    /// Component measurement
    #[command(alias = "m")]
    Measurement {
        #[command(subcommand)]
        command: MeasurementCommands,
    },
    /// Mortar mix
    Mix {
        #[command(subcommand)]
        command: MixCommands,
    },
    /// One checklist step
    #[command(alias = "s")]
    Step {
        #[arg(help = "Unique identifier of the step")]
        step_id: u64,
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Record an incident
    Incident { description: String },
    /// Write or replace the retrospective
    Retrospective { comment: String },
    /// Sign the record for your role
    Sign,
}

impl From<ActCommands> for Command {
    fn from(val: ActCommands) -> Self {
        match val {
            ActCommands::Measurement { command } => Command::Measurement(command.into()),
            ActCommands::Mix { command } => Command::Mix(command.into()),
            ActCommands::Step { step_id, command } => Command::Step {
                step_id,
                action: command.into(),
            },
            ActCommands::Incident { description } => Command::AddIncident { description },
            ActCommands::Retrospective { comment } => Command::SetRetrospective { comment },
            ActCommands::Sign => Command::SignRecord,
        }
    }
}

/// Act on a record
///
/// The acting user must be the record's operator or controller; each action
/// checks which of the two it requires.
#[derive(Args)]
pub struct ActArgs {
    #[arg(help = "Unique identifier of the record")]
    pub record_id: u64,
    #[arg(long = "as", value_name = "USER_ID", help = "User performing the action")]
    pub actor_id: u64,
    #[command(subcommand)]
    pub command: ActCommands,
}

impl From<ActArgs> for ApplyAction {
    fn from(val: ActArgs) -> Self {
        ApplyAction {
            record_id: val.record_id,
            actor_id: val.actor_id,
            command: val.command.into(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Runs parsed commands against the tracker and renders the results.
pub struct Cli {
    tracker: Tracker,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(tracker: Tracker, renderer: TerminalRenderer) -> Self {
        Self { tracker, renderer }
    }

    pub async fn handle_user_command(&self, command: UserCommands) -> Result<()> {
        match command {
            UserCommands::Signup(args) => {
                let user = self
                    .tracker
                    .signup(&args.into())
                    .await
                    .context("Failed to sign up")?;
                self.renderer.render(&CreateResult::new(user).to_string())
            }
            UserCommands::Activate(args) => {
                let id = args.id;
                let user = self
                    .tracker
                    .activate_user(&args.into())
                    .await
                    .with_context(|| format!("Failed to activate user {id}"))?;
                let result = UpdateResult::with_changes(user, vec!["Account activated".into()]);
                self.renderer.render(&result.to_string())
            }
            UserCommands::Show(args) => {
                let id = args.id;
                match self.tracker.get_user(&args.into()).await? {
                    Some(user) => self.renderer.render(&user.to_string()),
                    None => bail!("User with ID {id} not found"),
                }
            }
            UserCommands::List(args) => {
                let users: Users = self.tracker.list_users_summary(&args.into()).await?;
                self.renderer.render(&users.to_string())
            }
        }
    }

    pub async fn handle_workshop_command(&self, command: WorkshopCommands) -> Result<()> {
        match command {
            WorkshopCommands::Add(args) => {
                let workshop = self
                    .tracker
                    .create_workshop(&args.into())
                    .await
                    .context("Failed to add workshop")?;
                self.renderer.render(&CreateResult::new(workshop).to_string())
            }
            WorkshopCommands::List => {
                let workshops: Workshops = self.tracker.list_workshops_summary().await?;
                self.renderer.render(&workshops.to_string())
            }
            WorkshopCommands::Rename(args) => {
                let (workshop, previous) = self
                    .tracker
                    .rename_workshop(&args.into())
                    .await
                    .context("Failed to rename workshop")?;
                let change = format!("Name: '{previous}' → '{}'", workshop.name);
                self.renderer
                    .render(&UpdateResult::with_changes(workshop, vec![change]).to_string())
            }
            WorkshopCommands::Remove(args) => {
                if !args.confirm {
                    let status = OperationStatus::failure(format!(
                        "Removing workshop {} also deletes its records; pass --confirm to proceed",
                        args.id
                    ));
                    self.renderer.render(&status.to_string())?;
                    bail!("Removal of workshop {} not confirmed", args.id);
                }
                let workshop = self
                    .tracker
                    .remove_workshop(&Id { id: args.id })
                    .await
                    .with_context(|| format!("Failed to remove workshop {}", args.id))?;
                self.renderer.render(&DeleteResult::new(workshop).to_string())
            }
        }
    }

    pub async fn handle_definition_command(&self, command: DefinitionCommands) -> Result<()> {
        match command {
            DefinitionCommands::Add(args) => {
                let definition = self
                    .tracker
                    .add_step_definition(&args.into())
                    .await
                    .context("Failed to add step definition")?;
                self.renderer
                    .render(&CreateResult::new(definition).to_string())
            }
            DefinitionCommands::List => {
                let definitions: StepDefinitions =
                    self.tracker.list_step_definitions_summary().await?;
                self.renderer.render(&definitions.to_string())
            }
        }
    }

    pub async fn handle_record_command(&self, command: RecordCommands) -> Result<()> {
        match command {
            RecordCommands::Create(args) => {
                let record = self
                    .tracker
                    .create_record(&args.into())
                    .await
                    .context("Failed to open record")?;
                self.renderer.render(&CreateResult::new(record).to_string())
            }
            RecordCommands::List(args) => self.list_records(&args.into()).await,
            RecordCommands::Show(args) => {
                let id = args.id;
                let record = self
                    .tracker
                    .load_record(&args.into())
                    .await
                    .with_context(|| format!("Failed to load record {id}"))?;
                self.renderer.render(&record.to_string())
            }
            RecordCommands::Export(args) => self.export_record(args).await,
        }
    }

    pub async fn list_records(&self, params: &ListRecords) -> Result<()> {
        let records: RecordSummaries = self.tracker.list_records_summary(params).await?;
        self.renderer.render(&records.to_string())
    }

    async fn export_record(&self, args: ExportRecordArgs) -> Result<()> {
        let export = self
            .tracker
            .export_record(&Id { id: args.id })
            .await
            .with_context(|| format!("Failed to export record {}", args.id))?;
        let content = if args.json {
            serde_json::to_string_pretty(&export).context("Failed to serialize export")?
        } else {
            export.to_string()
        };

        match args.output {
            Some(path) => {
                std::fs::write(&path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                debug!("Record {} exported to {}", args.id, path.display());
                let status = OperationStatus::success(format!(
                    "Record {} exported to {}",
                    args.id,
                    path.display()
                ));
                self.renderer.render(&status.to_string())
            }
            None if args.json => {
                println!("{content}");
                Ok(())
            }
            None => self.renderer.render(&content),
        }
    }

    pub async fn handle_act(&self, args: ActArgs) -> Result<()> {
        let params: ApplyAction = args.into();
        let (_, outcome) = self
            .tracker
            .apply_action(&params)
            .await
            .with_context(|| {
                format!(
                    "Failed to apply {} to record {}",
                    params.command, params.record_id
                )
            })?;
        self.renderer.render(&outcome.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checklist_from_items() {
        let checklist = checklist(&[ChecklistItemArg::VerserEau, ChecklistItemArg::Melanger1Min]);
        assert!(checklist.verser_eau);
        assert!(checklist.melanger_1min);
        assert!(!checklist.mesurer_densite);
    }

    #[test]
    fn test_act_args_convert_to_command() {
        let args = ActArgs {
            record_id: 4,
            actor_id: 2,
            command: ActCommands::Step {
                step_id: 9,
                command: StepCommands::Status {
                    status: StepStatusArg::NonConforming,
                },
            },
        };
        let params: ApplyAction = args.into();
        assert_eq!(params.record_id, 4);
        assert_eq!(params.actor_id, 2);
        assert_eq!(
            params.command,
            Command::Step {
                step_id: 9,
                action: StepAction::SetStatus(StepValidation::NonConforming),
            }
        );
    }
}
