use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskdeck::core::db::{DEFAULT_USER_NAME, parse_birth_date};
use taskdeck::core::photo::encode_profile_photo;
use taskdeck::{
    DashboardDb, FileStorage, NewProject, NewUser, ProjectRepository, TaskRepository,
    UserRepository, UserUpdate,
};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Manage profiles, projects and their task lists")]
struct Cli {
    /// Storage file holding the dashboard
    #[arg(long, value_name = "FILE", env = "TASKDECK_DATA", default_value = "taskdeck.json")]
    data_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List profiles
    Users,
    /// Manage the active profile
    #[command(subcommand)]
    User(UserCommand),
    /// List projects
    Projects,
    #[command(subcommand)]
    Project(ProjectCommand),
    /// List tasks of the active project
    Tasks {
        /// Show another project's tasks instead
        #[arg(long, value_name = "ID")]
        project: Option<String>,
    },
    #[command(subcommand)]
    Task(TaskCommand),
    /// Show completion of the active project
    Progress,
}

#[derive(Subcommand)]
enum UserCommand {
    /// Create a profile and switch to it
    Add {
        #[arg(long)]
        name: Option<String>,
    },
    Switch { id: String },
    /// Edit the active profile
    Set {
        #[arg(long)]
        name: Option<String>,
        /// Birth date as YYYY-MM-DD; pass an empty string to clear it
        #[arg(long)]
        birth_date: Option<String>,
        /// Image file to use as the profile photo
        #[arg(long, value_name = "FILE")]
        photo: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a project and switch to it
    Add {
        #[arg(long)]
        name: Option<String>,
    },
    Switch { id: String },
    Rename { id: String, name: String },
    /// Delete a project and all of its tasks
    Remove { id: String },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task to the active project
    Add { title: String },
    /// Mark a task as done
    Done { id: String },
    /// Mark a task as open again
    Undo { id: String },
    Remove { id: String },
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let storage = FileStorage::open(&args.data_file)?;
    let mut db = DashboardDb::new(storage);
    let _changes = db.subscribe(|event, state| {
        info!(event = %event, progress = %state.progress(), "dashboard updated");
    });

    match args.command {
        Command::Users => {
            let active = db.active_user_id();
            for user in db.list_users() {
                let marker = if user.id == active { "*" } else { " " };
                let birth = if user.birth_date.is_empty() { "-" } else { user.birth_date.as_str() };
                let photo = if user.photo_base64.is_empty() { "no photo" } else { "photo" };
                println!("{marker} {}  {}  {birth}  {photo}", user.id, user.name);
            }
        }
        Command::User(UserCommand::Add { name }) => {
            let user = db.add_user(NewUser {
                name: name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty()),
                ..NewUser::default()
            });
            println!("Created profile {} ({})", user.id, user.name);
        }
        Command::User(UserCommand::Switch { id }) => {
            if !db.set_active_user(&id) {
                anyhow::bail!("No profile with id {id}");
            }
        }
        Command::User(UserCommand::Set {
            name,
            birth_date,
            photo,
        }) => {
            if let Some(date) = birth_date.as_deref().filter(|d| !d.trim().is_empty()) {
                if parse_birth_date(date).is_none() {
                    anyhow::bail!("Birth date must be YYYY-MM-DD, got {date:?}");
                }
            }
            let photo_base64 = photo.map(encode_profile_photo).transpose()?;
            let name = name.map(|n| {
                let n = n.trim();
                if n.is_empty() { DEFAULT_USER_NAME.to_owned() } else { n.to_owned() }
            });
            db.set_user(UserUpdate {
                name,
                birth_date: birth_date.map(|d| d.trim().to_owned()),
                photo_base64,
            });
        }
        Command::Projects => {
            let active = db.active_project_id();
            for project in db.list_projects() {
                let marker = if project.id == active { "*" } else { " " };
                let progress = db.state().progress_of(&project.id);
                println!("{marker} {}  {}  {progress}", project.id, project.name);
            }
        }
        Command::Project(ProjectCommand::Add { name }) => {
            let project = db.add_project(NewProject { name });
            println!("Created project {} ({})", project.id, project.name);
        }
        Command::Project(ProjectCommand::Switch { id }) => {
            if !db.set_active_project(&id) {
                anyhow::bail!("No project with id {id}");
            }
        }
        Command::Project(ProjectCommand::Rename { id, name }) => {
            if !db.update_project_name(&id, &name) {
                anyhow::bail!("No project with id {id}");
            }
        }
        Command::Project(ProjectCommand::Remove { id }) => {
            if !db.remove_project(&id) {
                anyhow::bail!("No project with id {id}");
            }
        }
        Command::Tasks { project } => {
            for task in db.get_tasks_by_project(project.as_deref()) {
                let check = if task.done { "[x]" } else { "[ ]" };
                println!("{check} {}  {}", task.id, task.title);
            }
        }
        Command::Task(TaskCommand::Add { title }) => {
            let title = title.trim();
            if title.is_empty() {
                println!("Nothing to add: the title is empty.");
            } else {
                let task = db.add_task(title);
                println!("Added task {}", task.id);
            }
        }
        Command::Task(TaskCommand::Done { id }) => {
            if !db.toggle_task(&id, true) {
                anyhow::bail!("No task with id {id}");
            }
        }
        Command::Task(TaskCommand::Undo { id }) => {
            if !db.toggle_task(&id, false) {
                anyhow::bail!("No task with id {id}");
            }
        }
        Command::Task(TaskCommand::Remove { id }) => {
            if !db.remove_task(&id) {
                anyhow::bail!("No task with id {id}");
            }
        }
        Command::Progress => {
            let project = db.get_active_project();
            let name = project.as_ref().map_or("", |p| p.name.as_str());
            println!("{name}: {}", db.get_progress());
        }
    }

    Ok(())
}
