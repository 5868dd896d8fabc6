use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "A single-user kanban task board for the terminal", long_about = None)]
#[command(version, arg_required_else_help = false)]
pub struct Cli {
    /// Path to the board data file (or set TASKBOARD_FILE)
    #[arg(long, value_name = "FILE", env = "TASKBOARD_FILE", global = true)]
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Task operations
    Task(TaskCommand),
    /// Board operations
    Board(BoardCommand),
    /// Column operations
    Column(ColumnCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a column
    Add(TaskAddArgs),
    /// List tasks
    List(TaskListArgs),
    /// Show one task
    Get {
        #[arg(long)]
        id: String,
    },
    /// Edit a task's title, description or priority
    Edit(TaskEditArgs),
    /// Move a task to another column
    Move {
        #[arg(long)]
        id: String,
        /// Target column: todo, in-progress or done
        #[arg(long)]
        status: String,
    },
    /// Delete a task
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Args)]
pub struct TaskAddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Column: todo, in-progress or done
    #[arg(long, default_value = "todo")]
    pub status: String,
    /// Priority: low, medium or high
    #[arg(long)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct TaskListArgs {
    #[arg(long)]
    pub status: Option<String>,
    /// Case-insensitive text matched against title and description
    #[arg(long)]
    pub search: Option<String>,
    /// Match the search text against titles only
    #[arg(long, requires = "search")]
    pub title_only: bool,
}

#[derive(Args)]
pub struct TaskEditArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "clear_priority")]
    pub priority: Option<String>,
    #[arg(long)]
    pub clear_priority: bool,
}

#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Show every column with its visible tasks
    Show {
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Args)]
pub struct ColumnCommand {
    #[command(subcommand)]
    pub action: ColumnAction,
}

#[derive(Subcommand)]
pub enum ColumnAction {
    /// List columns in display order
    List,
    /// Move a column to a new position
    Move {
        #[arg(long)]
        status: String,
        #[arg(long)]
        index: usize,
    },
}
