use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for stutra
/// Classroom attendance log with CSV export, backed by SQLite
#[derive(Parser)]
#[command(
    name = "stutra",
    version = env!("CARGO_PKG_VERSION"),
    about = "Classroom attendance tracker: record status changes and export per-day attendance as CSV",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the student roster
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// Record a status change for a student
    Mark {
        /// Student id (see `student list`)
        student_id: i64,

        /// present | absent | washroom | activity | bunking
        status: String,

        /// Attendance day (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,

        /// Wall-clock instant in milliseconds since epoch, default now
        #[arg(long = "at", value_name = "MS")]
        at: Option<i64>,
    },

    /// Export attendance as CSV or JSON
    Export {
        #[command(flatten)]
        period: PeriodArgs,

        /// Section filter ("All" keeps every student)
        #[arg(long)]
        section: Option<String>,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file (default: <export_dir>/<suggested name>)
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "file")]
        stdout: bool,

        /// Overwrite without asking
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Per-section head count for one day
    Summary {
        /// Attendance day (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        section: Option<String>,

        /// Also write the table as CSV
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },
}

#[derive(Subcommand)]
pub enum StudentAction {
    /// Add one student
    Add {
        #[arg(long)]
        name: String,

        #[arg(long = "admission", value_name = "NUMBER")]
        admission: String,

        /// Section membership; repeat for several sections
        #[arg(long = "section")]
        sections: Vec<String>,
    },

    /// List students with their roll numbers
    List {
        #[arg(long)]
        section: Option<String>,
    },

    /// Bulk import from a CSV or JSON roster file
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,
    },
}

/// One of `--date`, `--from/--to` or `--range`.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = true)]
pub struct PeriodArgs {
    /// Single attendance day (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["from", "to", "range"])]
    pub date: Option<String>,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long, requires = "to", conflicts_with = "range")]
    pub from: Option<String>,

    /// Last day of the range (YYYY-MM-DD)
    #[arg(long, requires = "from", conflicts_with = "range")]
    pub to: Option<String>,

    /// YYYY-MM-DD, YYYY-MM or YYYY-MM-DD:YYYY-MM-DD
    #[arg(long, short)]
    pub range: Option<String>,
}
