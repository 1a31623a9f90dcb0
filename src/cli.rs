//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::client::auth::Registration;
use crate::client::upload::{UploadOptions, AUTO_FILE_TYPE};
use crate::client::HttpNotesApi;
use crate::config::{Config, DEFAULT_API_URL, DEFAULT_DEBOUNCE_MS, DEFAULT_TIMEOUT_SECS};
use crate::core::error::NotesError;
use crate::core::render::{OutputFormat, RenderConfig};

/// noteseek - search, download and upload notes on a notes service.
#[derive(Parser, Debug)]
#[command(name = "noteseek")]
#[command(
    author,
    version,
    about,
    long_about = r#"noteseek talks to a notes/file service over its REST API.

Listings are resolved locally: entries are normalized, filtered by every
query token, ranked by where the tokens match, and files under a common
top-level folder collapse into one folder result.

Output formats (search, suggest, rank, live):
- jsonl: one {"name", "isFolder"} object per line (default)
- json: a single JSON array
- md: human-friendly Markdown with matched tokens in bold
- raw: names only, matched tokens highlighted on a terminal

Examples:
    noteseek search "lab report"
    noteseek download cs101/ --out ~/Downloads
    noteseek upload ./week1 --name cs101
    noteseek rank --input listing.json "lab 2"
"#
)]
pub struct Cli {
    /// Base URL of the notes service.
    #[arg(
        long,
        global = true,
        env = "NOTES_API_URL",
        default_value = DEFAULT_API_URL,
        value_name = "URL",
        long_help = "Base URL of the notes service. Request paths such as /api/notes are\n\
appended to it as-is, so a base path (https://host/app) is kept."
    )]
    pub api_url: String,

    /// Request timeout in seconds.
    #[arg(
        long,
        global = true,
        env = "NOTES_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_name = "SECS"
    )]
    pub timeout: u64,

    /// Directory holding the session file.
    #[arg(
        long,
        global = true,
        env = "NOTES_STATE_DIR",
        value_name = "DIR",
        long_help = "Directory holding the session file (session.json).\n\n\
Defaults to <config dir>/noteseek."
    )]
    pub state_dir: Option<PathBuf>,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for result sets.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Tip: Prefer jsonl when you want stable, line-oriented output for piping."
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Only errors are logged, and confirmations (saved paths, upload messages)\n\
are not printed. Result sets are still printed to stdout."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log debug diagnostics to stderr, including every download candidate\n\
tried. RUST_LOG overrides this when set."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the remote listing.
    #[command(
        long_about = "Fetch the listing for QUERY and print ranked, folder-collapsed results.\n\n\
Every query token must appear in a name. Without QUERY, all entries are listed\n\
in server order. A failed request prints an empty result set.\n\n\
Examples:\n\
  noteseek search\n\
  noteseek search \"lab 2\" --format md\n"
    )]
    Search {
        /// Free-text query.
        #[arg(value_name = "QUERY")]
        query: Option<String>,
    },

    /// One as-you-type lookup: blank input yields nothing.
    #[command(
        long_about = "Resolve QUERY the way the as-you-type search does: the query is trimmed,\n\
and a blank query returns an empty result set without contacting the server.\n\n\
Example:\n\
  noteseek suggest hw\n"
    )]
    Suggest {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Rank a saved listing offline.
    #[command(
        long_about = "Run the resolver over a listing saved as JSON (an array, {\"notes\": [...]}\n\
or {\"result\": [...]}). No network access.\n\n\
Examples:\n\
  noteseek rank --input listing.json \"lab report\"\n\
  curl -s $URL/api/notes | noteseek rank --input - --incremental hw\n"
    )]
    Rank {
        /// Listing file, or - for stdin.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Free-text query.
        #[arg(value_name = "QUERY")]
        query: Option<String>,

        /// Use as-you-type semantics (blank query yields nothing).
        #[arg(long)]
        incremental: bool,
    },

    /// Download a file, or a folder as a zip.
    #[command(
        long_about = "Download NAME into --out. Alternative endpoints are tried in order and the\n\
first that answers wins; only when all fail is an error reported.\n\n\
A name ending in '/' (or --folder) is downloaded as <folder>.zip. Existing\n\
files are never overwritten; a \" (n)\" suffix is added instead.\n\n\
Examples:\n\
  noteseek download lab1.pdf\n\
  noteseek download cs101 --folder --out ~/Downloads\n"
    )]
    Download {
        #[arg(value_name = "NAME")]
        name: String,

        /// Treat NAME as a folder.
        #[arg(long)]
        folder: bool,

        /// Output directory.
        #[arg(long, default_value = ".", value_name = "DIR")]
        out: PathBuf,
    },

    /// Upload a file or a folder.
    #[command(
        long_about = "Upload PATH. A directory is sent as one batch with every file's relative\n\
path and a manifest. The name is checked against the listing first.\n\n\
Examples:\n\
  noteseek upload notes.pdf --name week1 --type pdf\n\
  noteseek upload ./course --name cs101 --description \"Fall term\"\n"
    )]
    Upload {
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Custom name (folders: replaces the root directory name).
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// File type; sets the extension appended to a custom name.
        #[arg(
            long = "type",
            default_value = AUTO_FILE_TYPE,
            value_parser = ["auto", "pdf", "docx", "doc", "txt", "png", "jpg", "jpeg", "csv", "xlsx", "pptx"],
            value_name = "TYPE"
        )]
        file_type: String,

        #[arg(long, value_name = "TEXT")]
        description: Option<String>,
    },

    /// Interactive search driven by stdin lines.
    #[command(
        long_about = "Read queries from stdin, one per line, as if typed into a search box.\n\
Each line restarts the quiet period; only the last line of a burst is searched.\n\
A line starting with '!' is submitted immediately. Results are printed every\n\
time they change.\n"
    )]
    Live {
        /// Quiet period in milliseconds.
        #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS, value_name = "N")]
        debounce_ms: u64,
    },

    /// Sign in and remember the user.
    Login {
        #[arg(long, value_name = "USER")]
        username: String,

        /// Password; read from stdin when omitted.
        #[arg(long, env = "NOTES_PASSWORD", hide_env_values = true, value_name = "PASSWORD")]
        password: Option<String>,
    },

    /// Create an account.
    Register {
        #[arg(long, value_name = "USER")]
        username: String,

        /// Password; read from stdin when omitted.
        #[arg(long, env = "NOTES_PASSWORD", hide_env_values = true, value_name = "PASSWORD")]
        password: Option<String>,

        #[arg(long, default_value = "", value_name = "NAME")]
        full_name: String,

        #[arg(long, default_value = "", value_name = "EMAIL")]
        email: String,

        #[arg(long, default_value = "", value_name = "PHONE")]
        phone: String,
    },

    /// Forget the stored session.
    Logout,

    /// Print the signed-in user.
    Whoami,

    /// Save a quick note as my-notes.txt.
    #[command(
        long_about = "Write TEXT (or stdin when omitted) to <out>/my-notes.txt, replacing any\n\
earlier note.\n"
    )]
    Note {
        #[arg(value_name = "TEXT")]
        text: Option<String>,

        #[arg(long, default_value = ".", value_name = "DIR")]
        out: PathBuf,
    },

    /// Check configuration and backend reachability.
    Doctor,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config::new(self.api_url.clone(), self.timeout, self.state_dir.clone())
    }
}

/// Process exit code for a failed command
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<NotesError>() {
        Some(NotesError::NameTaken(_)) => 2,
        _ => 1,
    }
}

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let color = !cli.no_color;
    if !color {
        colored::control::set_override(false);
    }
    let render_config = RenderConfig::with_pretty(format, cli.pretty).with_color(color);

    let config = cli.config();
    tracing::debug!(api_url = %config.api_url, state_dir = %config.state_dir.display(), "config");
    let quiet = cli.quiet;

    match cli.command {
        Commands::Search { query } => {
            let api = connect(&config)?;
            crate::flows::search::run_search(&api, query.as_deref(), render_config).await
        }

        Commands::Suggest { query } => {
            let api = connect(&config)?;
            crate::flows::search::run_suggest(&api, &query, render_config).await
        }

        Commands::Rank {
            input,
            query,
            incremental,
        } => {
            crate::flows::search::run_rank(&input, query.as_deref(), incremental, render_config)
                .await
        }

        Commands::Download { name, folder, out } => {
            let api = connect(&config)?;
            crate::flows::transfer::run_download(&api, &name, folder, &out, quiet).await
        }

        Commands::Upload {
            path,
            name,
            file_type,
            description,
        } => {
            let api = connect(&config)?;
            let options = UploadOptions {
                custom_name: name,
                file_type: Some(file_type),
                description,
            };
            crate::flows::transfer::run_upload(&api, &path, options, quiet).await
        }

        Commands::Live { debounce_ms } => {
            let config = config.with_debounce_ms(debounce_ms);
            let api = Arc::new(connect(&config)?);
            crate::flows::live::run_live(api, config.debounce, render_config).await
        }

        Commands::Login { username, password } => {
            let api = connect(&config)?;
            let password = crate::flows::account::resolve_password(password)?;
            crate::flows::account::run_login(&api, &config.state_dir, &username, &password, quiet)
                .await
        }

        Commands::Register {
            username,
            password,
            full_name,
            email,
            phone,
        } => {
            let api = connect(&config)?;
            let registration = Registration {
                username,
                password: crate::flows::account::resolve_password(password)?,
                full_name,
                email,
                phone_number: phone,
            };
            crate::flows::account::run_register(&api, &registration, quiet).await
        }

        Commands::Logout => crate::flows::account::run_logout(&config.state_dir, quiet).await,

        Commands::Whoami => crate::flows::account::run_whoami(&config.state_dir).await,

        Commands::Note { text, out } => crate::flows::note::run_note(text, &out, quiet).await,

        Commands::Doctor => {
            let api = connect(&config)?;
            crate::flows::doctor::run_doctor(&api, &config, render_config.color).await
        }
    }
}

fn connect(config: &Config) -> Result<HttpNotesApi> {
    HttpNotesApi::new(config).context("Failed to create HTTP client")
}
