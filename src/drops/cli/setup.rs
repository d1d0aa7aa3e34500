use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "drops", bin_name = "drops", version = get_version())]
#[command(about = "Share files, links and notes as shortlinks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Machine-readable output: bare tab-separated values, no colors
    #[arg(long, global = true)]
    pub porcelain: bool,

    /// Log remote calls and reconciliation steps to stderr
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Flags shared by every command that creates a drop.
#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Title for the drop
    #[arg(short, long)]
    pub title: Option<String>,

    /// Make the drop private
    #[arg(long, conflicts_with = "public")]
    pub private: bool,

    /// Make the drop public even when the configured default is private
    #[arg(long)]
    pub public: bool,

    /// Protect the drop with a password
    #[arg(long)]
    pub password: Option<String>,

    /// Board name or id to add the drop to
    #[arg(short, long)]
    pub board: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a file
    Upload {
        path: PathBuf,

        #[command(flatten)]
        options: CreateArgs,
    },

    /// Shorten a link
    Link {
        url: String,

        #[command(flatten)]
        options: CreateArgs,
    },

    /// Create a text or code note
    Note {
        /// Note text
        #[arg(conflicts_with_all = ["file", "code"])]
        text: Option<String>,

        /// Read the note from a file
        #[arg(short, long, conflicts_with = "code")]
        file: Option<PathBuf>,

        /// Create a code note from this snippet
        #[arg(short, long)]
        code: Option<String>,

        /// Language for syntax highlighting
        #[arg(short, long)]
        lang: Option<String>,

        /// Treat the text or stdin input as code
        #[arg(long = "as-code", conflicts_with = "code")]
        as_code: bool,

        #[command(flatten)]
        options: CreateArgs,
    },

    /// List your drops
    #[command(alias = "ls")]
    List,

    /// Delete a drop
    #[command(alias = "rm")]
    Delete {
        /// Drop code
        code: String,
    },

    /// List boards, or show one board
    Boards {
        /// Board id
        id: Option<String>,
    },

    /// Store credentials for the service
    Login {
        /// API token
        #[arg(long, conflicts_with_all = ["username", "password"])]
        token: Option<String>,

        /// Account user name
        #[arg(short, long, required_unless_present = "token")]
        username: Option<String>,

        /// Account password (read from stdin when omitted)
        #[arg(short, long, requires = "username")]
        password: Option<String>,
    },

    /// Remove stored credentials
    Logout,

    /// Show which credentials are stored
    Whoami,

    /// Get or set configuration values
    Config {
        /// Configuration key (api-url, privacy, board)
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },
}
