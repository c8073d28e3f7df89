use clap::{Parser, Subcommand};

pub mod error;
pub mod handler;

/// Gantt chart export grabber
#[derive(Parser, Debug)]
#[command(name = "ganttgrab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Override the settings file path
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<std::path::PathBuf>,

    /// WebDriver endpoint the browser is driven through
    #[arg(long, global = true, value_name = "URL", default_value = "http://localhost:9515")]
    pub webdriver: String,

    /// Enable verbose logging (TRACE level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute; without one, the full export run starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the stored credentials can log in, then exit
    TestLogin,

    /// Store the login email, prompting for the password separately
    SetEmail {
        /// Email address
        email: String,
    },

    /// Store the project identifier list
    SetProjects {
        /// Project identifiers as shown in the site's DOM, comma-separated
        projects: String,
    },

    /// Store the directory exported files are saved to
    SetSavePath {
        /// Existing directory
        path: std::path::PathBuf,
    },

    /// Store the login URL
    SetUrl {
        /// Login URL of the site
        url: String,
    },
}
