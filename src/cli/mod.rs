//! CLI Module
//!
//! Command-line interface for the Triptych playground engine.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Triptych - three-pane HTML/CSS/JS playground engine
#[derive(Parser, Debug)]
#[command(name = "triptych")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose pane files into one HTML document
    #[command(name = "compose")]
    Compose {
        /// Markup pane file (starter template when omitted)
        #[arg(short, long)]
        markup: Option<PathBuf>,

        /// Style pane file (starter template when omitted)
        #[arg(short, long)]
        style: Option<PathBuf>,

        /// Script pane file (starter template when omitted)
        #[arg(short = 'j', long)]
        script: Option<PathBuf>,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Render pane files to a preview file
    #[command(name = "preview")]
    Preview {
        /// Markup pane file (starter template when omitted)
        #[arg(short, long)]
        markup: Option<PathBuf>,

        /// Style pane file (starter template when omitted)
        #[arg(short, long)]
        style: Option<PathBuf>,

        /// Script pane file (starter template when omitted)
        #[arg(short = 'j', long)]
        script: Option<PathBuf>,

        /// Preview file to write
        #[arg(short, long, default_value = "preview.html")]
        out: PathBuf,
    },

    /// Generate code for one pane from a prompt
    #[command(name = "generate")]
    Generate {
        /// Pane to generate for: markup, style or script
        target: String,

        /// What to generate
        prompt: String,

        /// File holding the pane's current code, sent as context
        #[arg(short, long)]
        current: Option<PathBuf>,

        /// Write the generated code here instead of stdout
        #[arg(short, long)]
        apply: Option<PathBuf>,
    },

    /// Generate an image for a prompt
    #[command(name = "image")]
    Image {
        /// What to generate
        prompt: String,

        /// Project id to attach the image record to
        #[arg(short, long)]
        project: Option<String>,
    },

    /// List stored projects
    #[command(name = "projects")]
    Projects,

    /// Show one stored project
    #[command(name = "project")]
    Project {
        /// Project id
        id: String,
    },

    /// Save pane files as a project
    #[command(name = "save-project")]
    SaveProject {
        /// Markup pane file (starter template when omitted)
        #[arg(short, long)]
        markup: Option<PathBuf>,

        /// Style pane file (starter template when omitted)
        #[arg(short, long)]
        style: Option<PathBuf>,

        /// Script pane file (starter template when omitted)
        #[arg(short = 'j', long)]
        script: Option<PathBuf>,

        /// Project title
        #[arg(short, long)]
        title: Option<String>,

        /// Project description
        #[arg(short, long)]
        description: Option<String>,

        /// Update this existing project instead of creating one
        #[arg(long)]
        id: Option<String>,

        /// Mark the project public
        #[arg(long)]
        public: bool,
    },

    /// Delete a stored project
    #[command(name = "delete-project")]
    DeleteProject {
        /// Project id
        id: String,
    },

    /// Export the composed document to a directory
    #[command(name = "export")]
    Export {
        /// Markup pane file (starter template when omitted)
        #[arg(short, long)]
        markup: Option<PathBuf>,

        /// Style pane file (starter template when omitted)
        #[arg(short, long)]
        style: Option<PathBuf>,

        /// Script pane file (starter template when omitted)
        #[arg(short = 'j', long)]
        script: Option<PathBuf>,

        /// Directory to export into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Snapshot pane files for crash recovery
    #[command(name = "snapshot")]
    Snapshot {
        /// Markup pane file (starter template when omitted)
        #[arg(short, long)]
        markup: Option<PathBuf>,

        /// Style pane file (starter template when omitted)
        #[arg(short, long)]
        style: Option<PathBuf>,

        /// Script pane file (starter template when omitted)
        #[arg(short = 'j', long)]
        script: Option<PathBuf>,

        /// Snapshot directory (config default when omitted)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Recover the latest snapshot
    #[command(name = "recover")]
    Recover {
        /// Snapshot directory (config default when omitted)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Write the recovered panes into this directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print suggested prompts for a generation target
    #[command(name = "suggest")]
    Suggest {
        /// Target: markup, style, script or image
        target: String,
    },

    /// Store the generation API key in the config file
    #[command(name = "set-key")]
    SetKey {
        /// API key for the generation service
        key: String,
    },

    /// Show the current configuration
    #[command(name = "config")]
    ShowConfig,
}
