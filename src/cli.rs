use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chronosnap")]
#[command(about = "Send yourself back in time: restyle or describe a photo with Gemini", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the era presets
    Eras,

    /// Transform a photo into an era or apply a custom edit
    Edit {
        /// Source photo
        #[arg(required = true)]
        image: PathBuf,

        /// Era preset id (see `chronosnap eras`)
        #[arg(short, long)]
        era: Option<String>,

        /// Custom edit instruction, e.g. "Add sunglasses"
        #[arg(short, long)]
        prompt: Option<String>,

        /// Output PNG (default: chronosnap-result.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Describe a photo
    Analyze {
        /// Photo to analyze
        #[arg(required = true)]
        image: PathBuf,

        /// Question or instruction (default: lighting, subjects and mood)
        #[arg(short, long)]
        prompt: Option<String>,
    },

    /// Show or edit settings
    Config {
        /// Store the Gemini API key
        #[arg(long)]
        set_api_key: Option<String>,

        /// Show settings
        #[arg(long)]
        show: bool,
    },
}
