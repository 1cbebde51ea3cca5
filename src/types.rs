// types.rs
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // Specify custom config path
    #[arg(short, long, default_value = "provisioner_config.json")]
    pub config: String,

    // Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a key pair and write it to disk
    Generate {
        #[arg(long)]
        public: PathBuf,
        #[arg(long)]
        private: PathBuf,
    },
    /// Print whether a framework version needs mounted SSH certs
    Check {
        #[arg(long)]
        framework: String,
        #[arg(long)]
        framework_version: String,
    },
    /// Build the SSH secret for a training job and print its manifest
    Secret {
        #[arg(long)]
        name: String,
        #[arg(long)]
        training_id: String,
        #[arg(long)]
        framework: String,
        #[arg(long)]
        framework_version: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
        // Build even when the policy says no certs are needed
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}
