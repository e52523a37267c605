use crate::util::logging::{parse_level, LoggingConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

/// Generate CI workflow jobs from the contents of a source tree
#[derive(Parser, Debug)]
#[command(
    name = "workflow-advisor",
    about = "Generate CI workflow jobs from the contents of a source tree",
    version,
    long_about = "workflow-advisor inspects a source tree with one or more ecosystem \
                  generators (go, js, python, java, csharp) and adds a build job for every \
                  ecosystem it recognises to a workflow file, creating the file if needed."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Starts from the environment; `--log-level` wins over `-v`/`-q`, which
    /// win over `WORKFLOW_ADVISOR_LOG_LEVEL`
    pub fn logging_config(&self) -> LoggingConfig {
        let config = LoggingConfig::from_env();
        match self.level_override() {
            Some(level) => LoggingConfig { level, ..config },
            None => config,
        }
    }

    fn level_override(&self) -> Option<Level> {
        if let Some(level_str) = &self.log_level {
            Some(parse_level(level_str))
        } else if self.verbose {
            Some(Level::DEBUG)
        } else if self.quiet {
            Some(Level::ERROR)
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Add detected build jobs to a workflow file",
        long_about = "Runs the requested generators in order against the source tree and \
                      writes the resulting workflow. The file is left untouched if any \
                      generator fails.\n\n\
                      Examples:\n  \
                      workflow-advisor generate -g go -w workflow.yaml --src .\n  \
                      workflow-advisor generate -g js,python -w .cloudbees/workflows/ci.yaml --src ./app"
    )]
    Generate(GenerateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        short = 'g',
        long = "generator",
        value_name = "NAME",
        required = true,
        value_delimiter = ',',
        help = "Generator to run; repeat or comma-separate for several"
    )]
    pub generators: Vec<String>,

    #[arg(
        short = 'w',
        long,
        value_name = "FILE",
        help = "Workflow file to update (created if missing)"
    )]
    pub workflow: PathBuf,

    #[arg(long, value_name = "DIR", help = "Root of the source tree to inspect")]
    pub src: PathBuf,
}
