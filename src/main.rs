use clap::Parser;
use tracing::debug;
use workflow_advisor::cli::{handle_generate, CliArgs, Commands};
use workflow_advisor::util::init_logging;
use workflow_advisor::VERSION;

fn main() {
    let args = CliArgs::parse();
    init_logging(args.logging_config());

    debug!("workflow-advisor v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Generate(generate_args) => handle_generate(generate_args),
    };

    std::process::exit(exit_code);
}
