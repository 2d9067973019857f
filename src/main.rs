//! Agentdock CLI - drive agent-bound containers from the command line

use clap::Parser;
use agentdock::cli::{Args, SubCommand};
use agentdock::{explain, format_output, DockConfig, DockError, OutputFormat, ScriptRunner, View};

fn main() {
    let args = Args::parse();
    agentdock::logging::init(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> agentdock::Result<()> {
    let config = match &args.config {
        Some(path) => DockConfig::load(path)?,
        None => DockConfig::default(),
    };
    let output_format = if args.json { OutputFormat::Json } else { OutputFormat::Human };

    match args.command {
        SubCommand::Containers => {
            let registry = config.build_registry()?;
            let containers: Vec<_> = registry.iter().cloned().collect();
            println!("{}", format_output(&View::Containers(&containers), &output_format));
            Ok(())
        }

        SubCommand::Run { file } => {
            let mut runner = ScriptRunner::new(&config, output_format)?.verbose(args.verbose);
            let result = runner.run_file(&file)?;

            for output in &result.outputs {
                println!("{}", output);
            }

            if !result.success {
                if let Some(err) = result.error {
                    return Err(DockError::ScriptError(err));
                }
            }

            if args.verbose {
                println!("\n--- Script completed: {} statements executed ---", result.statements_executed);
            }

            Ok(())
        }

        SubCommand::Explain { command } => {
            let view = View::Rule {
                command: &command,
                rule: explain(&command),
            };
            println!("{}", format_output(&view, &output_format));
            Ok(())
        }

        SubCommand::Repl { container } => agentdock::repl::run_repl(&config, container),
    }
}
