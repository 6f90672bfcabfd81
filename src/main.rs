use clap::{Parser as ClapParser, Subcommand};
use sqi::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "sqi")]
#[command(about = "sqi - A path query language for navigating and filtering structured values")]
#[command(version)]
struct Cli {
    /// Log filter (e.g. warn, debug, sqi=trace); falls back to SQI_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and evaluate an expression against JSON input
    Check {
        /// The expression to evaluate
        expression: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Treat comparisons between mismatched kinds as errors
        #[arg(short, long)]
        strict: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print every compile stage of an expression
    Explain {
        /// The expression to explain
        expression: String,
    },
}

fn main() {
    let cli = Cli::parse();
    cli::logging::init_logging(cli.log_level.as_deref());

    let result = match cli.command {
        Commands::Check {
            expression,
            input,
            pretty,
            strict,
            syntax_only,
        } => run_check(CheckOptions {
            expression,
            input,
            pretty,
            strict,
            syntax_only,
        }),
        Commands::Explain { expression } => match cli::explain(&expression) {
            Ok(explanation) => {
                println!("{}", explanation);
                Ok(())
            }
            Err(e) => Err(CliError::from(e)),
        },
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(mut options: CheckOptions) -> Result<(), CliError> {
    if options.input.is_none() && !options.syntax_only && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        options.input = Some(buffer);
    }

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if options.pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}
