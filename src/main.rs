use clap::{Parser as ClapParser, Subcommand};
use odata_expr::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "odx")]
#[command(about = "odx - Compile OData $filter/$orderby expressions and run them against JSON entities")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an expression against a model, optionally filtering or
    /// sorting JSON entities
    Check {
        /// The OData expression to compile
        expression: String,

        /// Path to the JSON model description
        #[arg(short, long)]
        model: String,

        /// Resource type the expression is rooted at
        #[arg(short, long)]
        resource: String,

        /// JSON entity input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Treat the expression as a $orderby clause
        #[arg(long)]
        orderby: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate the expression, don't execute
        #[arg(long)]
        syntax_only: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            expression,
            model,
            resource,
            input,
            orderby,
            pretty,
            syntax_only,
        } => run_check(expression, model, resource, input, orderby, pretty, syntax_only),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(
    expression: String,
    model_path: String,
    resource: String,
    input: Option<String>,
    orderby: bool,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let model = std::fs::read_to_string(&model_path).map_err(CliError::Io)?;

    let input = match input {
        Some(path) => Some(std::fs::read_to_string(&path).map_err(CliError::Io)?),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        expression,
        model,
        resource_type: resource,
        input,
        orderby,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::Valid { navigations } => {
            println!("Expression is valid");
            for chain in navigations {
                println!("navigation: {}", chain);
            }
        }
        CheckResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }
            .unwrap();
            println!("{}", json);
        }
    }
    Ok(())
}
