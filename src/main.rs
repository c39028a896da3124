use clap::{Parser, Subcommand};
use serde::Serialize;
use setupkit::{
    build_advisor, init_logging, load_config, read_request, ExportFormat, RecordChoiceRequest,
    StockSetupRequest, ToolpathRequest,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "setupkit")]
#[command(about = "CNC setup advisor: stock, orientation and toolpath suggestions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration (.toml or .json); defaults to the platform config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON file holding preferences and feedback; in-memory when omitted
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest stock dimensions and orientation for a request document
    Stock {
        /// Stock setup request (JSON)
        request: PathBuf,
    },

    /// Suggest per-feature operations, tools and feeds
    Toolpath {
        /// Toolpath strategy request (JSON)
        request: PathBuf,
    },

    /// Record how a suggestion was received
    Record {
        /// Record-choice request (JSON)
        request: PathBuf,
    },

    /// Show acceptance statistics
    Stats {
        #[arg(long)]
        operation_type: Option<String>,
    },

    /// Export the feedback history
    Export {
        /// csv or json
        #[arg(default_value = "json")]
        format: ExportFormat,

        #[arg(long)]
        operation_type: Option<String>,
    },

    /// Delete feedback history
    Clear {
        #[arg(long)]
        operation_type: Option<String>,

        /// Required; nothing is deleted without it
        #[arg(long)]
        confirm: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let advisor = build_advisor(config, cli.store.as_deref())?;

    match cli.command {
        Commands::Stock { request } => {
            let request: StockSetupRequest = read_request(&request)?;
            print_json(&advisor.suggest_stock_setup(&request))
        }
        Commands::Toolpath { request } => {
            let request: ToolpathRequest = read_request(&request)?;
            print_json(&advisor.suggest_toolpath_strategy(&request))
        }
        Commands::Record { request } => {
            let request: RecordChoiceRequest = read_request(&request)?;
            print_json(&advisor.record_user_choice(&request))
        }
        Commands::Stats { operation_type } => {
            print_json(&advisor.feedback_statistics(operation_type.as_deref()))
        }
        Commands::Export {
            format,
            operation_type,
        } => {
            let response = advisor.export_feedback_history(format, operation_type.as_deref());
            match response.data() {
                Some(data) => {
                    print!("{}", data);
                    Ok(())
                }
                None => print_json(&response),
            }
        }
        Commands::Clear {
            operation_type,
            confirm,
        } => {
            print_json(&advisor.clear_feedback_history(operation_type.as_deref(), confirm))
        }
    }
}
