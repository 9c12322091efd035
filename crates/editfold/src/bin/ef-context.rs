use std::io::Write;

use anyhow::Result;
use clap::ArgAction;
use clap::Parser;
use colored::*;
use env_logger::Builder;
use log::info;

use ef_context::ContextKind;
use ef_context::EditingContext;

use editfold::st_parsers::read_st_input;

#[derive(Debug, Parser)]
#[command(name = "ef-context")]
#[command(author, version, about = "Structural context of an editing position across bpRNA .st records")]
pub struct Cli {
    /// Input file (bpRNA .st), or "-" for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    input: String,

    /// 1-based editing position on each transcript
    #[arg(short, long, value_name = "POS")]
    edit_position: usize,

    /// How many nearest elements to report per direction
    #[arg(short, long, default_value_t = 3)]
    nearest: usize,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            // no prefix, just the message
            writeln!(buf, "{}", record.args())
        })
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let structures = read_st_input(&cli.input)?;
    info!("{}", format!("{} records read", structures.len()).yellow());

    for (index, ss) in structures.iter().enumerate() {
        let id = ss
            .reference_id()
            .map(str::to_string)
            .unwrap_or_else(|| format!("record_{}", index + 1));
        println!("{}", format!(">{}", id).yellow());

        let context = EditingContext::analyze(ss, cli.edit_position);
        if !context.has_result() {
            println!(
                "position {} outside transcript of length {}",
                cli.edit_position,
                ss.len()
            );
            continue;
        }

        if let Some(item) = context.containing() {
            println!("{} {}", "contained in".green(), item.element);
        }
        for item in context.items() {
            if item.kind != ContextKind::Contain {
                println!("{:>6} {}", item.kind.to_string(), item.element);
            }
        }

        println!("nearest 5' elements:");
        for (distance, item) in context.nearest_upstream(cli.nearest) {
            println!("{:>6} {}", distance, item.element);
        }
        println!("nearest 3' elements:");
        for (distance, item) in context.nearest_downstream(cli.nearest) {
            println!("{:>+6} {}", distance, item.element);
        }
    }

    Ok(())
}
