use std::fs::File;
use std::io::BufWriter;
use std::io::Write;

use anyhow::Result;
use clap::ArgAction;
use clap::Parser;
use colored::*;
use env_logger::Builder;
use log::info;
use rayon::prelude::*;

use ef_graph::DistanceRecord;
use ef_graph::EdgeRecord;
use ef_graph::SecondaryStructureGraph;

use editfold::st_parsers::read_st_input;

#[derive(Debug, Parser)]
#[command(name = "ef-graph")]
#[command(author, version, about = "Positional graphs and pairwise distances from bpRNA .st files")]
pub struct Cli {
    /// Input file (bpRNA .st), or "-" for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    input: String,

    /// Prefix for the output tables
    #[arg(long, default_value = "editfold")]
    out_prefix: String,

    /// Also write the distance records as JSON
    #[arg(long)]
    json: bool,

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

struct GraphTables {
    id: String,
    edges: Vec<EdgeRecord>,
    distances: Vec<DistanceRecord>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let structures = read_st_input(&cli.input)?;
    info!("{}", format!("{} records read", structures.len()).yellow());

    let tables: Vec<GraphTables> = structures
        .par_iter()
        .enumerate()
        .map(|(index, ss)| -> Result<GraphTables> {
            let id = ss
                .reference_id()
                .map(str::to_string)
                .unwrap_or_else(|| format!("record_{}", index + 1));
            let graph = SecondaryStructureGraph::from_structure(ss)?;
            Ok(GraphTables {
                id,
                edges: graph.edge_list(),
                distances: graph.all_pairs_distances(),
            })
        })
        .collect::<Result<_>>()?;

    let edges_path = format!("{}.edges.tsv", cli.out_prefix);
    let mut edges_out = BufWriter::new(File::create(&edges_path)?);
    writeln!(edges_out, "id\tsource\ttarget")?;
    for table in &tables {
        for edge in &table.edges {
            writeln!(edges_out, "{}\t{}\t{}", table.id, edge.source, edge.target)?;
        }
    }
    println!("{}", edges_path.green());

    let distance_path = format!("{}.distance.tsv", cli.out_prefix);
    let mut distance_out = BufWriter::new(File::create(&distance_path)?);
    writeln!(distance_out, "id\tsource\ttarget\tdistance")?;
    for table in &tables {
        for record in &table.distances {
            writeln!(
                distance_out,
                "{}\t{}\t{}\t{}",
                table.id, record.source, record.target, record.distance
            )?;
        }
    }
    println!("{}", distance_path.green());

    if cli.json {
        let json_path = format!("{}.distance.json", cli.out_prefix);
        let by_id: Vec<(&str, &[DistanceRecord])> = tables
            .iter()
            .map(|t| (t.id.as_str(), t.distances.as_slice()))
            .collect();
        std::fs::write(&json_path, serde_json::to_string_pretty(&by_id)?)?;
        println!("{}", json_path.green());
    }

    Ok(())
}
