//! Command-line driver for forest generation and SMT proofs.
//!
//! Usage:
//!   merkle-gen forest --h-level 4 --l-level 16 --pre-image 0
//!   merkle-gen smt-prove --depth 4 --key 0101

use std::path::PathBuf;
use std::process::ExitCode;

use ark_bn254::Fr;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use merkle_generator::{build_forest, ForestConfig, ForestOutput, GeneratorError, SmtProofOutput};
use merkle_trees::{verify_merkle_path, SparseMerkleTree};

#[derive(Parser, Debug)]
#[command(name = "merkle-gen", version, about = "Poseidon Merkle forest and SMT proof generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build 2^h-level branches of 2^l-level leaves in parallel and combine their roots
    Forest(ForestArgs),
    /// Build the deterministic SMT of a depth and print the Merkle path for one key
    SmtProve(SmtProveArgs),
}

#[derive(Args, Debug)]
struct ForestArgs {
    /// Depth of the top tree over branch roots
    #[arg(long, default_value_t = 4)]
    h_level: u32,
    /// Depth of each branch
    #[arg(long, default_value_t = 16)]
    l_level: u32,
    /// Offset, in branches, of the first leaf
    #[arg(long, default_value_t = 0)]
    pre_image: u64,
    /// Directory receiving the JSON output file
    #[arg(long, env = "MERKLE_GEN_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,
    /// Print the JSON without writing a file
    #[arg(long)]
    no_write: bool,
}

#[derive(Args, Debug)]
struct SmtProveArgs {
    /// Key length in bits
    #[arg(long)]
    depth: usize,
    /// Key to prove, as a string of 0/1 characters
    #[arg(long)]
    key: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Forest(args) => run_forest(args),
        Command::SmtProve(args) => run_smt_prove(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "merkle-gen failed");
            ExitCode::FAILURE
        }
    }
}

fn run_forest(args: ForestArgs) -> Result<(), GeneratorError> {
    let config = ForestConfig::new(args.h_level, args.l_level, args.pre_image);
    let forest = build_forest(config)?;
    let output = ForestOutput::from(&forest);

    println!("{}", output.to_pretty_json()?);

    if !args.no_write {
        let path = output.write_to(&args.out_dir, &config.output_file_name())?;
        info!(path = %path.display(), "output written");
    }
    Ok(())
}

fn run_smt_prove(args: SmtProveArgs) -> Result<(), GeneratorError> {
    let tree = SparseMerkleTree::deterministic(args.depth)?;
    let path = tree.generate_merkle_path(&args.key)?;
    let leaf: Fr = tree
        .get(&args.key)
        .ok_or_else(|| merkle_trees::Error::KeyNotFound(args.key.clone()))?;
    let verified = verify_merkle_path(leaf, &path, tree.root());

    let output = SmtProofOutput {
        depth: args.depth,
        key: args.key,
        leaf,
        root: tree.root(),
        path,
        verified,
    };
    println!("{}", output.to_pretty_json()?);
    Ok(())
}
