use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Boundary hierarchy linker (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "admlink", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch geoBoundaries source datasets for a country
    #[cfg(feature = "download")]
    Fetch(FetchArgs),

    /// Resolve parent units for each boundary by geometric containment
    Resolve(ResolveArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// ISO-3166-1 alpha-3 code, e.g. IND, BRA, NGA
    pub iso: String,

    /// Output location (directory).
    #[arg(value_hint = ValueHint::DirPath)]
    pub out: PathBuf,

    /// Admin levels to fetch
    #[arg(long, value_delimiter = ',', default_values_t = [1u8, 2, 3])]
    pub levels: Vec<u8>,

    /// Overwrite already-downloaded files (off by default)
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Level-1 (state/province) boundary file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub adm1: PathBuf,

    /// Level-2 (district) boundary file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub adm2: PathBuf,

    /// Level-3 (sub-district) boundary file; skipped when absent
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub adm3: Option<PathBuf>,

    /// Output directory for the resolved collections
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub out: PathBuf,

    /// Simplification tolerance applied to output geometries (degrees)
    #[arg(long)]
    pub simplify: Option<f64>,

    /// Overwrite existing output files
    #[arg(long)]
    pub force: bool,
}
