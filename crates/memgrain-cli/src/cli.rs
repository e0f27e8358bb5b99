use clap::{Args, Parser, Subcommand, ValueEnum};
use memgrain::core::models::leaflet::LeafletSelection;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "memgrain developers",
    version,
    about = "memgrain CLI - A command-line interface for memgrain, a post-processing toolkit for curvature-aware lipid domain assignment and protein placement on triangulated membrane meshes.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Write a machine-readable JSON report of the run to this path
    #[arg(long, global = true, value_name = "PATH")]
    pub report_json: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assign a quota-constrained, curvature-weighted lipid mix across a leaflet.
    Mix(MixArgs),
    /// Stamp a domain id on every point within a radius of chosen centers.
    Stamp(StampArgs),
    /// Place protein inclusions with a minimum mutual separation.
    Place(PlaceArgs),
}

/// Leaflet selector shared by the subcommands.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafletArg {
    Outer,
    Inner,
    Both,
}

impl From<LeafletArg> for LeafletSelection {
    fn from(arg: LeafletArg) -> Self {
        match arg {
            LeafletArg::Outer => LeafletSelection::Outer,
            LeafletArg::Inner => LeafletSelection::Inner,
            LeafletArg::Both => LeafletSelection::Both,
        }
    }
}

/// Folder arguments shared by every subcommand.
#[derive(Args, Debug)]
pub struct FolderArgs {
    /// Path to the input point folder (OuterBM.dat and friends).
    #[arg(short, long, default_value = "point", value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output point folder. Defaults to updating the input in place.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Do not back up an existing output folder before overwriting it.
    #[arg(long)]
    pub no_backup: bool,
}

/// Arguments for the `mix` subcommand.
#[derive(Args, Debug)]
pub struct MixArgs {
    #[command(flatten)]
    pub folder: FolderArgs,

    /// Path to the lipid specification file (domain id, name, fraction,
    /// preferred curvature, density per line).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub lipids: PathBuf,

    /// Which leaflet(s) to assign.
    #[arg(long, value_enum, default_value = "both")]
    pub leaflet: LeafletArg,

    /// Curvature coupling strength; 0 disables the curvature bias entirely.
    #[arg(short, long, default_value_t = 1.0, value_name = "FLOAT")]
    pub k_factor: f64,

    /// Scale each point's curvature weight by its vertex area.
    #[arg(long)]
    pub area_weighted: bool,

    /// Seed for the random number generator. Omit for a fresh seed per run.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Write a `[Lipids List]` section for the assigned mix to this str file.
    #[arg(long, value_name = "PATH")]
    pub str_output: Option<PathBuf>,

    /// Existing str file whose other sections are preserved in --str-output.
    #[arg(long, value_name = "PATH", requires = "str_output")]
    pub str_input: Option<PathBuf>,
}

/// Arguments for the `stamp` subcommand.
#[derive(Args, Debug)]
pub struct StampArgs {
    #[command(flatten)]
    pub folder: FolderArgs,

    /// Stamping radius around each center.
    #[arg(short, long, required = true, value_name = "FLOAT")]
    pub radius: f64,

    /// Domain id written to every point inside a stamp.
    #[arg(short, long, required = true, value_name = "INT")]
    pub domain_id: i32,

    /// Use the anchor points of inclusions of this type as centers.
    #[arg(short = 't', long, value_name = "INT")]
    pub protein_type: Option<i32>,

    /// Comma-separated point ids to use as additional centers (e.g. "3,17,80").
    #[arg(short, long, value_name = "IDS")]
    pub points: Option<String>,

    /// Which leaflet(s) to stamp.
    #[arg(long, value_enum, default_value = "both")]
    pub leaflet: LeafletArg,

    /// Measure the radius along the surface instead of through space.
    #[arg(long)]
    pub geodesic: bool,

    /// Maximum edge length of the surface proximity graph (geodesic mode only).
    #[arg(long, value_name = "FLOAT", requires = "geodesic")]
    pub edge_cutoff: Option<f64>,
}

/// Arguments for the `place` subcommand.
#[derive(Args, Debug)]
pub struct PlaceArgs {
    #[command(flatten)]
    pub folder: FolderArgs,

    /// Type id assigned to the new inclusions.
    #[arg(short = 't', long, required = true, value_name = "INT")]
    pub protein_type: i32,

    /// Minimum separation between inclusions (new and pre-existing alike).
    #[arg(short, long, required = true, value_name = "FLOAT")]
    pub radius: f64,

    /// Number of inclusions to place.
    #[arg(short = 'n', long, required = true, value_name = "INT")]
    pub count: usize,

    /// Bias placement toward points with this mean curvature.
    #[arg(short = 'c', long, value_name = "FLOAT")]
    pub preferred_curvature: Option<f64>,

    /// Curvature coupling strength for the placement bias.
    #[arg(short, long, default_value_t = 1.0, value_name = "FLOAT")]
    pub k_factor: f64,

    /// Seed for the random number generator. Omit for a fresh seed per run.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}
