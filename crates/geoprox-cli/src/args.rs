use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for geoprox-cli
#[derive(Debug, Parser)]
#[command(
    name = "geoprox",
    version,
    about = "Count schools within reach of health facilities"
)]
pub struct CliArgs {
    /// Log pagination and loader details (RUST_LOG still wins)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the datasets come from.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// URL of the facilities JSON document
    #[arg(long = "facilities-url", global = true, env = "GEOPROX_FACILITIES_URL")]
    pub facilities_url: Option<String>,

    /// Local facilities document (.json or .json.gz); wins over --facilities-url
    #[arg(long = "facilities-file", global = true)]
    pub facilities_file: Option<PathBuf>,

    /// Paged schools endpoint
    #[arg(long = "schools-url", global = true, env = "GEOPROX_SCHOOLS_URL", default_value = "")]
    pub schools_url: String,

    /// Schools per page
    #[arg(long = "page-size", global = true, default_value_t = 1000)]
    pub page_size: usize,

    /// HTTP timeout in seconds
    #[arg(long = "timeout", global = true, default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Filter selection applied before counting.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Country display name (e.g. Afghanistan), or "all"
    #[arg(short = 'c', long = "country", global = true, default_value = "all")]
    pub country: String,

    /// Comma-separated facility type labels (e.g. "Hospitals,Pharmacies"); default all
    #[arg(short = 't', long = "types", global = true, value_delimiter = ',')]
    pub types: Vec<String>,

    /// Buffer radius in km (clamped to 0..=500)
    #[arg(short = 'r', long = "radius", global = true, default_value_t = 10.0)]
    pub radius_km: f64,

    /// How co-located schools are counted
    #[arg(long = "identity", global = true, value_enum, default_value_t = IdentityArg::Coordinates)]
    pub identity: IdentityArg,

    /// Use the grid index instead of the pairwise scan
    #[arg(long = "grid", global = true)]
    pub grid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdentityArg {
    Coordinates,
    RecordId,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the countries present in the facilities dataset
    Countries,

    /// Show visible facilities per type under the current filter
    Visible,

    /// Count schools inside and outside the buffer zones
    Proximity {
        /// Extra countries (name or ISO3) whose schools are loaded as well
        #[arg(long = "load", value_delimiter = ',')]
        load: Vec<String>,
    },

    /// 5/10/50 km statistics for one country
    Stats {
        /// Country display name
        name: String,
    },

    /// Resolve a country name to its ISO3 code
    Resolve {
        /// Country display name
        name: String,
    },
}
