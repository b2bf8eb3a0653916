//! geoprox-cli — Command-line front end for geoprox-core
//!
//! Loads the facilities dataset (local file or URL), optionally pages in
//! schools for the selected country, and prints plain counts.
//!
//! Usage examples
//! --------------
//!
//! - List facility countries
//!   $ geoprox --facilities-file facilities.json.gz countries
//!
//! - Hospitals and pharmacies visible in Afghanistan
//!   $ geoprox --facilities-file f.json -c Afghanistan -t Hospitals,Pharmacies visible
//!
//! - Schools within 5 km of a visible facility
//!   $ geoprox --facilities-file f.json --schools-url <url> -c Afghanistan -r 5 proximity
//!
//! - Fixed-radius statistics
//!   $ geoprox --facilities-file f.json --schools-url <url> stats Afghanistan
mod args;

use crate::args::{CliArgs, Commands, IdentityArg};
use anyhow::{bail, Context};
use clap::Parser;
use geoprox_core::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("geoprox_core={default_level},geoprox_cli={default_level}").into()
        }))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Commands::Resolve { name } = &args.command {
        match geoprox_core::country::lookup(name) {
            Some(iso3) => println!("{iso3}"),
            None => println!("{name} (no match, used as-is)"),
        }
        return Ok(());
    }

    let mut session = open_session(&args)?;
    session
        .load_facilities()
        .context("failed to load the facilities dataset")?;
    apply_filter(&mut session, &args)?;

    match args.command {
        Commands::Countries => {
            for name in session.countries() {
                println!("{name}");
            }
        }

        Commands::Visible => {
            let counts = session.facility_type_counts();
            println!("Visible facilities: {}", session.visible_facilities().len());
            for (facility_type, n) in counts {
                println!("  {facility_type:<28} {n}");
            }
        }

        Commands::Proximity { load } => {
            load_schools(&mut session, &args.filter.country, &load);
            let counts = session.buffer_counts();
            println!(
                "Radius {} km: {} schools in buffer, {} outside ({} total)",
                session.filter_state().buffer_radius_km,
                counts.in_count,
                counts.out_count,
                counts.total()
            );
        }

        Commands::Stats { name } => {
            load_schools(&mut session, &name, &[]);
            let stats = session.country_stats(&name);
            println!("{name} ({})", resolve(&name));
            println!("  Schools:    {}", stats.total_schools);
            println!("  Facilities: {}", stats.total_facilities);
            for (radius, within) in REFERENCE_RADII_KM
                .iter()
                .zip([stats.within_5km, stats.within_10km, stats.within_50km])
            {
                println!(
                    "  Within {radius:>2} km: {within} ({:.1}%)",
                    stats.ratio(within) * 100.0
                );
            }
        }

        // Answered before any dataset was loaded.
        Commands::Resolve { .. } => {}
    }

    Ok(())
}

#[cfg(feature = "http")]
fn open_session(args: &CliArgs) -> anyhow::Result<Session<HttpSource>> {
    let src = &args.source;
    let config = LoaderConfig {
        facilities_url: src.facilities_url.clone(),
        facilities_path: src.facilities_file.clone(),
        schools_url: src.schools_url.clone(),
        page_size: src.page_size,
        timeout_secs: src.timeout_secs,
        ..Default::default()
    };
    if config.facilities_url.is_none() && config.facilities_path.is_none() {
        bail!("either --facilities-file or --facilities-url is required");
    }
    let proximity = ProximityConfig {
        identity: match args.filter.identity {
            IdentityArg::Coordinates => IdentityPolicy::Coordinates,
            IdentityArg::RecordId => IdentityPolicy::RecordId,
        },
        strategy: if args.filter.grid {
            Strategy::Grid
        } else {
            Strategy::BruteForce
        },
    };
    let source = HttpSource::new(config.clone()).context("failed to build HTTP client")?;
    Ok(Session::new(source, &config, proximity))
}

#[cfg(not(feature = "http"))]
fn open_session(_args: &CliArgs) -> anyhow::Result<Session<NoSource>> {
    bail!("geoprox-cli was built without the 'http' feature")
}

/// Placeholder source type for builds without any transport.
#[cfg(not(feature = "http"))]
struct NoSource;

#[cfg(not(feature = "http"))]
impl DataSource for NoSource {
    fn facilities_document(&self) -> Result<geoprox_core::model::raw::FacilitiesDocument> {
        Err(LoadError::NotFound("no transport compiled in".into()))
    }

    fn school_page(
        &self,
        _iso3: &str,
        _page: u32,
        _page_size: usize,
    ) -> Result<Vec<serde_json::Value>> {
        Err(LoadError::NotFound("no transport compiled in".into()))
    }
}

fn apply_filter<S: DataSource>(session: &mut Session<S>, args: &CliArgs) -> anyhow::Result<()> {
    let f = &args.filter;
    if !f.types.is_empty() {
        let mut types = Vec::with_capacity(f.types.len());
        for label in &f.types {
            match FacilityType::from_label(label) {
                Some(t) => types.push(t),
                None => bail!(
                    "unknown facility type '{label}' (expected one of: {})",
                    FacilityType::ALL.map(|t| t.label()).join(", ")
                ),
            }
        }
        session.set_selected_types(types);
    }
    session.set_selected_country(f.country.as_str());
    session
        .set_buffer_radius(f.radius_km)
        .context("invalid --radius")?;
    Ok(())
}

/// Load schools for `country` and each extra entry. Failures are reported
/// and counting continues with whatever arrived.
fn load_schools<S: DataSource>(session: &mut Session<S>, country: &str, extra: &[String]) {
    let targets = std::iter::once(country)
        .chain(extra.iter().map(String::as_str))
        .filter(|c| !is_all(c));
    for target in targets {
        match session.load_schools_report(target) {
            Ok(report) => info!(
                country = target,
                iso3 = %report.iso3,
                added = report.added,
                "schools ready"
            ),
            Err(e) => warn!(country = target, error = %e, "could not load all schools"),
        }
    }
}
