use anyhow::{bail, ensure, Context};
use clap::{builder::PathBufValueParser, value_parser, Arg, ArgMatches, Command};
use itertools::Itertools;
use ndarray::Array1;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vincenty_fwd::{
    input::{read_legs, read_start},
    solve_components, traverse, Ellipsoid, SolveOptions, DEFAULT_MAX_ITERATIONS,
    DEFAULT_TOLERANCE,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let m = cli().get_matches();
    match m.subcommand() {
        Some(("destination", sub)) => run_destination(sub),
        Some(("traverse", sub)) => run_traverse(sub),
        _ => bail!("no subcommand given"),
    }
}

fn cli() -> Command {
    let list = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .long(name)
            .required(true)
            .value_delimiter(',')
            .allow_negative_numbers(true)
            .value_parser(value_parser!(f64))
            .help(help)
    };

    Command::new("vincenty_fwd")
        .version("0.1.0")
        .about("Solves the forward geodesic problem on a reference ellipsoid.")
        .subcommand_required(true)
        .arg(
            Arg::new("ellipsoid")
                .long("ellipsoid")
                .global(true)
                .value_name("RADIUS_KM,FLATTENING")
                .value_delimiter(',')
                .value_parser(value_parser!(f64))
                .help("Equatorial radius in km and flattening. Defaults to WGS-84."),
        )
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .global(true)
                .value_name("RADIANS")
                .value_parser(value_parser!(f64))
                .help("Convergence tolerance on the auxiliary sphere arc length."),
        )
        .arg(
            Arg::new("max_iterations")
                .long("max-iterations")
                .global(true)
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Iterations allowed per element before giving up."),
        )
        .subcommand(
            Command::new("destination")
                .about("Prints 'lat lon back_azimuth' for each broadcast element. Each argument takes a comma separated list.")
                .arg(list("lat", "Start latitude(s) in degrees."))
                .arg(list("lon", "Start longitude(s) in degrees."))
                .arg(list("distance", "Distance(s) in kilometers."))
                .arg(list("azimuth", "Azimuth(s) in degrees clockwise from north.")),
        )
        .subcommand(
            Command::new("traverse")
                .about("Walks the legs in a leg file from the location in a start file.")
                .arg(
                    Arg::new("start")
                        .long("start")
                        .required(true)
                        .value_name("START-FILE")
                        .value_parser(PathBufValueParser::new())
                        .help("File containing '<lat> <lon> <name>'."),
                )
                .arg(
                    Arg::new("legs")
                        .long("legs")
                        .required(true)
                        .value_name("LEGS-FILE")
                        .value_parser(PathBufValueParser::new())
                        .help("File with one '<N|S> <deg> <min> <sec> <E|W> <dist_km> <name>' or '<azimuth> <dist_km> <name>' leg per line."),
                )
                .arg(
                    Arg::new("closure")
                        .long("closure")
                        .value_name("DEGREES")
                        .value_parser(value_parser!(f64))
                        .help("Fail unless the last point returns to the start within this many degrees."),
                ),
        )
}

fn solve_options(m: &ArgMatches) -> anyhow::Result<SolveOptions> {
    let mut options = SolveOptions::default()
        .with_tolerance(m.get_one::<f64>("tolerance").copied().unwrap_or(DEFAULT_TOLERANCE))
        .with_max_iterations(
            m.get_one::<usize>("max_iterations")
                .copied()
                .unwrap_or(DEFAULT_MAX_ITERATIONS),
        );
    if let Some(params) = m.get_many::<f64>("ellipsoid") {
        let params = params.copied().collect::<Vec<_>>();
        let ellipsoid = Ellipsoid::try_from(params.as_slice())
            .with_context(|| "invalid --ellipsoid")?;
        options = options.with_ellipsoid(ellipsoid);
    }
    Ok(options)
}

fn values(m: &ArgMatches, name: &str) -> Array1<f64> {
    m.get_many::<f64>(name)
        .map(|vals| vals.copied().collect())
        .unwrap_or_default()
}

fn run_destination(m: &ArgMatches) -> anyhow::Result<()> {
    let options = solve_options(m)?;
    let [lat, lon, distance, azimuth] =
        ["lat", "lon", "distance", "azimuth"].map(|name| values(m, name).into_dyn());
    let solution = solve_components(
        lat.view(),
        lon.view(),
        distance.view(),
        azimuth.view(),
        &options,
    )?;

    for (dest, baz) in solution
        .destinations
        .iter()
        .zip(solution.back_azimuths.iter())
    {
        println!("{} {} {}", dest.lat, dest.lon, baz);
    }

    Ok(())
}

fn run_traverse(m: &ArgMatches) -> anyhow::Result<()> {
    let options = solve_options(m)?;
    let (Some(start_path), Some(legs_path)) =
        (m.get_one::<PathBuf>("start"), m.get_one::<PathBuf>("legs"))
    else {
        bail!("both --start and --legs are required");
    };
    let start = read_start(start_path)?;
    let legs = read_legs(legs_path)?;

    let offsets = legs.iter().map(|leg| leg.offset).collect::<Vec<_>>();
    let walk = traverse(start.point, &offsets, &options)
        .with_context(|| format!("failed to walk the traverse from {}", start.name))?;

    let names = std::iter::once(&start.name).chain(legs.iter().map(|leg| &leg.name));
    for (point, name) in walk.points.iter().zip(names) {
        println!("{} {} {}", point.lat, point.lon, name);
    }

    let (dlat, dlon) = walk.misclosure_deg();
    info!(
        "{} legs, misclosure = ({dlat}°, {dlon}°), back azimuths = [{}]",
        offsets.len(),
        walk.back_azimuths.iter().join(", ")
    );
    if let Some(&eps) = m.get_one::<f64>("closure") {
        ensure!(
            walk.is_closed(eps),
            "traverse does not close within {eps}°: misclosure is ({dlat}°, {dlon}°)"
        );
    }

    Ok(())
}
