use clap::{Parser, Subcommand};
use linetrack_core::diagnostics::{format_diagnostic, format_parse_error};
use linetrack_core::eval::evaluate_lets;
use linetrack_core::{
    analyze_lattice, line_geometry, line_positions, load_lattice, parse_lattice, GridSpec,
    LatticeContext, LatticeError, TrackGrid, TrackList,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "linetrack")]
#[command(about = "Linear particle tracking through beamlines with aperture losses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track the lattice's phase-space grid and report loss counts
    Grid {
        /// Path to the lattice file
        file: PathBuf,

        #[arg(long)]
        xmin: Option<f64>,
        #[arg(long)]
        xmax: Option<f64>,
        #[arg(long)]
        xres: Option<f64>,
        #[arg(long)]
        pxmin: Option<f64>,
        #[arg(long)]
        pxmax: Option<f64>,
        #[arg(long)]
        pxres: Option<f64>,

        /// Print every grid point's final state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Track the lattice's particles and print their histories as JSON
    List {
        /// Path to the lattice file
        file: PathBuf,
    },

    /// Print each element with its cumulative end position
    Lineprint {
        /// Path to the lattice file
        file: PathBuf,
    },

    /// Print the opaque regions of the line as JSON polygons
    Aperture {
        /// Path to the lattice file
        file: PathBuf,

        /// How far outer regions reach beyond each aperture edge
        #[arg(long, default_value_t = 0.1)]
        extent: f64,

        /// Position of the start of the line
        #[arg(long, default_value_t = 0.0)]
        start: f64,
    },

    /// Parse and analyze a lattice file without tracking
    Check {
        /// Path to the lattice file
        file: PathBuf,
    },
}

/// Grid bounds given on the command line; unset fields fall back to the
/// lattice's `grid` declaration.
struct GridOverrides {
    x_min: Option<f64>,
    x_max: Option<f64>,
    x_res: Option<f64>,
    px_min: Option<f64>,
    px_max: Option<f64>,
    px_res: Option<f64>,
}

impl GridOverrides {
    fn is_complete(&self) -> bool {
        self.x_min.is_some()
            && self.x_max.is_some()
            && self.x_res.is_some()
            && self.px_min.is_some()
            && self.px_max.is_some()
            && self.px_res.is_some()
    }

    fn apply(&self, base: Option<GridSpec>) -> Option<GridSpec> {
        let base = match base {
            Some(spec) => spec,
            None if self.is_complete() => GridSpec {
                x_min: 0.0,
                x_max: 0.0,
                x_res: 0.0,
                px_min: 0.0,
                px_max: 0.0,
                px_res: 0.0,
            },
            None => return None,
        };
        Some(GridSpec {
            x_min: self.x_min.unwrap_or(base.x_min),
            x_max: self.x_max.unwrap_or(base.x_max),
            x_res: self.x_res.unwrap_or(base.x_res),
            px_min: self.px_min.unwrap_or(base.px_min),
            px_max: self.px_max.unwrap_or(base.px_max),
            px_res: self.px_res.unwrap_or(base.px_res),
        })
    }
}

#[derive(Serialize)]
struct GridPoint {
    i: usize,
    j: usize,
    x0: f64,
    px0: f64,
    s: f64,
    x: f64,
    px: f64,
    lost: String,
}

#[derive(Serialize)]
struct GridReport {
    spec: GridSpec,
    nx: usize,
    npx: usize,
    counts: BTreeMap<String, usize>,
    points: Vec<GridPoint>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grid {
            file,
            xmin,
            xmax,
            xres,
            pxmin,
            pxmax,
            pxres,
            json,
        } => {
            let overrides = GridOverrides {
                x_min: xmin,
                x_max: xmax,
                x_res: xres,
                px_min: pxmin,
                px_max: pxmax,
                px_res: pxres,
            };
            run_grid(&file, &overrides, json)
        }
        Commands::List { file } => run_list(&file),
        Commands::Lineprint { file } => run_lineprint(&file),
        Commands::Aperture {
            file,
            extent,
            start,
        } => run_aperture(&file, extent, start),
        Commands::Check { file } => run_check(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Read and build a lattice, formatting parse and analysis failures against
/// the source text.
fn load_file(file: &PathBuf) -> Result<LatticeContext, Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    match load_lattice(&source) {
        Ok(ctx) => Ok(ctx),
        Err(LatticeError::Parse(e)) => Err(format_parse_error(&e, &source).into()),
        Err(LatticeError::Invalid(diagnostics)) => {
            let lines: Vec<String> = diagnostics
                .errors()
                .map(|d| format_diagnostic(d, &source))
                .collect();
            Err(format!("lattice is invalid:\n{}", lines.join("\n")).into())
        }
        Err(e) => Err(e.into()),
    }
}

fn run_grid(
    file: &PathBuf,
    overrides: &GridOverrides,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_file(file)?;
    let spec = overrides
        .apply(ctx.grid)
        .ok_or("no grid declared in the lattice and no complete set of --xmin/--xmax/--xres/--pxmin/--pxmax/--pxres given")?;

    let grid = TrackGrid::new(&ctx.line, spec);
    let (nx, npx) = grid.shape();

    if json {
        let mut points = Vec::with_capacity(nx * npx);
        for i in 0..nx {
            for j in 0..npx {
                if let Some(p) = grid.get(i, j) {
                    let start = p.start();
                    points.push(GridPoint {
                        i,
                        j,
                        x0: start.x,
                        px0: start.px,
                        s: p.s,
                        x: p.x,
                        px: p.px,
                        lost: p.status.to_string(),
                    });
                }
            }
        }
        let report = GridReport {
            spec,
            nx,
            npx,
            counts: grid.loss_counts(),
            points,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("grid {} x {}", nx, npx);
        for (label, count) in grid.loss_counts() {
            println!("{} = {}", label, count);
        }
    }

    Ok(())
}

fn run_list(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_file(file)?;
    if ctx.particles.is_empty() {
        return Err("no particles declared in the lattice".into());
    }
    let list = TrackList::new(&ctx.line, &ctx.particles);
    println!("{}", serde_json::to_string_pretty(list.particles())?);
    Ok(())
}

fn run_lineprint(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_file(file)?;
    for position in line_positions(&ctx.line) {
        println!("{} {:.4}", position.name, position.s_end);
    }
    Ok(())
}

fn run_aperture(file: &PathBuf, extent: f64, start: f64) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_file(file)?;
    let polygons = line_geometry(&ctx.line, extent, start);
    println!("{}", serde_json::to_string_pretty(&polygons)?);
    Ok(())
}

fn run_check(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let lattice = parse_lattice(&source).map_err(|e| format_parse_error(&e, &source))?;
    let mut diagnostics = analyze_lattice(&lattice);
    let (_, let_diagnostics) = evaluate_lets(&lattice.lets);
    diagnostics.extend(let_diagnostics);

    for diagnostic in diagnostics.iter() {
        println!("{}", format_diagnostic(diagnostic, &source));
    }

    if diagnostics.has_errors() {
        return Err(format!("{} error(s) found", diagnostics.errors().count()).into());
    }
    println!(
        "ok: {} element(s), {} warning(s)",
        lattice.elements.len(),
        diagnostics.warnings().count()
    );
    Ok(())
}
