use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

mod checkerboard;
mod png;
mod scenes;

#[derive(Parser)]
#[command(name = "gs-twin-cli")]
#[command(about = "Render pico-gs digital twin demo scenes to PNG and diff against golden images", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress log output (errors are still printed).
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one built-in demo scene to a PNG file.
    Render {
        /// Scene name; see `list` for the full set.
        scene: String,

        /// Output PNG path.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the built-in demo scene names.
    List,
    /// Compare two PNG files, reporting per-pixel channel deltas.
    Diff {
        /// The freshly rendered image.
        a: PathBuf,

        /// The golden reference image.
        b: PathBuf,

        /// Maximum per-channel delta still considered a match.
        #[arg(long, default_value_t = 0)]
        tolerance: u8,
    },
}

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        env_logger::Builder::from_default_env().filter_level(log::LevelFilter::Info).init();
    }

    let result = match cli.command {
        Commands::Render { scene, output } => render(&scene, &output),
        Commands::List => {
            for name in scenes::SCENE_NAMES {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Diff { a, b, tolerance } => run_diff(&a, &b, tolerance),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn render(scene: &str, output: &PathBuf) -> anyhow::Result<()> {
    let buf = scenes::render(scene)?;
    png::save_color_buffer(output, &buf)?;
    log::info!("rendered scene {scene:?} to {}", output.display());
    Ok(())
}

fn run_diff(a: &PathBuf, b: &PathBuf, tolerance: u8) -> anyhow::Result<()> {
    let report = png::diff(a, b, tolerance)?;
    println!("{report}");
    anyhow::ensure!(
        report.mismatched_pixels == 0,
        "{} of {} pixels differ by more than tolerance {tolerance}",
        report.mismatched_pixels,
        report.width * report.height
    );
    Ok(())
}
