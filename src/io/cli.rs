//! Command-line interface: load a generation group, grow it, export images

use clap::Parser;
use log::{LevelFilter, info, warn};
use std::path::{Path, PathBuf};

use crate::algorithm::generator::DungeonGenerator;
use crate::io::configuration::{DEFAULT_SEED, GIF_FRAME_DELAY_MS, OUTPUT_SUFFIX};
use crate::io::error::Result;
use crate::io::image::export_grid_as_png;
use crate::io::loader::load_group;
use crate::io::logging::{ProgressLogger, level_for};
use crate::io::progress::ProgressManager;
use crate::io::visualization::export_placement_gif;
use crate::math::probability::RandomSelector;
use crate::spatial::grid::TileGrid;

#[derive(Parser)]
#[command(name = "roomlattice")]
#[command(
    author,
    version,
    about = "Grow a dungeon layout from a generation group file"
)]
/// Command-line arguments for the dungeon generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Generation group JSON file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// PNG output path (defaults to <CONFIG>_dungeon.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write an animated GIF of the placement order
    #[arg(short = 'g', long)]
    pub visualize: bool,

    /// Suppress progress output and all logging but errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase logging detail (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Report the timing trace when finished
    #[arg(short, long)]
    pub timing: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level selected by the flags; `--timing` raises it to show the trace
    pub fn log_level(&self) -> LevelFilter {
        let level = level_for(self.quiet, self.verbose);
        if self.timing {
            level.max(LevelFilter::Info)
        } else {
            level
        }
    }

    /// PNG path: `--output`, or the config path with the output suffix
    pub fn png_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| derived_path(&self.config, "png"))
    }

    /// GIF path, next to the PNG
    pub fn gif_path(&self) -> PathBuf {
        self.png_path().with_extension("gif")
    }
}

fn derived_path(config: &Path, extension: &str) -> PathBuf {
    let stem = config
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    config.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.{extension}"))
}

/// Drives one generation run with progress display and exports
pub struct Runner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl Runner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);
        Self {
            cli,
            progress_manager,
        }
    }

    /// Install the log backend, routed through the progress display
    ///
    /// # Errors
    ///
    /// Returns an error if a logger is already installed
    pub fn install_logger(&self) -> Result<()> {
        let multi = self
            .progress_manager
            .as_ref()
            .map(|pm| pm.multi_progress().clone());
        ProgressLogger::new(self.cli.log_level(), multi).install()
    }

    /// Generate the dungeon and write the requested outputs
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded, the start room
    /// or a pass queue is infeasible, or an export fails
    pub fn run(&mut self) -> Result<TileGrid> {
        let group = load_group(&self.cli.config)?;
        let pass_count = group.passes.len();
        let mut generator = DungeonGenerator::new(group, RandomSelector::new(self.cli.seed));

        generator.init();
        generator.place_starting_room()?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(pass_count);
        }
        for index in 0..pass_count {
            if let Some(ref mut pm) = self.progress_manager {
                pm.start_pass(index);
            }
            let report = generator.run_pass(index);
            if let (Some(pm), Ok(report)) = (self.progress_manager.as_mut(), &report) {
                pm.complete_pass(report);
            }
            if report?.stalled {
                warn!("Pass {index} stalled; continuing with the rooms it placed");
            }
        }
        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        let grid = generator.finish();
        info!("{grid}");

        let png_path = self.cli.png_path();
        export_grid_as_png(&grid, &png_path)?;
        info!("Wrote {}", png_path.display());

        if self.cli.visualize {
            let gif_path = self.cli.gif_path();
            export_placement_gif(&grid, &gif_path, GIF_FRAME_DELAY_MS)?;
            info!("Wrote {}", gif_path.display());
        }

        if self.cli.timing {
            for line in generator.trace().report() {
                info!("{line}");
            }
        }

        Ok(grid)
    }
}
