//! Airsprite CLI
//!
//! Commands: check, sheet
//! Issues and progress are logged to stderr; manifests go to files or stdout.
//! Returns non-zero on validation failure.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use airsprite_core::{
    assign_sprite_ids, build_manifest, Airframe, Rasterizer, SheetLayout, StyleContract,
    SvgValidator,
};

#[derive(Parser)]
#[command(name = "airsprite-cli")]
#[command(about = "Airsprite CLI - SVG style compliance and spritesheet layout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one SVG against the style contract
    Check {
        /// Path to the input svg file
        #[arg(long)]
        svg: PathBuf,
    },

    /// Assign sprite ids over an airframe directory and write the manifest
    Sheet {
        /// Path to the airframes JSON directory
        #[arg(long, default_value = "airframes/")]
        airframes_path: PathBuf,

        /// Path to the output json file
        #[arg(long)]
        output_json: PathBuf,

        /// Spritesheet width in pixels
        #[arg(long, default_value_t = 864)]
        sheet_width: u32,

        /// Sprite id of the first new sprite (one past the last existing id)
        #[arg(long, default_value_t = 0)]
        id_offset: u32,

        /// Name of the sheet PNG recorded in the manifest
        #[arg(long, default_value = "sprites.png")]
        png_name: String,

        /// Path to the inkscape v1+ binary; when set, each unique sprite
        /// source is exported as <sprite_id>.png under --sprites-dir
        #[arg(long)]
        inkscape: Option<PathBuf>,

        /// Directory for per-sprite PNG exports
        #[arg(long)]
        sprites_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { svg } => run_check(&svg),
        Commands::Sheet {
            airframes_path,
            output_json,
            sheet_width,
            id_offset,
            png_name,
            inkscape,
            sprites_dir,
        } => run_sheet(
            &airframes_path,
            &output_json,
            sheet_width,
            id_offset,
            &png_name,
            inkscape.as_deref(),
            sprites_dir.as_deref(),
        ),
    }
}

fn run_check(svg: &std::path::Path) -> ExitCode {
    let validator = SvgValidator::new(StyleContract::default());

    let issues = match validator.validate_file(svg) {
        Ok(issues) => issues,
        Err(e) => {
            error!("invalid svg file: {e}");
            return ExitCode::FAILURE;
        }
    };

    if issues.is_empty() {
        return ExitCode::SUCCESS;
    }

    for issue in &issues {
        error!(line = issue.line, file = %issue.file, "{}", issue.message);
    }
    error!("{} issues", issues.len());
    ExitCode::from(2) // contract violations, distinct from fatal errors
}

fn run_sheet(
    airframes_path: &std::path::Path,
    output_json: &std::path::Path,
    sheet_width: u32,
    id_offset: u32,
    png_name: &str,
    inkscape: Option<&std::path::Path>,
    sprites_dir: Option<&std::path::Path>,
) -> ExitCode {
    let airframes = match Airframe::from_dir(airframes_path) {
        Ok(a) => a,
        Err(e) => {
            error!("failed to load airframes: {e}");
            return ExitCode::FAILURE;
        }
    };

    let layout = SheetLayout::standard(sheet_width);
    if let Err(e) = layout.columns() {
        error!("bad sheet layout: {e}");
        return ExitCode::FAILURE;
    }

    let slots = assign_sprite_ids(&airframes, id_offset);
    let manifest = build_manifest(&airframes, &slots, &layout, png_name);

    let json = match serde_json::to_string_pretty(&manifest) {
        Ok(j) => j,
        Err(e) => {
            error!("failed to serialize manifest: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = fs::write(output_json, json) {
        error!("failed to write {}: {e}", output_json.display());
        return ExitCode::FAILURE;
    }
    info!(
        sprites = slots.len(),
        manifest = %output_json.display(),
        "wrote manifest"
    );

    if let (Some(inkscape), Some(dir)) = (inkscape, sprites_dir) {
        if let Err(e) = fs::create_dir_all(dir) {
            error!("failed to create {}: {e}", dir.display());
            return ExitCode::FAILURE;
        }
        let raster = Rasterizer::new(inkscape);
        for slot in &slots {
            let dst = dir.join(format!("{}.png", slot.sprite_id));
            info!(sprite_id = slot.sprite_id, svg_file = %slot.src, "exporting sprite");
            if let Err(e) = raster.convert(std::path::Path::new(&slot.src), &dst) {
                error!("failed to export {}: {e}", slot.src);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
