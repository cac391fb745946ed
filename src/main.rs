use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rgb_pipeline::DitherMode;
use rgbsim::models::{DisplayConfig, DisplayPreset, CONFIG_ENV, DEFAULT_PRESET};
use rgbsim::rendering::{read_png, write_png, SourceFormat};
use rgbsim::services::{RenderRequest, Simulator};

#[derive(Parser)]
#[command(name = "rgbsim")]
#[command(about = "Render true-color images through simulated limited displays")]
struct Cli {
    /// Log pipeline decisions (chosen visual, color cube, routines)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct DisplayArgs {
    /// Built-in display preset (run without a command to list them)
    #[arg(short, long)]
    display: Option<String>,

    /// YAML display description (defaults to $RGBSIM_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a PNG through the simulated display and save what it shows
    Render {
        /// Input PNG file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        display: DisplayArgs,

        /// Ordered dithering
        #[arg(long, value_enum, default_value_t = DitherArg::Auto)]
        dither: DitherArg,

        /// Pixel layout handed to the pipeline
        #[arg(long, value_enum, default_value_t = SourceArg::Rgb)]
        source: SourceArg,

        /// Horizontal position of the image in the window
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        x: i32,

        /// Vertical position of the image in the window
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        y: i32,
    },
    /// List the display's visuals with their scores
    Visuals {
        #[command(flatten)]
        display: DisplayArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Initialize the pipeline and describe its color setup
    Palette {
        #[command(flatten)]
        display: DisplayArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DitherArg {
    Off,
    On,
    Auto,
}

impl From<DitherArg> for DitherMode {
    fn from(arg: DitherArg) -> Self {
        match arg {
            DitherArg::Off => DitherMode::Off,
            DitherArg::On => DitherMode::On,
            DitherArg::Auto => DitherMode::Auto,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Rgb,
    Rgb32,
    Gray,
    Indexed,
}

impl From<SourceArg> for SourceFormat {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Rgb => SourceFormat::Rgb,
            SourceArg::Rgb32 => SourceFormat::Rgb32,
            SourceArg::Gray => SourceFormat::Gray,
            SourceArg::Indexed => SourceFormat::Indexed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            display,
            dither,
            source,
            x,
            y,
        }) => {
            init_logging(cli.verbose);
            let request = RenderRequest::default()
                .dither(dither.into())
                .source(source.into())
                .origin(x, y);
            run_render_command(&input, &output, &display, request, cli.verbose)
        }
        Some(Commands::Visuals { display, json }) => {
            init_logging(cli.verbose);
            run_visuals_command(&display, json, cli.verbose)
        }
        Some(Commands::Palette { display, json }) => {
            init_logging(cli.verbose);
            run_palette_command(&display, json, cli.verbose)
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "rgbsim=info,rgb_pipeline=info"
    } else {
        "rgbsim=warn,rgb_pipeline=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Config file (explicit or from the environment), then the preset flag.
fn load_config(args: &DisplayArgs, verbose: bool) -> anyhow::Result<DisplayConfig> {
    let mut config = DisplayConfig::load(args.config.as_deref())?;
    if let Some(name) = &args.display {
        config = config.with_preset(name.parse()?);
    }
    if verbose {
        config.pipeline.verbose = true;
    }
    Ok(config)
}

fn run_render_command(
    input: &Path,
    output: &Path,
    display: &DisplayArgs,
    request: RenderRequest,
    verbose: bool,
) -> anyhow::Result<()> {
    let config = load_config(display, verbose)?;
    let image = read_png(input)?;
    let mut simulator = Simulator::new(&config)?;
    let rendered = simulator.render(&image, request)?;
    let bytes = write_png(output, &rendered.image)?;

    let summary = &rendered.summary;
    println!(
        "Rendered {} ({}x{}, {} bytes)",
        output.display(),
        rendered.image.width,
        rendered.image.height,
        bytes
    );
    println!(
        "  visual {} ({}, depth {}), {} {}",
        summary.visual,
        summary.class,
        summary.depth,
        summary.conversion,
        if summary.dithered { "dithered" } else { "undithered" }
    );
    Ok(())
}

fn run_visuals_command(display: &DisplayArgs, json: bool, verbose: bool) -> anyhow::Result<()> {
    let config = load_config(display, verbose)?;
    let simulator = Simulator::new(&config)?;
    let report = simulator.visual_report();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Visuals:");
    for visual in &report {
        let marker = if visual.chosen { "*" } else { " " };
        let default = if visual.default { " (default)" } else { "" };
        println!(
            "  {marker} {:<6} {:<13} depth {:>2}  bpp {:>2}  score {:#06x}{default}",
            visual.id, visual.class, visual.depth, visual.bits_per_pixel, visual.score
        );
    }
    if !report.iter().any(|v| v.chosen) {
        println!("\nNo usable visual.");
    }
    Ok(())
}

fn run_palette_command(display: &DisplayArgs, json: bool, verbose: bool) -> anyhow::Result<()> {
    let config = load_config(display, verbose)?;
    let mut simulator = Simulator::new(&config)?;
    let report = simulator.palette_report()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Visual:        {} ({}, depth {}, {} byte(s) per pixel)",
        report.visual, report.class, report.depth, report.bytes_per_pixel
    );
    println!(
        "Color table:   {} ({} cells allocated)",
        if report.private_table { "private" } else { "shared" },
        report.allocated_cells
    );
    if let Some([r, g, b]) = report.shades {
        println!("Color cube:    {r} x {g} x {b}");
    }
    if let Some(pixels) = report.cube_pixels {
        println!("Cube pixels:   {pixels} distinct");
    }
    println!(
        "Routines:      {} / {} (dithered)",
        report.rgb_routine, report.rgb_dither_routine
    );
    println!(
        "Dithering:     {}{}",
        if report.ditherable { "available" } else { "no effect" },
        if report.dither_by_default { ", on by default" } else { "" }
    );
    println!("Scratch:       {} surface(s)", report.scratch_images);
    Ok(())
}

/// Show version, presets and environment
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var(CONFIG_ENV).ok();
    let rust_log = std::env::var("RUST_LOG").ok();

    println!("rgbsim v{VERSION}");
    println!("Render true-color images through simulated limited displays\n");

    println!("Environment Variables:");
    println!(
        "  {CONFIG_ENV} = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG      = {}",
        rust_log.as_deref().unwrap_or("rgbsim=warn,rgb_pipeline=warn (default)")
    );

    println!("\nConfig:");
    match config_file.as_deref() {
        Some(path) if Path::new(path).exists() => println!("  {path}"),
        Some(path) => println!("  {path} (file not found, using defaults)"),
        None => println!("  defaults (preset {DEFAULT_PRESET})"),
    }

    println!("\nDisplay Presets:");
    for preset in DisplayPreset::ALL {
        println!("  {:<15} {}", preset.name(), preset.description());
    }

    println!(
        "\nGamma-corrected cubes: {}",
        if cfg!(feature = "gamma") { "enabled" } else { "disabled" }
    );

    println!("\nCommands:");
    println!("  rgbsim render -i in.png -o out.png -d pseudo8   Render through a display");
    println!("  rgbsim visuals -d workstation                    List visuals and scores");
    println!("  rgbsim palette -d pseudo8                        Show the color setup");
}
