use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use bitmap_logic::config::AppConfig;
use bitmap_logic::console::run_console;
use bitmap_logic::debug_image::save_debug_images;
use bitmap_logic::gui::run_gui;
use bitmap_logic::pixel::{load_bitmap, PixelGrid};
use bitmap_logic::simulator::Simulator;

#[derive(Parser)]
#[command(name = "bitmap_logic", about = "Simulate NOT-gate circuits drawn in a bitmap")]
struct Cli {
    /// Image to simulate. Overrides `file_name` from the config file.
    image: Option<PathBuf>,
    /// JSON configuration file. A missing file means defaults.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
    /// Use the terminal viewer instead of the window.
    #[arg(long)]
    console: bool,
    /// Run N ticks without any viewer and print a summary.
    #[arg(long, value_name = "N", conflicts_with = "console")]
    ticks: Option<u32>,
    /// Write wire_map.png and gates.png into this directory after loading.
    #[arg(long, value_name = "DIR")]
    dump_debug: Option<PathBuf>,
    /// Fixed RNG seed. Overrides `simulator.seed` from the config file.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(seed) = cli.seed {
        config.simulator.seed = Some(seed);
    }

    let image_path = match cli.image {
        Some(path) => path,
        None if !config.file_name.is_empty() => PathBuf::from(&config.file_name),
        None => {
            return Err(format!(
                "no image given: pass a path or set file_name in '{}'",
                cli.config.display()
            )
            .into())
        }
    };

    let bitmap = load_bitmap(&image_path)?;
    info!(
        "read '{}' ({}x{})",
        image_path.display(),
        bitmap.width(),
        bitmap.height()
    );
    let simulator = Simulator::with_image(config.simulator.clone(), &bitmap)?;

    if let Some(dir) = &cli.dump_debug {
        save_debug_images(simulator.netlist(), dir)?;
    }

    if let Some(ticks) = cli.ticks {
        return run_headless(simulator, ticks);
    }

    if cli.console {
        return run_console(
            simulator,
            Some(image_path),
            config.console,
            config.simulations_per_frame,
        );
    }

    if let Err(e) = run_gui(
        simulator,
        bitmap,
        Some(image_path),
        config.gui,
        config.simulations_per_frame,
    ) {
        warn!("window viewer failed: {}", e);
        return Err(format!("failed to start window viewer: {}", e).into());
    }
    Ok(())
}

fn run_headless(mut simulator: Simulator, ticks: u32) -> Result<(), Box<dyn std::error::Error>> {
    simulator.simulate_n(ticks);

    let (width, height) = simulator.size();
    let high_wires = simulator.wire_states().iter().filter(|s| **s).count();
    let high_gates = simulator.gates().iter().filter(|g| g.state()).count();

    println!("Size:  {}x{}", width, height);
    println!("Wires: {} ({} high)", simulator.wire_count(), high_wires);
    println!("Gates: {} ({} high)", simulator.gate_count(), high_gates);
    println!("Ticks: {}", simulator.ticks());
    Ok(())
}
