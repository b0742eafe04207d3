//! notifier-rainbow CLI: run the rainbow animation on a webmail notifier.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use notifier_rainbow_core::animation::{run_animation, RunControl, StopFlag, TickBudget};
use notifier_rainbow_core::config::{AnimationConfig, DEFAULT_TICK_DELAY_MS};
use notifier_rainbow_core::cycle::ColorCycler;
use notifier_rainbow_core::device::{find_notifiers, locate_notifiers, HidapiBus};
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "notifier-rainbow",
    version,
    about = "Cycle a Dream Cheeky webmail notifier through the rainbow"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected webmail notifiers.
    List {
        /// Print the device list as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Enable every notifier and animate the first one (default).
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Pause between color reports, in milliseconds (1-250).
    #[arg(long, default_value_t = DEFAULT_TICK_DELAY_MS)]
    delay_ms: u64,
    /// Scale every channel by 31 instead of the neutral 27/31/15 white point.
    #[arg(long)]
    full_brightness: bool,
    /// Stop after this many color reports.
    #[arg(long)]
    ticks: Option<u64>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_TICK_DELAY_MS,
            full_brightness: false,
            ticks: None,
        }
    }
}

/// Stops on Ctrl-C, and after a tick budget when one is given.
struct CliControl {
    stop: StopFlag,
    budget: Option<TickBudget>,
}

impl RunControl for CliControl {
    fn should_continue(&mut self) -> bool {
        if !self.stop.should_continue() {
            return false;
        }
        self.budget.as_mut().is_none_or(|b| b.should_continue())
    }
}

fn open_bus() -> Option<HidapiBus> {
    match HidapiBus::new() {
        Ok(bus) => Some(bus),
        Err(e) => {
            warn!(error = %e, "HID subsystem unavailable");
            None
        }
    }
}

fn list(json: bool) -> Result<()> {
    let devices: Vec<_> = open_bus()
        .map(|bus| find_notifiers(&bus).into_iter().map(|d| d.info).collect())
        .unwrap_or_default();

    if json {
        let out = serde_json::to_string_pretty(&devices).context("serialize device list")?;
        println!("{out}");
    } else if devices.is_empty() {
        println!("No webmail notifier found.");
        println!("Ensure the device is plugged in and readable by your user.");
    } else {
        for dev in &devices {
            println!(
                "Webmail notifier (VID: 0x{:04X}, PID: 0x{:04X}, path: {}{})",
                dev.vid,
                dev.pid,
                dev.path,
                dev.serial
                    .as_deref()
                    .map(|s| format!(", serial: {s}"))
                    .unwrap_or_default()
            );
        }
    }
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let config = AnimationConfig::new(args.delay_ms, args.full_brightness)?;

    let stop = StopFlag::new();
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.stop()).context("failed to install Ctrl-C handler")?;
    }

    let Some(bus) = open_bus() else {
        return Ok(());
    };
    let notifiers = locate_notifiers(&bus);
    let Some(target) = notifiers.first() else {
        return Ok(());
    };
    if notifiers.len() > 1 {
        info!(
            count = notifiers.len(),
            path = %target.info.path,
            "Multiple notifiers enabled; animating the first"
        );
    }

    let mut control = CliControl {
        stop,
        budget: args.ticks.map(TickBudget::new),
    };
    run_animation(
        &target.transport,
        &mut ColorCycler::new(),
        &config,
        &mut control,
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { json }) => list(json),
        Some(Commands::Run(args)) => run(args),
        None => run(RunArgs::default()),
    }
}
