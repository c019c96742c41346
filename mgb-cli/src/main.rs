//! Headless command-line host for the emulation core: loads a cartridge,
//! runs frames at roughly the native refresh rate, and exits on STOP or on
//! an undefined opcode. Pair with `--trace` to use it as an instruction
//! tracer; rendering and input belong to a windowing host, not this binary.

use clap::Parser;
use mgb_core::{Cartridge, EmulationError, Machine};
use std::error::Error;
use std::time::{Duration, Instant};
use std::{fs, thread};

const CLOCK_SPEED: f64 = 4_194_304.0;

#[derive(Parser)]
struct Cli {
    /// Cartridge image to run
    rom_path: String,
    /// Log every executed instruction
    #[arg(long = "trace", default_value_t = false)]
    trace: bool,
    /// Skip the boot ROM and start from the post-boot state
    #[arg(long = "no-bootrom", default_value_t = true, action = clap::ArgAction::SetFalse)]
    bootrom: bool,
    /// Stop after this many frames (run forever if not set)
    #[arg(long = "frames")]
    frames: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.trace {
        logger.filter_module("mgb_core::machine", log::LevelFilter::Trace);
    }
    logger.init();

    let rom = fs::read(&args.rom_path)?;
    log::info!("Loaded {} bytes from {}", rom.len(), args.rom_path);

    // The core never parses the header; pick the mapper variant here
    let cartridge = match rom.get(0x147) {
        Some(0x00) | None => Cartridge::rom_only(rom),
        Some(_) => Cartridge::mbc1(rom),
    };

    let mut machine = Machine::new(cartridge, args.bootrom);
    machine.set_trace(args.trace);

    let mut frame_count = 0_u64;
    loop {
        if args.frames.is_some_and(|frames| frame_count >= frames) {
            return Ok(());
        }

        let frame_start = Instant::now();
        let cycles = match machine.step_frame() {
            Ok(cycles) => cycles,
            Err(EmulationError::StopExecuted) => {
                log::info!("STOP executed after {frame_count} frames, exiting");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        frame_count += 1;

        // Pace to the native ~59.73 Hz refresh rate
        let frame_time = Duration::from_secs_f64(cycles as f64 / CLOCK_SPEED);
        if let Some(remaining) = frame_time.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }
}
