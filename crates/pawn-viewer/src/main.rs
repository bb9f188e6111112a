mod app;
mod pawn;

use anyhow::Result;
use pawn_engine::device::GpuInit;
use pawn_engine::logging::{init_logging, LoggingConfig};
use pawn_engine::window::{Runtime, RuntimeConfig};

use crate::app::PawnApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig {
        target: env_logger::Target::Stdout,
        ..Default::default()
    });

    let gpu_init = GpuInit {
        prefer_srgb: false,
        ..Default::default()
    };

    Runtime::run(RuntimeConfig::default(), gpu_init, PawnApp::new())
}
