mod app;
mod config;
mod controls;
mod scene;

use loupe_engine::device::GpuInit;
use loupe_engine::logging::init_logging;
use loupe_engine::window::Runtime;

use app::Studio;
use config::StudioConfig;

fn main() -> anyhow::Result<()> {
    let config = StudioConfig::default();
    init_logging(config.logging.clone());

    log::info!("loupe studio starting");
    log::info!(
        "controls: pointer moves the lens | up/down zoom | left/right shape | R/F radius | \
         T/G outline | O outline color | A antialias | E lens | B background | \
         Backspace reset | Esc quit"
    );

    Runtime::run(config.runtime.clone(), GpuInit::default(), Studio::new(config))
}
