use color_eyre::Result;
use dot_globe::{common::settings::Settings, globe::land_mask::LandMask};

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let settings = Settings::load()?;
    let mask = LandMask::open(&settings.land_mask_path)?;

    dot_globe::run(settings, mask)
}
