use film_overlay::{logging, settings::Settings};

const SETTINGS_FILE: &str = "film_overlay.json";

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(settings.debug_logging, settings.log_file.clone());
    tracing::info!(settings = SETTINGS_FILE, "starting film overlay");
    film_overlay::gui::run(settings)
}
