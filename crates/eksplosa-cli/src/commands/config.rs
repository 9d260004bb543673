use clap::{Subcommand, ValueEnum};
use eksplosa_core::storage::config::{ApiConfig, QuizConfig};
use eksplosa_core::{CarouselConfig, Config};

#[derive(Clone, Copy, ValueEnum)]
pub enum Section {
    Api,
    Quiz,
    Carousel,
}

impl Section {
    fn key(self) -> &'static str {
        match self {
            Section::Api => "api",
            Section::Quiz => "quiz",
            Section::Carousel => "carousel",
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dot path
    Get {
        /// e.g. "quiz.feedback_delay_ms", "carousel.gap_px.wide"
        key: String,
    },
    /// Change one value and save
    Set {
        key: String,
        value: String,
    },
    /// Print the whole config, or one section, as TOML
    Show {
        #[arg(long, value_enum)]
        section: Option<Section>,
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Restore defaults for everything, or for one section
    Reset {
        #[arg(long, value_enum)]
        section: Option<Section>,
    },
    /// Print where config.toml lives
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::Show { section, json } => {
            let config = Config::load()?;
            let value = serde_json::to_value(&config)?;
            let value = match section {
                Some(s) => value[s.key()].clone(),
                None => value,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", toml::to_string_pretty(&value)?);
            }
        }
        ConfigAction::Reset { section } => {
            let mut config = Config::load_or_default();
            match section {
                None => config = Config::default(),
                Some(Section::Api) => config.api = ApiConfig::default(),
                Some(Section::Quiz) => config.quiz = QuizConfig::default(),
                Some(Section::Carousel) => config.carousel = CarouselConfig::default(),
            }
            config.save()?;
            match section {
                Some(s) => println!("[{}] reset to defaults", s.key()),
                None => println!("config reset to defaults"),
            }
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
    }
    Ok(())
}
