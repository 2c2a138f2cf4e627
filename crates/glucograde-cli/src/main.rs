//! GlucoGrade CLI - Grade foods against a spoken glucose reading

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use glucograde_core::{Config, DiabetesType};

mod commands;

#[derive(Parser)]
#[command(name = "glucograde")]
#[command(version)]
#[command(about = "Grade foods against your current glucose reading", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose output (show timings and debug info)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Overrides the configured diabetes type for one command
#[derive(Args)]
struct TypeOverride {
    /// Insulin dependent: show advice instead of a letter grade
    #[arg(long, conflicts_with = "type_two")]
    type_one: bool,

    /// Show a letter grade
    #[arg(long)]
    type_two: bool,
}

impl TypeOverride {
    fn resolve(&self, config: &Config) -> DiabetesType {
        if self.type_one {
            DiabetesType::TypeOne
        } else if self.type_two {
            DiabetesType::TypeTwo
        } else {
            config.diabetes_type
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite spelled-out numbers as digits
    Normalize {
        /// Sentence to rewrite
        text: String,
    },

    /// Extract the glucose reading from a sentence
    Measure {
        /// Sentence containing a reading, in words or digits
        text: String,
    },

    /// Score one food against a glucose reading
    Score {
        /// Food id or name from the nutrition table
        #[arg(short, long, conflicts_with = "nutrients", required_unless_present = "nutrients")]
        food: Option<String>,

        /// Nutrient vector: id,carbohydrate,fat,fiber,protein,sugar,added_sugar[,serving_weight]
        #[arg(short, long, allow_hyphen_values = true)]
        nutrients: Option<String>,

        /// Glucose reading in mg/dL (defaults to the configured baseline)
        #[arg(short, long)]
        glucose: Option<f64>,

        #[command(flatten)]
        diabetes_type: TypeOverride,
    },

    /// Extract reading and food from an utterance and grade it
    Analyze {
        /// Utterance, e.g. "my glucose is ninety, can I have a banana"
        text: String,

        #[command(flatten)]
        diabetes_type: TypeOverride,
    },

    /// List foods in the nutrition table
    Foods,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Set the reading assumed before one is spoken
    SetBaseline {
        /// Glucose reading in mg/dL
        value: f64,
    },

    /// Set the diabetes type
    SetDiabetesType {
        /// type-one or type-two
        kind: String,
    },

    /// Use a nutrition CSV instead of the built-in table
    SetDatabase {
        /// Path to CSV file
        path: String,
    },

    /// Add an object name to spot in utterances
    AddKeyword {
        /// Word to add
        word: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    // Load configuration
    let config_path = cli.config.as_deref();
    let mut config = Config::load(config_path)?;
    tracing::debug!(
        "Config: {} (baseline {} mg/dL, {})",
        config_path.unwrap_or("default location"),
        config.baseline_glucose,
        config.diabetes_type.display_name()
    );

    match cli.command {
        Commands::Normalize { text } => commands::text::normalize(&text),

        Commands::Measure { text } => commands::text::measure(&text),

        Commands::Score {
            food,
            nutrients,
            glucose,
            diabetes_type,
        } => {
            let diabetes_type = diabetes_type.resolve(&config);
            let target = match (food, nutrients) {
                (_, Some(values)) => commands::score::Target::Nutrients(values),
                (Some(food), None) => commands::score::Target::Food(food),
                (None, None) => anyhow::bail!("Pass --food or --nutrients"),
            };
            commands::score::run(&config, target, glucose, diabetes_type).await
        }

        Commands::Analyze {
            text,
            diabetes_type,
        } => {
            config.diabetes_type = diabetes_type.resolve(&config);
            commands::analyze::run(&config, &text, cli.verbose).await
        }

        Commands::Foods => commands::foods::list(&config).await,

        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path => commands::config::show_path(config_path),
            ConfigAction::SetBaseline { value } => {
                commands::config::set_baseline(&mut config, config_path, value)
            }
            ConfigAction::SetDiabetesType { kind } => {
                commands::config::set_diabetes_type(&mut config, config_path, &kind)
            }
            ConfigAction::SetDatabase { path } => {
                commands::config::set_database(&mut config, config_path, &path).await
            }
            ConfigAction::AddKeyword { word } => {
                commands::config::add_keyword(&mut config, config_path, &word)
            }
        },
    }
}
