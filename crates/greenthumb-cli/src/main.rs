//! Green Thumb storefront command line

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use greenthumb_catalog::{PlantId, PlantQuery, PlantRecord};
use greenthumb_core::{AppSettings, ExperienceLevel, Storefront};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("greenthumb")
        .version(greenthumb_core::VERSION)
        .about("Green Thumb plant storefront")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Settings file (TOML)"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Override the SQLite catalog path"),
        )
        .arg(
            Arg::new("prefs")
                .long("prefs")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Override the preference file path"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .global(true)
                .help("Remote config endpoint URL"),
        )
        .arg(
            Arg::new("developer-mode")
                .long("developer-mode")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Bypass the remote config cache"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(Command::new("seed").about("Seed the catalog if it is empty"))
        .subcommand(
            Command::new("list")
                .about("List plants")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Only plants whose name contains this text"),
                )
                .arg(
                    Arg::new("max-price")
                        .long("max-price")
                        .value_parser(value_parser!(f64))
                        .help("Only plants at or below this price"),
                ),
        )
        .subcommand(
            Command::new("launch")
                .about("Start the storefront: seed, description refresh, first-load check"),
        )
        .subcommand(
            Command::new("rate")
                .about("Save the gardening experience rating")
                .arg(
                    Arg::new("index")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("Rating position (0 = Beginner, 1 = Intermediate, 2 = Expert)"),
                ),
        )
        .subcommand(
            Command::new("add-to-cart")
                .about("Add a plant to the cart")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64))
                        .help("Plant identifier"),
                )
                .arg(
                    Arg::new("quantity")
                        .long("quantity")
                        .default_value("1")
                        .value_parser(value_parser!(u32))
                        .help("Number of plants"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn settings(matches: &ArgMatches) -> Result<AppSettings> {
    let mut settings = match matches.get_one::<PathBuf>("config") {
        Some(path) => AppSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AppSettings::default(),
    };

    if let Some(db) = matches.get_one::<PathBuf>("db") {
        settings.database_path.clone_from(db);
    }
    if let Some(prefs) = matches.get_one::<PathBuf>("prefs") {
        settings.preferences_path.clone_from(prefs);
    }
    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        settings.remote_config.endpoint = Some(endpoint.clone());
    }
    if matches.get_flag("developer-mode") {
        settings.remote_config.developer_mode = true;
    }
    Ok(settings)
}

fn print_plants(plants: &[PlantRecord]) {
    for plant in plants {
        println!("{:>3}  {:<18} {:>7.2}  {}", plant.id, plant.name, plant.price, plant.description);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let settings = settings(&matches)?;
    let storefront = Storefront::from_settings(&settings)
        .await
        .context("opening storefront")?;

    match matches.subcommand() {
        Some(("seed", _)) => {
            let seeded = storefront.seed().await?;
            println!("Seeded {seeded} plants");
        }
        Some(("list", args)) => {
            let mut query = PlantQuery::all();
            if let Some(name) = args.get_one::<String>("name") {
                query = query.with_name_containing(name.clone());
            }
            if let Some(max) = args.get_one::<f64>("max-price") {
                query = query.with_max_price(*max);
            }
            print_plants(&storefront.plants(&query).await?);
        }
        Some(("launch", _)) => {
            let report = storefront.launch().await?;
            if report.seeded > 0 {
                println!("Seeded {} plants", report.seeded);
            }
            if let Some(err) = &report.preference_error {
                eprintln!("Preferences unavailable: {err}");
            }
            if report.show_experience_prompt {
                let current = storefront.experience().current()?;
                println!("How would you rate your gardening experience?");
                for level in ExperienceLevel::ALL {
                    let marker = if current == Some(level) { '*' } else { ' ' };
                    println!("  {marker} {}: {}", level.index(), level.label());
                }
                println!("Answer with `greenthumb rate <index>`");
            }

            let refresh = &report.refresh;
            println!(
                "Descriptions: {:?} (value {:?} from {:?}), {} written, {} failed",
                refresh.summary.level,
                refresh.value,
                refresh.source,
                refresh.summary.written.len(),
                refresh.summary.failures.len(),
            );
            print_plants(&storefront.plants(&PlantQuery::all()).await?);
        }
        Some(("rate", args)) => {
            let index = args
                .get_one::<usize>("index")
                .copied()
                .context("missing rating index")?;
            let level = ExperienceLevel::try_from_index(index)?;
            storefront.experience().save(Some(level))?;
            println!("Saved gardening experience: {}", level.label());
        }
        Some(("add-to-cart", args)) => {
            let raw = args
                .get_one::<i64>("id")
                .copied()
                .context("missing plant id")?;
            let quantity = args.get_one::<u32>("quantity").copied().unwrap_or(1);
            let id = PlantId::new(raw)?;
            match storefront.add_to_cart(id, quantity).await? {
                Some(plant) => println!("Added {quantity} x {} to cart", plant.name),
                None => anyhow::bail!("no plant with id {id}"),
            }
        }
        _ => anyhow::bail!("no subcommand given"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn global_overrides_apply_after_subcommand() {
        let matches = cli()
            .try_get_matches_from([
                "greenthumb",
                "list",
                "--db",
                "/tmp/plants.db",
                "--endpoint",
                "http://localhost:8080/config",
                "--developer-mode",
            ])
            .unwrap();

        let settings = settings(&matches).unwrap();
        assert_eq!(settings.database_path, PathBuf::from("/tmp/plants.db"));
        assert_eq!(
            settings.remote_config.endpoint.as_deref(),
            Some("http://localhost:8080/config")
        );
        assert!(settings.remote_config.developer_mode);
        assert_eq!(
            settings.preferences_path,
            AppSettings::default().preferences_path
        );
    }

    #[test]
    fn rate_requires_numeric_index() {
        assert!(cli()
            .try_get_matches_from(["greenthumb", "rate", "expert"])
            .is_err());
    }
}
