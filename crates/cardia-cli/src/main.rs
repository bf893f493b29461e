use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use cardia_cli::commands::features::run_features;
use cardia_cli::commands::predict::{read_input_record, run_predict};
use cardia_cli::commands::train::run_train;
use cardia_cli::config::TrainConfig;
use cardia_cli::report::write_training_report;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CARDIA_LOG", "error,cardia=info"))
        .init();

    let matches = Command::new("cardia")
        .version(clap::crate_version!())
        .about("Heart-disease risk model: train, evaluate and predict")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Train the risk model on a heart dataset CSV and write an HTML report")
                .arg(
                    Arg::new("config")
                        .help("Path to training configuration JSON file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("data")
                        .short('d')
                        .long("data")
                        .help(
                            "Path to the training CSV. Overrides the path in the \
                             configuration file.",
                        )
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help(
                            "Path the HTML report is written to. Overrides the \
                             configuration file.",
                        )
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test_fraction")
                        .long("test-fraction")
                        .help(
                            "Fraction of each class held out for evaluation. \
                             Overrides the configuration file.",
                        )
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help(
                            "Seed for the train/test shuffle. Overrides the \
                             configuration file.",
                        )
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("max_iter")
                        .long("max-iter")
                        .help(
                            "Maximum optimizer iterations. Overrides the \
                             configuration file.",
                        )
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("learning_rate")
                        .long("learning-rate")
                        .help(
                            "Gradient descent step size. Overrides the \
                             configuration file.",
                        )
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable HTML report generation.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Train in-process and score one feature record")
                .arg(
                    Arg::new("input")
                        .help("Path to a JSON file mapping the ten feature names to values")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .help("Path to training configuration JSON file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("data")
                        .short('d')
                        .long("data")
                        .help(
                            "Path to the training CSV. Overrides the path in the \
                             configuration file.",
                        )
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test_fraction")
                        .long("test-fraction")
                        .help(
                            "Fraction of each class held out for evaluation. \
                             Overrides the configuration file.",
                        )
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help(
                            "Seed for the train/test shuffle. Overrides the \
                             configuration file.",
                        )
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("max_iter")
                        .long("max-iter")
                        .help(
                            "Maximum optimizer iterations. Overrides the \
                             configuration file.",
                        )
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("learning_rate")
                        .long("learning-rate")
                        .help(
                            "Gradient descent step size. Overrides the \
                             configuration file.",
                        )
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("features")
                .about("Print the static feature catalogue as JSON"),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("features", _)) => run_features(),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    let mut config = TrainConfig::from_arguments(config_path, matches)?;
    if let Some(report) = matches.get_one::<PathBuf>("output_file") {
        config.report = report.clone();
    }
    if config_path.is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        eprintln!("[Cardia] No config provided; effective config:\n{}", default_json);
    }
    log::info!("[Cardia] Training from {:?}", config.data);

    match run_train(&config) {
        Ok(model) => {
            if !matches.get_flag("no_report") {
                write_training_report(&model, &config, &config.report)?;
                eprintln!("[Cardia] Report written to {}", config.report.display());
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let input_path: &PathBuf = matches.get_one("input").unwrap();
    let config_path: Option<&PathBuf> = matches.get_one("config");
    let config = TrainConfig::from_arguments(config_path, matches)?;
    log::info!("[Cardia] Predicting for input: {:?}", input_path);

    let input = read_input_record(input_path)?;
    match run_predict(&config, &input) {
        Ok(prediction) => {
            println!("{}", serde_json::to_string_pretty(&prediction)?);
            Ok(())
        }
        Err(e) => {
            log::error!("Prediction failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
