use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use wbn_classifiers::config::{NormalizerKind, TermSource};
use wbn_cli::classify::{
    load_classify_config, run_classify, run_evaluate, write_evaluation, write_predictions,
    ClassifyConfig,
};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("WBN_LOG", "error,wbn=info"))
        .init();

    let matches = Command::new("wbn")
        .version(clap::crate_version!())
        .about("WBN CLI - Weighted Bayesian Network text classification")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("classify")
                .about("Fit on a labeled dataset and classify the documents of another")
                .arg(
                    Arg::new("train")
                        .help("Path to the labeled training dataset (.json, .tsv or .csv)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("input")
                        .help("Path to the dataset to classify (.json, .tsv or .csv)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .help("Path to JSON configuration file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write predictions (TSV). Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .args(model_overrides()),
        )
        .subcommand(
            Command::new("evaluate")
                .about("Evaluate the classifier on a seeded train/test split of a labeled dataset")
                .arg(
                    Arg::new("dataset")
                        .help("Path to the labeled dataset (.json, .tsv or .csv)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .help("Path to JSON configuration file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("train_fraction")
                        .long("train-fraction")
                        .help("Share of documents used for fitting. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(f32))
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed of the train/test shuffle. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(u64))
                        .value_hint(ValueHint::Other),
                )
                .args(model_overrides()),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("classify", sub_m)) => handle_classify(sub_m),
        Some(("evaluate", sub_m)) => handle_evaluate(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn model_overrides() -> [Arg; 3] {
    [
        Arg::new("depth_fraction")
            .long("depth-fraction")
            .help("Fraction of the global corpus used as edge depth. Overrides the configuration file.")
            .value_parser(clap::value_parser!(f64))
            .value_hint(ValueHint::Other),
        Arg::new("term_source")
            .long("term-source")
            .help("Which document terms build the graphs.")
            .value_parser(["tokens", "keywords", "both"])
            .value_hint(ValueHint::Other),
        Arg::new("normalizer")
            .long("normalizer")
            .help("How terms are normalized before counting.")
            .value_parser(["snowball", "lowercase", "identity"])
            .value_hint(ValueHint::Other),
    ]
}

fn resolve_config(matches: &ArgMatches) -> Result<ClassifyConfig> {
    let mut config = if let Some(config_path) = matches.get_one::<PathBuf>("config") {
        eprintln!("[WBN] Using config: {:?}", config_path);
        load_classify_config(config_path)?
    } else {
        eprintln!("[WBN] No config provided; using defaults.");
        ClassifyConfig::default()
    };

    if let Some(depth_fraction) = matches.get_one::<f64>("depth_fraction") {
        config.model.depth_fraction = *depth_fraction;
    }
    if let Some(term_source) = matches.get_one::<String>("term_source") {
        config.model.term_source = TermSource::from_str(term_source).map_err(anyhow::Error::msg)?;
    }
    if let Some(normalizer) = matches.get_one::<String>("normalizer") {
        config.model.normalizer =
            NormalizerKind::from_str(normalizer).map_err(anyhow::Error::msg)?;
    }

    if matches.get_one::<PathBuf>("config").is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        eprintln!("[WBN] Default config:\n{}", default_json);
    }

    Ok(config)
}

fn handle_classify(matches: &ArgMatches) -> Result<()> {
    let Some(train_path) = matches.get_one::<PathBuf>("train") else {
        unreachable!("train is a required argument")
    };
    let Some(input_path) = matches.get_one::<PathBuf>("input") else {
        unreachable!("input is a required argument")
    };
    let output_path: Option<&PathBuf> = matches.get_one("output_file");
    eprintln!("[WBN] Fitting on {:?}, classifying {:?}", train_path, input_path);

    let config = resolve_config(matches)?;
    let rows = run_classify(train_path, input_path, &config)?;
    write_predictions(&rows, output_path.map(PathBuf::as_path))?;

    let abstained = rows.iter().filter(|row| row.code.is_none()).count();
    eprintln!(
        "[WBN] Classified {} documents ({} without enough evidence).",
        rows.len(),
        abstained
    );
    Ok(())
}

fn handle_evaluate(matches: &ArgMatches) -> Result<()> {
    let Some(dataset) = matches.get_one::<PathBuf>("dataset") else {
        unreachable!("dataset is a required argument")
    };
    eprintln!("[WBN] Evaluating on {:?}", dataset);

    let mut config = resolve_config(matches)?;
    if let Some(train_fraction) = matches.get_one::<f32>("train_fraction") {
        config.train_fraction = *train_fraction;
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.seed = *seed;
    }

    let report = run_evaluate(dataset, &config)?;
    write_evaluation(&report, std::io::stdout().lock())?;
    Ok(())
}
