use glob::glob;
use std::env;
use std::path::Path;
use std::process;

use aop_with_pso::experiment::Experiment;
use aop_with_pso::experiment_config::ExperimentConfig;

fn run_file(path: &Path) {
    let config = match ExperimentConfig::from_file(path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {}", path.display(), err);
            return;
        }
    };

    let stats = path.with_extension("csv");
    match Experiment::run(&config, &stats) {
        Ok(Some(report)) => println!("{}\n{}\n", path.display(), report),
        Ok(None) => eprintln!("{}: already finished, skipping", path.display()),
        Err(err) => eprintln!("{}: {}", path.display(), err),
    }
}

fn main() {
    let pattern = env::args()
        .nth(1)
        .unwrap_or_else(|| "experiments/*.yaml".to_string());

    let entries = match glob(&pattern) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("Invalid pattern {}: {}", pattern, err);
            process::exit(1);
        }
    };

    for entry in entries {
        match entry {
            Ok(path) => run_file(&path),
            Err(err) => eprintln!("{}", err),
        }
    }
}
