use csv::Writer;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::Path;

use crate::experiment_config::{Algorithm, ExperimentConfig, ExperimentConfigError};
use crate::graph::import::import_instance;
use crate::metaheuristic::pso::{Report, Supervisor};
use crate::metaheuristic::{ProblemInstance, Pso};

pub struct Experiment {}

impl Experiment {
    /// Loads the instance, runs the swarm and writes the statistics to `stats_filename`.
    /// Returns `None` for experiments marked as finished.
    pub fn run(
        config: &ExperimentConfig,
        stats_filename: &Path,
    ) -> Result<Option<Report>, ExperimentConfigError> {
        if config.experiment.finished() {
            return Ok(None);
        }

        let verbose = config.experiment.verbose;
        let pso_cfg = config.algorithm.pso()?;
        let instance = import_instance(Path::new(config.graph_creation.filename.as_str()))?;
        let (c_min, c_max) = config.graph_creation.window(instance.c_min, instance.c_max)?;
        let mut graph = instance.graph;

        if verbose {
            eprintln!("{:#?}", pso_cfg);
            eprintln!(
                "Cmin:\t{}\nCmax:\t{}\nV:\t{}\nE:\t{}\nS0:\t{}\n",
                c_min,
                c_max,
                graph.size(),
                graph.iter_edges().count(),
                graph.start() + 1
            );
            eprintln!("Analyzing graph...");
        }
        graph.analyze(pso_cfg.mst);
        if verbose {
            let blacklist: Vec<String> = graph
                .blacklist()
                .iter()
                .map(|id| format!("{}", id + 1))
                .collect();
            eprintln!("Blacklisted nodes: \t{}", blacklist.join(" "));
            eprintln!("Generating random particles...");
        }

        let supervisor = Supervisor::new(
            config.experiment.aggregation_rate,
            Writer::from_writer(File::create(stats_filename)?),
        );
        let mut pso = Pso::new(
            ProblemInstance::new(&graph, c_min, c_max),
            pso_cfg.params(),
            supervisor,
        )?;

        let bar = if !verbose {
            ProgressBar::hidden()
        } else if pso_cfg.optima == 0 {
            let bar = ProgressBar::new(pso_cfg.max_cycles as u64);
            bar.set_style(
                ProgressStyle::default_bar().template("Optimizing {bar:40} {pos}/{len} {msg}"),
            );
            bar
        } else {
            ProgressBar::new_spinner()
        };

        while pso.single_iteration().is_some() {
            bar.set_message(&format!("best reward {}", pso.best().best_reward()));
            bar.inc(1);
        }
        bar.finish_and_clear();

        let outcome = pso.finish();
        if pso_cfg.optima != 0 {
            eprintln!("Iterations: {}", outcome.iterations);
        }

        Ok(Some(outcome.report()))
    }
}
