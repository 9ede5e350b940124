mod message;
mod params;
mod particle;
mod supervisor;
mod worker_pool;

pub use message::Message;
pub use params::{EvalConfig, Params};
pub use particle::{Evaluation, Particle};
pub use supervisor::Supervisor;
pub use worker_pool::WorkerPool;

use crate::metaheuristic::{ProblemInstance, Solution};
use crate::rng::{rng64, split_seed};

use rayon::ThreadPoolBuildError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::time::Instant;

/// Particle swarm optimizer for the arc orienteering problem.
///
/// Every cycle each particle moves towards its own and the swarm's best position
/// (or jumps randomly in random walk mode) and is evaluated again. Particles are
/// processed in parallel; the swarm's best is only recomputed once all of them
/// are done, so within a cycle everybody follows the same best.
pub struct Pso<'a, W: Write> {
    config: EvalConfig,
    params: Params,
    swarm: Vec<Particle<'a>>,
    best: Particle<'a>,
    best_route: Solution,
    pool: WorkerPool,
    pub supervisor: Supervisor<W>,
    i: usize,
}

impl<'a, W: Write> Pso<'a, W> {
    /// Randomizes and evaluates the initial swarm.
    /// Panics on an empty swarm or a graph which was not analyzed as required.
    pub fn new(
        problem: ProblemInstance<'a>,
        params: Params,
        supervisor: Supervisor<W>,
    ) -> Result<Self, ThreadPoolBuildError> {
        let graph = problem.graph();
        assert!(params.swarm_size > 0, "The swarm needs at least one particle.");
        assert!(graph.is_analyzed(), "Graph has to be analyzed first.");
        assert!(
            !params.use_mst || graph.spanning_tree().is_some(),
            "Spanning tree mode needs a graph analyzed with a spanning tree."
        );

        let start_time = Instant::now();
        let config = EvalConfig::new(problem.c_min(), problem.c_max(), params.use_mst);
        let mut rng = rng64(params.seed);
        let swarm: Vec<Particle> = (0..params.swarm_size)
            .map(|_| {
                let mut particle = Particle::new(graph, split_seed(&mut rng));
                particle.randomize();
                particle.evaluate(&config);
                particle
            })
            .collect();
        let best = Particle::best(&swarm, &config).clone();
        let best_route = best.best_route(&config);
        let pool = WorkerPool::new(params.threads)?;

        // the receiver is owned by the supervisor itself, sending can't fail
        supervisor
            .sender()
            .send(Message::new(
                0,
                0,
                params.swarm_size,
                params.swarm_size,
                0,
                start_time.elapsed(),
                best.best_cost(),
                best.best_reward(),
            ))
            .ok();

        Ok(Pso {
            config,
            params,
            swarm,
            best,
            best_route,
            pool,
            supervisor,
            i: 0,
        })
    }

    /// Stops at the optima reward if one is set, after `max_cycles` cycles otherwise.
    pub fn finished(&self) -> bool {
        if self.params.optima != 0 {
            self.best.best_reward() == self.params.optima
        } else {
            self.i >= self.params.max_cycles
        }
    }

    /// Runs one cycle over the whole swarm. Returns the best route afterwards,
    /// or `None` without doing anything if the run is already finished.
    pub fn single_iteration(&mut self) -> Option<&Solution> {
        if self.finished() {
            return None;
        }

        let cycle = self.i + 1;
        let best = &self.best;
        let config = &self.config;
        let params = &self.params;
        let messages = self.pool.run_all(&mut self.swarm, |id, particle| {
            let start_time = Instant::now();
            if params.random_walk {
                particle.randomize();
            } else {
                particle.update_speed(best, params.social_factor, params.cognitive_factor);
                if params.max_velocity > 0.0 {
                    particle.limit_speed(params.max_velocity);
                }
                particle.update_position();
            }
            let evaluation = particle.evaluate(config);

            Message::from_evaluation(
                id + 1,
                cycle,
                evaluation,
                start_time.elapsed(),
                particle.cost(),
                particle.reward(),
            )
        });

        let start_time = Instant::now();
        let tx = self.supervisor.sender();
        for message in messages {
            tx.send(message).ok();
        }

        self.best = Particle::best(&self.swarm, &self.config).clone();
        self.best_route = self.best.best_route(&self.config);
        tx.send(Message::new(
            0,
            cycle,
            0,
            0,
            0,
            start_time.elapsed(),
            self.best.best_cost(),
            self.best.best_reward(),
        ))
        .ok();
        self.supervisor.aggregate_receive();
        self.i += 1;

        Some(&self.best_route)
    }

    pub fn best(&self) -> &Particle<'a> {
        &self.best
    }

    pub fn iterations(&self) -> usize {
        self.i
    }

    /// Flushes the statistics and hands out the final best.
    pub fn finish(mut self) -> PsoOutcome<'a> {
        self.supervisor.finish();
        PsoOutcome {
            best: self.best,
            best_route: self.best_route,
            iterations: self.i,
            config: self.config,
        }
    }

    pub fn run(mut self) -> PsoOutcome<'a> {
        while self.single_iteration().is_some() {}
        self.finish()
    }
}

pub struct PsoOutcome<'a> {
    pub best: Particle<'a>,
    pub best_route: Solution,
    pub iterations: usize,
    pub config: EvalConfig,
}

impl<'a> PsoOutcome<'a> {
    pub fn report(&self) -> Report {
        Report {
            cost: self.best.best_cost(),
            reward: self.best.best_reward(),
            route: self.best_route.clone(),
            iterations: self.iterations,
        }
    }
}

/// Final answer of a run, shown with one based node ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub cost: f64,
    pub reward: u32,
    pub route: Solution,
    pub iterations: usize,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cost:\t{}", self.cost)?;
        writeln!(f, "Reward:\t{}", self.reward)?;
        write!(
            f,
            "Route:\t{}",
            self.route
                .iter_nodes()
                .map(|id| format!("{}", id + 1))
                .collect::<Vec<String>>()
                .join("->")
        )
    }
}
