use crate::rng::os_random_seed;

pub struct Params {
    pub max_cycles: usize,
    pub swarm_size: usize,
    pub social_factor: f64,
    pub cognitive_factor: f64,
    pub use_mst: bool,
    pub random_walk: bool,
    /// Reward to stop at. 0 runs exactly `max_cycles` cycles instead.
    pub optima: u32,
    /// Worker threads, 0 picks one more than the available cores.
    pub threads: usize,
    /// Velocity components are clamped to this magnitude, 0 disables the clamp.
    pub max_velocity: f64,
    pub seed: u128,
}

impl Params {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        max_cycles: usize,
        swarm_size: usize,
        social_factor: f64,
        cognitive_factor: f64,
        use_mst: bool,
        random_walk: bool,
        optima: u32,
        threads: usize,
        max_velocity: f64,
        seed: Option<u128>,
    ) -> Self {
        Params {
            max_cycles,
            swarm_size,
            social_factor,
            cognitive_factor,
            use_mst,
            random_walk,
            optima,
            threads,
            max_velocity,
            seed: seed.unwrap_or_else(os_random_seed),
        }
    }
}

/// Everything a particle needs to turn its position into a scored route.
/// Built once per run and shared read-only by every particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalConfig {
    pub penalty: f64,
    pub c_min: f64,
    pub c_max: f64,
    pub use_mst: bool,
}

impl EvalConfig {
    /// The penalty weight equals `c_max`, so any penalized route is infeasible.
    pub fn new(c_min: f64, c_max: f64, use_mst: bool) -> Self {
        EvalConfig {
            penalty: c_max,
            c_min,
            c_max,
            use_mst,
        }
    }

    /// Greedy construction stops adding nodes once the route costs this much.
    pub fn midpoint(&self) -> f64 {
        (self.c_min + self.c_max) / 2.0
    }

    pub fn in_window(&self, cost: f64) -> bool {
        cost >= self.c_min && cost <= self.c_max
    }

    /// Strictly inside the window, used when picking the swarm's best.
    pub fn strictly_feasible(&self, cost: f64) -> bool {
        cost > self.c_min && cost < self.c_max
    }
}
