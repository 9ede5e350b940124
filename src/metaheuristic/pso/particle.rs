use crate::graph::WeightedGraph;
use crate::metaheuristic::pso::EvalConfig;
use crate::metaheuristic::Solution;
use crate::rng::rng64;

use oorandom::Rand64;
use std::cmp::Ordering;
use std::collections::VecDeque;

/// Consecutive evaluations without improving the own best before a restart.
const MAX_TIMES_NO_IMPROVE: usize = 6;

/// What an evaluation did to the particle's own best.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Improved,
    Stagnated,
    /// Stagnated for too long, the position was randomized again.
    Restarted,
}

#[derive(Debug, Clone)]
struct Memory {
    cost: f64,
    reward: u32,
    priorities: Vec<f64>,
    visiting: Vec<bool>,
}

/// A candidate solution. The position is one priority and one visiting flag per node;
/// the flags choose which nodes to route through and the priorities their order.
#[derive(Debug, Clone)]
pub struct Particle<'a> {
    graph: &'a WeightedGraph,
    rng: Rand64,
    times_no_improve: usize,
    cost: f64,
    reward: u32,
    priorities: Vec<f64>,
    visiting: Vec<bool>,
    priorities_speed: Vec<f64>,
    visiting_speed: Vec<f64>,
    best: Option<Memory>,
}

impl<'a> Particle<'a> {
    /// The graph has to be analyzed before the particle is evaluated.
    pub fn new(graph: &'a WeightedGraph, seed: u128) -> Self {
        let n = graph.size();
        Particle {
            graph,
            rng: rng64(seed),
            times_no_improve: 0,
            cost: f64::INFINITY,
            reward: 0,
            priorities: vec![0.0; n],
            visiting: vec![true; n],
            priorities_speed: vec![0.0; n],
            visiting_speed: vec![0.0; n],
            best: None,
        }
    }

    /// Draws a fresh position and velocity. The own best is kept.
    pub fn randomize(&mut self) {
        let rng = &mut self.rng;
        for p in self.priorities.iter_mut() {
            *p = rng.rand_float() * 10.0 - 5.0;
        }
        for v in self.visiting.iter_mut() {
            *v = rng.rand_range(0..2) == 1;
        }
        for s in self.priorities_speed.iter_mut() {
            *s = rng.rand_float() * 10.0 - 5.0;
        }
        for s in self.visiting_speed.iter_mut() {
            *s = rng.rand_float() * 10.0 - 5.0;
        }
    }

    /// Builds a closed route from `start` out of a position.
    ///
    /// Candidates are taken either in spanning tree preorder or sorted by priority,
    /// and each is inserted where it makes the route cheapest while staying below
    /// `c_max`. Candidates without such a spot go to the back of the queue.
    /// Construction ends when the queue runs dry, after three tries per candidate,
    /// or once the route costs half the window. The cheapest path back to `start`
    /// closes the route. If `start` can't be reached from the last inserted node
    /// the route is returned open.
    pub fn decode(&self, priorities: &[f64], visiting: &[bool], config: &EvalConfig) -> Solution {
        let graph = self.graph;
        let start = graph.start();

        let mut queue: VecDeque<usize> = if config.use_mst {
            graph.preorder(priorities, visiting).into_iter().collect()
        } else {
            let mut candidates: Vec<usize> = (0..graph.size())
                .filter(|&i| visiting[i] && i != start)
                .collect();
            candidates.sort_by(|a, b| {
                priorities[*a]
                    .partial_cmp(&priorities[*b])
                    .unwrap_or(Ordering::Equal)
            });
            candidates.into_iter().collect()
        };

        let mut route = Solution::from_nodes(vec![start]);
        let mut cost = 0.0;
        let max_tries = 3 * queue.len();
        let mut tries = 0;
        let midpoint = config.midpoint();

        while tries < max_tries && cost < midpoint {
            let node = match queue.pop_front() {
                Some(node) => node,
                None => break,
            };

            let mut candidate_cost = f64::INFINITY;
            // 0 means no feasible spot
            let mut candidate_position = 0;
            let nodes = route.nodes();
            for (i, (prev, next)) in route.iter_edges().enumerate() {
                let into = graph.edge(prev, node).cost();
                let out = graph.edge(node, next).cost();
                let new_cost = cost + into + out;
                if new_cost < candidate_cost && new_cost < config.c_max {
                    candidate_cost = new_cost;
                    candidate_position = i + 1;
                }
            }
            let tail = graph.edge(nodes[nodes.len() - 1], node).cost();
            if cost + tail < candidate_cost && cost + tail < config.c_max {
                candidate_cost = cost + tail;
                candidate_position = nodes.len();
            }

            tries += 1;
            if candidate_position == 0 {
                queue.push_back(node);
                continue;
            }

            route.insert_node(candidate_position, node);
            cost = candidate_cost;
        }

        if let Some(last) = route.last() {
            route.extend(graph.best_path(last, start));
        }
        route
    }

    /// The route encoded by the current position.
    pub fn route(&self, config: &EvalConfig) -> Solution {
        self.decode(&self.priorities, &self.visiting, config)
    }

    /// The route encoded by the own best position, or the current one if there is none yet.
    pub fn best_route(&self, config: &EvalConfig) -> Solution {
        let (priorities, visiting) = self.best_position();
        self.decode(priorities, visiting, config)
    }

    /// Scores the current position and updates the own best.
    ///
    /// Routes outside the window pay the penalty once, routes walking an arc twice
    /// pay it three times. The own best is replaced on the first evaluation, or
    /// by a strictly more rewarding route within `c_max`.
    pub fn evaluate(&mut self, config: &EvalConfig) -> Evaluation {
        let value = self.route(config).value(self.graph);
        self.cost = value.cost;
        self.reward = value.reward;

        if !config.in_window(self.cost) {
            self.cost += config.penalty;
        }
        if value.double_use {
            self.cost += 3.0 * config.penalty;
        }

        let improved = match &self.best {
            None => true,
            Some(best) => self.reward > best.reward && self.cost <= config.c_max,
        };

        if improved {
            self.best = Some(Memory {
                cost: self.cost,
                reward: self.reward,
                priorities: self.priorities.clone(),
                visiting: self.visiting.clone(),
            });
            self.times_no_improve = 0;
            return Evaluation::Improved;
        }

        self.times_no_improve += 1;
        if self.times_no_improve == MAX_TIMES_NO_IMPROVE {
            self.times_no_improve = 0;
            self.randomize();
            Evaluation::Restarted
        } else {
            Evaluation::Stagnated
        }
    }

    /// Pulls the velocity towards the own best and the swarm's best position.
    /// Visiting flags count as 0 and 1.
    pub fn update_speed(&mut self, global: &Particle, social_factor: f64, cognitive_factor: f64) {
        let (own_priorities, own_visiting) = match &self.best {
            Some(best) => (&best.priorities, &best.visiting),
            None => (&self.priorities, &self.visiting),
        };
        let (global_priorities, global_visiting) = global.best_position();

        for i in 0..self.priorities.len() {
            let x = self.priorities[i];
            self.priorities_speed[i] += cognitive_factor * (own_priorities[i] - x)
                + social_factor * (global_priorities[i] - x);

            let x = flag(self.visiting[i]);
            self.visiting_speed[i] += cognitive_factor * (flag(own_visiting[i]) - x)
                + social_factor * (flag(global_visiting[i]) - x);
        }
    }

    pub fn limit_speed(&mut self, max_velocity: f64) {
        for s in self
            .priorities_speed
            .iter_mut()
            .chain(self.visiting_speed.iter_mut())
        {
            *s = s.clamp(-max_velocity, max_velocity);
        }
    }

    /// Moves the priorities by their velocity and redraws every visiting flag with
    /// the sigmoid of its velocity as probability. Blacklisted nodes are never visited.
    pub fn update_position(&mut self) {
        for (p, s) in self.priorities.iter_mut().zip(self.priorities_speed.iter()) {
            *p += s;
        }

        let rng = &mut self.rng;
        for (v, s) in self.visiting.iter_mut().zip(self.visiting_speed.iter()) {
            *v = rng.rand_float() < 1.0 / (1.0 + (-s).exp());
        }
        for &id in self.graph.blacklist() {
            self.visiting[id] = false;
        }
    }

    /// Picks the swarm's representative. Among particles whose best cost lies strictly
    /// inside the window the most rewarding one wins, the earlier one on ties. Without
    /// any such particle the cheapest one is taken.
    /// Panics on an empty swarm.
    pub fn best<'s>(swarm: &'s [Particle<'a>], config: &EvalConfig) -> &'s Particle<'a> {
        assert!(!swarm.is_empty(), "Can't pick the best of an empty swarm.");

        let mut feasible: Vec<&Particle> = swarm
            .iter()
            .filter(|p| config.strictly_feasible(p.best_cost()))
            .collect();

        if feasible.is_empty() {
            return swarm
                .iter()
                .min_by(|a, b| {
                    a.best_cost()
                        .partial_cmp(&b.best_cost())
                        .unwrap_or(Ordering::Equal)
                })
                .unwrap_or(&swarm[0]);
        }

        feasible.sort_by(|a, b| b.best_reward().cmp(&a.best_reward()));
        feasible[0]
    }

    fn best_position(&self) -> (&[f64], &[bool]) {
        match &self.best {
            Some(best) => (&best.priorities[..], &best.visiting[..]),
            None => (&self.priorities[..], &self.visiting[..]),
        }
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn reward(&self) -> u32 {
        self.reward
    }

    /// NaN until the particle was evaluated once.
    pub fn best_cost(&self) -> f64 {
        self.best.as_ref().map_or(f64::NAN, |best| best.cost)
    }

    pub fn best_reward(&self) -> u32 {
        self.best.as_ref().map_or(0, |best| best.reward)
    }

    pub fn priorities(&self) -> &[f64] {
        &self.priorities
    }

    pub fn visiting(&self) -> &[bool] {
        &self.visiting
    }

    pub fn priorities_speed(&self) -> &[f64] {
        &self.priorities_speed
    }

    pub fn visiting_speed(&self) -> &[f64] {
        &self.visiting_speed
    }
}

fn flag(visiting: bool) -> f64 {
    if visiting {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    // 0 <-> 1 <-> 2 <-> 3 <-> 0, every arc costs 1 and rewards 5
    fn square_graph(build_mst: bool) -> WeightedGraph {
        let mut graph = WeightedGraph::new(4, 0);
        for i in 0..4 {
            let j = (i + 1) % 4;
            graph.add_edge(i, j, 1.0, 5);
            graph.add_edge(j, i, 1.0, 5);
        }
        graph.analyze(build_mst);
        graph
    }

    fn config() -> EvalConfig {
        EvalConfig::new(0.0, 10.0, false)
    }

    fn particle_with_best<'a>(graph: &'a WeightedGraph, cost: f64, reward: u32) -> Particle<'a> {
        let mut particle = Particle::new(graph, 1);
        particle.best = Some(Memory {
            cost,
            reward,
            priorities: vec![0.0; graph.size()],
            visiting: vec![true; graph.size()],
        });
        particle
    }

    #[test]
    fn randomize_stays_in_range() {
        let graph = square_graph(false);
        let mut particle = Particle::new(&graph, 7);
        particle.randomize();

        for x in particle
            .priorities()
            .iter()
            .chain(particle.priorities_speed())
            .chain(particle.visiting_speed())
        {
            assert!(*x >= -5.0 && *x < 5.0, "{} is out of range.", x);
        }
        assert!(particle.best.is_none(), "Randomize does not touch the best.");
    }

    #[test]
    fn same_seed_same_particle() {
        let graph = square_graph(false);
        let mut a = Particle::new(&graph, 99);
        let mut b = Particle::new(&graph, 99);
        a.randomize();
        b.randomize();

        assert_eq!(a.priorities(), b.priorities());
        assert_eq!(a.visiting(), b.visiting());
    }

    #[test]
    fn decode_is_deterministic() {
        let graph = square_graph(false);
        let mut particle = Particle::new(&graph, 3);
        particle.randomize();
        let config = config();

        assert_eq!(particle.route(&config), particle.route(&config));
    }

    #[test]
    fn decode_follows_priorities() {
        let graph = square_graph(false);
        let particle = Particle::new(&graph, 0);
        let route = particle.decode(&[0.0, 1.0, 2.0, 3.0], &[true; 4], &config());

        assert_eq!(route.nodes(), &[0, 1, 2, 3, 0], "Whole square in order.");
    }

    #[test]
    fn decode_requeues_unplaceable_nodes() {
        let graph = square_graph(false);
        let particle = Particle::new(&graph, 0);
        // 2 can only follow 1 or 3, so it has to wait for 1
        let route = particle.decode(&[0.0, 1.0, 0.5, 3.0], &[true; 4], &config());

        assert_eq!(route.nodes(), &[0, 1, 2, 3, 0]);
    }

    #[test]
    fn decode_stops_at_midpoint() {
        let graph = square_graph(false);
        let particle = Particle::new(&graph, 0);
        let config = EvalConfig::new(0.0, 2.0, false);
        let route = particle.decode(&[0.0, 1.0, 2.0, 3.0], &[true; 4], &config);

        assert_eq!(route.nodes(), &[0, 1, 0], "Cost 1 already reaches the midpoint.");
    }

    #[test]
    fn decode_with_nothing_to_visit_stays_home() {
        let graph = square_graph(false);
        let particle = Particle::new(&graph, 0);
        let route = particle.decode(&[0.0; 4], &[false; 4], &config());

        assert_eq!(route.nodes(), &[0], "No candidates, no path back.");
    }

    #[test]
    fn decode_gives_up_after_three_tries_per_candidate() {
        let graph = square_graph(false);
        let particle = Particle::new(&graph, 0);
        // every arc costs 1, so no candidate ever fits below c_max
        let config = EvalConfig::new(0.0, 0.5, false);
        let route = particle.decode(&[0.0, 1.0, 2.0, 3.0], &[true; 4], &config);

        assert_eq!(route.nodes(), &[0], "Nothing fits, the queue keeps cycling.");
    }

    #[test]
    fn decode_leaves_route_open_without_way_back() {
        // 0 <-> 1, 0 -> 2, 2 <-> 3
        let mut graph = WeightedGraph::new(4, 0);
        graph.add_edge(0, 1, 1.0, 1);
        graph.add_edge(1, 0, 1.0, 1);
        graph.add_edge(0, 2, 1.0, 1);
        graph.add_edge(2, 3, 1.0, 1);
        graph.add_edge(3, 2, 1.0, 1);
        graph.analyze(false);
        let particle = Particle::new(&graph, 0);
        let route = particle.decode(&[0.0; 4], &[true, false, true, false], &config());

        assert!(graph.blacklist().is_empty(), "Every node reaches another one.");
        assert_eq!(route.nodes(), &[0, 2], "0 can't be reached from 2.");
    }

    #[test]
    fn decode_with_mst_uses_preorder() {
        let graph = square_graph(true);
        let particle = Particle::new(&graph, 0);
        let config = EvalConfig::new(0.0, 10.0, true);
        let route = particle.decode(&[0.0, 1.0, 2.0, 3.0], &[true; 4], &config);

        assert_eq!(route.first(), Some(0));
        assert_eq!(route.last(), Some(0));
        assert_eq!(route.nodes(), &[0, 1, 2, 3, 0]);
    }

    #[test]
    fn every_route_is_closed() {
        let graph = square_graph(false);
        let config = config();
        for seed in 0..50 {
            let mut particle = Particle::new(&graph, seed);
            particle.randomize();
            let route = particle.route(&config);

            assert_eq!(route.first(), Some(graph.start()), "Seed {} starts elsewhere.", seed);
            assert_eq!(route.last(), Some(graph.start()), "Seed {} ends elsewhere.", seed);
        }
    }

    #[test]
    fn every_mst_route_is_closed() {
        let graph = square_graph(true);
        let config = EvalConfig::new(0.0, 10.0, true);
        for seed in 0..50 {
            let mut particle = Particle::new(&graph, seed);
            particle.randomize();
            let route = particle.route(&config);

            assert_eq!(route.first(), Some(graph.start()), "Seed {} starts elsewhere.", seed);
            assert_eq!(route.last(), Some(graph.start()), "Seed {} ends elsewhere.", seed);
        }
    }

    #[test]
    fn evaluate_full_square() {
        let graph = square_graph(false);
        let mut particle = Particle::new(&graph, 0);
        particle.priorities = vec![0.0, 1.0, 2.0, 3.0];
        let evaluation = particle.evaluate(&config());

        assert_eq!(evaluation, Evaluation::Improved, "First evaluation sets the best.");
        assert!(approx_eq!(f64, particle.cost(), 4.0));
        assert_eq!(particle.reward(), 20);
        assert!(approx_eq!(f64, particle.best_cost(), 4.0));
        assert_eq!(particle.best_reward(), 20);
    }

    #[test]
    fn evaluate_penalizes_double_use() {
        let graph = square_graph(false);
        let mut particle = Particle::new(&graph, 0);
        particle.visiting = vec![true, true, false, false];
        particle.evaluate(&config());

        // 0 -> 1 -> 0 walks the same arc twice
        assert_eq!(particle.reward(), 5, "Reward of the arc pays once.");
        assert!(approx_eq!(f64, particle.cost(), 2.0 + 3.0 * 10.0));
    }

    #[test]
    fn evaluate_penalizes_cost_outside_window() {
        let graph = square_graph(false);
        let mut particle = Particle::new(&graph, 0);
        particle.priorities = vec![0.0, 1.0, 2.0, 3.0];
        particle.evaluate(&EvalConfig::new(5.0, 10.0, false));

        assert!(approx_eq!(f64, particle.cost(), 4.0 + 10.0), "4 is below c_min.");
    }

    #[test]
    fn evaluate_reward_never_exceeds_distinct_arcs() {
        let graph = square_graph(false);
        let config = config();
        for seed in 0..30 {
            let mut particle = Particle::new(&graph, seed);
            particle.randomize();
            particle.evaluate(&config);

            assert!(particle.reward() <= 20, "Only four arc pairs exist.");
        }
    }

    #[test]
    fn evaluate_restarts_after_six_stagnations() {
        let graph = square_graph(false);
        let mut particle = Particle::new(&graph, 5);
        let config = config();
        particle.visiting = vec![false; 4];
        particle.evaluate(&config);
        let position = particle.priorities.clone();

        let outcomes: Vec<Evaluation> = (0..6).map(|_| particle.evaluate(&config)).collect();

        assert!(
            outcomes[..5].iter().all(|e| *e == Evaluation::Stagnated),
            "Nothing changes, nothing improves."
        );
        assert_eq!(outcomes[5], Evaluation::Restarted, "Sixth stagnation restarts.");
        assert_ne!(particle.priorities, position, "Position was randomized.");
        assert_eq!(particle.times_no_improve, 0, "Counter was reset.");
    }

    #[test]
    fn improvement_resets_stagnation() {
        let graph = square_graph(false);
        let mut particle = Particle::new(&graph, 5);
        let config = config();
        particle.visiting = vec![false; 4];
        particle.evaluate(&config);
        particle.evaluate(&config);
        particle.evaluate(&config);
        particle.visiting = vec![true; 4];
        particle.priorities = vec![0.0, 1.0, 2.0, 3.0];

        assert_eq!(particle.evaluate(&config), Evaluation::Improved);
        assert_eq!(particle.times_no_improve, 0);
    }

    #[test]
    fn best_prefers_feasible_reward() {
        let graph = square_graph(false);
        let swarm = vec![
            particle_with_best(&graph, 5.0, 10),
            particle_with_best(&graph, 8.0, 20),
            particle_with_best(&graph, 12.0, 30),
        ];
        let best = Particle::best(&swarm, &config());

        assert!(approx_eq!(f64, best.best_cost(), 8.0), "Cost 12 is infeasible.");
        assert_eq!(best.best_reward(), 20);
    }

    #[test]
    fn best_tie_keeps_swarm_order() {
        let graph = square_graph(false);
        let swarm = vec![
            particle_with_best(&graph, 3.0, 20),
            particle_with_best(&graph, 2.0, 20),
        ];
        let best = Particle::best(&swarm, &config());

        assert!(approx_eq!(f64, best.best_cost(), 3.0), "First of equals wins.");
    }

    #[test]
    fn best_falls_back_to_cheapest() {
        let graph = square_graph(false);
        let swarm = vec![
            particle_with_best(&graph, 40.0, 10),
            particle_with_best(&graph, 10.0, 20),
            particle_with_best(&graph, 10.0, 5),
        ];
        let best = Particle::best(&swarm, &config());

        assert_eq!(best.best_reward(), 20, "Cheapest first occurrence.");
    }

    #[test]
    #[should_panic]
    fn best_of_empty_swarm_panics() {
        let swarm: Vec<Particle> = Vec::new();
        Particle::best(&swarm, &config());
    }

    #[test]
    fn update_speed_pulls_towards_bests() {
        let graph = square_graph(false);
        let mut particle = particle_with_best(&graph, 4.0, 20);
        particle.priorities = vec![1.0; 4];
        particle.visiting = vec![false; 4];
        let mut global = particle_with_best(&graph, 4.0, 20);
        global.best.as_mut().unwrap().priorities = vec![3.0; 4];

        particle.update_speed(&global, 0.5, 0.25);

        // 0.25 * (0 - 1) + 0.5 * (3 - 1)
        assert!(particle.priorities_speed().iter().all(|s| approx_eq!(f64, *s, 0.75)));
        // 0.25 * (1 - 0) + 0.5 * (1 - 0)
        assert!(particle.visiting_speed().iter().all(|s| approx_eq!(f64, *s, 0.75)));
    }

    #[test]
    fn limit_speed_clamps() {
        let graph = square_graph(false);
        let mut particle = Particle::new(&graph, 0);
        particle.priorities_speed = vec![-9.0, 0.5, 9.0, 1.0];
        particle.visiting_speed = vec![2.0, -2.0, 0.0, 0.0];
        particle.limit_speed(1.0);

        assert_eq!(particle.priorities_speed(), &[-1.0, 0.5, 1.0, 1.0]);
        assert_eq!(particle.visiting_speed(), &[1.0, -1.0, 0.0, 0.0]);
    }

    #[test]
    fn update_position_moves_and_samples() {
        let graph = square_graph(false);
        let mut particle = Particle::new(&graph, 0);
        particle.priorities_speed = vec![1.0, -1.0, 0.5, 0.0];
        particle.visiting_speed = vec![1000.0, -1000.0, 1000.0, -1000.0];
        particle.update_position();

        assert_eq!(particle.priorities(), &[1.0, -1.0, 0.5, 0.0]);
        assert_eq!(particle.visiting(), &[true, false, true, false]);
    }

    #[test]
    fn update_position_never_visits_blacklisted() {
        let mut graph = WeightedGraph::new(3, 0);
        graph.add_edge(0, 1, 1.0, 1);
        graph.add_edge(1, 0, 1.0, 1);
        graph.analyze(false);
        let mut particle = Particle::new(&graph, 0);
        particle.visiting_speed = vec![1000.0; 3];
        particle.update_position();

        assert_eq!(particle.visiting(), &[true, true, false], "Node 2 is isolated.");
    }
}
