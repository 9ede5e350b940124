use crate::metaheuristic::pso::particle::Evaluation;
use crate::metaheuristic::supervisor;
use crate::metaheuristic::supervisor::MessageInfo;

use std::time::Duration;

/// Report of one particle task, or of the swarm's best when `particle_id` is 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub particle_id: usize,
    pub cycle: usize,
    pub evaluations: usize,
    pub improvements: usize,
    pub restarts: usize,
    pub cpu_time: Duration,
    pub cost: f64,
    pub reward: u32,
}

impl Message {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        particle_id: usize,
        cycle: usize,
        evaluations: usize,
        improvements: usize,
        restarts: usize,
        cpu_time: Duration,
        cost: f64,
        reward: u32,
    ) -> Self {
        Self {
            particle_id,
            cycle,
            evaluations,
            improvements,
            restarts,
            cpu_time,
            cost,
            reward,
        }
    }

    pub fn from_evaluation(
        particle_id: usize,
        cycle: usize,
        evaluation: Evaluation,
        cpu_time: Duration,
        cost: f64,
        reward: u32,
    ) -> Self {
        Self::new(
            particle_id,
            cycle,
            1,
            (evaluation == Evaluation::Improved) as usize,
            (evaluation == Evaluation::Restarted) as usize,
            cpu_time,
            cost,
            reward,
        )
    }

    pub fn is_supervisor(&self) -> bool {
        self.particle_id == 0
    }
}

impl supervisor::Message for Message {
    fn get_info(&self) -> MessageInfo {
        MessageInfo::new(
            self.evaluations,
            self.improvements,
            self.restarts,
            self.cpu_time,
        )
    }
}
