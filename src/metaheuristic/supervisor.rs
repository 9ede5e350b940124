use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use std::time::Duration;

pub trait Message {
    fn get_info(&self) -> MessageInfo;
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MessageInfo {
    pub evaluations: usize,
    pub cpu_time: Duration,
    pub n_improvements: usize,
    pub restarts: usize,
}

impl MessageInfo {
    pub fn new(
        evaluations: usize,
        n_improvements: usize,
        restarts: usize,
        cpu_time: Duration,
    ) -> Self {
        Self {
            evaluations,
            n_improvements,
            restarts,
            cpu_time,
        }
    }
}

impl Add for MessageInfo {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            evaluations: self.evaluations + other.evaluations,
            n_improvements: self.n_improvements + other.n_improvements,
            restarts: self.restarts + other.restarts,
            cpu_time: self.cpu_time + other.cpu_time,
        }
    }
}

impl AddAssign for MessageInfo {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}
