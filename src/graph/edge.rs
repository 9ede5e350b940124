/// A directed arc with the time it takes to traverse and the reward collected on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    cost: f64,
    reward: u32,
}

impl Edge {
    pub fn new(cost: f64, reward: u32) -> Self {
        Edge { cost, reward }
    }

    /// Stand-in for an arc that does not exist.
    pub fn missing() -> Self {
        Edge {
            cost: f64::INFINITY,
            reward: 0,
        }
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn reward(&self) -> u32 {
        self.reward
    }

    pub fn exists(&self) -> bool {
        self.cost.is_finite()
    }
}
