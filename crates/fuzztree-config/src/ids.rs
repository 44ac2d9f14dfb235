//! Identifier generation.

use crate::configuration::ConfigurationId;

/// Hands out sequential configuration ids.
///
/// Passed explicitly to the generator so separate generation runs never share
/// a counter.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: ConfigurationId,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: ConfigurationId) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> ConfigurationId {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);

        let mut ids = IdGenerator::starting_at(10);
        assert_eq!(ids.next_id(), 10);
    }
}
