use crate::node::NodeId;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length of generated node ids
pub const ID_LENGTH: usize = 7;

/// Random id generator for document nodes.
///
/// Ids are short alphanumeric strings. Collision checking against the
/// document happens in [`crate::Document::create_node`], the generator
/// only produces candidates.
pub struct IdGenerator {
    rng: StdRng,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator, for fixtures and tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate the next candidate id
    pub fn new_id(&mut self) -> NodeId {
        let id: String = (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(ID_LENGTH)
            .map(char::from)
            .collect();
        NodeId::new(id)
    }

    /// Generate an id that `is_taken` rejects for none of the attempts
    pub fn unique_id(&mut self, is_taken: impl Fn(&NodeId) -> bool) -> NodeId {
        loop {
            let id = self.new_id();
            if !is_taken(&id) {
                return id;
            }
            tracing::debug!(%id, "Generated id collides, retrying");
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Propose a name that isn't in use.
///
/// Returns `candidate` when it's free, otherwise appends the smallest
/// counter (starting at 1) that makes it unique.
pub fn propose_name(candidate: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let base = if candidate.is_empty() { "node" } else { candidate };
    if !is_taken(base) {
        return base.to_string();
    }

    let mut counter = 1;
    loop {
        let name = format!("{}{}", base, counter);
        if !is_taken(&name) {
            return name;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seeded_ids_are_reproducible() {
        let mut gen1 = IdGenerator::seeded(42);
        let mut gen2 = IdGenerator::seeded(42);

        assert_eq!(gen1.new_id(), gen2.new_id());
        assert_eq!(gen1.new_id(), gen2.new_id());
        assert_eq!(gen1.new_id().as_str().len(), ID_LENGTH);
    }

    #[test]
    fn test_unique_id_skips_taken() {
        let mut probe = IdGenerator::seeded(7);
        let first = probe.new_id();

        let mut gen = IdGenerator::seeded(7);
        let id = gen.unique_id(|id| *id == first);
        assert_ne!(id, first);
    }

    #[test]
    fn test_propose_name() {
        let taken: HashSet<&str> = ["text", "text1", "page"].into_iter().collect();

        assert_eq!(propose_name("button", |n| taken.contains(n)), "button");
        assert_eq!(propose_name("text", |n| taken.contains(n)), "text2");
        assert_eq!(propose_name("page", |n| taken.contains(n)), "page1");
        assert_eq!(propose_name("", |n| taken.contains(n)), "node");
    }
}
