use circuit_core::config::MAX_PARSED_CIRCUITS;
use circuit_core::fixtures::Fixture;
use log::debug;
use spice_format::Schematic;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone)]
pub struct Context {
    shared: Arc<RwLock<ContextShared>>,
}

impl Context {
    pub fn new(circuits: Vec<Fixture>) -> Self {
        Self {
            shared: Arc::new(RwLock::new(ContextShared {
                fixture_count: circuits.len(),
                circuits,
                parsed_count: 0,
            })),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, ContextShared> {
        self.shared.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, ContextShared> {
        self.shared.write().await
    }
}

pub struct ContextShared {
    /// Bundled fixtures first, then parsed circuits in the order they arrived.
    pub circuits: Vec<Fixture>,
    fixture_count: usize,
    parsed_count: usize,
}

impl ContextShared {
    pub fn ids(&self) -> Vec<String> {
        self.circuits.iter().map(|c| c.id.clone()).collect()
    }

    pub fn circuit(&self, id: &str) -> Option<&Schematic> {
        self.circuits
            .iter()
            .find(|c| c.id == id)
            .map(|c| &c.schematic)
    }

    /// Stores a parsed circuit under the next free `parsed_<n>` id and returns that id.
    ///
    /// At most [`MAX_PARSED_CIRCUITS`] parsed circuits are kept; fixtures are never dropped.
    pub fn add_parsed(&mut self, schematic: Schematic) -> String {
        self.parsed_count += 1;
        let id = format!("parsed_{}", self.parsed_count);
        self.circuits.push(Fixture {
            id: id.clone(),
            schematic,
        });
        while self.circuits.len() - self.fixture_count > MAX_PARSED_CIRCUITS {
            let dropped = self.circuits.remove(self.fixture_count);
            debug!("Dropped {} to make room for {id}", dropped.id);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_core::fixtures::load_fixtures;

    #[test]
    fn oldest_parsed_circuits_are_dropped() {
        let fixtures = load_fixtures().unwrap();
        let fixture_ids = fixtures.iter().map(|f| f.id.clone()).collect::<Vec<_>>();
        let mut shared = ContextShared {
            fixture_count: fixtures.len(),
            circuits: fixtures,
            parsed_count: 0,
        };
        let schematic = shared.circuits[0].schematic.clone();

        for _ in 0..MAX_PARSED_CIRCUITS + 2 {
            shared.add_parsed(schematic.clone());
        }

        let ids = shared.ids();
        assert_eq!(ids.len(), fixture_ids.len() + MAX_PARSED_CIRCUITS);
        assert_eq!(ids[..fixture_ids.len()], fixture_ids[..]);
        assert_eq!(ids[fixture_ids.len()], "parsed_3");
        assert_eq!(
            ids.last().map(String::as_str),
            Some(format!("parsed_{}", MAX_PARSED_CIRCUITS + 2).as_str())
        );
        assert!(shared.circuit("parsed_1").is_none());
        assert!(shared.circuit("simple_led").is_some());
    }
}
