//! Registry discovery.
//!
//! Registries can be contributed by other parts of an application without
//! being passed to the builder one by one: they are listed once in a
//! `RegistryDiscovery` table, and every populator built with that table
//! gets a fresh instance of each.

use super::RandomizerRegistry;

/// Factory producing a fresh registry.
pub type RegistryFactory = fn() -> Box<dyn RandomizerRegistry>;

/// Table of installed registry factories.
#[derive(Debug, Clone, Default)]
pub struct RegistryDiscovery {
    factories: Vec<RegistryFactory>,
}

impl RegistryDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a registry factory.
    pub fn install(&mut self, factory: RegistryFactory) -> &mut Self {
        self.factories.push(factory);
        self
    }

    /// Builder-style variant of [`install`](Self::install).
    pub fn with(mut self, factory: RegistryFactory) -> Self {
        self.factories.push(factory);
        self
    }

    /// Instantiate every installed registry.
    pub fn discover(&self) -> Vec<Box<dyn RandomizerRegistry>> {
        self.factories.iter().map(|factory| factory()).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct First;
    impl RandomizerRegistry for First {}

    struct Second;
    impl RandomizerRegistry for Second {}

    #[test]
    fn test_discover_in_installation_order() {
        let discovery = RegistryDiscovery::new()
            .with(|| Box::new(First))
            .with(|| Box::new(Second));
        let registries = discovery.discover();
        assert_eq!(registries.len(), 2);
        assert!(registries[0].name().ends_with("First"));
        assert!(registries[1].name().ends_with("Second"));
    }
}
