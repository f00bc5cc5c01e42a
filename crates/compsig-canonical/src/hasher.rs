use std::collections::BTreeMap;
use std::fmt;

use compsig_schemas::{NO_DIGEST, SHA256};
use sha2::digest::DynDigest;
use sha2::Sha256;
use thiserror::Error;

/// Constructor for a streaming hash primitive.
pub type HashFactory = fn() -> Box<dyn DynDigest + Send>;

/// Errors raised by hash algorithm lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashError {
    /// No algorithm is registered under this name.
    #[error("hash algorithm {0} not found/implemented")]
    UnknownAlgorithm(String),
    /// The algorithm has no hash function (the exclusion marker).
    #[error("hash algorithm {0} cannot be used to compute a digest")]
    NotSigningAlgorithm(String),
    /// The name is reserved for the exclusion marker.
    #[error("hash algorithm name {0} is reserved")]
    Reserved(String),
}

/// A hash primitive together with its canonical algorithm name.
///
/// The primitive is reset before every [`Hasher::hash`] call, so one hasher
/// can digest any number of inputs.
pub struct Hasher {
    algorithm_name: String,
    function: Option<Box<dyn DynDigest + Send>>,
}

impl Hasher {
    /// Canonical algorithm name (e.g. `sha256`).
    pub fn algorithm_name(&self) -> &str {
        &self.algorithm_name
    }

    /// Returns true for the exclusion marker, which cannot hash.
    pub fn is_no_digest(&self) -> bool {
        self.function.is_none()
    }

    /// Feeds bytes into the running hash.
    pub fn update(&mut self, data: &[u8]) -> Result<(), HashError> {
        self.function_mut()?.update(data);
        Ok(())
    }

    /// Returns the hash of everything fed so far and resets the state.
    pub fn finalize_reset(&mut self) -> Result<Vec<u8>, HashError> {
        Ok(self.function_mut()?.finalize_reset().into_vec())
    }

    /// Hashes `data` from a fresh state.
    pub fn hash(&mut self, data: &[u8]) -> Result<Vec<u8>, HashError> {
        let function = self.function_mut()?;
        function.reset();
        function.update(data);
        Ok(function.finalize_reset().into_vec())
    }

    fn function_mut(&mut self) -> Result<&mut (dyn DynDigest + Send + 'static), HashError> {
        match self.function.as_mut() {
            Some(function) => Ok(&mut **function),
            None => Err(HashError::NotSigningAlgorithm(self.algorithm_name.clone())),
        }
    }
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("algorithm_name", &self.algorithm_name)
            .field("no_digest", &self.is_no_digest())
            .finish()
    }
}

#[derive(Clone)]
struct RegistryEntry {
    name: String,
    factory: Option<HashFactory>,
}

/// Maps algorithm names (case-insensitive) to hash primitives.
///
/// Always contains the `NO-DIGEST` marker. [`HasherRegistry::default`] adds
/// `sha256`; further algorithms can be registered by callers.
#[derive(Clone)]
pub struct HasherRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl HasherRegistry {
    /// Registry containing only the `NO-DIGEST` marker.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            NO_DIGEST.to_ascii_lowercase(),
            RegistryEntry {
                name: NO_DIGEST.to_string(),
                factory: None,
            },
        );
        Self { entries }
    }

    /// Registers `factory` under `name`, replacing an earlier registration.
    pub fn register(&mut self, name: &str, factory: HashFactory) -> Result<(), HashError> {
        let key = name.to_ascii_lowercase();
        if key == NO_DIGEST.to_ascii_lowercase() {
            return Err(HashError::Reserved(name.to_string()));
        }
        self.entries.insert(
            key,
            RegistryEntry {
                name: name.to_string(),
                factory: Some(factory),
            },
        );
        Ok(())
    }

    /// Looks up a hasher by name, ignoring case.
    pub fn hasher_for_name(&self, name: &str) -> Result<Hasher, HashError> {
        let entry = self
            .entries
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| HashError::UnknownAlgorithm(name.to_string()))?;
        Ok(Hasher {
            algorithm_name: entry.name.clone(),
            function: entry.factory.map(|factory| factory()),
        })
    }

    /// Looks up a hasher that can produce a signing digest; rejects `NO-DIGEST`.
    pub fn signing_hasher_for_name(&self, name: &str) -> Result<Hasher, HashError> {
        let hasher = self.hasher_for_name(name)?;
        if hasher.is_no_digest() {
            return Err(HashError::NotSigningAlgorithm(hasher.algorithm_name));
        }
        Ok(hasher)
    }

    /// Canonical names of all registered algorithms.
    pub fn algorithms(&self) -> Vec<&str> {
        self.entries.values().map(|entry| entry.name.as_str()).collect()
    }
}

impl Default for HasherRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.entries.insert(
            SHA256.to_string(),
            RegistryEntry {
                name: SHA256.to_string(),
                factory: Some(sha256),
            },
        );
        registry
    }
}

impl fmt::Debug for HasherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.algorithms()).finish()
    }
}

fn sha256() -> Box<dyn DynDigest + Send> {
    Box::new(Sha256::default())
}

/// Looks up `name` in the default registry.
pub fn hasher_for_name(name: &str) -> Result<Hasher, HashError> {
    HasherRegistry::default().hasher_for_name(name)
}
