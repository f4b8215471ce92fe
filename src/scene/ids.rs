//! Opaque identifiers and their generator

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Last four characters, used in compact labels
            pub fn short(&self) -> &str {
                let start = self
                    .0
                    .char_indices()
                    .rev()
                    .nth(3)
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                &self.0[start..]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a placed entity, unique for the scene's lifetime
    EntityId
);

opaque_id!(
    /// Identifier of a rule
    RuleId
);

/// Seeded source of opaque ids, owned by a scene
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: Pcg32,
}

impl IdGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Next raw id string (`xxxxxxxx-xxxx-xxxx`, lowercase hex)
    pub fn next_raw(&mut self) -> String {
        let a: u32 = self.rng.random();
        let b: u32 = self.rng.random();
        format!("{:08x}-{:04x}-{:04x}", a, b >> 16, b & 0xffff)
    }
}
