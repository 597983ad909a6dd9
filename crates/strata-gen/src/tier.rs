use serde::Serialize;

/// A named size class of generated graphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub name: &'static str,
    pub min_nodes: usize,
    pub max_nodes: usize,
}

pub const TIER_SMALL: Tier = Tier {
    name: "small",
    min_nodes: 6,
    max_nodes: 10,
};

pub const TIER_MEDIUM: Tier = Tier {
    name: "medium",
    min_nodes: 10,
    max_nodes: 20,
};

pub const TIER_LARGE: Tier = Tier {
    name: "large",
    min_nodes: 20,
    max_nodes: 50,
};

pub const TIERS: [Tier; 3] = [TIER_SMALL, TIER_MEDIUM, TIER_LARGE];

impl Tier {
    /// Look up a tier by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        TIERS.into_iter().find(|tier| tier.name == name)
    }
}
