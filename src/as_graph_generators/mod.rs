use crate::as_graph::{ASGraph, ASN};
use crate::shared::{ASGraphError, Relationships, Settings};

pub trait ASGraphGenerator {
    fn generate(&self) -> Result<ASGraph, ASGraphError>;
}

/// Destination of the [`ExampleTopology`]
pub const EXAMPLE_DST: ASN = 0;

/// `(a, b, rel)` where `b` is `rel` of `a`
pub const EXAMPLE_EDGES: [(ASN, ASN, Relationships); 15] = [
    (0, 1, Relationships::Providers),
    (0, 2, Relationships::Providers),
    (0, 3, Relationships::Providers),
    (1, 2, Relationships::Providers),
    (1, 3, Relationships::Providers),
    (1, 4, Relationships::Providers),
    (2, 3, Relationships::Providers),
    (2, 4, Relationships::Providers),
    (3, 4, Relationships::Peers),
    (3, 5, Relationships::Customers),
    (3, 6, Relationships::Customers),
    (3, 7, Relationships::Peers),
    (5, 6, Relationships::Customers),
    (5, 7, Relationships::Providers),
    (6, 7, Relationships::Providers),
];

/// Eight AS fixture mixing customer, provider and peer links. AS 0 is a
/// multi-homed stub and the default destination.
pub struct ExampleTopology {
    pub settings: Settings,
    pub dst: ASN,
}

impl ExampleTopology {
    pub fn new() -> Self {
        ExampleTopology {
            settings: Settings::GaoRexford,
            dst: EXAMPLE_DST,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_dst(mut self, dst: ASN) -> Self {
        self.dst = dst;
        self
    }
}

impl Default for ExampleTopology {
    fn default() -> Self {
        ExampleTopology::new()
    }
}

impl ASGraphGenerator for ExampleTopology {
    fn generate(&self) -> Result<ASGraph, ASGraphError> {
        let mut as_graph = ASGraph::from_edges(EXAMPLE_EDGES.to_vec(), self.settings);
        as_graph.check_relationships()?;
        as_graph.set_dst(self.dst)?;
        Ok(as_graph)
    }
}
