//! Density samples and territory groupings produced by the scoring backend.

use serde::{Deserialize, Serialize};
use super::{NodeId, Point};

/// Scalar intensity score in `[0, 1]` attached to one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensitySample {
    #[serde(alias = "nodeID")]
    pub node_id: NodeId,
    pub intensity: f64,
}

impl DensitySample {
    pub fn new(node_id: impl Into<NodeId>, intensity: f64) -> Self {
        Self { node_id: node_id.into(), intensity }
    }
}

/// How thoroughly a territory has been investigated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Explored,
    Frontier,
    Unexplored,
}

impl Classification {
    pub const ALL: [Classification; 3] = [
        Classification::Explored,
        Classification::Frontier,
        Classification::Unexplored,
    ];

    /// Single-letter badge code.
    pub fn code(&self) -> char {
        match self {
            Classification::Explored => 'E',
            Classification::Frontier => 'F',
            Classification::Unexplored => 'U',
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Explored => write!(f, "explored"),
            Classification::Frontier => write!(f, "frontier"),
            Classification::Unexplored => write!(f, "unexplored"),
        }
    }
}

/// A cluster of nodes with a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Territory {
    pub nodes: Vec<NodeId>,
    /// Anchor for badges. Falls back to the first member when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub central_node: Option<NodeId>,
    /// Declared member count. Zero means "not provided".
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub density: f64,
    #[serde(alias = "type")]
    pub classification: Classification,
    #[serde(default)]
    pub description: String,
}

impl Territory {
    pub fn new(classification: Classification, nodes: impl IntoIterator<Item = impl Into<NodeId>>) -> Self {
        let nodes: Vec<NodeId> = nodes.into_iter().map(Into::into).collect();
        Self {
            size: nodes.len(),
            nodes,
            central_node: None,
            density: 0.0,
            classification,
            description: String::new(),
        }
    }

    pub fn with_central_node(mut self, id: impl Into<NodeId>) -> Self {
        self.central_node = Some(id.into());
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The node a badge is pinned to.
    pub fn anchor(&self) -> Option<&NodeId> {
        self.central_node.as_ref().or_else(|| self.nodes.first())
    }
}

/// Territories grouped by classification, as the backend returns them.
///
/// Entries inside a group need not carry a classification on the wire; the
/// group they sit in wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerritoryMap {
    #[serde(default, deserialize_with = "group::explored")]
    pub explored: Vec<Territory>,
    #[serde(default, deserialize_with = "group::frontier")]
    pub frontier: Vec<Territory>,
    #[serde(default, deserialize_with = "group::unexplored")]
    pub unexplored: Vec<Territory>,
}

impl TerritoryMap {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sort flat territories into their groups.
    pub fn from_territories(territories: impl IntoIterator<Item = Territory>) -> Self {
        let mut map = TerritoryMap::default();
        for t in territories {
            map.group_mut(t.classification).push(t);
        }
        map
    }

    pub fn group(&self, classification: Classification) -> &[Territory] {
        match classification {
            Classification::Explored => &self.explored,
            Classification::Frontier => &self.frontier,
            Classification::Unexplored => &self.unexplored,
        }
    }

    fn group_mut(&mut self, classification: Classification) -> &mut Vec<Territory> {
        match classification {
            Classification::Explored => &mut self.explored,
            Classification::Frontier => &mut self.frontier,
            Classification::Unexplored => &mut self.unexplored,
        }
    }

    /// Explored, then frontier, then unexplored.
    pub fn iter(&self) -> impl Iterator<Item = &Territory> {
        Classification::ALL.into_iter().flat_map(move |c| self.group(c).iter())
    }

    pub fn len(&self) -> usize {
        self.explored.len() + self.frontier.len() + self.unexplored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A gap in the graph the backend suggests filling, in canvas space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyZone {
    pub x: f64,
    pub y: f64,
    /// Pixel radius of the marker. Zero means "not provided".
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub suggested_concepts: Vec<String>,
}

impl EmptyZone {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, radius: 0.0, suggested_concepts: Vec::new() }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A link the backend recommends the investigator add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSuggestion {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub impact: String,
    /// Lower is more urgent.
    #[serde(default)]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_relation: Option<String>,
}

impl ConnectionSuggestion {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            reason: String::new(),
            impact: String::new(),
            priority: 0,
            suggested_relation: None,
        }
    }
}

mod group {
    use serde::{Deserialize, Deserializer};
    use super::{Classification, NodeId};

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Entry {
        #[serde(default)]
        nodes: Vec<NodeId>,
        #[serde(default)]
        central_node: Option<NodeId>,
        #[serde(default)]
        size: usize,
        #[serde(default)]
        density: f64,
        #[serde(default)]
        description: String,
    }

    fn tagged<'de, D>(d: D, classification: Classification) -> Result<Vec<super::Territory>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<Entry>::deserialize(d)?;
        Ok(entries
            .into_iter()
            .map(|e| super::Territory {
                size: if e.size == 0 { e.nodes.len() } else { e.size },
                nodes: e.nodes,
                central_node: e.central_node.filter(|id| !id.0.is_empty()),
                density: e.density,
                classification,
                description: e.description,
            })
            .collect())
    }

    pub fn explored<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<super::Territory>, D::Error> {
        tagged(d, Classification::Explored)
    }

    pub fn frontier<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<super::Territory>, D::Error> {
        tagged(d, Classification::Frontier)
    }

    pub fn unexplored<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<super::Territory>, D::Error> {
        tagged(d, Classification::Unexplored)
    }
}
