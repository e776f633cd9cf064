use std::{fmt, sync::Arc};

use hashbrown::HashMap;

/// Direct predecessors of every block listed in a precedence file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecedenceGraph {
    // declared bound, 1 + highest block id seen
    pub(crate) num_blocks: usize,
    pub(crate) predecessors: HashMap<usize, Vec<usize>>,
}

impl PrecedenceGraph {
    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    /// Blocks that must be extracted before `block`. Unknown blocks have none.
    pub fn predecessors(&self, block: usize) -> &[usize] {
        self.predecessors
            .get(&block)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn num_arcs(&self) -> usize {
        self.predecessors.values().map(Vec::len).sum()
    }

    /// Number of blocks that have a precedence line.
    pub fn len(&self) -> usize {
        self.predecessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predecessors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.predecessors
            .iter()
            .map(|(block, predecessors)| (*block, predecessors.as_slice()))
    }
}

/// Lower and upper bounds per (resource, period).
///
/// Pairs without an entry are unconstrained: `-inf` below and `+inf` above.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceLimits {
    lower: HashMap<(usize, usize), f64>,
    upper: HashMap<(usize, usize), f64>,
}

impl ResourceLimits {
    pub fn lower_bound(&self, resource: usize, period: usize) -> f64 {
        self.lower
            .get(&(resource, period))
            .copied()
            .unwrap_or(f64::NEG_INFINITY)
    }

    pub fn upper_bound(&self, resource: usize, period: usize) -> f64 {
        self.upper
            .get(&(resource, period))
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    pub fn bounds(&self, resource: usize, period: usize) -> (f64, f64) {
        (
            self.lower_bound(resource, period),
            self.upper_bound(resource, period),
        )
    }

    pub fn set_bounds(&mut self, resource: usize, period: usize, lower: f64, upper: f64) {
        self.lower.insert((resource, period), lower);
        self.upper.insert((resource, period), upper);
    }

    /// Number of (resource, period) pairs with recorded bounds.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Yields `(resource, period, lower, upper)` for every recorded pair.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64, f64)> + '_ {
        self.lower.keys().map(|&(resource, period)| {
            let (lower, upper) = self.bounds(resource, period);
            (resource, period, lower, upper)
        })
    }
}

/// Value of an extra block model column.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    // in column order
    pub(crate) attributes: Vec<(String, AttributeValue)>,
}

impl Block {
    pub fn coordinates(&self) -> (i64, i64, i64) {
        (self.x, self.y, self.z)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockModel {
    pub(crate) num_blocks: usize,
    pub(crate) blocks: HashMap<usize, Block>,
}

impl BlockModel {
    /// One past the highest block id in the file.
    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    pub fn block(&self, id: usize) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub fn coordinates(&self, id: usize) -> Option<(i64, i64, i64)> {
        self.block(id).map(Block::coordinates)
    }

    pub fn attribute(&self, id: usize, name: &str) -> Option<&AttributeValue> {
        self.block(id).and_then(|block| block.attribute(name))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.blocks.iter().map(|(id, block)| (*id, block))
    }
}

/// Present value of `value` earned in `period`.
pub fn discount(value: f64, discount_rate: f64, period: usize) -> f64 {
    value / (1.0 + discount_rate).powf(period as f64)
}

/// Ultimate pit limit problem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Upit {
    pub name: String,
    // value of the TYPE header, if any
    pub kind: Option<String>,
    pub num_blocks: usize,
    pub(crate) profits: HashMap<usize, f64>,
    pub precedence: Option<Arc<PrecedenceGraph>>,
}

impl Upit {
    pub fn profit(&self, block: usize) -> f64 {
        self.profits.get(&block).copied().unwrap_or(0.0)
    }

    pub fn profits(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.profits.iter().map(|(block, profit)| (*block, *profit))
    }

    /// Total value of the ore blocks.
    pub fn positive_total(&self) -> f64 {
        self.profits.values().filter(|profit| **profit > 0.0).sum()
    }

    /// Total cost of the waste blocks.
    pub fn negative_total(&self) -> f64 {
        self.profits.values().filter(|profit| **profit < 0.0).sum()
    }
}

/// Constrained pit limit problem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cpit {
    pub name: String,
    pub kind: Option<String>,
    pub num_blocks: usize,
    pub num_periods: usize,
    pub num_resources: usize,
    pub discount_rate: f64,
    pub(crate) profits: HashMap<usize, f64>,
    pub limits: ResourceLimits,
    // (block, resource)
    pub(crate) coefficients: HashMap<(usize, usize), f64>,
    pub precedence: Option<Arc<PrecedenceGraph>>,
}

impl Cpit {
    /// Undiscounted profit of `block`, zero if the objective does not list it.
    pub fn profit(&self, block: usize) -> f64 {
        self.profits.get(&block).copied().unwrap_or(0.0)
    }

    pub fn profits(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.profits.iter().map(|(block, profit)| (*block, *profit))
    }

    pub fn discounted_profit(&self, block: usize, period: usize) -> f64 {
        discount(self.profit(block), self.discount_rate, period)
    }

    /// Amount of `resource` consumed by extracting `block`.
    pub fn resource_coefficient(&self, block: usize, resource: usize) -> f64 {
        self.coefficients
            .get(&(block, resource))
            .copied()
            .unwrap_or(0.0)
    }

    /// Yields `(block, resource, coefficient)`.
    pub fn resource_coefficients(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.coefficients
            .iter()
            .map(|(&(block, resource), coefficient)| (block, resource, *coefficient))
    }
}

/// Precedence constrained production scheduling problem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pcpsp {
    pub name: String,
    pub kind: Option<String>,
    pub num_blocks: usize,
    pub num_periods: usize,
    pub num_destinations: usize,
    pub num_resources: usize,
    pub num_general_constraints: usize,
    pub discount_rate: f64,
    // one profit per destination
    pub(crate) profits: HashMap<usize, Vec<f64>>,
    pub limits: ResourceLimits,
    // (block, destination, resource)
    pub(crate) resource_coefficients: HashMap<(usize, usize, usize), f64>,
    // (block, destination, period, row)
    pub(crate) general_coefficients: HashMap<(usize, usize, usize, usize), f64>,
    pub(crate) general_limits: HashMap<usize, (f64, f64)>,
    pub precedence: Option<Arc<PrecedenceGraph>>,
}

impl Pcpsp {
    pub fn profit(&self, block: usize, destination: usize) -> f64 {
        self.profits
            .get(&block)
            .and_then(|profits| profits.get(destination))
            .copied()
            .unwrap_or(0.0)
    }

    /// Yields `(block, per-destination profits)`.
    pub fn profits(&self) -> impl Iterator<Item = (usize, &[f64])> {
        self.profits
            .iter()
            .map(|(block, profits)| (*block, profits.as_slice()))
    }

    pub fn discounted_profit(&self, block: usize, destination: usize, period: usize) -> f64 {
        discount(self.profit(block, destination), self.discount_rate, period)
    }

    pub fn resource_coefficient(&self, block: usize, destination: usize, resource: usize) -> f64 {
        self.resource_coefficients
            .get(&(block, destination, resource))
            .copied()
            .unwrap_or(0.0)
    }

    /// Yields `(block, destination, resource, coefficient)`.
    pub fn resource_coefficients(
        &self,
    ) -> impl Iterator<Item = (usize, usize, usize, f64)> + '_ {
        self.resource_coefficients
            .iter()
            .map(|(&(block, destination, resource), coefficient)| {
                (block, destination, resource, *coefficient)
            })
    }

    pub fn general_coefficient(
        &self,
        block: usize,
        destination: usize,
        period: usize,
        row: usize,
    ) -> f64 {
        self.general_coefficients
            .get(&(block, destination, period, row))
            .copied()
            .unwrap_or(0.0)
    }

    /// Yields `((block, destination, period, row), coefficient)`.
    pub fn general_coefficients(
        &self,
    ) -> impl Iterator<Item = ((usize, usize, usize, usize), f64)> + '_ {
        self.general_coefficients
            .iter()
            .map(|(key, coefficient)| (*key, *coefficient))
    }

    /// Bounds of general side constraint `row`, unconstrained if not listed.
    pub fn general_bounds(&self, row: usize) -> (f64, f64) {
        self.general_limits
            .get(&row)
            .copied()
            .unwrap_or((f64::NEG_INFINITY, f64::INFINITY))
    }

    pub fn num_general_limits(&self) -> usize {
        self.general_limits.len()
    }
}
