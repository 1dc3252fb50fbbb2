//! Data sheet collaborator: columns, conditions, sorters, aggregations and rows.

mod aggregator;
mod condition;
#[allow(clippy::module_inception)]
mod sheet;

pub use aggregator::*;
pub use condition::*;
pub use sheet::*;
