pub mod batch;
pub mod dag;
pub mod instance;

pub use minelib_parser as parser;

pub use batch::{load_all, BatchOptions, BatchResult};
pub use dag::PrecedenceDag;
pub use instance::{
    load, Instance, InstanceKind, InstanceSummary, LoadError, LoadOptions, PrecedenceSource,
};
