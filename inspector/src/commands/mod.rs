mod benchmark;
mod graph;
mod summary;

pub use benchmark::benchmark;
pub use graph::graph;
pub use summary::summary;
