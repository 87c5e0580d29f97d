pub mod nodeset;
pub mod resources;
pub mod label;
pub mod dom;
pub mod labelling;
pub mod columns;
pub mod preprocessing;

pub use nodeset::NodeSet;
pub use resources::Resources;
pub use label::{Label, LabelArena, LabelId, Route};
pub use labelling::{LabellingSolver, LabellingStats, NodeLabels};
pub use columns::{Column, default_columns, initial_columns, negative_cost_columns};
pub use preprocessing::preprocess;
