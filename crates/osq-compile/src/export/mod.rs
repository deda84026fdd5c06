//! Backend exporters. cQASM 3 export lives on `Circuit`'s `Display` impl in
//! `osq-ir`; the lossy/downstream formats live here.

mod cqasm1;
mod quantify;

pub use cqasm1::Cqasm1Exporter;
pub use quantify::{QuantifyExporter, QuantifyOperation, QuantifySchedule};
