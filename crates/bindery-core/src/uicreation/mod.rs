//! Creation of whole UI parts from annotated PMOs.

mod section;
mod table;
mod table_section;

pub use section::PmoBasedSectionFactory;
pub use table::PmoBasedTableFactory;
pub use table_section::{PmoBasedTableSectionFactory, TableSection};
