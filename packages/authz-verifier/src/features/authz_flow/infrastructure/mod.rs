pub mod relation_table;

pub use relation_table::RelationTable;
