pub mod traversal;

pub use traversal::reverse_postorder;
