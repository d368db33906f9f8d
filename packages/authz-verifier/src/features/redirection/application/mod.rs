pub mod call_resolver;

pub use call_resolver::{CallResolver, RewrittenFile};
