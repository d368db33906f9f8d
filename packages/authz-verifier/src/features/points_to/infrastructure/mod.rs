pub mod alias_oracle;
pub mod union_find;

pub use alias_oracle::UnionFindAliasOracle;
pub use union_find::UnionFind;
