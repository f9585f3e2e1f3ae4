//! The project index: core types, graph assembly, queries, and incremental
//! maintenance.

pub mod builder;
pub mod queries;
pub mod types;
pub mod update;

pub use builder::{BuildOutcome, GraphBuilder};
pub use queries::{cycles, entry_points, leaf_files, stats, IndexStats};
pub use types::{
    ClassSignature, ConstantSignature, Edge, FieldSignature, FileInfo, FunctionSignature,
    ImportKind, ImportSpec, IndexMetadata, MethodSignature, Parameter, ProjectIndex, TreeNode,
    TreeNodeKind, ValueKind, Visibility, SCHEMA_VERSION,
};
pub use update::{remove, update, update_from_disk, UpdateOutcome};
