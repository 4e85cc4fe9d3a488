//! Data-shaping utilities.

pub mod chunks;
pub mod latest;
pub mod misc;
pub mod tree;

pub use chunks::{array_chunks, chunk_delimited, chunk_delimited_str};
pub use latest::{LatestTokenTable, Token};
pub use misc::{
    compare_by_property, escape_html, generate_random_id, has_duplicate_property, is_valid_integer,
    is_valid_url, pick, sort_by_property, SortOrder,
};
pub use tree::{flatten_tree, node_path, FlattenOptions, PathNode};
