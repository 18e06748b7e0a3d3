//! comptree-maxtree - Component-tree construction and analysis
//!
//! Builds the max-tree of a grayscale image: the rooted tree whose nodes
//! are the connected components of the image's upper level sets, ordered
//! by inclusion. The tree carries a configurable bundle of per-node
//! attributes (area, contrast, volume, stability, contour statistics,
//! bounding boxes, neighborhood rings), supports deactivating nodes by
//! attribute thresholds, and reconstructs filtered images under several
//! level rules.
//!
//! Construction is Salembier's hierarchical-queue flooding over a
//! border-padded workspace; see [`ComponentTree::with_options`] for the
//! full surface.
//!
//! # Examples
//!
//! ```
//! use comptree_core::Image;
//! use comptree_maxtree::{ComponentTree, Rule};
//!
//! let img = Image::from_vec_2d(3, 3, vec![0u8, 0, 0, 0, 5, 0, 0, 0, 0]).unwrap();
//! let mut tree = ComponentTree::new(&img).unwrap();
//!
//! // unfiltered DIRECT reconstruction reproduces the input
//! assert_eq!(tree.reconstruct(Rule::Direct).unwrap(), img);
//!
//! // pruning the single-pixel peak flattens the image
//! tree.area_filtering(2, i64::MAX);
//! assert_eq!(tree.reconstruct(Rule::Min).unwrap().data(), &[0u8; 9]);
//! ```

mod attributes;
pub mod error;
mod filter;
mod flood;
pub mod node;
pub mod options;
mod reconstruct;
mod tree;

pub use error::{TreeError, TreeResult};
pub use node::{Attribute, Node, NodeId};
pub use options::{AttributeSet, Rule, TreeOptions};
pub use tree::ComponentTree;
