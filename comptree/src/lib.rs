//! comptree - Component-tree engine for grayscale images
//!
//! Builds the max-tree of a 2D or 3D grayscale image, annotates it with a
//! configurable attribute bundle, filters nodes by attribute thresholds,
//! and reconstructs filtered images under several level rules.
//!
//! # Overview
//!
//! - [`Image<T>`] / [`Neighborhood`] - dense image container and
//!   connectivity presets (`comptree-core`)
//! - [`ComponentTree`] - flooding construction, attributes, filters,
//!   reconstruction (`comptree-maxtree`)
//! - [`io`] - binary PGM/PPM readers and writers (`comptree-io`)
//! - [`morph`] - flat morphology and gradients (`comptree-morph`)
//!
//! # Example
//!
//! ```
//! use comptree::{ComponentTree, Image, Rule};
//!
//! let img = Image::from_vec_2d(3, 3, vec![0u8, 0, 0, 0, 5, 0, 0, 0, 0]).unwrap();
//! let mut tree = ComponentTree::new(&img).unwrap();
//! tree.area_filtering(2, i64::MAX);
//! let flat = tree.reconstruct(Rule::Min).unwrap();
//! assert_eq!(flat.data(), &[0u8; 9]);
//! ```

pub use comptree_core::{Error, Image, Neighborhood, Pixel, Positions, Result, Rgb};
pub use comptree_maxtree::{
    Attribute, AttributeSet, ComponentTree, Node, NodeId, Rule, TreeError, TreeOptions, TreeResult,
};

pub use comptree_io as io;
pub use comptree_morph as morph;
