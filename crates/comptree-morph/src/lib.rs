//! comptree-morph - Flat morphology for comptree images
//!
//! Grayscale erosion, dilation, opening, closing and the morphological
//! gradients over an arbitrary [`Neighborhood`](comptree_core::Neighborhood).
//! The tree engine uses [`gradient`] to precompute the edge image consumed
//! by the border-gradient attribute; the operators are also useful as
//! standalone preprocessing.

pub mod error;
pub mod flat;

pub use error::{MorphError, MorphResult};
pub use flat::{close, dilate, erode, external_gradient, gradient, internal_gradient, open};
