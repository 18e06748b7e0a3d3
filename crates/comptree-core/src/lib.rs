//! comptree-core - Image container and neighborhood types
//!
//! Foundation crate for the comptree workspace. It provides:
//!
//! - **[`Image<T>`]** - a dense n-D buffer of scalar voxels with
//!   coordinate/offset arithmetic, cropping, pasting and border padding
//! - **[`Neighborhood`]** - an ordered displacement set with cached flat
//!   offsets and the standard connectivity presets
//! - **[`Pixel`]** - the narrow numeric interface the algorithms are
//!   generic over
//!
//! # Examples
//!
//! ```
//! use comptree_core::{Image, Neighborhood};
//!
//! let mut img = Image::<u8>::new_2d(8, 8).unwrap();
//! img.set(3, 3, 0, 200).unwrap();
//! assert_eq!(img.max_value(), 200);
//!
//! let mut nb = Neighborhood::n8_2d();
//! nb.bind_to(&img);
//! assert_eq!(nb.offsets().len(), 8);
//! ```

pub mod error;
pub mod image;
pub mod neighborhood;
pub mod pixel;

pub use error::{Error, Result};
pub use image::{Image, Positions};
pub use neighborhood::Neighborhood;
pub use pixel::{Pixel, Rgb};
