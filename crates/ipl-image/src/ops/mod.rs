//! Transform operations.
//!
//! Every operation comes in two forms:
//!
//! - `op_to(&self, dest, ..)` brings `dest` to the output shape through
//!   [`Image::reinitialize`](crate::Image::reinitialize) (reusing its buffer
//!   when it already matches), then runs the native primitive into it.
//! - `op(&self, ..)` does the same into a fresh placeholder and returns it.
//!
//! The source must be initialized; destinations may be placeholders.
//!
//! | Operation | Output size | Output type |
//! |---|---|---|
//! | [`resize`](crate::Image::resize) | requested | source |
//! | [`rotate`](crate::Image::rotate) | source | source |
//! | [`gaussian_blur`](crate::Image::gaussian_blur) | source | source |
//! | [`lut`](crate::Image::lut) | source | source |
//! | [`copy_to`](crate::Image::copy_to) / [`duplicate`](crate::Image::duplicate) | source | source |
//! | [`split`](crate::Image::split) | source | one channel per plane |
//! | [`convert_color`](crate::Image::convert_color) | source | channels per conversion |

mod blur;
mod color;
mod copy;
mod lut;
mod resize;
mod rotate;
mod split;

pub use lut::Lut;
