mod bitmap;
mod blit;
mod page;
mod shape;

pub use self::bitmap::{Bitmap, BoundingBox};
pub use self::blit::Blit;
pub use self::page::{InheritedRef, Page};
pub use self::shape::Shape;
