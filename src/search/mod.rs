//! Query execution: building, sending, bounds resolution and normalization.

pub mod bounds;
pub mod normalize;
pub mod querier;

pub use self::bounds::{BoundsResolver, StatBounds, StatBoundsMap};
pub use self::normalize::Normalizer;
pub use self::querier::Querier;
