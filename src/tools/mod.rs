pub mod favorites;
pub mod matches;
pub mod normalize;

pub use favorites::*;
pub use matches::*;
pub use normalize::*;
