pub mod fixtures;
pub mod steps;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use steps::*;
