mod compute;

pub use compute::*;
