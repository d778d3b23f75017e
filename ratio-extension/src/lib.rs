mod ratio_ext;

pub use ratio_ext::*;
