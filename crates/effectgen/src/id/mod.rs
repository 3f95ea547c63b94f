mod nanoid;

pub use nanoid::*;
