pub mod bit;

pub use bit::Bit;
