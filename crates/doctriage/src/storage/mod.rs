pub mod filesystem;

pub use filesystem::Mover;
