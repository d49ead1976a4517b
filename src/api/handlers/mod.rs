pub mod breast_cancer;
pub mod character;
pub mod system;

pub use breast_cancer::*;
pub use character::*;
pub use system::*;
