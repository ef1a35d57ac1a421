pub mod digits;
pub mod error;
pub mod guard;
pub mod metadata;
pub mod palette;

pub use digits::*;
pub use error::*;
pub use guard::*;
pub use metadata::*;
pub use palette::*;
