pub mod analyze;
pub mod score;
pub mod suggest;

pub use analyze::*;
pub use score::*;
pub use suggest::*;
