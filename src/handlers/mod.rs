pub mod diagnostics;
pub mod flush;
pub mod health;
pub mod instruments;
pub mod rooms;

pub use diagnostics::*;
pub use flush::*;
pub use health::*;
pub use instruments::*;
pub use rooms::*;
