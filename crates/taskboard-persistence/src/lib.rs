pub mod backend;
pub mod cache;
pub mod store;
pub mod traits;

pub use backend::*;
pub use cache::*;
pub use store::*;
pub use traits::*;
