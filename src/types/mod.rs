pub mod analysis;
pub mod cache;
pub mod forecast;
pub mod indicators;
pub mod price;

pub use analysis::*;
pub use cache::*;
pub use forecast::*;
pub use indicators::*;
pub use price::*;
