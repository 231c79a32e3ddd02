mod asset;
mod network;
mod provider;
mod vault;

pub use asset::*;
pub use network::*;
pub use provider::*;
pub use vault::*;
