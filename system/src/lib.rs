pub extern crate euclid;
pub extern crate serde;
pub extern crate serde_json;
pub extern crate uuid;

mod board;
mod client_replica;
mod element;
mod error;
mod gesture;
mod geometry;
mod message;
mod traits;
mod types;
mod voice;

pub use board::*;
pub use client_replica::*;
pub use element::*;
pub use error::*;
pub use gesture::*;
pub use geometry::*;
pub use message::*;
pub use traits::*;
pub use types::*;
pub use voice::*;
