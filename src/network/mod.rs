pub mod network_error;
pub use network_error::*;

pub mod command;
pub use command::*;

pub mod reply;
pub use reply::*;

pub mod network_in;
pub use network_in::*;

pub mod network_out;
pub use network_out::*;
