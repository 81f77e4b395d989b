mod address;
mod location;

pub use address::Address;
pub use location::{Location, MAX_NAME_LEN};
