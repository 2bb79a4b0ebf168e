pub mod caption;
pub mod creative;
pub mod request;

pub use caption::*;
pub use creative::*;
pub use request::*;
