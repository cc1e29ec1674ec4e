pub mod address;
pub mod json;
pub mod order_line;
pub mod order_status;

pub use address::Address;
pub use order_line::OrderLine;
pub use order_status::OrderStatus;
