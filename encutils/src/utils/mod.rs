pub mod media_type;
pub use media_type::{MediaType, MediaTypeError, parse_header};

pub mod transport;
pub use transport::{Headers, TransportInfo};
