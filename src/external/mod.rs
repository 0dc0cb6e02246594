pub mod google_maps;
pub mod nominatim;
pub mod osrm;
pub mod transport;

pub use transport::{HttpTransport, Request, Transport};

#[cfg(test)]
pub mod fake;
