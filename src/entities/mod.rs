mod location;
mod route;
mod shipment;

pub use location::{Coordinates, GeoPoint};
pub use route::RouteResult;
pub use shipment::{Log as ShipmentLog, NewShipment, Shipment, Stats as ShipmentStats, Status as ShipmentStatus};
