use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{NewShipment, RouteResult, Shipment, ShipmentStats, ShipmentStatus};
use crate::error::Error;

#[async_trait]
pub trait RouteAPI {
    /// Best-effort route summary; degrades to a synthetic route instead of failing.
    async fn resolve_route(&self, source: &str, destination: &str) -> RouteResult;
}

#[async_trait]
pub trait ShipmentAPI {
    async fn create_shipment(&self, params: NewShipment) -> Result<Shipment, Error>;
    async fn find_shipment(&self, id: Uuid) -> Result<Shipment, Error>;
    async fn list_shipments(&self) -> Result<Vec<Shipment>, Error>;
    async fn update_shipment_status(
        &self,
        id: Uuid,
        status: ShipmentStatus,
    ) -> Result<Shipment, Error>;
    async fn shipment_stats(&self) -> Result<ShipmentStats, Error>;
}

pub trait API: RouteAPI + ShipmentAPI {}
