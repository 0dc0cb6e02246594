use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::ShipmentAPI,
    entities::{NewShipment, Shipment, ShipmentStats, ShipmentStatus},
    error::{invalid_input_error, invalid_state_error, Error},
};

#[async_trait]
impl ShipmentAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_shipment(&self, params: NewShipment) -> Result<Shipment, Error> {
        // resolved before anything is persisted; never recomputed afterwards
        let route = self
            .resolver
            .resolve(&params.source, &params.destination)
            .await;

        let shipment = Shipment::new(params, route);

        self.store.insert_shipment(&shipment).await?;

        tracing::info!(id = %shipment.id, "shipment created");

        Ok(shipment)
    }

    #[tracing::instrument(skip(self))]
    async fn find_shipment(&self, id: Uuid) -> Result<Shipment, Error> {
        self.store
            .fetch_shipment(&id)
            .await?
            .ok_or_else(invalid_input_error)
    }

    #[tracing::instrument(skip(self))]
    async fn list_shipments(&self) -> Result<Vec<Shipment>, Error> {
        self.store.fetch_shipments().await
    }

    #[tracing::instrument(skip(self))]
    async fn update_shipment_status(
        &self,
        id: Uuid,
        status: ShipmentStatus,
    ) -> Result<Shipment, Error> {
        let mut shipment = self.find_shipment(id).await?;

        shipment.set_status(status);

        if !self.store.update_shipment(&shipment).await? {
            return Err(invalid_state_error());
        }

        Ok(shipment)
    }

    #[tracing::instrument(skip(self))]
    async fn shipment_stats(&self) -> Result<ShipmentStats, Error> {
        Ok(ShipmentStats {
            in_transit: self.store.count_shipments(ShipmentStatus::InTransit).await?,
            delivered: self.store.count_shipments(ShipmentStatus::Delivered).await?,
        })
    }
}
