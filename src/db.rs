use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    entities::{Shipment, ShipmentStatus},
    error::Error,
};

/// Where shipments live once created.
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    async fn insert_shipment(&self, shipment: &Shipment) -> Result<(), Error>;
    async fn fetch_shipment(&self, id: &Uuid) -> Result<Option<Shipment>, Error>;
    async fn fetch_shipments(&self) -> Result<Vec<Shipment>, Error>;
    async fn update_shipment(&self, shipment: &Shipment) -> Result<bool, Error>;
    async fn count_shipments(&self, status: ShipmentStatus) -> Result<usize, Error>;
}

/// In-process store, kept in insertion order.
#[derive(Debug, Default)]
pub struct MemStore {
    shipments: RwLock<Vec<Shipment>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShipmentStore for MemStore {
    async fn insert_shipment(&self, shipment: &Shipment) -> Result<(), Error> {
        self.shipments.write().await.push(shipment.clone());
        Ok(())
    }

    async fn fetch_shipment(&self, id: &Uuid) -> Result<Option<Shipment>, Error> {
        let shipments = self.shipments.read().await;
        Ok(shipments.iter().find(|s| &s.id == id).cloned())
    }

    async fn fetch_shipments(&self) -> Result<Vec<Shipment>, Error> {
        Ok(self.shipments.read().await.clone())
    }

    async fn update_shipment(&self, shipment: &Shipment) -> Result<bool, Error> {
        let mut shipments = self.shipments.write().await;

        match shipments.iter_mut().find(|s| s.id == shipment.id) {
            Some(existing) => {
                *existing = shipment.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_shipments(&self, status: ShipmentStatus) -> Result<usize, Error> {
        let shipments = self.shipments.read().await;
        Ok(shipments.iter().filter(|s| s.status == status).count())
    }
}

#[test]
fn mem_store_round_trip() {
    use crate::entities::{NewShipment, RouteResult, ShipmentStatus};
    use tokio_test::block_on;

    let store = MemStore::new();

    let route = RouteResult {
        distance: "15.0 km".into(),
        duration: "25 mins".into(),
        source: "Farm A".into(),
        destination: "Market NYC".into(),
        coordinates: None,
    };
    let mut shipment = Shipment::new(
        NewShipment {
            produce_id: "1".into(),
            source: "Farm A".into(),
            destination: "Market NYC".into(),
            delivery_date: "2024-06-01".into(),
            status: None,
        },
        route,
    );

    block_on(store.insert_shipment(&shipment)).unwrap();
    assert_eq!(block_on(store.fetch_shipments()).unwrap().len(), 1);

    shipment.set_status(ShipmentStatus::InTransit);
    assert!(block_on(store.update_shipment(&shipment)).unwrap());

    let stored = block_on(store.fetch_shipment(&shipment.id)).unwrap().unwrap();
    assert_eq!(stored.status, ShipmentStatus::InTransit);
    assert_eq!(stored.logs.len(), 2);
    assert_eq!(block_on(store.count_shipments(ShipmentStatus::InTransit)).unwrap(), 1);
    assert_eq!(block_on(store.count_shipments(ShipmentStatus::Delivered)).unwrap(), 0);

    assert!(block_on(store.fetch_shipment(&Uuid::new_v4())).unwrap().is_none());
}
