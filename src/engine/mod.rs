mod route_api;
mod shipment_api;

use std::sync::Arc;

use crate::{
    api::API,
    config::Config,
    db::{MemStore, ShipmentStore},
    error::Error,
    resolver::RouteResolver,
};

pub struct Engine {
    resolver: RouteResolver,
    store: Arc<dyn ShipmentStore>,
}

impl Engine {
    pub fn new(resolver: RouteResolver, store: Arc<dyn ShipmentStore>) -> Self {
        Self { resolver, store }
    }

    /// Live providers from `config`, shipments kept in memory.
    #[tracing::instrument(name = "Engine::from_config", skip_all)]
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let resolver = RouteResolver::new(config)?;

        Ok(Self::new(resolver, Arc::new(MemStore::new())))
    }
}

impl API for Engine {}

#[cfg(test)]
fn offline_engine() -> Engine {
    use crate::external::fake::FakeTransport;

    let resolver = RouteResolver::with_transport(&Config::default(), Arc::new(FakeTransport::new()));

    Engine::new(resolver, Arc::new(MemStore::new()))
}

#[cfg(test)]
fn new_shipment(source: &str, destination: &str) -> crate::entities::NewShipment {
    crate::entities::NewShipment {
        produce_id: "1".into(),
        source: source.into(),
        destination: destination.into(),
        delivery_date: "2024-06-01T00:00:00.000Z".into(),
        status: None,
    }
}

#[test]
fn create_shipment_attaches_route() {
    use crate::api::ShipmentAPI;
    use crate::entities::ShipmentStatus;
    use crate::resolver::Fallback;
    use tokio_test::block_on;

    let engine = offline_engine();

    let shipment = block_on(engine.create_shipment(new_shipment("Farm A", "Market NYC"))).unwrap();

    assert_eq!(shipment.status, ShipmentStatus::Scheduled);
    assert_eq!(shipment.destination, "Market NYC");
    assert_eq!(shipment.logs.len(), 1);
    assert_eq!(
        shipment.route_data,
        Some(Fallback.route("Farm A", "Market NYC"))
    );

    let found = block_on(engine.find_shipment(shipment.id)).unwrap();
    assert_eq!(found.id, shipment.id);
    assert_eq!(block_on(engine.list_shipments()).unwrap().len(), 1);
}

#[test]
fn status_updates_append_logs_and_keep_route() {
    use crate::api::ShipmentAPI;
    use crate::entities::ShipmentStatus;
    use tokio_test::block_on;

    let engine = offline_engine();
    let shipment = block_on(engine.create_shipment(new_shipment("Farm B", "Fresh Market"))).unwrap();

    let updated =
        block_on(engine.update_shipment_status(shipment.id, ShipmentStatus::InTransit)).unwrap();
    assert_eq!(updated.status, ShipmentStatus::InTransit);
    assert_eq!(updated.logs.len(), 2);
    assert_eq!(updated.route_data, shipment.route_data);

    let updated =
        block_on(engine.update_shipment_status(shipment.id, ShipmentStatus::Delivered)).unwrap();
    assert_eq!(updated.logs.last().map(|l| l.status), Some(ShipmentStatus::Delivered));

    let stored = block_on(engine.find_shipment(shipment.id)).unwrap();
    assert_eq!(stored.logs.len(), 3);
}

#[test]
fn unknown_shipment_is_invalid_input() {
    use crate::api::ShipmentAPI;
    use crate::entities::ShipmentStatus;
    use crate::error::INVALID_INPUT_ERROR;
    use tokio_test::block_on;
    use uuid::Uuid;

    let engine = offline_engine();

    let err = block_on(engine.find_shipment(Uuid::new_v4())).unwrap_err();
    assert_eq!(err.code, INVALID_INPUT_ERROR);

    let err = block_on(engine.update_shipment_status(Uuid::new_v4(), ShipmentStatus::Delivered))
        .unwrap_err();
    assert_eq!(err.code, INVALID_INPUT_ERROR);
}

#[test]
fn route_is_resolved_once_per_shipment() {
    use crate::api::ShipmentAPI;
    use crate::entities::{RouteResult, ShipmentStatus};
    use crate::resolver::RouteProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::block_on;

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl RouteProvider for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn attempt(&self, source: &str, destination: &str) -> Result<RouteResult, Error> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(RouteResult {
                distance: "1.0 km".into(),
                duration: "2 mins".into(),
                source: source.into(),
                destination: destination.into(),
                coordinates: None,
            })
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = RouteResolver::with_providers(vec![Box::new(Counting(calls.clone()))]);
    let engine = Engine::new(resolver, Arc::new(MemStore::new()));

    let shipment = block_on(engine.create_shipment(new_shipment("Farm A", "Market NYC"))).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(shipment.route_data.unwrap().distance, "1.0 km");

    block_on(engine.update_shipment_status(shipment.id, ShipmentStatus::InTransit)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn stats_follow_status_transitions() {
    use crate::api::ShipmentAPI;
    use crate::entities::{ShipmentStats, ShipmentStatus};
    use tokio_test::block_on;

    let engine = offline_engine();
    assert_eq!(block_on(engine.shipment_stats()).unwrap(), ShipmentStats::default());

    let first = block_on(engine.create_shipment(new_shipment("Farm A", "Market NYC"))).unwrap();
    let second = block_on(engine.create_shipment(new_shipment("Farm B", "Fresh Market"))).unwrap();
    block_on(engine.create_shipment(new_shipment("Farm C", "Corner Store"))).unwrap();

    block_on(engine.update_shipment_status(first.id, ShipmentStatus::InTransit)).unwrap();
    block_on(engine.update_shipment_status(second.id, ShipmentStatus::InTransit)).unwrap();
    assert_eq!(
        block_on(engine.shipment_stats()).unwrap(),
        ShipmentStats {
            in_transit: 2,
            delivered: 0
        }
    );

    block_on(engine.update_shipment_status(first.id, ShipmentStatus::Delivered)).unwrap();
    assert_eq!(
        block_on(engine.shipment_stats()).unwrap(),
        ShipmentStats {
            in_transit: 1,
            delivered: 1
        }
    );
}
