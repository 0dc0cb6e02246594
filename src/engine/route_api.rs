use super::Engine;

use async_trait::async_trait;

use crate::{api::RouteAPI, entities::RouteResult};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn resolve_route(&self, source: &str, destination: &str) -> RouteResult {
        self.resolver.resolve(source, destination).await
    }
}

#[test]
fn resolve_route_never_fails() {
    use tokio_test::block_on;

    let engine = super::offline_engine();

    let route = block_on(engine.resolve_route("Farm A", "Market NYC"));

    assert_eq!(route.distance, "15.0 km");
    assert_eq!(route.duration, "25 mins");
    assert_eq!(route.source, "Farm A");
}
