use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::RouteResult;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: Uuid,
    pub produce_id: String,
    pub destination: String,
    pub delivery_date: String,
    pub status: Status,
    pub logs: Vec<Log>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub route_data: Option<RouteResult>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Scheduled,
    #[serde(rename = "In Transit")]
    InTransit,
    Delivered,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Log {
    pub status: Status,
    pub timestamp: DateTime<Utc>,
}

/// Delivery counts shown on the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub in_transit: usize,
    pub delivered: usize,
}

/// Input for shipment creation. `source` is only used to resolve the route.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    pub produce_id: String,
    pub source: String,
    pub destination: String,
    pub delivery_date: String,
    #[serde(default)]
    pub status: Option<Status>,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InTransit => "In Transit",
            Self::Delivered => "Delivered",
        }
    }
}

impl Shipment {
    pub fn new(params: NewShipment, route_data: RouteResult) -> Self {
        let status = params.status.unwrap_or_default();

        Self {
            id: Uuid::new_v4(),
            produce_id: params.produce_id,
            destination: params.destination,
            delivery_date: params.delivery_date,
            status,
            // the first entry is always "Scheduled", whatever status was requested
            logs: vec![Log {
                status: Status::Scheduled,
                timestamp: Utc::now(),
            }],
            route_data: Some(route_data),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.logs.push(Log {
            status,
            timestamp: Utc::now(),
        });
    }
}

#[test]
fn new_shipment_is_scheduled_with_one_log() {
    let route = RouteResult {
        distance: "15.0 km".into(),
        duration: "25 mins".into(),
        source: "Farm A".into(),
        destination: "Market NYC".into(),
        coordinates: None,
    };
    let params = NewShipment {
        produce_id: "1".into(),
        source: "Farm A".into(),
        destination: "Market NYC".into(),
        delivery_date: "2024-06-01".into(),
        status: None,
    };

    let mut shipment = Shipment::new(params, route.clone());
    assert_eq!(shipment.status, Status::Scheduled);
    assert_eq!(shipment.logs.len(), 1);
    assert_eq!(shipment.route_data, Some(route.clone()));

    shipment.set_status(Status::InTransit);
    shipment.set_status(Status::Delivered);

    let statuses: Vec<Status> = shipment.logs.iter().map(|l| l.status).collect();
    assert_eq!(
        statuses,
        vec![Status::Scheduled, Status::InTransit, Status::Delivered]
    );
    assert_eq!(shipment.route_data, Some(route));
}

#[test]
fn status_uses_display_names_on_the_wire() {
    assert_eq!(
        serde_json::to_string(&Status::InTransit).unwrap(),
        "\"In Transit\""
    );
    assert_eq!(Status::InTransit.name(), "In Transit");

    let status: Status = serde_json::from_str("\"Delivered\"").unwrap();
    assert_eq!(status, Status::Delivered);
}

#[test]
fn stats_use_camel_case() {
    let stats = Stats {
        in_transit: 2,
        delivered: 1,
    };

    assert_eq!(
        serde_json::to_value(stats).unwrap(),
        serde_json::json!({ "inTransit": 2, "delivered": 1 })
    );
}
