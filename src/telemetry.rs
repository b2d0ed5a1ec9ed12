use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::inventory::types::{EquipmentId, OrderId};

/// Initialize structured logging for the engine.
/// JSON output so the surrounding service can ship log lines as-is;
/// RUST_LOG overrides the default level.
pub fn init_telemetry() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Fieldstock telemetry initialized with structured logging");
    Ok(())
}

/// Correlation id linking one caller request across engine and store logs.
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one action execution or order completion. Callers pass
/// whichever of the equipment/order ids apply.
pub fn create_action_span(
    operation: &str,
    equipment_id: Option<EquipmentId>,
    order_id: Option<OrderId>,
    correlation_id: Option<&str>,
) -> tracing::Span {
    tracing::info_span!(
        "equipment_action",
        operation,
        equipment.id = equipment_id.map(tracing::field::display),
        order.id = order_id.map(tracing::field::display),
        correlation.id = correlation_id,
    )
}

/// Shutdown telemetry gracefully
pub fn shutdown_telemetry() {
    // For structured logging, no explicit shutdown needed
    tracing::info!("Fieldstock telemetry shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_ids_are_unique_uuids() {
        let first = generate_correlation_id();
        let second = generate_correlation_id();

        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn action_spans_accept_partial_context() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let span = create_action_span("deploy", Some(EquipmentId::new()), None, None);
            assert_eq!(
                span.metadata().expect("span enabled").name(),
                "equipment_action"
            );

            let order_only = create_action_span("complete", None, Some(OrderId::new()), None);
            assert!(order_only.metadata().is_some());
        });
    }
}
