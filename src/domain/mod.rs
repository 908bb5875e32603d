//! Domain model: value objects, pricing and shipping services, aggregates
pub mod aggregates;
pub mod events;
pub mod pricing;
pub mod shipping;
pub mod value_objects;
