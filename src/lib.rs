//! Contract Onboarding Client Core
//!
//! This library provides the non-visual core of the contract onboarding
//! client: form validation schemas, the data models exchanged with the
//! backend, the credit card display model and the real-time signaling
//! connector.
//!
//! # Modules
//!
//! - `core`: Domain-layer namespace (forms, models, errors).
//! - `integrations`: External service integrations.
//! - `obs`: Logging setup.
//! - `br_validators`: CPF, e-mail, phone and date validators.
//! - `config`: Configuration management.
//! - `credit_card_view`: Credit card display model and delete dispatch.
//! - `errors`: Error handling types.
//! - `form_schemas`: Contract, personal-data and address form schemas.
//! - `models`: Domain data models.
//! - `signaling`: Socket.IO signaling connector.
//! - `validation`: Declarative field validation engine.

pub mod core;
pub mod integrations;
pub mod obs;

pub mod br_validators;
pub mod config;
pub mod credit_card_view;
pub mod errors;
pub mod form_schemas;
pub mod models;
pub mod signaling;
pub mod validation;
