//! Client-side orchestration for the obesity risk prediction service.
//!
//! A [`fields::FieldSet`] collects the sixteen lifestyle answers, the
//! [`validator`] gates submission on completeness, and the
//! [`orchestrator::RequestOrchestrator`] drives a single request to the
//! service over a [`transport::PredictionTransport`]. [`risk::color_for`] and
//! [`view::ResultView`] turn the outcome into something presentable.

pub mod config;
pub mod error;
pub mod fields;
pub mod orchestrator;
pub mod risk;
pub mod service;
pub mod telemetry;
pub mod transport;
pub mod validator;
pub mod view;
