//! Client-facing analytical engines for a real-estate marketing site.
//!
//! [`analysis::investment`] projects a rental property's cash flow, equity,
//! and loan amortization over a holding period and manages caller-owned
//! scenario books. [`analysis::readiness`] turns a seller's questionnaire into
//! a weighted 0-100 readiness score with a letter grade.
//!
//! Both engines are pure and synchronous. Configuration, telemetry, and the
//! HTTP-facing error type live alongside them for the hosting service.

pub mod analysis;
pub mod config;
pub mod error;
pub mod telemetry;
