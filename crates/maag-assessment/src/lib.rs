//! Gastric-symptom (maag) self-assessment: questionnaire schema, completion gating, exclusive
//! red-flag checklist, risk scoring, and the service plumbing around them.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
