//! TimeDetect Core
//!
//! Core types for the TimeDetect demo client.
//!
//! This crate contains:
//! - Domain types: Core business entities (Registration, Job status, Prediction)
//! - DTOs: Wire payloads and responses exchanged with the detection API,
//!   including the field allow-list applied to outgoing registrations

pub mod domain;
pub mod dto;
