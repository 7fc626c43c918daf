//! API request data models.
//!
//! These structures define the inbound JSON contract of the relay. They are deserialized
//! from the caller's request and serialized again, unchanged, as the body of the outbound
//! request to the inference service.
//!
//! - [`detection`]: Image payloads and the detector discriminator
//! - [`text`]: Free-text payloads for keyword analysis

pub mod detection;
pub mod text;
