//! Multi-party aggregation protocol
//!
//! A round, end to end:
//!
//! - Key holder: [`PrivateContext::generate`], publishes [`PublicContext`]
//! - Each contributor: [`crate::encode::encode`] then [`PublicContext::encrypt`]
//! - Aggregator: [`AggregationCircuit::aggregate`] (no secret key)
//! - Key holder: [`PrivateContext::decrypt`], then [`report`]
//!
//! Only the normalized aggregate is ever decrypted; individual vectors stay
//! opaque to everyone but the key holder.

mod ciphertext;
mod circuit;
mod context;
mod decode;
mod report;

pub use ciphertext::{AggregateCiphertext, EncryptedVector};
pub use circuit::{aggregate, AggregationCircuit, LEVELS_CONSUMED};
pub use context::{PrivateContext, PublicContext};
pub use decode::{decode, decode_raw, DecryptedAggregate};
pub use report::{report, AlleleFrequencyReport, FrequencyEntry, FrequencyReporter};
