// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXXXX (e.g., C_K7NP3X2Q for cars)
//!
//! The alphabet excludes I, L, O, U so IDs can be read back over the phone
//! when a renter calls about a booking.

use rand::{Rng, RngCore};

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Random characters after the prefix
const ID_LENGTH: usize = 8;

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// Car listing (C_)
    Car,
    /// Booking (B_)
    Booking,
    /// User (U_)
    User,
    /// Admin grant (K_) - K for Key
    Grant,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Car => "C",
            EntityPrefix::Booking => "B",
            EntityPrefix::User => "U",
            EntityPrefix::Grant => "K",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID, e.g. `generate_id(EntityPrefix::Booking)` -> `"B_8MWQT2KD"`
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(ID_LENGTH))
}

pub fn generate_car_id() -> String {
    generate_id(EntityPrefix::Car)
}

pub fn generate_booking_id() -> String {
    generate_id(EntityPrefix::Booking)
}

pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

pub fn generate_grant_id() -> String {
    generate_id(EntityPrefix::Grant)
}

/// Generate a 256-bit secret, hex encoded. Used for admin grant secrets.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
