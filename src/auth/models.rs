//! Authentication data models

use serde::{Deserialize, Serialize};

/// JWT claims for locally signed HS256 tokens
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

/// Output of a successful identity-provider verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject_id: String,
    pub email: String,
}

/// `accounts:lookup` request body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseLookupRequest<'a> {
    pub id_token: &'a str,
}

/// `accounts:lookup` response, reduced to the fields we read
#[derive(Deserialize, Debug)]
pub struct FirebaseLookupResponse {
    #[serde(default)]
    pub users: Vec<FirebaseAccount>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseAccount {
    pub local_id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}
