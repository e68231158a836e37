//! DER structures of a password recipient info.
//!
//! - [`AlgorithmIdentifier`] - `{ algorithm, parameters }`
//! - [`Pbkdf2Params`] - PKCS #5 PBKDF2 parameters
//! - [`PasswordRecipientInfo`] - The recipient record itself

mod algorithm_identifier;
mod pbkdf2_params;
mod recipient_info;

pub use algorithm_identifier::AlgorithmIdentifier;
pub use pbkdf2_params::Pbkdf2Params;
pub use recipient_info::PasswordRecipientInfo;
