#![no_main]

use libfuzzer_sys::fuzz_target;
use pwri::core::types::PasswordRecipientInfo;
use pwri::{PasswordRecipient, Rfc3211KeyWrap};

fuzz_target!(|data: &[u8]| {
    // Recovery from attacker-controlled records should fail cleanly
    let Ok(pwri) = PasswordRecipientInfo::from_der_bytes(data) else {
        return;
    };
    // Keep the fuzzer from spending its time inside PBKDF2
    let _ = PasswordRecipient::new("fuzz")
        .max_iteration_count(16)
        .recover_content_key(&pwri, &Rfc3211KeyWrap::new());
});
