#![no_main]

use libfuzzer_sys::fuzz_target;
use pwri::core::types::PasswordRecipientInfo;

fuzz_target!(|data: &[u8]| {
    // Parsing and field access should never panic
    for parsed in [
        PasswordRecipientInfo::from_der_bytes(data),
        PasswordRecipientInfo::from_recipient_info_der(data),
    ] {
        if let Ok(pwri) = parsed {
            let _ = pwri.pbkdf2_params();
            let _ = pwri.kek_algorithm().and_then(|kek| kek.iv());
            let _ = pwri.to_der_bytes();
        }
    }
});
