#![no_main]
use libfuzzer_sys::fuzz_target;
use vhsave::PlayerProfile;

fuzz_target!(|data: &[u8]| {
    let Ok(profile) = PlayerProfile::from_slice(data) else {
        return;
    };

    // Every decoded profile must be serializable
    #[cfg(feature = "json")]
    let _ = serde_json::to_vec(&profile).unwrap();

    #[cfg(not(feature = "json"))]
    let _ = profile;
});
