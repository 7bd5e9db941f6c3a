#![no_main]
use libfuzzer_sys::fuzz_target;
use vhsave::Package;

fuzz_target!(|data: &[u8]| {
    let mut package = Package::new(data);
    let len = package.remaining();

    // Alternate readers until one fails, checking that the cursor only moves
    // forward and never past the end
    loop {
        let before = package.remaining();
        let ok = match before % 5 {
            0 => package.read_string().is_ok(),
            1 => package.read_package().map(|mut x| x.read_i32().ok()).is_ok(),
            2 => package.read_zdo_id().is_ok(),
            3 => package.read_string_list().is_ok(),
            _ => package.read_i32_list().is_ok(),
        };

        assert!(package.remaining() <= before);
        assert_eq!(package.position() + package.remaining(), len);
        if !ok || package.is_empty() {
            break;
        }
    }
});
