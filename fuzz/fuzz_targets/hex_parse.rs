#![no_main]

use hexchroma_core::ColorError;
use hexchroma_core::codec::{HexColor, decode, encode};
use hexchroma_core::ops::{complementary, invert, triadic_palette};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    match HexColor::parse(raw) {
        Ok(hex) => {
            let digits = hex.as_str();
            assert_eq!(digits.len(), 6);
            assert!(
                digits
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
            );
            assert_eq!(encode(decode(hex)), hex);
            assert_eq!(HexColor::parse(&hex.prefixed()), Ok(hex));

            let comp = complementary(hex);
            assert_eq!(invert(comp), decode(hex));
            assert_eq!(triadic_palette(hex)[0], decode(hex));
        }
        Err(ColorError::MissingParameter) => assert!(raw.is_empty()),
        Err(ColorError::InvalidFormat { value, .. }) => assert_eq!(value, raw),
    }
});
