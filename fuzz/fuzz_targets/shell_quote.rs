#![no_main]

use ghid_shell::{fish_quote, posix_quote};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let value = String::from_utf8_lossy(data);
    let posix = posix_quote(&value);
    let fish = fish_quote(&value);
    assert!(!posix.contains('\n'));
    assert!(!fish.contains('\n'));

    if !value.chars().any(char::is_control) {
        let words = shell_words::split(&posix).expect("quoted value splits");
        assert_eq!(words, vec![value.into_owned()]);
    }
});
