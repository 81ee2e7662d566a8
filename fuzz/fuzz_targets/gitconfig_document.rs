#![no_main]

use ghid_gitconfig::{add_include_if_in, remove_include_if_in, GitConfigDocument};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let document = GitConfigDocument::parse(&raw);
    let reparsed = GitConfigDocument::parse(&document.render());
    assert_eq!(document.managed_dirs(), reparsed.managed_dirs());

    let mut edited = reparsed;
    add_include_if_in(&mut edited, "/fuzz/work", "/fuzz/config/git/work.gitconfig");
    assert!(edited.managed_dirs().contains(&"/fuzz/work/".to_string()));
    assert!(!add_include_if_in(
        &mut edited,
        "/fuzz/work",
        "/fuzz/config/git/work.gitconfig"
    ));
    assert!(remove_include_if_in(&mut edited, "/fuzz/work"));
    assert!(!edited.managed_dirs().contains(&"/fuzz/work/".to_string()));
});
