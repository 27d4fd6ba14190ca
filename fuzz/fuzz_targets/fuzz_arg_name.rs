#![no_main]
use libfuzzer_sys::fuzz_target;
use mistlog::fmt::{Args, Registry, read_arg_name};

fuzz_target!(|data: &str| {
    let (_, consumed) = read_arg_name(data);
    assert!(consumed <= data.len());
    assert!(data.is_char_boundary(consumed));

    // Every name read must move the cursor forward, values read or not
    let registry = Registry::empty();
    let mut args = Args::new(data, &registry);
    let mut left = args.remaining().len();
    while args.next_name().is_some() {
        let now = args.remaining().len();
        assert!(now < left);
        left = now;
    }
});
