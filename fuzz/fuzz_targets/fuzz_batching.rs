#![no_main]

use arbitrary::Arbitrary;
use compound_query::{batch_count, Batches};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    identifiers: Vec<String>,
    max_batch_size: u8,
}

fuzz_target!(|input: Input| {
    let size = input.max_batch_size as usize + 1;
    let batches: Vec<_> = Batches::new(&input.identifiers, size).collect();

    assert_eq!(batches.len(), batch_count(input.identifiers.len(), size));
    assert!(batches.iter().all(|b| !b.identifiers.is_empty() && b.identifiers.len() <= size));

    let rejoined: Vec<&String> = batches.iter().flat_map(|b| b.identifiers).collect();
    assert_eq!(rejoined, input.identifiers.iter().collect::<Vec<_>>());
});
