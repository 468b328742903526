#![no_main]

use compound_query::{check_fragment, FilterExpression, Placeholder, QueryShape, StatementTemplate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (ignore invalid UTF-8)
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Checking must never panic
    let Ok(filter) = FilterExpression::parse(text) else {
        return;
    };

    // An accepted filter wrapped in its slot must still be one
    // self-contained fragment
    let shape = QueryShape::new("MOLECULE", "MOL_REGID");
    let template = StatementTemplate::new(&shape, &filter, Placeholder::QuestionNumbered)
        .expect("fixed shape is valid");
    let sql = template.render(3);
    assert!(check_fragment(&sql).is_ok(), "escaped slot: {}", sql);
});
