#![no_main]
use libfuzzer_sys::fuzz_target;
use scriptorium_core::graph::topological_order;
use scriptorium_core::segment::segment;
use scriptorium_core::validator::FormulaValidator;
use scriptorium_math::extract_formulas;
use scriptorium_syntax::{parse, strip_comments};

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let _ = parse(&s);
    let stripped = strip_comments(&s);

    // Positions must stay on char boundaries of the text they index.
    for formula in extract_formulas(&stripped) {
        assert!(stripped.is_char_boundary(formula.position));
    }

    let doc = segment("fuzz.tex", &stripped);
    let _ = topological_order(&doc);
    let _ = FormulaValidator::default().validate_texts(&s, &stripped);
    let _ = doc.assemble();
});
