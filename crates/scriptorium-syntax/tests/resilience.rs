use scriptorium_syntax::{SyntaxKind, outline, parse, strip_comments};

#[test]
fn test_incomplete_environment() {
    let input = "\\begin{itemize";
    let root = parse(input).syntax();
    assert_eq!(root.kind(), SyntaxKind::Root);
    assert_eq!(root.text().to_string(), input);
}

#[test]
fn test_incomplete_heading_group() {
    let input = "\\section{Hello";
    let root = parse(input).syntax();
    assert_eq!(u32::from(root.text_range().len()), input.len() as u32);
    assert!(outline::headings(&root).is_empty());
}

#[test]
fn test_stray_braces() {
    let root = parse("\\} \\{ } {").syntax();
    assert_eq!(root.kind(), SyntaxKind::Root);
}

#[test]
fn test_garbage_never_panics() {
    let inputs = [
        "",
        "\\",
        "$$$",
        "%",
        "\\section*",
        "\\section*[",
        "\\input{",
        "]]]][[[",
        "\\begin{\\end{",
    ];
    for input in inputs {
        let root = parse(input).syntax();
        assert_eq!(root.text().to_string(), input);
        let _ = outline::headings(&root);
        let _ = outline::includes(&root);
        let _ = strip_comments(input);
    }
}
