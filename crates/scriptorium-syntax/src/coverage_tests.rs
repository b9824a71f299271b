use crate::lexer::Lexer;
use crate::outline::{headings, includes};
use crate::parser::parse;
use crate::SyntaxKind;

#[test]
fn test_lexer_offset_tracks_bytes() {
    let mut lexer = Lexer::new("é$");
    lexer.next_token();
    assert_eq!(lexer.offset(), 2);
    assert_eq!(lexer.next_token(), (SyntaxKind::Dollar, "$"));
}

#[test]
fn test_parser_unclosed_environment() {
    let res = parse(r"\begin{document} Hello");
    assert_eq!(res.errors[0].message, "Unclosed environment, expected \\end");
}

#[test]
fn test_parser_missing_brace_after_begin() {
    let res = parse(r"\begin document}");
    assert!(res.errors[0].message.contains("Expected '{'"));
}

#[test]
fn test_parser_unmatched_rbrace_in_env() {
    let res = parse(r"\begin{a} } \end{a}");
    assert_eq!(res.errors[0].message, "Unmatched '}' inside environment");
}

#[test]
fn test_parser_unclosed_optional() {
    let res = parse(r"\section[short");
    assert!(res.errors.iter().any(|e| e.message == "Expected ']'"));
}

#[test]
fn test_include_missing_brace() {
    let res = parse(r"\input file}");
    assert!(!res.errors.is_empty());
    assert!(includes(&res.syntax()).is_empty());
}

#[test]
fn test_stray_end_at_top_level_is_plain_command() {
    let res = parse(r"\end{document} after \section{Late}");
    assert!(res.errors.is_empty());
    assert_eq!(headings(&res.syntax()).len(), 1);
}

#[test]
fn test_headings_after_unclosed_environment_are_still_found() {
    let res = parse(r"\begin{figure} \section{A} text \section{B}");
    let found = headings(&res.syntax());
    assert_eq!(found.len(), 2);
}

#[test]
fn test_include_inside_group() {
    let res = parse(r"{\input{nested}}");
    let found = includes(&res.syntax());
    assert_eq!(found[0].target, "nested");
}

#[test]
fn test_math_environments_keep_dollars_flat() {
    let res = parse(r"\begin{align} a &= $b$ \end{align}");
    let env = res.syntax().children().next().unwrap();
    let dollars = env
        .children_with_tokens()
        .filter(|el| el.kind() == SyntaxKind::Dollar)
        .count();
    assert_eq!(dollars, 2);
}
