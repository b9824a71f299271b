use crate::{SyntaxKind, SyntaxNode, lexer::Lexer};
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};
use std::iter::Peekable;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

/// Heading commands and their nesting depth.
pub const HEADING_COMMANDS: [(&str, u8); 3] = [
    ("\\section", 1),
    ("\\subsection", 2),
    ("\\subsubsection", 3),
];

/// Commands that splice another file into the document.
pub const INCLUDE_COMMANDS: [&str; 2] = ["\\input", "\\include"];

enum CommandClass {
    Begin,
    Heading,
    Include,
    Other,
}

fn classify(command: &str) -> CommandClass {
    if command == "\\begin" {
        CommandClass::Begin
    } else if HEADING_COMMANDS.iter().any(|(name, _)| *name == command) {
        CommandClass::Heading
    } else if INCLUDE_COMMANDS.contains(&command) {
        CommandClass::Include
    } else {
        CommandClass::Other
    }
}

pub struct Parser<'a> {
    lexer: Peekable<Lexer<'a>>,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
    current_offset: TextSize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input).peekable(),
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            current_offset: TextSize::from(0),
        }
    }

    pub fn parse(mut self) -> ParseResult {
        self.builder.start_node(SyntaxKind::Root.into());
        while self.peek() != SyntaxKind::Eof {
            self.parse_element();
        }
        self.builder.finish_node();
        ParseResult {
            green_node: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn peek(&mut self) -> SyntaxKind {
        self.lexer
            .peek()
            .map(|(k, _)| *k)
            .unwrap_or(SyntaxKind::Eof)
    }

    fn peek_text(&mut self) -> &str {
        self.lexer.peek().map(|(_, t)| *t).unwrap_or("")
    }

    fn bump(&mut self) {
        if let Some((kind, text)) = self.lexer.next() {
            self.builder.token(kind.into(), text);
            self.current_offset += TextSize::of(text);
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let start = self.current_offset;
        let len = TextSize::of(self.peek_text());
        self.errors.push(SyntaxError {
            message: message.into(),
            range: TextRange::at(start, len),
        });
    }

    fn stray_closer(&mut self, message: &str) {
        self.error(message);
        self.builder.start_node(SyntaxKind::Error.into());
        self.bump();
        self.builder.finish_node();
    }

    fn parse_element(&mut self) {
        match self.peek() {
            SyntaxKind::Command => self.parse_command(),
            SyntaxKind::LBrace => self.parse_group(),
            SyntaxKind::RBrace => self.stray_closer("Unmatched '}'"),
            SyntaxKind::Eof => {}
            _ => self.bump(),
        }
    }

    fn parse_command(&mut self) {
        match classify(self.peek_text()) {
            CommandClass::Begin => self.parse_environment(),
            CommandClass::Heading => self.parse_heading(),
            CommandClass::Include => self.parse_include(),
            CommandClass::Other => self.bump(),
        }
    }

    fn parse_group(&mut self) {
        self.builder.start_node(SyntaxKind::Group.into());
        self.bump(); // '{'

        while !matches!(self.peek(), SyntaxKind::Eof | SyntaxKind::RBrace) {
            self.parse_element();
        }

        if self.peek() == SyntaxKind::RBrace {
            self.bump();
        } else {
            self.error("Expected '}'");
        }
        self.builder.finish_node();
    }

    fn parse_optional(&mut self) {
        self.builder.start_node(SyntaxKind::Optional.into());
        self.bump(); // '['

        loop {
            match self.peek() {
                SyntaxKind::RBracket => {
                    self.bump();
                    break;
                }
                SyntaxKind::Eof => {
                    self.error("Expected ']'");
                    break;
                }
                SyntaxKind::RBrace => self.stray_closer("Unmatched '}' inside optional argument"),
                _ => self.parse_element(),
            }
        }
        self.builder.finish_node();
    }

    fn parse_include(&mut self) {
        self.builder.start_node(SyntaxKind::Include.into());
        self.bump();

        if self.peek() == SyntaxKind::LBrace {
            self.parse_group();
        } else {
            self.error("Expected '{' after include command");
        }

        self.builder.finish_node();
    }

    /// `\section*[short]{Title}`: the star and the optional argument must
    /// follow the command directly, as must the title group.
    fn parse_heading(&mut self) {
        self.builder.start_node(SyntaxKind::Heading.into());
        self.bump();

        if self.peek() == SyntaxKind::Star {
            self.bump();
        }
        if self.peek() == SyntaxKind::LBracket {
            self.parse_optional();
        }
        if self.peek() == SyntaxKind::LBrace {
            self.parse_group();
        } else {
            self.error("Expected '{' after heading command");
        }

        self.builder.finish_node();
    }

    fn parse_environment(&mut self) {
        self.builder.start_node(SyntaxKind::Environment.into());
        self.bump(); // \begin

        if self.peek() == SyntaxKind::LBrace {
            self.parse_group();
        } else {
            self.error("Expected '{' after \\begin");
        }

        loop {
            match self.peek() {
                SyntaxKind::Eof => {
                    self.error("Unclosed environment, expected \\end");
                    break;
                }
                SyntaxKind::Command if self.peek_text() == "\\end" => {
                    self.bump();
                    if self.peek() == SyntaxKind::LBrace {
                        self.parse_group();
                    } else {
                        self.error("Expected '{' after \\end");
                    }
                    break;
                }
                SyntaxKind::RBrace => self.stray_closer("Unmatched '}' inside environment"),
                _ => self.parse_element(),
            }
        }

        self.builder.finish_node();
    }
}

pub struct ParseResult {
    pub green_node: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green_node.clone())
    }
}

pub fn parse(input: &str) -> ParseResult {
    Parser::new(input).parse()
}
