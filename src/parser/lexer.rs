//! Lexer for Mustache tag syntax using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

fn tag_body(slice: &str, sigil: usize) -> String {
    slice[sigil..slice.len() - 2].trim().to_string()
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Chunk {
    // Sigil tags. The inner `([^}]|\}[^}])*` lets a lone `}` appear in the
    // body without terminating the tag.
    #[regex(r"\{\{#([^}]|\}[^}])*\}\}", |lex| tag_body(lex.slice(), 3), priority = 6)]
    SectionOpen(String),

    #[regex(r"\{\{\^([^}]|\}[^}])*\}\}", |lex| tag_body(lex.slice(), 3), priority = 6)]
    InvertedOpen(String),

    #[regex(r"\{\{/([^}]|\}[^}])*\}\}", |lex| tag_body(lex.slice(), 3), priority = 6)]
    SectionClose(String),

    #[regex(r"\{\{>([^}]|\}[^}])*\}\}", |lex| tag_body(lex.slice(), 3), priority = 6)]
    Partial(String),

    #[regex(r"\{\{&([^}]|\}[^}])*\}\}", |lex| tag_body(lex.slice(), 3), priority = 6)]
    Ampersand(String),

    // Comments (skip)
    #[regex(r"\{\{!([^}]|\}[^}])*\}\}", logos::skip, priority = 6)]
    Comment,

    // Triple mustache, unescaped interpolation
    #[regex(r"\{\{\{[^}]*\}\}\}", |lex| {
        let s = lex.slice();
        s[3..s.len() - 3].trim().to_string()
    }, priority = 8)]
    Triple(String),

    // Plain interpolation - must yield to the sigil forms above
    #[regex(r"\{\{([^}]|\}[^}])*\}\}", |lex| tag_body(lex.slice(), 2), priority = 4)]
    Variable(String),

    // An opening `{{` whose tag never closes
    #[regex(r"\{\{([^}]|\}[^}])*\}?", priority = 2)]
    Unterminated,

    // Literal text. A `{` not followed by another `{` is ordinary text.
    #[regex(r"[^{]+", |lex| lex.slice().to_string())]
    #[regex(r"\{[^{]*", |lex| lex.slice().to_string())]
    Text(String),
}

/// Lex template source into chunks with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Chunk, Span)> + '_ {
    Chunk::lexer(input)
        .spanned()
        .filter_map(|(chunk, span)| chunk.ok().map(|c| (c, span)))
}
