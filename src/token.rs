use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

/// Statement-introducing and clause-delimiting words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Tuna,
    TunaMayo,
    Return,
    MustardLeaf,
    Explode,
    Twist,
    Plummet,
    CoughSyrup,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Tuna => "Tuna",
            Keyword::TunaMayo => "Tuna_Mayo",
            Keyword::Return => "Return",
            Keyword::MustardLeaf => "Mustard_Leaf",
            Keyword::Explode => "Explode",
            Keyword::Twist => "Twist",
            Keyword::Plummet => "Plummet",
            Keyword::CoughSyrup => "Cough_Syrup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind<'a> {
    Identifier(&'a str),
    Keyword(Keyword),
    Number(f64),
    Str(&'a str),
    Boolean(bool),

    // Operators
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    Percent,   // %
    EqEq,      // ==
    NotEq,     // !=
    Less,      // <
    Greater,   // >
    LessEq,    // <=
    GreaterEq, // >=
    And,       // and
    Or,        // or
    Not,       // not

    // Delimiters
    LParen,   // (
    RParen,   // )
    LBrace,   // {
    RBrace,   // }
    LBracket, // [
    RBracket, // ]
    Dot,      // .
    Comma,    // ,
    Colon,    // :

    Eof,
}

impl<'a> TokenKind<'a> {
    /// Human-readable rendering used by parse errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier(name) => format!("identifier '{name}'"),
            TokenKind::Keyword(keyword) => format!("keyword '{}'", keyword.as_str()),
            TokenKind::Number(value) => format!("number {value}"),
            TokenKind::Str(value) => format!("string '{value}'"),
            TokenKind::Boolean(true) => "'Salmon'".to_string(),
            TokenKind::Boolean(false) => "'Bonito_Flakes'".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Percent => "'%'".to_string(),
            TokenKind::EqEq => "'=='".to_string(),
            TokenKind::NotEq => "'!='".to_string(),
            TokenKind::Less => "'<'".to_string(),
            TokenKind::Greater => "'>'".to_string(),
            TokenKind::LessEq => "'<='".to_string(),
            TokenKind::GreaterEq => "'>='".to_string(),
            TokenKind::And => "'and'".to_string(),
            TokenKind::Or => "'or'".to_string(),
            TokenKind::Not => "'not'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind<'a>, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Word tables of the language: keywords and boolean literal spellings.
///
/// Built once and handed to the scanner instead of living in process-wide
/// statics, so every consumer sees the same immutable tables.
#[derive(Debug, Clone)]
pub struct Lexicon {
    keywords: HashMap<&'static str, Keyword>,
    booleans: HashMap<&'static str, bool>,
}

impl Lexicon {
    pub fn new() -> Self {
        let keywords = [
            Keyword::Tuna,
            Keyword::TunaMayo,
            Keyword::Return,
            Keyword::MustardLeaf,
            Keyword::Explode,
            Keyword::Twist,
            Keyword::Plummet,
            Keyword::CoughSyrup,
        ]
        .into_iter()
        .map(|keyword| (keyword.as_str(), keyword))
        .collect();
        let booleans = HashMap::from([("Salmon", true), ("Bonito_Flakes", false)]);
        Self { keywords, booleans }
    }

    pub fn keyword(&self, word: &str) -> Option<Keyword> {
        self.keywords.get(word).copied()
    }

    pub fn boolean(&self, word: &str) -> Option<bool> {
        self.booleans.get(word).copied()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_resolves_keywords_and_booleans() {
        let lexicon = Lexicon::new();
        assert_eq!(lexicon.keyword("Tuna_Mayo"), Some(Keyword::TunaMayo));
        assert_eq!(lexicon.keyword("Salmon"), None);
        assert_eq!(lexicon.boolean("Salmon"), Some(true));
        assert_eq!(lexicon.boolean("Bonito_Flakes"), Some(false));
        assert_eq!(lexicon.boolean("Tuna"), None);
    }
}
