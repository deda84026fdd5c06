//! Lexer for the cQASM 3 subset (`version`, registers, gate calls with
//! modifiers, measure/reset/barrier/wait, `asm` passthrough).

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    #[token("version")]
    Version,

    #[token("qubit")]
    Qubit,

    #[token("bit")]
    Bit,

    #[token("measure")]
    Measure,

    #[token("reset")]
    Reset,

    #[token("init")]
    InitKw,

    #[token("barrier")]
    Barrier,

    #[token("wait")]
    Wait,

    #[token("asm")]
    Asm,

    #[token("ctrl")]
    Ctrl,

    #[token("negctrl")]
    NegCtrl,

    #[token("inv")]
    Inv,

    #[token("pow")]
    Pow,

    #[token("pi")]
    Pi,

    #[token("tau")]
    Tau,

    #[token("euler")]
    Euler,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    #[regex(r#""""[\s\S]*?""""#, |lex| {
        let s = lex.slice();
        Some(s[3..s.len()-3].to_string())
    }, priority = 3)]
    TripleQuoted(String),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    StringLiteral(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("**")]
    Power,

    #[token("->")]
    Arrow,

    #[token("=")]
    Eq,

    #[token("@")]
    At,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Version => write!(f, "version"),
            Token::Qubit => write!(f, "qubit"),
            Token::Bit => write!(f, "bit"),
            Token::Measure => write!(f, "measure"),
            Token::Reset => write!(f, "reset"),
            Token::InitKw => write!(f, "init"),
            Token::Barrier => write!(f, "barrier"),
            Token::Wait => write!(f, "wait"),
            Token::Asm => write!(f, "asm"),
            Token::Ctrl => write!(f, "ctrl"),
            Token::NegCtrl => write!(f, "negctrl"),
            Token::Inv => write!(f, "inv"),
            Token::Pow => write!(f, "pow"),
            Token::Pi => write!(f, "pi"),
            Token::Tau => write!(f, "tau"),
            Token::Euler => write!(f, "euler"),
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::TripleQuoted(s) => write!(f, "\"\"\"{s}\"\"\""),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Power => write!(f, "**"),
            Token::Arrow => write!(f, "->"),
            Token::Eq => write!(f, "="),
            Token::At => write!(f, "@"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Semicolon => write!(f, ";"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    #[allow(dead_code)]
    pub span: std::ops::Range<usize>,
}

/// Tokenizes a cQASM 3 source string.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, (std::ops::Range<usize>, String)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push(Ok(SpannedToken { token, span })),
            Err(()) => {
                let slice = &source[span.clone()];
                tokens.push(Err((span, format!("invalid token: '{slice}'"))));
            }
        }
    }

    tokens
}
