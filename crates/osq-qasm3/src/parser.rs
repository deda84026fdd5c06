//! Recursive-descent parser for the cQASM 3 subset, producing an AST
//! [`Program`]. Lowering the AST into a `Circuit` is `reader::read`'s job,
//! not the parser's — this module only turns text into structure.

use crate::ast::{BinOp, BitRef, Expression, GateCall, GateModifier, Program, QubitRef, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{tokenize, SpannedToken, Token};

/// Parses a cQASM 3 source string into an AST.
pub fn parse(source: &str) -> ParseResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    line: usize,
}

#[allow(clippy::cast_possible_truncation, clippy::unnecessary_wraps)]
impl Parser {
    fn new(source: &str) -> ParseResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, message)) => {
                    return Err(ParseError::LexerError { position: span.start, message })
                }
            }
        }
        Ok(Parser { tokens, pos: 0, line: 1 })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<Token> {
        if self.is_eof() {
            return None;
        }
        let token = self.tokens[self.pos].token.clone();
        self.pos += 1;
        Some(token)
    }

    fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let found = self.advance().ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;
        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(ParseError::UnexpectedToken {
                line: self.line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        self.peek().is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_program(&mut self) -> ParseResult<Program> {
        self.expect(Token::Version)?;
        let version = self.parse_version()?;
        self.expect(Token::Semicolon)?;

        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { version, statements })
    }

    fn parse_version(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::FloatLiteral(v)) => Ok(format!("{v}")),
            Some(Token::IntLiteral(v)) => Ok(format!("{v}.0")),
            Some(other) => Err(ParseError::InvalidVersion(other.to_string())),
            None => Err(ParseError::UnexpectedEof("version number".into())),
        }
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self.peek().cloned().ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        match token {
            Token::Qubit => self.parse_qubit_decl(),
            Token::Bit => self.parse_bit_decl(),
            Token::Measure => self.parse_measure(),
            Token::Reset => self.parse_reset(),
            Token::InitKw => self.parse_init(),
            Token::Barrier => self.parse_barrier(),
            Token::Wait => self.parse_wait(),
            Token::Asm => self.parse_asm(),
            Token::Ctrl | Token::NegCtrl | Token::Inv | Token::Pow => self.parse_modified_gate_call(),
            Token::Identifier(_) => self.parse_identifier_statement(),
            _ => Err(ParseError::UnexpectedToken { line: self.line, expected: "statement".into(), found: token.to_string() }),
        }
    }

    fn parse_qubit_decl(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Qubit)?;
        let size = self.parse_optional_bracketed_size()?;
        let name = self.parse_identifier()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::QubitDecl { name, size })
    }

    fn parse_bit_decl(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Bit)?;
        let size = self.parse_optional_bracketed_size()?;
        let name = self.parse_identifier()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::BitDecl { name, size })
    }

    fn parse_optional_bracketed_size(&mut self) -> ParseResult<Option<u32>> {
        if self.consume(&Token::LBracket) {
            let size = self.parse_int_literal()? as u32;
            self.expect(Token::RBracket)?;
            Ok(Some(size))
        } else {
            Ok(None)
        }
    }

    fn parse_measure(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Measure)?;
        let qubits = self.parse_qubit_refs()?;
        let bits = if self.consume(&Token::Arrow) { self.parse_bit_refs()? } else { vec![] };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure { qubits, bits })
    }

    fn parse_reset(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Reset)?;
        let qubits = self.parse_qubit_refs()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Reset { qubits })
    }

    fn parse_init(&mut self) -> ParseResult<Statement> {
        self.expect(Token::InitKw)?;
        let qubits = self.parse_qubit_refs()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Init { qubits })
    }

    fn parse_barrier(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Barrier)?;
        let qubits = if self.check(&Token::Semicolon) { vec![] } else { self.parse_qubit_refs()? };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Barrier { qubits })
    }

    fn parse_wait(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Wait)?;
        self.expect(Token::LParen)?;
        let cycles = self.parse_expression()?;
        self.expect(Token::RParen)?;
        let qubits = self.parse_qubit_refs()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Wait { cycles, qubits })
    }

    fn parse_asm(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Asm)?;
        self.expect(Token::LParen)?;
        let backend_name = self.parse_identifier()?;
        self.expect(Token::RParen)?;
        let payload = match self.advance() {
            Some(Token::TripleQuoted(s) | Token::StringLiteral(s)) => s,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    line: self.line,
                    expected: "asm payload string".into(),
                    found: other.to_string(),
                })
            }
            None => return Err(ParseError::UnexpectedEof("asm payload".into())),
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::AsmDeclaration { backend_name, payload })
    }

    /// Parses one or more leading `ctrl`/`negctrl`/`inv`/`pow` modifiers
    /// (`mod @ mod @ … @ name ...;`), then the gate call they apply to.
    fn parse_modified_gate_call(&mut self) -> ParseResult<Statement> {
        let mut modifiers = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Ctrl) => {
                    self.advance();
                    let count = self.parse_optional_paren_u32()?;
                    self.expect(Token::At)?;
                    modifiers.push(GateModifier::Ctrl(count));
                }
                Some(Token::NegCtrl) => {
                    self.advance();
                    let count = self.parse_optional_paren_u32()?;
                    self.expect(Token::At)?;
                    modifiers.push(GateModifier::NegCtrl(count));
                }
                Some(Token::Inv) => {
                    self.advance();
                    self.expect(Token::At)?;
                    modifiers.push(GateModifier::Inv);
                }
                Some(Token::Pow) => {
                    self.advance();
                    self.expect(Token::LParen)?;
                    let exponent = self.parse_expression()?;
                    self.expect(Token::RParen)?;
                    self.expect(Token::At)?;
                    modifiers.push(GateModifier::Pow(exponent));
                }
                _ => break,
            }
        }
        let name = self.parse_identifier()?;
        self.parse_gate_call_tail(name, modifiers)
    }

    fn parse_optional_paren_u32(&mut self) -> ParseResult<Option<u32>> {
        if self.consume(&Token::LParen) {
            let n = self.parse_int_literal()? as u32;
            self.expect(Token::RParen)?;
            Ok(Some(n))
        } else {
            Ok(None)
        }
    }

    /// An identifier at statement position is either a gate call or the
    /// target of a `c = measure q;` assignment.
    fn parse_identifier_statement(&mut self) -> ParseResult<Statement> {
        let name = self.parse_identifier()?;
        if self.check(&Token::LBracket) || self.check(&Token::Eq) {
            return self.parse_measure_assignment(name);
        }
        self.parse_gate_call_tail(name, vec![])
    }

    fn parse_measure_assignment(&mut self, target: String) -> ParseResult<Statement> {
        let index = if self.consume(&Token::LBracket) {
            let idx = self.parse_int_literal()? as u32;
            self.expect(Token::RBracket)?;
            Some(idx)
        } else {
            None
        };
        self.expect(Token::Eq)?;
        self.expect(Token::Measure)?;
        let qubits = self.parse_qubit_refs()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure { qubits, bits: vec![BitRef::Single { register: target, index }] })
    }

    fn parse_gate_call_tail(&mut self, name: String, modifiers: Vec<GateModifier>) -> ParseResult<Statement> {
        let params = if self.consume(&Token::LParen) {
            let p = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };
        let qubits = self.parse_qubit_refs()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Gate(GateCall { name, params, qubits, modifiers }))
    }

    fn parse_qubit_refs(&mut self) -> ParseResult<Vec<QubitRef>> {
        let mut refs = vec![self.parse_qubit_ref()?];
        while self.consume(&Token::Comma) {
            refs.push(self.parse_qubit_ref()?);
        }
        Ok(refs)
    }

    fn parse_qubit_ref(&mut self) -> ParseResult<QubitRef> {
        let register = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let start = self.parse_int_literal()? as u32;
            let result = if self.consume(&Token::Colon) {
                let end = self.parse_int_literal()? as u32;
                QubitRef::Range { register, start, end }
            } else {
                QubitRef::Single { register, index: Some(start) }
            };
            self.expect(Token::RBracket)?;
            Ok(result)
        } else {
            Ok(QubitRef::Single { register, index: None })
        }
    }

    fn parse_bit_refs(&mut self) -> ParseResult<Vec<BitRef>> {
        let mut refs = vec![self.parse_bit_ref()?];
        while self.consume(&Token::Comma) {
            refs.push(self.parse_bit_ref()?);
        }
        Ok(refs)
    }

    fn parse_bit_ref(&mut self) -> ParseResult<BitRef> {
        let register = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let start = self.parse_int_literal()? as u32;
            let result = if self.consume(&Token::Colon) {
                let end = self.parse_int_literal()? as u32;
                BitRef::Range { register, start, end }
            } else {
                BitRef::Single { register, index: Some(start) }
            };
            self.expect(Token::RBracket)?;
            Ok(result)
        } else {
            Ok(BitRef::Single { register, index: None })
        }
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_expr(0)
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expr()?;
        while let Some(op) = self.peek_binary_op() {
            let prec = op_precedence(op);
            if prec < min_prec {
                break;
            }
            self.advance();
            let right = self.parse_binary_expr(prec + 1)?;
            left = Expression::BinOp { left: Box::new(left), op, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expression> {
        if self.consume(&Token::Minus) {
            return Ok(Expression::Neg(Box::new(self.parse_unary_expr()?)));
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Expression> {
        let token = self.peek().cloned().ok_or_else(|| ParseError::UnexpectedEof("expression".into()))?;
        match token {
            Token::IntLiteral(v) => {
                self.advance();
                Ok(Expression::Int(v as i64))
            }
            Token::FloatLiteral(v) => {
                self.advance();
                Ok(Expression::Float(v))
            }
            Token::Pi => {
                self.advance();
                Ok(Expression::Pi)
            }
            Token::Tau => {
                self.advance();
                Ok(Expression::Tau)
            }
            Token::Euler => {
                self.advance();
                Ok(Expression::Euler)
            }
            Token::Identifier(name) => {
                self.advance();
                if self.consume(&Token::LParen) {
                    let args = self.parse_expression_list()?;
                    self.expect(Token::RParen)?;
                    Ok(Expression::FnCall { name, args })
                } else {
                    Err(ParseError::UndefinedIdentifier(name))
                }
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(Expression::Paren(Box::new(expr)))
            }
            _ => Err(ParseError::UnexpectedToken { line: self.line, expected: "expression".into(), found: token.to_string() }),
        }
    }

    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Percent => Some(BinOp::Mod),
            Token::Power => Some(BinOp::Pow),
            _ => None,
        }
    }

    fn parse_expression_list(&mut self) -> ParseResult<Vec<Expression>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            Some(other) => Err(ParseError::UnexpectedToken { line: self.line, expected: "identifier".into(), found: other.to_string() }),
            None => Err(ParseError::UnexpectedEof("identifier".into())),
        }
    }

    fn parse_int_literal(&mut self) -> ParseResult<u64> {
        match self.advance() {
            Some(Token::IntLiteral(v)) => Ok(v),
            Some(other) => Err(ParseError::UnexpectedToken { line: self.line, expected: "integer".into(), found: other.to_string() }),
            None => Err(ParseError::UnexpectedEof("integer".into())),
        }
    }
}

fn op_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => 1,
        BinOp::Mul | BinOp::Div | BinOp::Mod => 2,
        BinOp::Pow => 3,
    }
}
