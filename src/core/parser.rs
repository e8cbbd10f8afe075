use std::cell::{Cell, RefCell};

use super::{
    Block, Condition, Decl, Expr, Result, SymbolTable, TinyError, Token, TokenType, TraceEvent,
    Type, Value,
};

/// Parses a series of Tokens with one token of lookahead, either evaluating
/// as it goes or building a syntax tree for a later interpretation pass.
///
/// `Parser` implements the tiny language grammar:
///
/// ```notrust
/// prog       → let_in_end* EOF ;
/// let_in_end → "let" decl_list "in" type "(" expr ")" "end" ";" ;
/// decl_list  → decl decl* ;
/// decl       → IDENTIFIER ":" type "=" expr ";" ;
/// type       → "int" | "real" ;
/// expr       → term ( ( "+" | "-" ) term )*
///            | "if" cond "then" expr "else" expr ;
/// term       → factor ( ( "*" | "/" ) factor )* ;
/// factor     → "(" expr ")" | IDENTIFIER | NUMBER | type "(" expr ")" ;
/// cond       → factor ( "<" | "<=" | ">" | ">=" | "==" | "<>" ) factor ;
/// ```
///
/// The grammar is LL(1): every production is chosen by inspecting the
/// lookahead alone, and no rule re-inspects a token another rule consumed.
/// `cond` operands really are single factors, not full expressions.
///
/// There is no error recovery. The first token that doesn't fit aborts the
/// whole parse, and any blocks not yet reached stay unevaluated.
pub struct Parser {
    tokens: Vec<Token>,
    /// cursor is an implementation detail end users shouldn't worry about.
    /// Use interior mutability here to avoid forcing the user to hold a
    /// mutable Parser.
    cursor: Cell<usize>,
    /// Declarations live here for the lifetime of the run, shared by every
    /// block this parser processes. A fresh parser starts empty.
    table: RefCell<SymbolTable>,
    tracer: Option<Box<dyn Fn(TraceEvent)>>,
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            cursor: Cell::new(0),
            table: RefCell::new(SymbolTable::new()),
            tracer: None,
        }
    }

    /// Like `new`, but `tracer` is invoked at every grammar-rule entry and
    /// exit. The parser itself never prints; the tracer decides what to do
    /// with the events.
    #[must_use]
    pub fn with_tracer(tokens: Vec<Token>, tracer: Box<dyn Fn(TraceEvent)>) -> Self {
        Parser {
            tokens,
            cursor: Cell::new(0),
            table: RefCell::new(SymbolTable::new()),
            tracer: Some(tracer),
        }
    }

    /// Parses and evaluates a whole program, producing one value per
    /// `let ... in ... end` block, in source order.
    ///
    /// Evaluation happens during the parse: declarations update the symbol
    /// table the moment their semicolon is consumed, and each block's body
    /// is computed with whatever the table holds at that point.
    pub fn parse_program(self) -> Result<Vec<Value>> {
        self.trace(TraceEvent::Enter("prog"));
        let mut results = Vec::new();

        while self.match_token(TokenType::Let) {
            results.push(self.let_in_end()?);
        }
        self.expect_consumed()?;

        self.trace(TraceEvent::Exit("prog"));
        Ok(results)
    }

    /// Parses a whole program without evaluating it, producing one syntax
    /// tree per block.
    ///
    /// Token consumption is identical to `parse_program`, but identifiers
    /// are not resolved and division is not checked; both become the
    /// interpreter's concern.
    pub fn parse_blocks(self) -> Result<Vec<Block>> {
        self.trace(TraceEvent::Enter("prog"));
        let mut blocks = Vec::new();

        while self.match_token(TokenType::Let) {
            blocks.push(self.block()?);
        }
        self.expect_consumed()?;

        self.trace(TraceEvent::Exit("prog"));
        Ok(blocks)
    }

    /// Everything after the last block must be the Eof sentinel.
    fn expect_consumed(&self) -> Result<()> {
        match self.peek() {
            Some(trailing) if trailing.token_type != TokenType::Eof => Err(
                TinyError::UnexpectedToken("let".to_owned(), trailing.clone()),
            ),
            _ => Ok(()),
        }
    }

    fn let_in_end(&self) -> Result<Value> {
        self.trace(TraceEvent::Enter("let_in_end"));
        self.decl_list()?;
        self.consume(TokenType::In)?;
        // The block's declared result type is parsed but never coerces the
        // emitted value; only explicit casts convert.
        self.type_name()?;
        self.consume(TokenType::LeftParen)?;
        let result = self.expr()?;
        self.consume(TokenType::RightParen)?;
        self.consume(TokenType::End)?;
        self.consume(TokenType::Semicolon)?;
        self.trace(TraceEvent::Exit("let_in_end"));

        Ok(result)
    }

    fn decl_list(&self) -> Result<()> {
        self.decl()?;
        while self.check(TokenType::Identifier) {
            self.decl()?;
        }

        Ok(())
    }

    fn decl(&self) -> Result<()> {
        self.trace(TraceEvent::Enter("decl"));
        let name = self.consume(TokenType::Identifier)?;
        self.consume(TokenType::Colon)?;
        let declared_type = self.type_name()?;
        self.consume(TokenType::Assign)?;
        // The right-hand side sees the table as it exists right now, so
        // later declarations may reference earlier ones but not vice versa.
        let value = self.expr()?;
        self.consume(TokenType::Semicolon)?;
        self.table
            .borrow_mut()
            .define(name.lexeme.to_string(), declared_type, value);
        self.trace(TraceEvent::Exit("decl"));

        Ok(())
    }

    fn type_name(&self) -> Result<Type> {
        if self.match_token(TokenType::Int) {
            Ok(Type::Int)
        } else if self.match_token(TokenType::Real) {
            Ok(Type::Real)
        } else {
            Err(self.mismatch("int or real"))
        }
    }

    fn expr(&self) -> Result<Value> {
        self.trace(TraceEvent::Enter("expr"));
        let result = if self.match_token(TokenType::If) {
            self.if_expr()?
        } else {
            let mut result = self.term()?;
            while self.match_tokens(&[TokenType::Plus, TokenType::Minus]) {
                let operator = self.previous();
                let right = self.term()?;
                result = if operator.token_type == TokenType::Plus {
                    result.add(right)?
                } else {
                    result.sub(right)?
                };
            }
            result
        };
        self.trace(TraceEvent::Exit("expr"));

        Ok(result)
    }

    fn term(&self) -> Result<Value> {
        self.trace(TraceEvent::Enter("term"));
        let mut result = self.factor()?;

        while self.match_tokens(&[TokenType::Star, TokenType::Slash]) {
            let operator = self.previous();
            let right = self.factor()?;
            result = if operator.token_type == TokenType::Star {
                result.mul(right)?
            } else {
                result.div(right)?
            };
        }
        self.trace(TraceEvent::Exit("term"));

        Ok(result)
    }

    fn factor(&self) -> Result<Value> {
        self.trace(TraceEvent::Enter("factor"));
        let value = if self.match_token(TokenType::LeftParen) {
            let value = self.expr()?;
            self.consume(TokenType::RightParen)?;
            value
        } else if self.match_token(TokenType::Identifier) {
            let name = self.previous();
            self.table.borrow().get(&name.lexeme)?.value
        } else if self.match_token(TokenType::Number) {
            Value::from_lexeme(&self.previous().lexeme)?
        } else if self.match_token(TokenType::Int) {
            self.cast(Type::Int)?
        } else if self.match_token(TokenType::Real) {
            self.cast(Type::Real)?
        } else {
            return Err(TinyError::ExpectedExpression(self.peek().unwrap().clone()));
        };
        self.trace(TraceEvent::Exit("factor"));

        Ok(value)
    }

    /// The parenthesized remainder of an explicit cast; the type keyword has
    /// already been consumed.
    fn cast(&self, target: Type) -> Result<Value> {
        self.consume(TokenType::LeftParen)?;
        let value = self.expr()?;
        self.consume(TokenType::RightParen)?;

        Ok(value.cast(target))
    }

    fn cond(&self) -> Result<bool> {
        self.trace(TraceEvent::Enter("cond"));
        let left = self.factor()?;
        if !self.match_tokens(COMPARISONS) {
            return Err(self.mismatch("comparison operator"));
        }
        let operator = self.previous();
        let right = self.factor()?;
        let result = left.compare(&operator, right)?;
        self.trace(TraceEvent::Exit("cond"));

        Ok(result)
    }

    fn if_expr(&self) -> Result<Value> {
        // `if` has already been consumed by `expr`.
        let condition = self.cond()?;
        self.consume(TokenType::Then)?;
        let then_value = self.expr()?;
        self.consume(TokenType::Else)?;
        let else_value = self.expr()?;

        // Both branches are parsed and computed to keep the token stream
        // positioned; only the taken branch's value survives.
        Ok(if condition { then_value } else { else_value })
    }

    fn block(&self) -> Result<Block> {
        self.trace(TraceEvent::Enter("let_in_end"));
        let mut decls = vec![self.decl_node()?];
        while self.check(TokenType::Identifier) {
            decls.push(self.decl_node()?);
        }
        self.consume(TokenType::In)?;
        self.type_name()?;
        self.consume(TokenType::LeftParen)?;
        let body = *self.expr_node()?;
        self.consume(TokenType::RightParen)?;
        self.consume(TokenType::End)?;
        self.consume(TokenType::Semicolon)?;
        self.trace(TraceEvent::Exit("let_in_end"));

        Ok(Block { decls, body })
    }

    fn decl_node(&self) -> Result<Decl> {
        self.trace(TraceEvent::Enter("decl"));
        let name = self.consume(TokenType::Identifier)?;
        self.consume(TokenType::Colon)?;
        let declared_type = self.type_name()?;
        self.consume(TokenType::Assign)?;
        let init = *self.expr_node()?;
        self.consume(TokenType::Semicolon)?;
        self.trace(TraceEvent::Exit("decl"));

        Ok(Decl {
            name,
            declared_type,
            init,
        })
    }

    fn expr_node(&self) -> Result<Box<Expr>> {
        self.trace(TraceEvent::Enter("expr"));
        let expr = if self.match_token(TokenType::If) {
            self.if_node()?
        } else {
            let mut expr = self.term_node()?;
            while self.match_tokens(&[TokenType::Plus, TokenType::Minus]) {
                let operator = self.previous();
                let right = self.term_node()?;
                expr = Box::new(Expr::Binary(expr, operator, right));
            }
            expr
        };
        self.trace(TraceEvent::Exit("expr"));

        Ok(expr)
    }

    fn term_node(&self) -> Result<Box<Expr>> {
        self.trace(TraceEvent::Enter("term"));
        let mut expr = self.factor_node()?;

        while self.match_tokens(&[TokenType::Star, TokenType::Slash]) {
            let operator = self.previous();
            let right = self.factor_node()?;
            expr = Box::new(Expr::Binary(expr, operator, right));
        }
        self.trace(TraceEvent::Exit("term"));

        Ok(expr)
    }

    fn factor_node(&self) -> Result<Box<Expr>> {
        self.trace(TraceEvent::Enter("factor"));
        let expr = if self.match_token(TokenType::LeftParen) {
            // Parenthesized content is the node itself; grouping leaves no
            // mark on the tree.
            let expr = self.expr_node()?;
            self.consume(TokenType::RightParen)?;
            expr
        } else if self.match_token(TokenType::Identifier) {
            Box::new(Expr::Variable(self.previous()))
        } else if self.match_token(TokenType::Number) {
            Box::new(Expr::Literal(Value::from_lexeme(&self.previous().lexeme)?))
        } else if self.match_tokens(&[TokenType::Int, TokenType::Real]) {
            let keyword = self.previous();
            self.consume(TokenType::LeftParen)?;
            let inner = self.expr_node()?;
            self.consume(TokenType::RightParen)?;
            Box::new(Expr::Cast(keyword, inner))
        } else {
            return Err(TinyError::ExpectedExpression(self.peek().unwrap().clone()));
        };
        self.trace(TraceEvent::Exit("factor"));

        Ok(expr)
    }

    fn if_node(&self) -> Result<Box<Expr>> {
        let condition = self.cond_node()?;
        self.consume(TokenType::Then)?;
        let then_branch = self.expr_node()?;
        self.consume(TokenType::Else)?;
        let else_branch = self.expr_node()?;

        Ok(Box::new(Expr::If(condition, then_branch, else_branch)))
    }

    fn cond_node(&self) -> Result<Condition> {
        self.trace(TraceEvent::Enter("cond"));
        let left = self.factor_node()?;
        if !self.match_tokens(COMPARISONS) {
            return Err(self.mismatch("comparison operator"));
        }
        let operator = self.previous();
        let right = self.factor_node()?;
        self.trace(TraceEvent::Exit("cond"));

        Ok(Condition {
            left,
            operator,
            right,
        })
    }

    fn trace(&self, event: TraceEvent) {
        if let Some(tracer) = &self.tracer {
            tracer(event);
        }
    }

    /// Builds the syntax error for a lookahead that matches none of the
    /// expected alternatives.
    fn mismatch(&self, expected: &str) -> TinyError {
        // The scanner terminates every stream with Eof, so the lookahead
        // must exist.
        TinyError::UnexpectedToken(expected.to_owned(), self.peek().unwrap().clone())
    }

    fn consume(&self, expected: TokenType) -> Result<Token> {
        if !self.check(expected) {
            let actual = self.peek().unwrap().clone();

            match expected {
                TokenType::RightParen => return Err(TinyError::UnclosedParenthesis(actual.line)),
                TokenType::Semicolon => return Err(TinyError::MissingSemicolon(actual.line)),
                _ => return Err(TinyError::UnexpectedToken(expected.to_string(), actual)),
            }
        }

        // We just validated the next token. It must exist.
        Ok(self.advance().unwrap())
    }

    fn match_token(&self, token_type: TokenType) -> bool {
        if !self.check(token_type) {
            return false;
        }

        self.advance().is_some()
    }

    fn match_tokens(&self, token_types: &[TokenType]) -> bool {
        token_types.iter().any(|t| self.match_token(*t))
    }

    fn check(&self, token_type: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().map_or(false, |t| t.token_type == token_type)
    }

    fn is_at_end(&self) -> bool {
        self.peek()
            .map_or(false, |t| t.token_type == TokenType::Eof)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor.get())
    }

    fn previous(&self) -> Token {
        assert!(self.cursor.get() > 0);
        self.tokens.get(self.cursor.get() - 1).cloned().unwrap()
    }

    fn advance(&self) -> Option<Token> {
        if !self.is_at_end() {
            let old = self.cursor.get();
            self.cursor.replace(old + 1);
        }

        Some(self.previous())
    }
}

/// The comparison operators `cond` accepts.
const COMPARISONS: &[TokenType] = &[
    TokenType::Less,
    TokenType::LessEqual,
    TokenType::Greater,
    TokenType::GreaterEqual,
    TokenType::EqualEqual,
    TokenType::NotEqual,
];

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::core::Scanner;

    fn eval(source: &str) -> Result<Vec<Value>> {
        let scanner = Scanner::new(source.to_owned());
        Parser::new(scanner.scan_tokens().unwrap()).parse_program()
    }

    fn trees(source: &str) -> Result<Vec<Block>> {
        let scanner = Scanner::new(source.to_owned());
        Parser::new(scanner.scan_tokens().unwrap()).parse_blocks()
    }

    #[test]
    fn it_parses_an_empty_program() {
        assert_eq!(Ok(vec![]), eval(""));
    }

    #[test]
    fn it_binds_multiplication_tighter_than_addition() {
        assert_eq!(
            Ok(vec![Value::Int(7)]),
            eval("let a : int = 1 ; in int ( 1 + 2 * 3 ) end ;")
        );
    }

    #[test]
    fn it_lets_parentheses_override_precedence() {
        assert_eq!(
            Ok(vec![Value::Int(9)]),
            eval("let a : int = 1 ; in int ( ( 1 + 2 ) * 3 ) end ;")
        );
    }

    #[test]
    fn it_chains_subtraction_left_to_right() {
        assert_eq!(
            Ok(vec![Value::Int(5)]),
            eval("let a : int = 1 ; in int ( 10 - 2 - 3 ) end ;")
        );
    }

    #[test]
    fn it_resolves_declared_variables() {
        assert_eq!(
            Ok(vec![Value::Int(35)]),
            eval("let x : int = 5 ; y : int = x + 2 ; in int ( x * y ) end ;")
        );
    }

    #[test]
    fn it_rejects_undeclared_identifiers() {
        assert_eq!(
            Err(TinyError::UndefinedIdentifier("z".to_owned())),
            eval("let x : int = 5 ; in int ( z ) end ;")
        );
    }

    #[test]
    fn it_rejects_forward_references() {
        assert_eq!(
            Err(TinyError::UndefinedIdentifier("y".to_owned())),
            eval("let x : int = y + 1 ; y : int = 2 ; in int ( x ) end ;")
        );
    }

    #[test]
    fn it_overwrites_on_redeclaration() {
        assert_eq!(
            Ok(vec![Value::Int(2)]),
            eval("let x : int = 1 ; x : int = 2 ; in int ( x ) end ;")
        );
    }

    #[test]
    fn it_shares_declarations_across_blocks_of_one_run() {
        let source = "let x : int = 1 ; in int ( x ) end ; \
                      let y : int = 2 ; in int ( x + y ) end ;";

        assert_eq!(Ok(vec![Value::Int(1), Value::Int(3)]), eval(source));
    }

    #[test]
    fn it_keeps_independent_runs_independent() {
        assert_eq!(
            Ok(vec![Value::Int(1)]),
            eval("let x : int = 1 ; in int ( x ) end ;")
        );

        // A fresh scanner and parser must not see the first run's table.
        assert_eq!(
            Err(TinyError::UndefinedIdentifier("x".to_owned())),
            eval("let y : int = 2 ; in int ( x + y ) end ;")
        );
    }

    #[test]
    fn it_takes_the_then_branch_when_the_condition_holds() {
        assert_eq!(
            Ok(vec![Value::Int(1)]),
            eval("let a : int = 1 ; in int ( if 3 < 4 then 1 else 2 ) end ;")
        );
    }

    #[test]
    fn it_takes_the_else_branch_when_the_condition_fails() {
        assert_eq!(
            Ok(vec![Value::Int(2)]),
            eval("let a : int = 1 ; in int ( if 3 > 4 then 1 else 2 ) end ;")
        );
    }

    #[test]
    fn it_compares_mixed_operands_by_numeric_value() {
        assert_eq!(
            Ok(vec![Value::Int(1)]),
            eval("let a : int = 1 ; in int ( if 3 == 3.0 then 1 else 2 ) end ;")
        );
    }

    #[test]
    fn it_requires_a_comparison_operator_in_a_condition() {
        assert_eq!(
            Err(TinyError::UnexpectedToken(
                "comparison operator".to_owned(),
                Token::new(TokenType::Then, "then".to_owned(), 1),
            )),
            eval("let a : int = 1 ; in int ( if 3 then 1 else 2 ) end ;")
        );
    }

    #[test]
    fn it_divides_into_a_real() {
        assert_eq!(
            Ok(vec![Value::Real(3.5)]),
            eval("let a : int = 1 ; in real ( 7 / 2 ) end ;")
        );
    }

    #[test]
    fn it_truncates_with_an_int_cast() {
        assert_eq!(
            Ok(vec![Value::Int(3)]),
            eval("let a : int = 1 ; in int ( int ( 7 / 2 ) ) end ;")
        );
    }

    #[test]
    fn it_widens_with_a_real_cast() {
        assert_eq!(
            Ok(vec![Value::Real(7.0)]),
            eval("let a : int = 1 ; in real ( real ( 7 ) ) end ;")
        );
    }

    #[test]
    fn it_promotes_mixed_arithmetic() {
        assert_eq!(
            Ok(vec![Value::Real(2.5)]),
            eval("let x : real = 1.5 ; in real ( x + 1 ) end ;")
        );
    }

    #[test]
    fn it_rejects_integer_literals_that_do_not_fit() {
        // Scans fine; the failure is the conversion, not the lexing.
        assert_eq!(
            Err(TinyError::NumberOutOfRange(
                "99999999999999999999".to_owned()
            )),
            eval("let a : int = 99999999999999999999 ; in int ( a ) end ;")
        );
    }

    #[test]
    fn it_fails_on_integer_overflow() {
        assert_eq!(
            Err(TinyError::IntegerOverflow),
            eval("let a : int = 9223372036854775807 ; in int ( a + 1 ) end ;")
        );
    }

    #[test]
    fn it_fails_on_division_by_zero() {
        assert_eq!(
            Err(TinyError::DivisionByZero),
            eval("let a : int = 1 ; in int ( 5 / 0 ) end ;")
        );
    }

    #[test]
    fn it_fails_on_division_by_a_real_zero() {
        assert_eq!(
            Err(TinyError::DivisionByZero),
            eval("let a : int = 1 ; in int ( 5 / 0.0 ) end ;")
        );
    }

    #[test]
    fn it_aborts_the_run_at_the_first_failing_block() {
        let source = "let a : int = 1 ; in int ( a / 0 ) end ; \
                      let b : int = 2 ; in int ( b ) end ;";

        // No partial results: the second block is never evaluated.
        assert_eq!(Err(TinyError::DivisionByZero), eval(source));
    }

    #[test]
    fn it_reports_a_missing_semicolon() {
        assert_eq!(
            Err(TinyError::MissingSemicolon(1)),
            eval("let x : int = 5 ; in int ( x ) end")
        );
    }

    #[test]
    fn it_reports_a_missing_end() {
        assert_eq!(
            Err(TinyError::UnexpectedToken(
                "end".to_owned(),
                Token::new(TokenType::Semicolon, ";".to_owned(), 1),
            )),
            eval("let x : int = 5 ; in int ( x ) ;")
        );
    }

    #[test]
    fn it_detects_unclosed_parenthesis() {
        assert_eq!(
            Err(TinyError::UnclosedParenthesis(1)),
            eval("let x : int = ( 1 + 2 ; in int ( x ) end ;")
        );
    }

    #[test]
    fn it_requires_at_least_one_declaration() {
        assert_eq!(
            Err(TinyError::UnexpectedToken(
                "identifier".to_owned(),
                Token::new(TokenType::In, "in".to_owned(), 1),
            )),
            eval("let in int ( 1 ) end ;")
        );
    }

    #[test]
    fn it_rejects_trailing_tokens() {
        assert_eq!(
            Err(TinyError::UnexpectedToken(
                "let".to_owned(),
                Token::new(TokenType::Number, "42".to_owned(), 1),
            )),
            eval("let x : int = 5 ; in int ( x ) end ; 42")
        );
    }

    #[test]
    fn it_produces_one_result_per_block_in_source_order() {
        let source = "let a : int = 1 ; in int ( a ) end ; \
                      let b : int = 2 ; in int ( b ) end ; \
                      let c : int = 3 ; in int ( c ) end ;";

        assert_eq!(
            Ok(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
            eval(source)
        );
    }

    #[test]
    fn it_builds_a_tree_for_a_block() {
        let expected = Block {
            decls: vec![Decl {
                name: Token::new(TokenType::Identifier, "a".to_owned(), 1),
                declared_type: Type::Int,
                init: Expr::Literal(Value::Int(1)),
            }],
            body: Expr::Binary(
                Box::new(Expr::Literal(Value::Int(1))),
                Token::new(TokenType::Plus, "+".to_owned(), 1),
                Box::new(Expr::Literal(Value::Int(2))),
            ),
        };

        assert_eq!(
            Ok(vec![expected]),
            trees("let a : int = 1 ; in int ( 1 + 2 ) end ;")
        );
    }

    #[test]
    fn it_builds_left_associative_chains() {
        let inner = Expr::Binary(
            Box::new(Expr::Literal(Value::Int(1))),
            Token::new(TokenType::Minus, "-".to_owned(), 1),
            Box::new(Expr::Literal(Value::Int(2))),
        );
        let expected = Expr::Binary(
            Box::new(inner),
            Token::new(TokenType::Minus, "-".to_owned(), 1),
            Box::new(Expr::Literal(Value::Int(3))),
        );

        let blocks = trees("let a : int = 1 ; in int ( 1 - 2 - 3 ) end ;").unwrap();
        assert_eq!(expected, blocks[0].body);
    }

    #[test]
    fn it_collapses_grouping_to_the_inner_node() {
        let blocks = trees("let a : int = 1 ; in int ( ( 1 ) ) end ;").unwrap();
        assert_eq!(Expr::Literal(Value::Int(1)), blocks[0].body);
    }

    #[test]
    fn it_does_not_resolve_identifiers_or_check_division_at_parse_time() {
        let expected = Expr::Binary(
            Box::new(Expr::Variable(Token::new(
                TokenType::Identifier,
                "x".to_owned(),
                1,
            ))),
            Token::new(TokenType::Slash, "/".to_owned(), 1),
            Box::new(Expr::Literal(Value::Int(0))),
        );

        // `x` and `b` are never declared; tree mode accepts both anyway.
        let blocks = trees("let a : int = b ; in int ( x / 0 ) end ;").unwrap();
        assert_eq!(expected, blocks[0].body);
    }

    #[test]
    fn it_builds_cast_and_if_nodes() {
        let variable = |name: &str| {
            Box::new(Expr::Variable(Token::new(
                TokenType::Identifier,
                name.to_owned(),
                1,
            )))
        };
        let expected = Expr::If(
            Condition {
                left: variable("a"),
                operator: Token::new(TokenType::Less, "<".to_owned(), 1),
                right: variable("b"),
            },
            Box::new(Expr::Cast(
                Token::new(TokenType::Int, "int".to_owned(), 1),
                variable("a"),
            )),
            Box::new(Expr::Literal(Value::Int(2))),
        );

        let blocks =
            trees("let a : int = 1 ; in int ( if a < b then int ( a ) else 2 ) end ;").unwrap();
        assert_eq!(expected, blocks[0].body);
    }

    #[test]
    fn it_reports_rule_entry_and_exit_to_the_tracer() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        let scanner = Scanner::new("let a : int = 1 ; in int ( a ) end ;".to_owned());
        let parser = Parser::with_tracer(
            scanner.scan_tokens().unwrap(),
            Box::new(move |event| sink.borrow_mut().push(event)),
        );
        parser.parse_program().unwrap();

        let events = events.borrow();
        assert_eq!(Some(&TraceEvent::Enter("prog")), events.first());
        assert_eq!(Some(&TraceEvent::Exit("prog")), events.last());
        assert!(events.contains(&TraceEvent::Enter("decl")));
        assert!(events.contains(&TraceEvent::Exit("factor")));
    }
}
