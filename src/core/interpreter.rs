use super::{Block, Expr, Result, SymbolTable, TinyError, TokenType, Type, Value};

/// Evaluates the syntax trees built by the parser's tree-building mode.
///
/// This is the deferred half of the front end: `Parser::parse_blocks`
/// consumes tokens without resolving anything, and `Interpreter` walks the
/// resulting trees post-order with the same semantics the evaluating parser
/// applies inline. Identifier resolution and division-by-zero checking
/// happen here.
pub struct Interpreter {
    table: SymbolTable,
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Interpreter {
            table: SymbolTable::new(),
        }
    }

    /// Evaluates `blocks` in source order, producing one value per block.
    ///
    /// The symbol table persists across blocks, so a later block sees the
    /// declarations of an earlier one, just as in the evaluating parse. The
    /// first error aborts the run; blocks not yet reached are not evaluated.
    pub fn interpret(&mut self, blocks: &[Block]) -> Result<Vec<Value>> {
        let mut results = Vec::with_capacity(blocks.len());
        for block in blocks {
            results.push(self.execute(block)?);
        }

        Ok(results)
    }

    fn execute(&mut self, block: &Block) -> Result<Value> {
        // Declarations evaluate in source order against the table as it
        // stands, so forward references fail here exactly as they do in the
        // evaluating parse.
        for decl in &block.decls {
            let value = self.evaluate(&decl.init)?;
            self.table
                .define(decl.name.lexeme.to_string(), decl.declared_type, value);
        }

        self.evaluate(&block.body)
    }

    fn evaluate(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(value) => Ok(*value),
            Expr::Variable(name) => self.table.get(&name.lexeme).map(|binding| binding.value),
            Expr::Binary(left, operator, right) => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                left.apply(operator, right)
            }
            Expr::Cast(keyword, inner) => {
                let value = self.evaluate(inner)?;
                match keyword.token_type {
                    TokenType::Int => Ok(value.cast(Type::Int)),
                    TokenType::Real => Ok(value.cast(Type::Real)),
                    _ => Err(TinyError::UnexpectedToken(
                        "int or real".to_owned(),
                        keyword.clone(),
                    )),
                }
            }
            Expr::If(condition, then_branch, else_branch) => {
                let left = self.evaluate(&condition.left)?;
                let right = self.evaluate(&condition.right)?;

                // Only the taken branch is evaluated here; the parser has
                // already consumed both.
                if left.compare(&condition.operator, right)? {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }
        }
    }
}
