use tracing::debug;

use crate::{
    QueryError,
    parser::{
        ParseError, Token, TokenKind, TokenValue,
        ast::{BinaryOp, Expr, FunctionCall, Literal, Select, SelectField, TableExpr, UnaryOp},
        tokenize,
    },
};

/// Recursive-descent parser over the token stream.
///
/// Precedence, loosest first: `OR`, `AND`, `NOT`, `IS [NOT] NULL` / `IN`,
/// comparisons, `+ -`, `* / %`, unary minus, primaries.
#[derive(Debug, Default)]
pub struct QueryParser {
    pub position: usize,
    pub tokens: Vec<Token>,
}

impl QueryParser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { position: 0, tokens }
    }

    /// Lex and parse a full query.
    pub fn parse_text(text: &str) -> Result<Select, QueryError> {
        let tokens = tokenize(text)?;
        let select = QueryParser::new(tokens).parse()?;
        debug!(query = %select, "parsed query");
        Ok(select)
    }

    pub fn eof(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    pub fn peek(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.position + ahead)
    }

    pub fn next(&mut self) {
        self.position += 1;
    }

    /// Position reported for errors at end of input.
    pub fn end_position(&self) -> usize {
        self.tokens.last().map(|t| t.position + t.text.len()).unwrap_or(0)
    }

    /// Consume the current token if it has the given kind.
    pub fn check(&mut self, kind: TokenKind) -> bool {
        if self.current_kind() == Some(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        match self.current() {
            Some(token) if token.is(kind) => {
                let token = token.clone();
                self.next();
                Ok(token)
            }
            _ => ParseError::new(&format!("expected {}", what), self).err(),
        }
    }

    /// Parse one SELECT statement spanning the whole token stream.
    pub fn parse(&mut self) -> Result<Select, ParseError> {
        let select = self.parse_select()?;
        if !self.eof() {
            return ParseError::new("unexpected token after end of query", self).err();
        }
        Ok(select)
    }

    fn parse_select(&mut self) -> Result<Select, ParseError> {
        self.expect(TokenKind::Select, "SELECT")?;
        let fields = self.parse_select_fields()?;

        let table = if self.check(TokenKind::From) { Some(self.parse_table_list()?) } else { None };

        let where_expr = if self.check(TokenKind::Where) { Some(self.parse_expr()?) } else { None };

        let groups = if self.check(TokenKind::Group) {
            self.expect(TokenKind::By, "BY after GROUP")?;
            Some(self.parse_groups()?)
        } else {
            None
        };

        Ok(Select { fields, table, where_expr, groups })
    }

    fn parse_select_fields(&mut self) -> Result<Vec<SelectField>, ParseError> {
        let mut fields = vec![self.parse_select_field()?];
        while self.check(TokenKind::Comma) {
            fields.push(self.parse_select_field()?);
        }
        Ok(fields)
    }

    fn parse_select_field(&mut self) -> Result<SelectField, ParseError> {
        if self.check(TokenKind::Star) {
            return Ok(SelectField { expr: Expr::Star, alias: None });
        }

        let expr = self.parse_expr()?;
        let alias = self.parse_alias()?;
        Ok(SelectField { expr, alias })
    }

    /// `[AS] identifier`, for select fields and table sources.
    fn parse_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.check(TokenKind::As) {
            return Ok(Some(self.expect(TokenKind::Identifier, "alias after AS")?.text));
        }
        if self.current_kind() == Some(TokenKind::Identifier) {
            return Ok(Some(self.expect(TokenKind::Identifier, "alias")?.text));
        }
        Ok(None)
    }

    fn parse_groups(&mut self) -> Result<Vec<String>, ParseError> {
        let mut groups = vec![self.expect(TokenKind::Identifier, "GROUP BY column or alias")?.text];
        while self.check(TokenKind::Comma) {
            groups.push(self.expect(TokenKind::Identifier, "GROUP BY column or alias")?.text);
        }
        Ok(groups)
    }

    fn parse_table_list(&mut self) -> Result<TableExpr, ParseError> {
        let mut tables = vec![self.parse_join_chain()?];
        while self.check(TokenKind::Comma) {
            tables.push(self.parse_join_chain()?);
        }

        if tables.len() == 1 {
            Ok(tables.remove(0))
        } else {
            Ok(TableExpr::Union(tables))
        }
    }

    fn parse_join_chain(&mut self) -> Result<TableExpr, ParseError> {
        let mut left = self.parse_table_atom()?;
        while self.check(TokenKind::Join) {
            let right = self.parse_table_atom()?;
            self.expect(TokenKind::On, "ON after JOIN source")?;
            let condition = self.parse_expr()?;
            left = TableExpr::Join { left: Box::new(left), right: Box::new(right), condition };
        }
        Ok(left)
    }

    fn parse_table_atom(&mut self) -> Result<TableExpr, ParseError> {
        if self.check(TokenKind::LParen) {
            if self.current_kind() == Some(TokenKind::Select) {
                let select = self.parse_select()?;
                self.expect(TokenKind::RParen, "')' after subquery")?;
                let alias = self.parse_alias()?;
                return Ok(TableExpr::Subquery { select: Box::new(select), alias });
            }
            let tables = self.parse_table_list()?;
            self.expect(TokenKind::RParen, "')' after table list")?;
            return Ok(tables);
        }

        let name = self.expect(TokenKind::Identifier, "table name")?.text;
        let alias = self.parse_alias()?;
        Ok(TableExpr::Table { name, alias })
    }

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.check(TokenKind::Or) {
            let right = self.parse_and()?;
            left = Expr::binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while self.check(TokenKind::And) {
            let right = self.parse_not()?;
            left = Expr::binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::Not) {
            let expr = self.parse_not()?;
            return Ok(Expr::unary(UnaryOp::Not, expr));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_comparison()?;
        loop {
            if self.check(TokenKind::Is) {
                let op = if self.check(TokenKind::Not) { UnaryOp::IsNotNull } else { UnaryOp::IsNull };
                self.expect(TokenKind::Null, "NULL after IS")?;
                expr = Expr::unary(op, expr);
            } else if self.current_kind() == Some(TokenKind::In) {
                self.next();
                expr = Expr::InList { expr: Box::new(expr), list: self.parse_in_list()? };
            } else if self.current_kind() == Some(TokenKind::Not) && self.peek(1).is_some_and(|t| t.is(TokenKind::In)) {
                self.position += 2;
                let list = self.parse_in_list()?;
                expr = Expr::unary(UnaryOp::Not, Expr::InList { expr: Box::new(expr), list });
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_in_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen, "'(' after IN")?;
        let list = self.parse_expr_list()?;
        self.expect(TokenKind::RParen, "')' after IN list")?;
        Ok(list)
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut items = vec![self.parse_expr()?];
        while self.check(TokenKind::Comma) {
            items.push(self.parse_expr()?);
        }
        Ok(items)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = BinaryOp::check_comparison(self) {
            let right = self.parse_additive()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = BinaryOp::check_additive(self) {
            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = BinaryOp::check_multiplicative(self) {
            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::Minus) {
            let expr = self.parse_unary()?;
            return Ok(Expr::unary(UnaryOp::Neg, expr));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.current().cloned() else {
            return ParseError::new("unexpected end of input in expression", self).err();
        };

        match token.kind {
            TokenKind::Number | TokenKind::String => {
                self.next();
                match token.value {
                    TokenValue::Int(i) => Ok(Expr::Literal(Literal::Int(i))),
                    TokenValue::Str(s) => Ok(Expr::Literal(Literal::String(s))),
                    TokenValue::None => ParseError::new("literal token without a value", self).err(),
                }
            }
            TokenKind::True => {
                self.next();
                Ok(Expr::Literal(Literal::Bool(true)))
            }
            TokenKind::False => {
                self.next();
                Ok(Expr::Literal(Literal::Bool(false)))
            }
            TokenKind::Null => {
                self.next();
                Ok(Expr::Literal(Literal::Null))
            }
            TokenKind::LParen => {
                self.next();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::Identifier => {
                self.next();
                if self.current_kind() == Some(TokenKind::LParen) {
                    self.parse_function_call(token.text)
                } else {
                    Ok(Expr::Column(token.text))
                }
            }
            _ => ParseError::new("unexpected token in expression", self).err(),
        }
    }

    /// `NAME()`, `NAME(*)`, `NAME(DISTINCT expr)` or `NAME(expr, ...)`,
    /// with the cursor on the opening parenthesis.
    fn parse_function_call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;

        let mut distinct = false;
        let args = if self.check(TokenKind::RParen) {
            return Ok(Expr::Function(FunctionCall { name, args: vec![], distinct }));
        } else if self.check(TokenKind::Star) {
            vec![Expr::Star]
        } else {
            distinct = self.check(TokenKind::Distinct);
            self.parse_expr_list()?
        };

        self.expect(TokenKind::RParen, "')' after function arguments")?;
        Ok(Expr::Function(FunctionCall { name, args, distinct }))
    }
}
