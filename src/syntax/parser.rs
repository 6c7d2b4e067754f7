//! PICO-8 Lua parser
//!
//! Converts code text into a [`Chunk`]. The grammar lives in `grammar.pest`;
//! binary and unary operator precedence is resolved here with pest's Pratt
//! parser. This parser is purely syntactic - no name resolution or checking.

use once_cell::sync::Lazy;
use pest::{
    error::{Error, ErrorVariant, InputLocation, LineColLocation},
    iterators::Pair,
    pratt_parser::{Assoc, Op, PrattParser},
    Parser,
};
use pest_derive::Parser;

use crate::errors::{ParseError, SourceContext};
use crate::syntax::{
    Args, BinOp, Block, Chunk, CompoundOp, CondBlock, Expr, Field, FuncBody, FuncName, IfChain,
    Stat, UnOp,
};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct LuaParser;

static PRATT: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    use Assoc::{Left, Right};

    PrattParser::new()
        .op(Op::infix(Rule::op_or, Left))
        .op(Op::infix(Rule::op_and, Left))
        .op(Op::infix(Rule::op_lt, Left)
            | Op::infix(Rule::op_gt, Left)
            | Op::infix(Rule::op_le, Left)
            | Op::infix(Rule::op_ge, Left)
            | Op::infix(Rule::op_ne, Left)
            | Op::infix(Rule::op_bang_ne, Left)
            | Op::infix(Rule::op_eq, Left))
        .op(Op::infix(Rule::op_bor, Left))
        .op(Op::infix(Rule::op_bxor, Left))
        .op(Op::infix(Rule::op_band, Left))
        .op(Op::infix(Rule::op_shl, Left)
            | Op::infix(Rule::op_shr, Left)
            | Op::infix(Rule::op_lshr, Left)
            | Op::infix(Rule::op_rotl, Left)
            | Op::infix(Rule::op_rotr, Left))
        .op(Op::infix(Rule::op_concat, Right))
        .op(Op::infix(Rule::op_add, Left) | Op::infix(Rule::op_sub, Left))
        .op(Op::infix(Rule::op_mul, Left)
            | Op::infix(Rule::op_div, Left)
            | Op::infix(Rule::op_idiv, Left)
            | Op::infix(Rule::op_mod, Left))
        .op(Op::prefix(Rule::op_not)
            | Op::prefix(Rule::op_neg)
            | Op::prefix(Rule::op_len)
            | Op::prefix(Rule::op_bnot)
            | Op::prefix(Rule::op_peek)
            | Op::prefix(Rule::op_peek2)
            | Op::prefix(Rule::op_peek4))
        .op(Op::infix(Rule::op_pow, Right))
});

type ParseResult<T> = Result<T, ParseError>;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse code text into a syntax tree. Diagnostics name the source `code`.
pub fn parse(code: &str) -> ParseResult<Chunk> {
    parse_source(&SourceContext::from_file("code", code))
}

/// Parse the content of `source`, naming it in diagnostics.
pub fn parse_source(source: &SourceContext) -> ParseResult<Chunk> {
    let pairs = LuaParser::parse(Rule::chunk, &source.content)
        .map_err(|e| convert_parse_error(e, source))?;

    let builder = Builder { source };
    let mut stats = Vec::new();
    for chunk in pairs {
        for block in children(chunk) {
            stats.extend(builder.block(block)?.stats);
        }
    }

    log::debug!("parsed {} top-level statements from {}", stats.len(), source.name);
    Ok(Chunk {
        block: Block::new(stats),
    })
}

// ============================================================================
// TREE BUILDER
// ============================================================================

struct Builder<'s> {
    source: &'s SourceContext,
}

impl<'s> Builder<'s> {
    fn block(&self, pair: Pair<Rule>) -> ParseResult<Block> {
        let stats = children(pair)
            .map(|p| self.stat(p))
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Block::new(stats))
    }

    fn stat(&self, pair: Pair<Rule>) -> ParseResult<Stat> {
        let outer = pair.clone();
        let mut inner = children(pair.clone());

        match pair.as_rule() {
            Rule::label => Ok(Stat::Label(self.name(inner.next(), &outer)?)),
            Rule::break_stat => Ok(Stat::Break),
            Rule::goto_stat => Ok(Stat::Goto(self.name(inner.next(), &outer)?)),

            Rule::do_stat => Ok(Stat::Do(self.block(self.part(inner.next(), "block", &outer)?)?)),

            Rule::while_stat => {
                let cond = self.exp(self.part(inner.next(), "condition", &outer)?)?;
                let body = self.block(self.part(inner.next(), "block", &outer)?)?;
                Ok(Stat::While { cond, body })
            }

            Rule::repeat_stat => {
                let body = self.block(self.part(inner.next(), "block", &outer)?)?;
                let cond = self.exp(self.part(inner.next(), "condition", &outer)?)?;
                Ok(Stat::Repeat { body, cond })
            }

            Rule::if_stat => self.if_chain(inner, &outer).map(Stat::If),

            Rule::for_num => {
                let var = self.name(inner.next(), &outer)?;
                let mut exps = Vec::with_capacity(3);
                let mut body = None;
                for part in inner {
                    match part.as_rule() {
                        Rule::exp => exps.push(self.exp(part)?),
                        Rule::block => body = Some(self.block(part)?),
                        rule => return Err(self.unexpected(rule, &part)),
                    }
                }
                let body = body.ok_or_else(|| self.missing("loop body", &outer))?;
                let mut exps = exps.into_iter();
                let start = exps.next().ok_or_else(|| self.missing("start value", &outer))?;
                let stop = exps.next().ok_or_else(|| self.missing("limit value", &outer))?;
                let step = exps.next();
                Ok(Stat::NumericFor {
                    var,
                    start,
                    stop,
                    step,
                    body,
                })
            }

            Rule::for_in => {
                let names = self.namelist(self.part(inner.next(), "name list", &outer)?)?;
                let exprs = self.explist(self.part(inner.next(), "expression list", &outer)?)?;
                let body = self.block(self.part(inner.next(), "loop body", &outer)?)?;
                Ok(Stat::GenericFor { names, exprs, body })
            }

            Rule::func_def => {
                let name = self.funcname(self.part(inner.next(), "function name", &outer)?)?;
                let body = self.funcbody(self.part(inner.next(), "function body", &outer)?)?;
                Ok(Stat::Function { name, body })
            }

            Rule::local_func => {
                let name = self.name(inner.next(), &outer)?;
                let body = self.funcbody(self.part(inner.next(), "function body", &outer)?)?;
                Ok(Stat::LocalFunction { name, body })
            }

            Rule::local_assign => {
                let names = self.namelist(self.part(inner.next(), "name list", &outer)?)?;
                match inner.next() {
                    Some(values) => Ok(Stat::LocalAssign {
                        names,
                        values: self.explist(values)?,
                    }),
                    None => Ok(Stat::LocalDecl(names)),
                }
            }

            Rule::print_stat => {
                let args = self.explist(self.part(inner.next(), "print arguments", &outer)?)?;
                Ok(Stat::Print(args))
            }

            Rule::return_stat => match inner.next() {
                Some(list) => Ok(Stat::Return(self.explist(list)?)),
                None => Ok(Stat::Return(Vec::new())),
            },

            Rule::expr_stat => self.expr_stat(inner, &outer),

            rule => Err(self.unexpected(rule, &pair)),
        }
    }

    fn if_chain<'i>(
        &self,
        mut inner: impl Iterator<Item = Pair<'i, Rule>>,
        outer: &Pair<'i, Rule>,
    ) -> ParseResult<IfChain> {
        let cond = self.exp(self.part(inner.next(), "condition", outer)?)?;
        let block = self.block(self.part(inner.next(), "block", outer)?)?;
        let mut branches = vec![CondBlock { cond, block }];
        let mut default = None;

        for clause in inner {
            let mut parts = children(clause.clone());
            match clause.as_rule() {
                Rule::elseif_clause => {
                    let cond = self.exp(self.part(parts.next(), "condition", &clause)?)?;
                    let block = self.block(self.part(parts.next(), "block", &clause)?)?;
                    branches.push(CondBlock { cond, block });
                }
                Rule::else_clause => {
                    default = Some(self.block(self.part(parts.next(), "block", &clause)?)?);
                }
                rule => return Err(self.unexpected(rule, &clause)),
            }
        }

        Ok(IfChain { branches, default })
    }

    fn expr_stat<'i>(
        &self,
        mut inner: impl Iterator<Item = Pair<'i, Rule>>,
        outer: &Pair<'i, Rule>,
    ) -> ParseResult<Stat> {
        let head = self.part(inner.next(), "expression", outer)?;
        let head_pair = head.clone();
        let first = self.suffixedexp(head)?;

        let Some(tail) = inner.next() else {
            if first.is_call() {
                return Ok(Stat::Call(first));
            }
            return Err(self.error(
                "syntax error: expression is not a statement",
                "expected a call or an assignment",
                &head_pair,
            ));
        };

        match tail.as_rule() {
            Rule::assign_tail => {
                let mut targets = vec![self.target(first, &head_pair)?];
                let mut values = None;
                for part in children(tail.clone()) {
                    match part.as_rule() {
                        Rule::suffixedexp => {
                            let target = self.suffixedexp(part.clone())?;
                            targets.push(self.target(target, &part)?);
                        }
                        Rule::explist => values = Some(self.explist(part)?),
                        rule => return Err(self.unexpected(rule, &part)),
                    }
                }
                let values = values.ok_or_else(|| self.missing("assigned values", &tail))?;
                Ok(Stat::Assign { targets, values })
            }
            Rule::compound_tail => {
                let target = self.target(first, &head_pair)?;
                let mut parts = children(tail.clone());
                let op_pair = self.part(parts.next(), "operator", &tail)?;
                let op = compound_op(op_pair.as_str())
                    .ok_or_else(|| self.unexpected(op_pair.as_rule(), &op_pair))?;
                let value = self.exp(self.part(parts.next(), "expression", &tail)?)?;
                Ok(Stat::CompoundAssign { target, op, value })
            }
            rule => Err(self.unexpected(rule, &tail)),
        }
    }

    fn target(&self, expr: Expr, pair: &Pair<Rule>) -> ParseResult<Expr> {
        if expr.is_assignable() {
            Ok(expr)
        } else {
            Err(self.error(
                format!("syntax error: cannot assign to {}", expr.type_name()),
                "not assignable",
                pair,
            ))
        }
    }

    // ------------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------------

    fn funcname(&self, pair: Pair<Rule>) -> ParseResult<FuncName> {
        let mut path = Vec::new();
        let mut method = None;
        for part in children(pair) {
            match part.as_rule() {
                Rule::name => path.push(part.as_str().to_string()),
                Rule::method_name => {
                    let outer = part.clone();
                    method = Some(self.name(children(part).next(), &outer)?);
                }
                rule => return Err(self.unexpected(rule, &part)),
            }
        }
        Ok(FuncName { path, method })
    }

    fn funcbody(&self, pair: Pair<Rule>) -> ParseResult<FuncBody> {
        let mut params = Vec::new();
        let mut variadic = false;
        let mut body = Block::default();

        for part in children(pair) {
            match part.as_rule() {
                Rule::parlist => {
                    for param in children(part) {
                        match param.as_rule() {
                            Rule::name => params.push(param.as_str().to_string()),
                            Rule::vararg => variadic = true,
                            rule => return Err(self.unexpected(rule, &param)),
                        }
                    }
                }
                Rule::block => body = self.block(part)?,
                rule => return Err(self.unexpected(rule, &part)),
            }
        }

        Ok(FuncBody {
            params,
            variadic,
            body,
        })
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn exp(&self, pair: Pair<Rule>) -> ParseResult<Expr> {
        PRATT
            .map_primary(|primary| self.primary(primary))
            .map_prefix(|op, operand| {
                Ok(Expr::Unary {
                    op: unary_op(op.as_rule()).ok_or_else(|| self.unexpected(op.as_rule(), &op))?,
                    operand: Box::new(operand?),
                })
            })
            .map_infix(|lhs, op, rhs| {
                Ok(Expr::Binary {
                    op: binary_op(op.as_rule())
                        .ok_or_else(|| self.unexpected(op.as_rule(), &op))?,
                    lhs: Box::new(lhs?),
                    rhs: Box::new(rhs?),
                })
            })
            .parse(pair.into_inner())
    }

    fn primary(&self, pair: Pair<Rule>) -> ParseResult<Expr> {
        match pair.as_rule() {
            Rule::nil_lit => Ok(Expr::Nil),
            Rule::true_lit => Ok(Expr::True),
            Rule::false_lit => Ok(Expr::False),
            Rule::vararg => Ok(Expr::Vararg),
            Rule::number => Ok(Expr::Number(pair.as_str().to_string())),
            Rule::string => Ok(Expr::String(pair.as_str().to_string())),
            Rule::function_lit => {
                let outer = pair.clone();
                let body = self.part(children(pair).next(), "function body", &outer)?;
                Ok(Expr::Function(self.funcbody(body)?))
            }
            Rule::table => self.table(pair).map(Expr::Table),
            Rule::suffixedexp => self.suffixedexp(pair),
            rule => Err(self.unexpected(rule, &pair)),
        }
    }

    fn suffixedexp(&self, pair: Pair<Rule>) -> ParseResult<Expr> {
        let outer = pair.clone();
        let mut parts = children(pair);
        let head = self.part(parts.next(), "expression", &outer)?;

        let mut expr = match head.as_rule() {
            Rule::name => Expr::Name(head.as_str().to_string()),
            Rule::paren_exp => {
                let inner = self.part(children(head.clone()).next(), "expression", &head)?;
                Expr::Paren(Box::new(self.exp(inner)?))
            }
            rule => return Err(self.unexpected(rule, &head)),
        };

        for suffix in parts {
            let mut inner = children(suffix.clone());
            expr = match suffix.as_rule() {
                Rule::field_suffix => Expr::Field {
                    object: Box::new(expr),
                    name: self.name(inner.next(), &suffix)?,
                },
                Rule::index_suffix => Expr::Index {
                    object: Box::new(expr),
                    key: Box::new(self.exp(self.part(inner.next(), "index", &suffix)?)?),
                },
                Rule::method_suffix => {
                    let method = self.name(inner.next(), &suffix)?;
                    let args = self.args(self.part(inner.next(), "arguments", &suffix)?)?;
                    Expr::MethodCall {
                        object: Box::new(expr),
                        method,
                        args,
                    }
                }
                Rule::call_suffix => Expr::Call {
                    callee: Box::new(expr),
                    args: self.args(self.part(inner.next(), "arguments", &suffix)?)?,
                },
                rule => return Err(self.unexpected(rule, &suffix)),
            };
        }

        Ok(expr)
    }

    fn args(&self, pair: Pair<Rule>) -> ParseResult<Args> {
        match pair.as_rule() {
            Rule::call_args => match children(pair).next() {
                Some(list) => Ok(Args::List(self.explist(list)?)),
                None => Ok(Args::List(Vec::new())),
            },
            Rule::table => self.table(pair).map(Args::Table),
            Rule::string => Ok(Args::String(pair.as_str().to_string())),
            rule => Err(self.unexpected(rule, &pair)),
        }
    }

    fn table(&self, pair: Pair<Rule>) -> ParseResult<Vec<Field>> {
        children(pair)
            .map(|field| {
                let outer = field.clone();
                let mut parts = children(field.clone());
                match field.as_rule() {
                    Rule::field_index => {
                        let key = self.exp(self.part(parts.next(), "key", &outer)?)?;
                        let value = self.exp(self.part(parts.next(), "value", &outer)?)?;
                        Ok(Field::Indexed { key, value })
                    }
                    Rule::field_named => {
                        let name = self.name(parts.next(), &outer)?;
                        let value = self.exp(self.part(parts.next(), "value", &outer)?)?;
                        Ok(Field::Named { name, value })
                    }
                    Rule::field_positional => {
                        let value = self.exp(self.part(parts.next(), "value", &outer)?)?;
                        Ok(Field::Positional(value))
                    }
                    rule => Err(self.unexpected(rule, &field)),
                }
            })
            .collect()
    }

    fn explist(&self, pair: Pair<Rule>) -> ParseResult<Vec<Expr>> {
        children(pair).map(|p| self.exp(p)).collect()
    }

    fn namelist(&self, pair: Pair<Rule>) -> ParseResult<Vec<String>> {
        let outer = pair.clone();
        children(pair)
            .map(|p| self.name(Some(p), &outer))
            .collect()
    }

    fn name(&self, pair: Option<Pair<Rule>>, outer: &Pair<Rule>) -> ParseResult<String> {
        let pair = self.part(pair, "name", outer)?;
        match pair.as_rule() {
            Rule::name => Ok(pair.as_str().to_string()),
            rule => Err(self.unexpected(rule, &pair)),
        }
    }

    // ------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------

    fn part<'i>(
        &self,
        pair: Option<Pair<'i, Rule>>,
        what: &str,
        outer: &Pair<Rule>,
    ) -> ParseResult<Pair<'i, Rule>> {
        expect(pair, what, outer, self.source)
    }

    fn missing(&self, what: &str, outer: &Pair<Rule>) -> ParseError {
        self.error(format!("missing {what}"), "incomplete construct", outer)
    }

    fn unexpected(&self, rule: Rule, pair: &Pair<Rule>) -> ParseError {
        self.error(
            format!("internal error: unexpected grammar rule {rule:?}"),
            "not understood by the tree builder",
            pair,
        )
    }

    fn error(&self, message: impl Into<String>, label: &str, pair: &Pair<Rule>) -> ParseError {
        make_error(self.source, message.into(), label, pair)
    }
}

// ============================================================================
// OPERATOR TABLES
// ============================================================================

fn binary_op(rule: Rule) -> Option<BinOp> {
    let op = match rule {
        Rule::op_or => BinOp::Or,
        Rule::op_and => BinOp::And,
        Rule::op_lt => BinOp::Lt,
        Rule::op_gt => BinOp::Gt,
        Rule::op_le => BinOp::Le,
        Rule::op_ge => BinOp::Ge,
        Rule::op_eq => BinOp::Eq,
        Rule::op_ne => BinOp::Ne,
        Rule::op_bang_ne => BinOp::BangNe,
        Rule::op_bor => BinOp::BitOr,
        Rule::op_bxor => BinOp::BitXor,
        Rule::op_band => BinOp::BitAnd,
        Rule::op_shl => BinOp::Shl,
        Rule::op_shr => BinOp::Shr,
        Rule::op_lshr => BinOp::LShr,
        Rule::op_rotl => BinOp::Rotl,
        Rule::op_rotr => BinOp::Rotr,
        Rule::op_concat => BinOp::Concat,
        Rule::op_add => BinOp::Add,
        Rule::op_sub => BinOp::Sub,
        Rule::op_mul => BinOp::Mul,
        Rule::op_div => BinOp::Div,
        Rule::op_idiv => BinOp::IntDiv,
        Rule::op_mod => BinOp::Mod,
        Rule::op_pow => BinOp::Pow,
        _ => return None,
    };
    Some(op)
}

fn unary_op(rule: Rule) -> Option<UnOp> {
    let op = match rule {
        Rule::op_not => UnOp::Not,
        Rule::op_neg => UnOp::Neg,
        Rule::op_len => UnOp::Len,
        Rule::op_bnot => UnOp::BitNot,
        Rule::op_peek => UnOp::Peek,
        Rule::op_peek2 => UnOp::Peek2,
        Rule::op_peek4 => UnOp::Peek4,
        _ => return None,
    };
    Some(op)
}

fn compound_op(text: &str) -> Option<CompoundOp> {
    let op = match text {
        "+=" => CompoundOp::Add,
        "-=" => CompoundOp::Sub,
        "*=" => CompoundOp::Mul,
        "/=" => CompoundOp::Div,
        "\\=" => CompoundOp::IntDiv,
        "%=" => CompoundOp::Mod,
        "^=" => CompoundOp::Pow,
        "..=" => CompoundOp::Concat,
        "|=" => CompoundOp::BitOr,
        "&=" => CompoundOp::BitAnd,
        "^^=" => CompoundOp::BitXor,
        "<<=" => CompoundOp::Shl,
        ">>=" => CompoundOp::Shr,
        ">>>=" => CompoundOp::LShr,
        "<<>=" => CompoundOp::Rotl,
        ">><=" => CompoundOp::Rotr,
        _ => return None,
    };
    Some(op)
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Inner pairs with keyword tokens removed.
fn children<'i>(pair: Pair<'i, Rule>) -> impl Iterator<Item = Pair<'i, Rule>> {
    pair.into_inner().filter(|p| !is_keyword(p.as_rule()))
}

fn is_keyword(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::kw_break
            | Rule::kw_do
            | Rule::kw_else
            | Rule::kw_elseif
            | Rule::kw_end
            | Rule::kw_for
            | Rule::kw_function
            | Rule::kw_goto
            | Rule::kw_if
            | Rule::kw_in
            | Rule::kw_local
            | Rule::kw_repeat
            | Rule::kw_return
            | Rule::kw_then
            | Rule::kw_until
            | Rule::kw_while
            | Rule::EOI
    )
}

fn expect<'i>(
    pair: Option<Pair<'i, Rule>>,
    what: &str,
    outer: &Pair<Rule>,
    source: &SourceContext,
) -> ParseResult<Pair<'i, Rule>> {
    pair.ok_or_else(|| {
        make_error(
            source,
            format!("missing {what}"),
            "incomplete construct",
            outer,
        )
    })
}

fn make_error(source: &SourceContext, message: String, label: &str, pair: &Pair<Rule>) -> ParseError {
    let span = pair.as_span();
    let (line, column) = span.start_pos().line_col();
    ParseError {
        message,
        line,
        column,
        src: source.to_named_source(),
        span: (span.start()..span.end()).into(),
        label: label.to_string(),
    }
}

fn convert_parse_error(error: Error<Rule>, source: &SourceContext) -> ParseError {
    let (line, column) = match error.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };
    let span = match error.location {
        InputLocation::Pos(pos) => (pos..pos).into(),
        InputLocation::Span((start, end)) => (start..end).into(),
    };

    let message = match &error.variant {
        ErrorVariant::ParsingError { positives, .. } => {
            let mut expected: Vec<&str> = Vec::new();
            for rule in positives {
                let description = rule_description(*rule);
                if !expected.contains(&description) {
                    expected.push(description);
                }
            }
            match expected.as_slice() {
                [] => "syntax error".to_string(),
                [only] => format!("expected {only}"),
                [init @ .., last] => format!("expected {}, or {}", init.join(", "), last),
            }
        }
        ErrorVariant::CustomError { message } => message.clone(),
    };
    let error_line = source.content.lines().nth(line.saturating_sub(1));
    let message = match error_line.and_then(shorthand_hint) {
        Some(hint) => format!("{message}; {hint}"),
        None => message,
    };

    ParseError {
        message,
        line,
        column,
        src: source.to_named_source(),
        span,
        label: "syntax error here".into(),
    }
}

/// PICO-8's one-line `if (c) stmt` and `while (c) stmt` forms are not accepted.
fn shorthand_hint(line: &str) -> Option<&'static str> {
    let trimmed = line.trim_start();
    let opens = |keyword: &str| {
        trimmed
            .strip_prefix(keyword)
            .is_some_and(|rest| rest.trim_start().starts_with('('))
    };
    let has_word = |word: &str| {
        line.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .any(|w| w == word)
    };

    if opens("if") && !has_word("then") {
        Some("the one-line `if (cond) stmt` shorthand is not supported, write `if cond then stmt end`")
    } else if opens("while") && !has_word("do") {
        Some("the one-line `while (cond) stmt` shorthand is not supported, write `while cond do stmt end`")
    } else {
        None
    }
}

fn rule_description(rule: Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::block | Rule::return_stat => "statement",
        Rule::label => "label",
        Rule::break_stat => "`break`",
        Rule::goto_stat => "`goto`",
        Rule::do_stat => "`do` block",
        Rule::while_stat => "`while` loop",
        Rule::repeat_stat => "`repeat` loop",
        Rule::if_stat => "`if` statement",
        Rule::elseif_clause => "`elseif`",
        Rule::else_clause => "`else`",
        Rule::for_num | Rule::for_in => "`for` loop",
        Rule::func_def | Rule::local_func => "function definition",
        Rule::local_assign => "local declaration",
        Rule::print_stat => "`?` print",
        Rule::expr_stat => "statement",
        Rule::assign_tail | Rule::compound_tail | Rule::compound_op => "assignment",
        Rule::funcbody => "function body",
        Rule::parlist => "parameter list",
        Rule::namelist => "name list",
        Rule::explist | Rule::exp => "expression",
        Rule::function_lit => "function",
        Rule::suffixedexp | Rule::paren_exp => "expression",
        Rule::field_suffix | Rule::index_suffix | Rule::method_suffix | Rule::call_suffix => {
            "field access or call"
        }
        Rule::call_args => "call arguments",
        Rule::table => "table constructor",
        Rule::field_index | Rule::field_named | Rule::field_positional => "table field",
        Rule::name | Rule::funcname | Rule::method_name => "name",
        Rule::number => "number",
        Rule::string => "string",
        Rule::nil_lit | Rule::true_lit | Rule::false_lit | Rule::vararg => "literal",
        Rule::kw_break => "`break`",
        Rule::kw_do => "`do`",
        Rule::kw_else => "`else`",
        Rule::kw_elseif => "`elseif`",
        Rule::kw_end => "`end`",
        Rule::kw_for => "`for`",
        Rule::kw_function => "`function`",
        Rule::kw_goto => "`goto`",
        Rule::kw_if => "`if`",
        Rule::kw_in => "`in`",
        Rule::kw_local => "`local`",
        Rule::kw_repeat => "`repeat`",
        Rule::kw_return => "`return`",
        Rule::kw_then => "`then`",
        Rule::kw_until => "`until`",
        Rule::kw_while => "`while`",
        Rule::keyword => "keyword",
        _ => "operator",
    }
}
