//! Canonical layout for PICO-8 Lua syntax trees.
//!
//! Rendering is a pure function of the tree and the nesting depth. Each
//! statement gets its own line, indented two spaces per level; nested blocks
//! render one level deeper than the statement that opens them.

use crate::syntax::{
    Args, Block, Chunk, Expr, Field, FuncBody, FuncName, IfChain, Stat, UnOp,
};

const INDENT: &str = "  ";

// ============================================================================
// PUBLIC API
// ============================================================================

/// Render a whole chunk. Non-empty output ends with exactly one newline.
pub fn render_chunk(chunk: &Chunk) -> String {
    render_block(&chunk.block, 0)
}

/// Render every statement of `block` at `depth`, one per line.
///
/// An empty block renders as the empty string.
pub fn render_block(block: &Block, depth: usize) -> String {
    let mut out = String::new();
    for stat in &block.stats {
        out.push_str(&render_stat(stat, depth));
        out.push('\n');
    }
    out
}

/// Render one statement at `depth`, without a trailing newline.
pub fn render_stat(stat: &Stat, depth: usize) -> String {
    let ind = INDENT.repeat(depth);
    let inner = |block: &Block| render_block(block, depth + 1);
    // `;` keeps a leading `(` from continuing the previous line's expression
    let lead = if opens_with_paren(stat) { ";" } else { "" };

    match stat {
        Stat::Assign { targets, values } => format!(
            "{ind}{lead}{} = {}",
            render_list(targets, depth),
            render_list(values, depth)
        ),
        Stat::CompoundAssign { target, op, value } => format!(
            "{ind}{lead}{} {} {}",
            render_expr(target, depth),
            op.as_str(),
            render_expr(value, depth)
        ),
        Stat::Print(args) => format!("{ind}print({})", render_list(args, depth)),
        Stat::Call(call) => format!("{ind}{lead}{}", render_expr(call, depth)),
        Stat::Do(body) => format!("{ind}do\n{}{ind}end", inner(body)),
        Stat::While { cond, body } => format!(
            "{ind}while {} do\n{}{ind}end",
            render_expr(cond, depth),
            inner(body)
        ),
        Stat::Repeat { body, cond } => format!(
            "{ind}repeat\n{}{ind}until {}",
            inner(body),
            render_expr(cond, depth)
        ),
        Stat::If(chain) => render_if(chain, depth),
        Stat::NumericFor {
            var,
            start,
            stop,
            step,
            body,
        } => {
            let mut range = format!("{}, {}", render_expr(start, depth), render_expr(stop, depth));
            if let Some(step) = step {
                range.push_str(", ");
                range.push_str(&render_expr(step, depth));
            }
            format!("{ind}for {var} = {range} do\n{}{ind}end", inner(body))
        }
        Stat::GenericFor { names, exprs, body } => format!(
            "{ind}for {} in {} do\n{}{ind}end",
            names.join(", "),
            render_list(exprs, depth),
            inner(body)
        ),
        Stat::Function { name, body } => format!(
            "{ind}function {}{}",
            render_funcname(name),
            render_funcbody(body, depth)
        ),
        Stat::LocalFunction { name, body } => format!(
            "{ind}local function {name}{}",
            render_funcbody(body, depth)
        ),
        Stat::LocalDecl(names) => format!("{ind}local {}", names.join(", ")),
        Stat::LocalAssign { names, values } => format!(
            "{ind}local {} = {}",
            names.join(", "),
            render_list(values, depth)
        ),
        Stat::Return(values) if values.is_empty() => format!("{ind}return"),
        Stat::Return(values) => format!("{ind}return {}", render_list(values, depth)),
        Stat::Break => format!("{ind}break"),
        Stat::Label(name) => format!("{ind}::{name}::"),
        Stat::Goto(name) => format!("{ind}goto {name}"),
    }
}

/// Render an expression. `depth` is the depth of the enclosing statement and
/// only matters for function literals, whose bodies span several lines.
pub fn render_expr(expr: &Expr, depth: usize) -> String {
    match expr {
        Expr::Nil => "nil".to_string(),
        Expr::True => "true".to_string(),
        Expr::False => "false".to_string(),
        Expr::Vararg => "...".to_string(),
        Expr::Number(text) | Expr::String(text) | Expr::Name(text) => text.clone(),
        Expr::Function(body) => format!("function{}", render_funcbody(body, depth)),
        Expr::Table(fields) => render_table(fields, depth),
        Expr::Binary { op, lhs, rhs } => format!(
            "{} {} {}",
            render_expr(lhs, depth),
            op.as_str(),
            render_expr(rhs, depth)
        ),
        Expr::Unary { op, operand } => render_unary(*op, operand, depth),
        Expr::Paren(inner) => format!("({})", render_expr(inner, depth)),
        Expr::Index { object, key } => format!(
            "{}{}",
            render_expr(object, depth),
            bracketed(&render_expr(key, depth))
        ),
        Expr::Field { object, name } => format!("{}.{name}", render_expr(object, depth)),
        Expr::Call { callee, args } => {
            format!("{}{}", render_expr(callee, depth), render_args(args, depth))
        }
        Expr::MethodCall {
            object,
            method,
            args,
        } => format!(
            "{}:{method}{}",
            render_expr(object, depth),
            render_args(args, depth)
        ),
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn render_if(chain: &IfChain, depth: usize) -> String {
    let ind = INDENT.repeat(depth);
    let mut out = String::new();

    for (i, branch) in chain.branches.iter().enumerate() {
        let keyword = if i == 0 { "if" } else { "elseif" };
        out.push_str(&format!(
            "{ind}{keyword} {} then\n",
            render_expr(&branch.cond, depth)
        ));
        out.push_str(&render_block(&branch.block, depth + 1));
    }

    if let Some(default) = &chain.default {
        out.push_str(&format!("{ind}else\n"));
        out.push_str(&render_block(default, depth + 1));
    }

    out.push_str(&ind);
    out.push_str("end");
    out
}

/// Whether the statement's first token is `(`.
fn opens_with_paren(stat: &Stat) -> bool {
    let mut expr: &Expr = match stat {
        Stat::Call(call) => call,
        Stat::CompoundAssign { target, .. } => target,
        Stat::Assign { targets, .. } => match targets.first() {
            Some(target) => target,
            None => return false,
        },
        _ => return false,
    };
    loop {
        expr = match expr {
            Expr::Paren(_) => return true,
            Expr::Index { object, .. }
            | Expr::Field { object, .. }
            | Expr::MethodCall { object, .. } => &**object,
            Expr::Call { callee, .. } => &**callee,
            _ => return false,
        };
    }
}

fn render_funcname(name: &FuncName) -> String {
    let path = name.path.join(".");
    match &name.method {
        Some(method) => format!("{path}:{method}"),
        None => path,
    }
}

fn render_funcbody(body: &FuncBody, depth: usize) -> String {
    let ind = INDENT.repeat(depth);
    let mut params = body.params.join(", ");
    if body.variadic {
        if !params.is_empty() {
            params.push_str(", ");
        }
        params.push_str("...");
    }
    format!("({params})\n{}{ind}end", render_block(&body.body, depth + 1))
}

fn render_unary(op: UnOp, operand: &Expr, depth: usize) -> String {
    let operand = render_expr(operand, depth);
    match op {
        UnOp::Not => format!("not {operand}"),
        // `--` would start a comment
        UnOp::Neg if operand.starts_with('-') => format!("- {operand}"),
        _ => format!("{}{operand}", op.as_str()),
    }
}

fn render_args(args: &Args, depth: usize) -> String {
    match args {
        Args::List(values) => format!("({})", render_list(values, depth)),
        Args::Table(fields) => render_table(fields, depth),
        Args::String(text) => text.clone(),
    }
}

fn render_table(fields: &[Field], depth: usize) -> String {
    let fields = fields
        .iter()
        .map(|field| match field {
            Field::Indexed { key, value } => format!(
                "{} = {}",
                bracketed(&render_expr(key, depth)),
                render_expr(value, depth)
            ),
            Field::Named { name, value } => format!("{name} = {}", render_expr(value, depth)),
            Field::Positional(value) => render_expr(value, depth),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{fields}}}")
}

fn render_list(exprs: &[Expr], depth: usize) -> String {
    exprs
        .iter()
        .map(|e| render_expr(e, depth))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `[key]`, padded when the key is itself a long string so `[[` is not read
/// as a long bracket.
fn bracketed(key: &str) -> String {
    if key.starts_with('[') {
        format!("[ {key} ]")
    } else {
        format!("[{key}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{BinOp, CondBlock};

    fn name(n: &str) -> Expr {
        Expr::Name(n.to_string())
    }

    fn call(callee: &str) -> Stat {
        Stat::Call(Expr::Call {
            callee: Box::new(name(callee)),
            args: Args::List(vec![]),
        })
    }

    #[test]
    fn empty_block_renders_nothing() {
        assert_eq!(render_block(&Block::default(), 3), "");
        assert_eq!(render_stat(&Stat::Do(Block::default()), 0), "do\nend");
    }

    #[test]
    fn nested_blocks_indent_two_spaces() {
        let stat = Stat::While {
            cond: Expr::True,
            body: Block::new(vec![Stat::Do(Block::new(vec![call("f")]))]),
        };
        assert_eq!(
            render_stat(&stat, 1),
            "  while true do\n    do\n      f()\n    end\n  end"
        );
    }

    #[test]
    fn if_chain_has_single_end() {
        let chain = IfChain {
            branches: vec![
                CondBlock {
                    cond: name("a"),
                    block: Block::new(vec![call("f")]),
                },
                CondBlock {
                    cond: name("b"),
                    block: Block::new(vec![call("g")]),
                },
            ],
            default: Some(Block::new(vec![call("h")])),
        };
        assert_eq!(
            render_stat(&Stat::If(chain), 0),
            "if a then\n  f()\nelseif b then\n  g()\nelse\n  h()\nend"
        );
    }

    #[test]
    fn double_negation_keeps_a_space() {
        let expr = Expr::Unary {
            op: UnOp::Neg,
            operand: Box::new(Expr::Unary {
                op: UnOp::Neg,
                operand: Box::new(name("x")),
            }),
        };
        assert_eq!(render_expr(&expr, 0), "- -x");
    }

    #[test]
    fn not_takes_a_space() {
        let expr = Expr::Unary {
            op: UnOp::Not,
            operand: Box::new(name("x")),
        };
        assert_eq!(render_expr(&expr, 0), "not x");
    }

    #[test]
    fn variadic_params() {
        let body = |params: Vec<&str>| FuncBody {
            params: params.into_iter().map(String::from).collect(),
            variadic: true,
            body: Block::default(),
        };
        assert_eq!(render_expr(&Expr::Function(body(vec![])), 0), "function(...)\nend");
        assert_eq!(
            render_expr(&Expr::Function(body(vec!["a", "b"])), 0),
            "function(a, b, ...)\nend"
        );
    }

    #[test]
    fn method_definition_name() {
        let stat = Stat::Function {
            name: FuncName {
                path: vec!["a".into(), "b".into()],
                method: Some("m".into()),
            },
            body: FuncBody {
                params: vec!["x".into()],
                variadic: false,
                body: Block::new(vec![Stat::Return(vec![Expr::Binary {
                    op: BinOp::Add,
                    lhs: Box::new(name("x")),
                    rhs: Box::new(Expr::Number("1".into())),
                }])]),
            },
        };
        assert_eq!(
            render_stat(&stat, 0),
            "function a.b:m(x)\n  return x + 1\nend"
        );
    }

    #[test]
    fn parenthesized_call_statement_gets_a_separator() {
        let stat = Stat::Call(Expr::Call {
            callee: Box::new(Expr::Paren(Box::new(name("g")))),
            args: Args::List(vec![]),
        });
        assert_eq!(render_stat(&stat, 1), "  ;(g)()");
        assert_eq!(render_stat(&call("g"), 0), "g()");
    }

    #[test]
    fn long_string_keys_are_padded() {
        let expr = Expr::Index {
            object: Box::new(name("t")),
            key: Box::new(Expr::String("[[k]]".into())),
        };
        assert_eq!(render_expr(&expr, 0), "t[ [[k]] ]");
    }
}
