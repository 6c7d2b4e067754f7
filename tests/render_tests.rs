// tests/render_tests.rs

use p8pretty::format_code;
use p8pretty::syntax::parse;

fn fmt(code: &str) -> String {
    format_code(code).unwrap_or_else(|e| panic!("failed to format {code:?}: {e}"))
}

fn assert_formats(code: &str, expected: &str) {
    assert_eq!(fmt(code), expected, "formatting {code:?}");
}

// ---
// Canonical layout
// ---

#[test]
fn test_numeric_for() {
    assert_formats("for i=1,10 do x=x+i end", "for i = 1, 10 do\n  x = x + i\nend\n");
}

#[test]
fn test_compound_assignment_keeps_parentheses() {
    assert_formats("x+=(1+2)*3", "x += (1 + 2) * 3\n");
}

#[test]
fn test_table_constructor() {
    assert_formats("t={1,2,[5]=6,name=7}", "t = {1, 2, [5] = 6, name = 7}\n");
    assert_formats("t={}", "t = {}\n");
    assert_formats("t={a=1;b=2;}", "t = {a = 1, b = 2}\n");
}

#[test]
fn test_if_chain_layout() {
    assert_formats(
        "if a then f() elseif b then g() elseif c then h() else k() end",
        "if a then\n  f()\nelseif b then\n  g()\nelseif c then\n  h()\nelse\n  k()\nend\n",
    );
}

#[test]
fn test_nested_functions_indent() {
    assert_formats(
        "function _update() if btn(0) then local function go(d) p.x+=d end go(-1) end end",
        "function _update()\n  if btn(0) then\n    local function go(d)\n      p.x += d\n    end\n    go(-1)\n  end\nend\n",
    );
}

#[test]
fn test_function_literal_in_expression() {
    assert_formats(
        "add(fns,function(a,...) return a end)",
        "add(fns, function(a, ...)\n  return a\nend)\n",
    );
}

#[test]
fn test_loops_and_blocks() {
    assert_formats(
        "while x<3 do x+=1 end repeat y-=1 until y==0 do local a=1 end",
        "while x < 3 do\n  x += 1\nend\nrepeat\n  y -= 1\nuntil y == 0\ndo\n  local a = 1\nend\n",
    );
    assert_formats(
        "for k,v in pairs(t) do print(k,v) end",
        "for k, v in pairs(t) do\n  print(k, v)\nend\n",
    );
}

#[test]
fn test_empty_blocks() {
    assert_formats("do end", "do\nend\n");
    assert_formats("function f() end", "function f()\nend\n");
}

#[test]
fn test_statements_without_blocks() {
    assert_formats("local a,b", "local a, b\n");
    assert_formats("::loop:: goto loop", "::loop::\ngoto loop\n");
    assert_formats("return", "return\n");
    assert_formats("f() return a,b", "f()\nreturn a, b\n");
    assert_formats("while true do break end", "while true do\n  break\nend\n");
}

#[test]
fn test_print_shorthand_becomes_a_call() {
    assert_formats("?\"hi\",1,2", "print(\"hi\", 1, 2)\n");
}

#[test]
fn test_empty_input_renders_nothing() {
    assert_formats("", "");
    assert_formats("-- just a comment\n", "");
}

// ---
// Expressions
// ---

#[test]
fn test_every_binary_operator_is_spaced() {
    let ops = [
        "or", "and", "<", ">", "<=", ">=", "==", "~=", "!=", "|", "^^", "&", "<<", ">>", ">>>",
        "<<>", ">><", "..", "+", "-", "*", "/", "\\", "%", "^",
    ];
    for op in ops {
        let tight = if op.chars().all(char::is_alphabetic) {
            format!("x=a {op} b")
        } else {
            format!("x=a{op}b")
        };
        assert_formats(&tight, &format!("x = a {op} b\n"));
    }
}

#[test]
fn test_unary_operators() {
    assert_formats("x=not a", "x = not a\n");
    assert_formats("x=- a", "x = -a\n");
    assert_formats("x=#t", "x = #t\n");
    assert_formats("x=~a", "x = ~a\n");
    assert_formats("x=@0x6000", "x = @0x6000\n");
    assert_formats("x=%a", "x = %a\n");
    assert_formats("x=$a", "x = $a\n");
}

#[test]
fn test_double_negation_does_not_become_a_comment() {
    assert_formats("x=-(-a)", "x = -(-a)\n");
    assert_formats("x=- -a", "x = - -a\n");
}

#[test]
fn test_literals_keep_their_spelling() {
    assert_formats("x=0x1F", "x = 0x1F\n");
    assert_formats("x=0b101", "x = 0b101\n");
    assert_formats("s='it\\'s'", "s = 'it\\'s'\n");
    assert_formats("s=[[a\nb]]", "s = [[a\nb]]\n");
    assert_formats("x=nil y=true z=false", "x = nil\ny = true\nz = false\n");
}

#[test]
fn test_call_argument_forms_are_kept() {
    assert_formats("f{1,2}", "f{1, 2}\n");
    assert_formats("f'x'", "f'x'\n");
    assert_formats("obj:m(1)", "obj:m(1)\n");
    assert_formats("a.b[c].d(e)", "a.b[c].d(e)\n");
}

#[test]
fn test_long_string_key_is_padded() {
    assert_formats("t[ [[k]] ]=1", "t[ [[k]] ] = 1\n");
}

#[test]
fn test_comments_are_dropped() {
    assert_formats("x=1 -- set x\n// done\ny=2", "x = 1\ny = 2\n");
}

#[test]
fn test_statement_starting_with_paren_keeps_its_separator() {
    assert_formats("a=f;(g)()", "a = f\n;(g)()\n");
    assert_formats("local a=f;(g).x=1", "local a = f\n;(g).x = 1\n");
    assert_formats("x=1 (t):m()", "x = 1\n;(t):m()\n");
    assert_formats("if c then (g)() end", "if c then\n  ;(g)()\nend\n");
    assert_formats("a=f;g()", "a = f\ng()\n");
}

#[test]
fn test_paren_statements_reparse_to_the_same_tree() {
    for source in ["a=f;(g)()", "local a=f;(g).x=1", "x=1;(t)[k]=2"] {
        let formatted = fmt(source);
        assert_eq!(
            parse(&formatted).unwrap(),
            parse(source).unwrap(),
            "tree changed for {source:?}"
        );
    }
}

// ---
// Idempotence
// ---

#[test]
fn test_formatting_is_idempotent() {
    let sources = [
        "for i=1,10 do x=x+i end",
        "function a.b:c(x,...) if x then return -x^2 elseif y then else end end",
        "t={1,[\"k\"]=f(),n={}} x+=(1+2)*3 ?t",
        "local f=function() while a and not b do a=a-1 end end",
        "x=- -a y=2^-3 z=a..b..c",
        "a=f;(g)()",
        "local a=f;(g).x=1",
        "while c do x=y;(h)[1]+=2 end",
    ];
    for source in sources {
        let once = fmt(source);
        assert_eq!(fmt(&once), once, "not idempotent for {source:?}");
    }
}
