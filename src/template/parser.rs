use super::generators::{common, GeneratorRegistry, Param};
use super::scope::{Binding, Env, Invocable, ScopeId, ScopeMode, ScopeTree, Stmt};
use crate::error::{GenfuzzError, Result};

/// One whitespace-separated token of a statement line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RawTok {
    Word(String),
    Quoted(Vec<u8>),
}

/// Split a line into words and quoted literals, unescaping the latter.
fn tokenize(line: &str, line_no: usize) -> Result<Vec<RawTok>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' {
            chars.next();
            tokens.push(RawTok::Quoted(read_quoted(&mut chars, line_no)?));
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '"' {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(RawTok::Word(word));
        }
    }
    Ok(tokens)
}

/// Read a quoted literal body up to the closing quote, decoding the escape
/// sequences `\n \r \t \0 \\ \" \'` and `\xNN`.
fn read_quoted(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line_no: usize,
) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    loop {
        let c = chars
            .next()
            .ok_or_else(|| GenfuzzError::parse(line_no, "unterminated string literal"))?;
        match c {
            '"' => return Ok(bytes),
            '\\' => {
                let esc = chars
                    .next()
                    .ok_or_else(|| GenfuzzError::parse(line_no, "unterminated escape sequence"))?;
                match esc {
                    'n' => bytes.push(b'\n'),
                    'r' => bytes.push(b'\r'),
                    't' => bytes.push(b'\t'),
                    '0' => bytes.push(0),
                    '\\' => bytes.push(b'\\'),
                    '"' => bytes.push(b'"'),
                    '\'' => bytes.push(b'\''),
                    'x' => {
                        let hi = chars.next();
                        let lo = chars.next();
                        let (Some(hi), Some(lo)) = (hi, lo) else {
                            return Err(GenfuzzError::parse(line_no, "truncated \\x escape"));
                        };
                        let value = u8::from_str_radix(&format!("{hi}{lo}"), 16).map_err(|_| {
                            GenfuzzError::parse(line_no, format!("invalid \\x escape: \\x{hi}{lo}"))
                        })?;
                        bytes.push(value);
                    }
                    other => {
                        return Err(GenfuzzError::parse(
                            line_no,
                            format!("invalid escape sequence: \\{other}"),
                        ));
                    }
                }
            }
            other => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
}

fn to_param(tok: RawTok) -> Param {
    match tok {
        RawTok::Quoted(bytes) => Param::Literal(bytes),
        RawTok::Word(word) => match word.parse::<i64>() {
            Ok(n) => Param::Number(n),
            Err(_) => Param::Reference(word),
        },
    }
}

/// Parse the template source into a validated scope tree.
///
/// The root scope is pre-populated with the ambient built-ins
/// (`literal-text`, `random-string`, `random-choice`); `var` declarations go
/// through `registry`. Reference validation runs as a second pass once the
/// whole tree exists, so forward references into enclosing scopes are
/// accepted while later siblings in the same scope are not.
pub(crate) fn parse(source: &str, registry: &GeneratorRegistry) -> Result<ScopeTree> {
    let mut tree = ScopeTree::new();
    install_ambient_builtins(&mut tree);

    // Per-scope sequence counters; ambient built-ins occupy seq 0.
    let mut next_seq: Vec<u32> = vec![1];
    let mut stack: Vec<ScopeId> = vec![ScopeTree::ROOT];
    let mut last_line = 0;

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let tokens = tokenize(raw_line, line_no)?;
        let Some(first) = tokens.first() else {
            continue;
        };
        let current = *stack.last().expect("scope stack never empties");

        let head = match first {
            RawTok::Word(word) => word.as_str(),
            RawTok::Quoted(_) => {
                return Err(GenfuzzError::parse(
                    line_no,
                    "statement must begin with a binding name",
                ));
            }
        };

        match head {
            _ if head.starts_with('#') => continue,
            "(" => {
                let mode = parse_group_header(&tokens[1..], line_no)?;
                let child = tree.push_child(current, mode);
                next_seq.push(1);
                // The placeholder occupies a position even though it
                // resolves no name itself.
                bump(&mut next_seq, current);
                tree.node_mut(current)
                    .statements
                    .push(Stmt::Nested { child });
                stack.push(child);
            }
            ")" => {
                if tokens.len() > 1 {
                    return Err(GenfuzzError::parse(
                        line_no,
                        "closing delimiter takes no parameters",
                    ));
                }
                if stack.len() == 1 {
                    return Err(GenfuzzError::parse(line_no, "unmatched ')'"));
                }
                stack.pop();
            }
            "var" => {
                let mut rest = tokens[1..].iter();
                let name = match rest.next() {
                    Some(RawTok::Word(word)) if word.parse::<i64>().is_err() => word.clone(),
                    _ => {
                        return Err(GenfuzzError::parse(
                            line_no,
                            "var requires a non-numeric binding name",
                        ));
                    }
                };
                let type_name = match rest.next() {
                    Some(RawTok::Word(word)) => word.clone(),
                    _ => {
                        return Err(GenfuzzError::parse(
                            line_no,
                            format!("var {name} is missing a generator type"),
                        ));
                    }
                };
                let args: Vec<Param> = rest.cloned().map(to_param).collect();

                let factory = registry.factory(&type_name).ok_or_else(|| {
                    GenfuzzError::parse(line_no, format!("unknown generator type {type_name:?}"))
                })?;
                let gen = factory(&args)
                    .map_err(|message| GenfuzzError::parse(line_no, message))?;

                let seq = bump(&mut next_seq, current);
                tree.node_mut(current).bindings.insert(
                    name,
                    Binding {
                        seq,
                        line: line_no,
                        decl_args: args,
                        invocable: Invocable::Declared {
                            gen,
                            env: Env {
                                scope: current,
                                seq,
                            },
                        },
                    },
                );
            }
            name => {
                let args: Vec<Param> = tokens[1..].iter().cloned().map(to_param).collect();
                let seq = bump(&mut next_seq, current);
                tree.node_mut(current).statements.push(Stmt::Invoke {
                    name: name.to_string(),
                    args,
                    seq,
                    line: line_no,
                });
            }
        }
    }

    if stack.len() != 1 {
        return Err(GenfuzzError::parse(last_line, "unmatched '('"));
    }

    validate_references(&tree)?;
    Ok(tree)
}

fn bump(next_seq: &mut [u32], scope: ScopeId) -> u32 {
    let seq = next_seq[scope.0];
    next_seq[scope.0] += 1;
    seq
}

/// Tokens after the opening `(`: empty for a plain group, `* <max>` for a
/// repeat group.
fn parse_group_header(rest: &[RawTok], line_no: usize) -> Result<ScopeMode> {
    match rest {
        [] => Ok(ScopeMode::Once),
        [RawTok::Word(op), RawTok::Word(max)] if op == "*" => {
            let max: u32 = max.parse().map_err(|_| {
                GenfuzzError::parse(line_no, format!("invalid repeat bound {max:?}"))
            })?;
            if max == 0 {
                return Err(GenfuzzError::parse(line_no, "repeat bound must be positive"));
            }
            Ok(ScopeMode::Repeat { max })
        }
        _ => Err(GenfuzzError::parse(line_no, "malformed group header")),
    }
}

fn install_ambient_builtins(tree: &mut ScopeTree) {
    let root = tree.node_mut(ScopeTree::ROOT);
    for (name, gen) in common::ambient_builtins() {
        root.bindings.insert(
            name.to_string(),
            Binding {
                seq: 0,
                line: 0,
                decl_args: Vec::new(),
                invocable: Invocable::Ambient(gen),
            },
        );
    }
}

/// Second pass: every invoked name and every reference parameter must
/// resolve under the lexical-scope rule at the position it appears.
fn validate_references(tree: &ScopeTree) -> Result<()> {
    for scope in tree.scope_ids() {
        let node = tree.node(scope);
        for stmt in &node.statements {
            let Stmt::Invoke {
                name,
                args,
                seq,
                line,
            } = stmt
            else {
                continue;
            };
            let env = Env { scope, seq: *seq };
            let Some(binding) = tree.resolve(env, name) else {
                return Err(GenfuzzError::parse(
                    *line,
                    format!("unknown binding name {name:?}"),
                ));
            };
            if let Invocable::Ambient(gen) = &binding.invocable {
                gen.validate_call(args)
                    .map_err(|message| GenfuzzError::parse(*line, message))?;
            }
            check_ref_params(tree, env, args, *line)?;
        }
        for binding in node.bindings.values() {
            if let Invocable::Declared { env, .. } = binding.invocable {
                check_ref_params(tree, env, &binding.decl_args, binding.line)?;
            }
        }
    }
    Ok(())
}

fn check_ref_params(tree: &ScopeTree, env: Env, args: &[Param], line: usize) -> Result<()> {
    for param in args {
        if let Param::Reference(name) = param {
            if tree.resolve(env, name).is_none() {
                return Err(GenfuzzError::parse(
                    line,
                    format!("unknown binding name {name:?}"),
                ));
            }
        }
    }
    Ok(())
}

