//! jq filters over `serde_json::Value`, compiled with jaq.
//!
//! The full jaq standard library is loaded, except that natives reaching
//! outside the filter (process environment, exit, logging) are replaced by
//! ones that fail. Module loading is unsupported and no global variables are
//! bound, so `import` and `$ENV` are rejected when the filter is parsed.

use jaq_core::box_iter::box_once;
use jaq_core::compile::{self, Lut};
use jaq_core::load::{self, Arena, File, Loader};
use jaq_core::{Compiler, Ctx, Cv, Error, Exn, Native, RcIter, ValXs};
use jaq_json::Val;
use serde_json::Value;

/// Natives with effects beyond their output.
const SIDE_EFFECTS: &[&str] = &["env", "halt", "halt_error", "debug", "stderr"];

/// jq builtins that jaq does not ship.
const EXTRA_DEFS: &str = r#"
def IN(s): any(s == .; .);
def IN(src; s): any(src == s; .);
"#;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The expression could not be lexed or parsed.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("undefined {kind} `{name}`")]
    Undefined { kind: &'static str, name: String },

    /// A well-formed expression failed on a particular input.
    #[error("{0}")]
    Eval(String),
}

/// A compiled, reusable filter.
pub struct Query {
    filter: jaq_core::Filter<Native<Val>>,
    inputs: RcIter<core::iter::Empty<Result<Val, String>>>,
}

impl Query {
    pub fn parse(source: &str) -> Result<Self, QueryError> {
        let arena = Arena::default();
        let program = File { code: source, path: () };
        let modules = Loader::new(prelude())
            .load(&arena, program)
            .map_err(syntax_error)?;
        let filter = Compiler::default()
            .with_funs(natives())
            .compile(modules)
            .map_err(undefined)?;
        Ok(Self {
            filter,
            inputs: RcIter::new(core::iter::empty()),
        })
    }

    /// Runs the filter against `input`. Outputs are produced on demand and an
    /// error for one output does not end the stream.
    pub fn run(&self, input: Value) -> impl Iterator<Item = Result<Value, QueryError>> + '_ {
        let ctx = Ctx::<Val>::new([], &self.inputs);
        self.filter
            .run((ctx, Val::from(input)))
            .map(|out| out.map(Value::from).map_err(|e| QueryError::Eval(e.to_string())))
    }
}

fn prelude() -> impl Iterator<Item = load::parse::Def<&'static str>> {
    let extra = load::parse(EXTRA_DEFS, |p| p.defs()).unwrap_or_default();
    jaq_std::defs().chain(jaq_json::defs()).chain(extra)
}

fn natives() -> impl Iterator<Item = jaq_std::Filter<Native<Val>>> {
    jaq_std::funs()
        .chain(jaq_json::funs())
        .map(|(name, arity, native)| {
            if SIDE_EFFECTS.contains(&name) {
                (name, arity, Native::new(unavailable))
            } else {
                (name, arity, native)
            }
        })
}

fn unavailable<'a>(_: &'a Lut<Native<Val>>, _: Cv<'a, Val>) -> ValXs<'a, Val> {
    box_once(Err(Exn::from(Error::str("filter is not available"))))
}

fn syntax_error(errs: load::Errors<&str, ()>) -> QueryError {
    let first = errs.into_iter().find_map(|(file, err)| {
        let (message, found) = match err {
            load::Error::Lex(es) => es
                .into_iter()
                .next()
                .map(|(expect, found)| (format!("expected {}", expect.as_str()), found))?,
            load::Error::Parse(es) => es
                .into_iter()
                .next()
                .map(|(expect, found)| (format!("expected {}", expect.as_str()), found))?,
            load::Error::Io(es) => es.into_iter().next().map(|(path, msg)| (msg, path))?,
        };
        Some(QueryError::Syntax {
            offset: offset_in(file.code, found),
            message,
        })
    });
    first.unwrap_or_else(|| QueryError::Syntax {
        offset: 0,
        message: "unparseable filter".into(),
    })
}

fn undefined(errs: compile::Errors<&str, ()>) -> QueryError {
    let first = errs.into_iter().flat_map(|(_, es)| es).next();
    match first {
        Some((name, kind)) => QueryError::Undefined {
            kind: kind.as_str(),
            name: name.to_string(),
        },
        None => QueryError::Undefined {
            kind: "filter",
            name: String::new(),
        },
    }
}

/// Byte offset of `part` inside `code`, clamped to the code length.
fn offset_in(code: &str, part: &str) -> usize {
    (part.as_ptr() as usize)
        .saturating_sub(code.as_ptr() as usize)
        .min(code.len())
}
