use std::sync::Arc;

use rand::Rng;

use super::{EmitResult, Generator, Param};
use crate::template::engine::Ctx;

/// The ambient built-ins installed into every root scope. Each is also
/// constructible through the registry so `var` can bind a configured copy
/// under a new name.
pub(crate) fn ambient_builtins() -> Vec<(&'static str, Arc<dyn Generator>)> {
    vec![
        (
            "literal-text",
            Arc::new(LiteralText { text: None }) as Arc<dyn Generator>,
        ),
        (
            "random-string",
            Arc::new(RandomString { max: None }) as Arc<dyn Generator>,
        ),
        (
            "random-choice",
            Arc::new(RandomChoice { alts: Vec::new() }) as Arc<dyn Generator>,
        ),
    ]
}

/// Writes a fixed byte string unconditionally.
#[derive(Debug)]
pub struct LiteralText {
    /// `None` for the ambient form, which reads the call site instead.
    text: Option<Vec<u8>>,
}

impl Generator for LiteralText {
    fn emit(&self, call_args: &[Param], ctx: &mut Ctx<'_>) -> EmitResult {
        match &self.text {
            Some(bytes) => ctx.put(bytes),
            None => {
                for param in call_args {
                    ctx.emit_param(param)?;
                }
                Ok(())
            }
        }
    }

    fn validate_call(&self, args: &[Param]) -> Result<(), String> {
        if args.is_empty() {
            return Err("literal-text takes at least one parameter".to_string());
        }
        Ok(())
    }
}

pub(crate) fn literal_text_factory(
    args: &[Param],
) -> std::result::Result<Arc<dyn Generator>, String> {
    match args {
        [Param::Literal(bytes)] => Ok(Arc::new(LiteralText {
            text: Some(bytes.clone()),
        })),
        _ => Err("literal-text takes exactly one quoted string".to_string()),
    }
}

/// Emits a string of random printable ASCII bytes, length uniform in
/// `[0, max)`.
#[derive(Debug)]
pub struct RandomString {
    max: Option<u32>,
}

impl Generator for RandomString {
    fn emit(&self, call_args: &[Param], ctx: &mut Ctx<'_>) -> EmitResult {
        let max = match self.max {
            Some(max) => max,
            None => match call_args.first() {
                Some(Param::Number(n)) if *n > 0 => *n as u32,
                // Rejected at parse time; nothing sensible to emit.
                _ => return Ok(()),
            },
        };
        let len = ctx.rng().gen_range(0..max) as usize;
        let mut bytes = vec![0u8; len];
        for byte in bytes.iter_mut() {
            *byte = ctx.rng().gen_range(0x21u8..=0x7e);
        }
        ctx.put(&bytes)
    }

    fn validate_call(&self, args: &[Param]) -> Result<(), String> {
        match args {
            [Param::Number(n)] if *n > 0 => Ok(()),
            _ => Err("random-string takes one positive maximum length".to_string()),
        }
    }
}

pub(crate) fn random_string_factory(
    args: &[Param],
) -> std::result::Result<Arc<dyn Generator>, String> {
    match args {
        [Param::Number(n)] if *n > 0 => Ok(Arc::new(RandomString {
            max: Some(*n as u32),
        })),
        _ => Err("random-string takes one positive maximum length".to_string()),
    }
}

/// Uniformly picks one alternative and resolves it: a literal is written as
/// is, a number as decimal ASCII, a reference invokes the named binding.
#[derive(Debug)]
pub struct RandomChoice {
    /// Empty for the ambient form, which reads the call site instead.
    alts: Vec<Param>,
}

impl Generator for RandomChoice {
    fn emit(&self, call_args: &[Param], ctx: &mut Ctx<'_>) -> EmitResult {
        let alts = if self.alts.is_empty() {
            call_args
        } else {
            self.alts.as_slice()
        };
        if alts.is_empty() {
            return Ok(());
        }
        let pick = ctx.rng().gen_range(0..alts.len());
        let choice = alts[pick].clone();
        ctx.emit_param(&choice)
    }

    fn validate_call(&self, args: &[Param]) -> Result<(), String> {
        if args.is_empty() {
            return Err("random-choice takes at least one alternative".to_string());
        }
        Ok(())
    }
}

pub(crate) fn random_choice_factory(
    args: &[Param],
) -> std::result::Result<Arc<dyn Generator>, String> {
    if args.is_empty() {
        return Err("random-choice takes at least one alternative".to_string());
    }
    Ok(Arc::new(RandomChoice {
        alts: args.to_vec(),
    }))
}
