//! Composable decode steps.
//!
//! A [`Mutator`] looks at the encoding word and the architecture's decode
//! context, and either appends one operand, sets a decode-time flag, or checks
//! a constraint. Returning `false` rejects the encoding; the decoder then
//! produces an invalid instruction instead of the terminal's mnemonic.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Signature shared by all mutators over a context type `D`.
pub type MutatorFn<D> = dyn Fn(u32, &mut D) -> bool + Send + Sync;

/// What a mutator contributes when it succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Appends exactly one operand.
    Operand,
    /// Sets or clears a decode-time flag.
    Flag,
    /// Only validates the word or the context.
    Guard,
}

/// A named decode step. Cloning shares the underlying closure.
pub struct Mutator<D> {
    name: Cow<'static, str>,
    effect: Effect,
    apply: Arc<MutatorFn<D>>,
}

impl<D> Mutator<D> {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, effect: Effect, f: F) -> Self
    where
        F: Fn(u32, &mut D) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            effect,
            apply: Arc::new(f),
        }
    }

    /// A mutator that appends one operand.
    pub fn operand<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(u32, &mut D) -> bool + Send + Sync + 'static,
    {
        Self::new(name, Effect::Operand, f)
    }

    /// A mutator that only sets flags; it never fails.
    pub fn flag<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(u32, &mut D) + Send + Sync + 'static,
    {
        Self::new(name, Effect::Flag, move |w, d| {
            f(w, d);
            true
        })
    }

    /// A mutator that accepts or rejects without touching the operand list.
    pub fn guard<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(u32, &D) -> bool + Send + Sync + 'static,
    {
        Self::new(name, Effect::Guard, move |w, d: &mut D| f(w, d))
    }

    /// Name used in diagnostics when this mutator rejects an encoding.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    #[inline]
    pub fn apply(&self, word: u32, ctx: &mut D) -> bool {
        (self.apply)(word, ctx)
    }
}

impl<D> Clone for Mutator<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            effect: self.effect,
            apply: Arc::clone(&self.apply),
        }
    }
}

impl<D> fmt::Debug for Mutator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutator")
            .field("name", &self.name)
            .field("effect", &self.effect)
            .finish()
    }
}
