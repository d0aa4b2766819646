//! The randomizer abstraction.
//!
//! A `Randomizer` produces one value of a known type. Randomizers are
//! stateless: everything that varies between calls comes from the
//! `RandomizerContext` (the shared random source and the current depth).

use crate::parameters::Parameters;
use fixture_core::{FieldDescriptor, Value};
use rand::rngs::StdRng;

/// State handed to a randomizer for one invocation.
pub struct RandomizerContext<'a> {
    /// The populator's random source; drawing from anything else breaks reproducibility
    pub rng: &'a mut StdRng,

    /// Parameters the populator was built with
    pub parameters: &'a Parameters,

    /// Nesting level of the value being produced
    pub depth: usize,

    /// The field being populated, when the value is for a field
    pub field: Option<&'a FieldDescriptor>,
}

impl RandomizerContext<'_> {
    /// Nesting levels left before fields are no longer populated.
    pub fn remaining_depth(&self) -> usize {
        self.parameters
            .max_randomization_depth
            .saturating_sub(self.depth)
    }
}

/// Strategy producing values of a single declared type.
pub trait Randomizer: Send + Sync {
    /// Produce a value.
    fn randomize(&self, ctx: &mut RandomizerContext<'_>) -> Value;
}

/// Randomizer backed by a closure over the context.
pub struct FnRandomizer<F>(F);

impl<F> Randomizer for FnRandomizer<F>
where
    F: Fn(&mut RandomizerContext<'_>) -> Value + Send + Sync,
{
    fn randomize(&self, ctx: &mut RandomizerContext<'_>) -> Value {
        (self.0)(ctx)
    }
}

/// Wrap a closure over the randomizer context.
///
/// ```
/// use fixture_populator::randomizer_fn;
/// use fixture_core::Value;
/// use rand::Rng;
///
/// let dice = randomizer_fn(|ctx| Value::Int32(ctx.rng.random_range(1..=6)));
/// # let _ = dice;
/// ```
pub fn randomizer_fn<F>(f: F) -> FnRandomizer<F>
where
    F: Fn(&mut RandomizerContext<'_>) -> Value + Send + Sync,
{
    FnRandomizer(f)
}

/// Randomizer backed by a closure that ignores the context.
pub struct Supplier<F>(F);

impl<F> Randomizer for Supplier<F>
where
    F: Fn() -> Value + Send + Sync,
{
    fn randomize(&self, _ctx: &mut RandomizerContext<'_>) -> Value {
        (self.0)()
    }
}

/// Wrap a value supplier.
pub fn supplier<F>(f: F) -> Supplier<F>
where
    F: Fn() -> Value + Send + Sync,
{
    Supplier(f)
}

/// Randomizer that always produces the same value.
#[derive(Debug, Clone)]
pub struct Constant(Value);

impl Randomizer for Constant {
    fn randomize(&self, _ctx: &mut RandomizerContext<'_>) -> Value {
        self.0.clone()
    }
}

/// Always produce `value`.
pub fn constant(value: impl Into<Value>) -> Constant {
    Constant(value.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn with_context<T>(f: impl FnOnce(&mut RandomizerContext<'_>) -> T) -> T {
        let mut rng = StdRng::seed_from_u64(42);
        let parameters = Parameters {
            max_randomization_depth: 5,
            ..Parameters::default()
        };
        let mut ctx = RandomizerContext {
            rng: &mut rng,
            parameters: &parameters,
            depth: 2,
            field: None,
        };
        f(&mut ctx)
    }

    #[test]
    fn test_constant() {
        let r = constant(42i64);
        with_context(|ctx| {
            assert_eq!(r.randomize(ctx), Value::Int64(42));
            assert_eq!(r.randomize(ctx), Value::Int64(42));
        });
    }

    #[test]
    fn test_supplier() {
        let r = supplier(|| Value::from("fixed"));
        with_context(|ctx| assert_eq!(r.randomize(ctx), Value::from("fixed")));
    }

    #[test]
    fn test_randomizer_fn_uses_context() {
        let r = randomizer_fn(|ctx| Value::Int32(ctx.rng.random_range(1..=6)));
        with_context(|ctx| {
            for _ in 0..20 {
                let v = r.randomize(ctx).as_i64().unwrap();
                assert!((1..=6).contains(&v));
            }
            assert_eq!(ctx.remaining_depth(), 3);
        });
    }
}
