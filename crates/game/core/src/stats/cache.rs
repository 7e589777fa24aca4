//! Lazily recomputed accumulators.

use std::marker::PhantomData;

/// Aggregate that modifiers of type `M` can be folded into.
pub trait Accumulator<M>: Clone {
    fn apply(&mut self, modifier: &M);
}

/// Cached fold of a modifier list over a base accumulator.
///
/// The cache starts dirty. [`get`](Self::get) rebuilds from the base by
/// applying every modifier in list order when dirty, otherwise it hands back
/// the cached value untouched. Whoever owns the modifier list must call
/// [`invalidate`](Self::invalidate) whenever that list or the base changes;
/// [`StatMediator`](super::StatMediator) does this on every mutation.
#[derive(Clone, Debug)]
pub struct CacheMediator<A, M> {
    cached: A,
    dirty: bool,
    recomputes: u64,
    _modifier: PhantomData<fn(&M)>,
}

impl<A: Accumulator<M>, M> CacheMediator<A, M> {
    pub fn new(initial: A) -> Self {
        Self {
            cached: initial,
            dirty: true,
            recomputes: 0,
            _modifier: PhantomData,
        }
    }

    /// Returns the accumulated value, rebuilding it first if stale.
    pub fn get(&mut self, base: &A, modifiers: &[M]) -> &A {
        if self.dirty {
            let mut acc = base.clone();
            for modifier in modifiers {
                acc.apply(modifier);
            }
            self.cached = acc;
            self.dirty = false;
            self.recomputes += 1;
            tracing::trace!(
                modifiers = modifiers.len(),
                recomputes = self.recomputes,
                "accumulator rebuilt"
            );
        }
        &self.cached
    }

    /// Last computed value, possibly stale.
    pub fn peek(&self) -> &A {
        &self.cached
    }

    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// How many times [`get`](Self::get) actually rebuilt the accumulator.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Sum(i64);

    impl Accumulator<i64> for Sum {
        fn apply(&mut self, modifier: &i64) {
            self.0 += modifier;
        }
    }

    #[test]
    fn consecutive_gets_reuse_the_cached_value() {
        let mut cache = CacheMediator::new(Sum::default());
        let modifiers = [1, 2, 3];

        let first: *const Sum = cache.get(&Sum(10), &modifiers);
        let second: *const Sum = cache.get(&Sum(10), &modifiers);

        assert_eq!(cache.peek(), &Sum(16));
        assert_eq!(first, second);
        assert_eq!(cache.recompute_count(), 1);
    }

    #[test]
    fn invalidate_forces_rebuild_from_base() {
        let mut cache = CacheMediator::new(Sum::default());
        cache.get(&Sum(0), &[5]);

        cache.invalidate();
        assert!(cache.is_dirty());

        assert_eq!(cache.get(&Sum(0), &[5, 5]), &Sum(10));
        assert_eq!(cache.recompute_count(), 2);
    }

    #[test]
    fn stale_list_is_not_observed_without_invalidate() {
        let mut cache = CacheMediator::new(Sum::default());
        cache.get(&Sum(0), &[1]);

        assert_eq!(cache.get(&Sum(0), &[1, 100]), &Sum(1));
    }
}
