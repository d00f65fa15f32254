//! Iterator adapters backing the lazy operators.
//!
//! Each stage owns its upstream iterator plus whatever local state the
//! operator needs, and does exactly one step of work per `next` call. No
//! stage pulls from upstream before it is itself pulled.

use std::iter::FusedIterator;
use std::rc::Rc;

/// Yields upstream elements for which the predicate holds.
///
/// The index passed to the predicate counts every upstream element seen,
/// not only those yielded.
pub struct Where<I, P> {
    upstream: I,
    predicate: Rc<P>,
    index: usize,
}

impl<I, P> Where<I, P> {
    pub(crate) const fn new(upstream: I, predicate: Rc<P>) -> Self {
        Self {
            upstream,
            predicate,
            index: 0,
        }
    }
}

impl<I, P> Iterator for Where<I, P>
where
    I: Iterator,
    P: Fn(&I::Item, usize) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        for element in self.upstream.by_ref() {
            let index = self.index;
            self.index += 1;
            if (self.predicate)(&element, index) {
                return Some(element);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.upstream.size_hint().1)
    }
}

/// Yields `selector(element, index)` for each upstream element.
pub struct Select<I, F> {
    upstream: I,
    selector: Rc<F>,
    index: usize,
}

impl<I, F> Select<I, F> {
    pub(crate) const fn new(upstream: I, selector: Rc<F>) -> Self {
        Self {
            upstream,
            selector,
            index: 0,
        }
    }
}

impl<I, F, U> Iterator for Select<I, F>
where
    I: Iterator,
    F: Fn(I::Item, usize) -> U,
{
    type Item = U;

    fn next(&mut self) -> Option<U> {
        let element = self.upstream.next()?;
        let index = self.index;
        self.index += 1;
        Some((self.selector)(element, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}

/// Flattens one level of `selector(element, index)` and maps every inner
/// value through `result_selector(&element, inner)`.
pub struct SelectMany<I, F, R, C>
where
    I: Iterator,
    C: IntoIterator,
{
    upstream: I,
    selector: Rc<F>,
    result_selector: Rc<R>,
    index: usize,
    current: Option<(I::Item, C::IntoIter)>,
}

impl<I, F, R, C> SelectMany<I, F, R, C>
where
    I: Iterator,
    C: IntoIterator,
{
    pub(crate) const fn new(upstream: I, selector: Rc<F>, result_selector: Rc<R>) -> Self {
        Self {
            upstream,
            selector,
            result_selector,
            index: 0,
            current: None,
        }
    }
}

impl<I, F, R, C, U> Iterator for SelectMany<I, F, R, C>
where
    I: Iterator,
    I::Item: Clone,
    C: IntoIterator,
    F: Fn(I::Item, usize) -> C,
    R: Fn(&I::Item, C::Item) -> U,
{
    type Item = U;

    fn next(&mut self) -> Option<U> {
        loop {
            if let Some((source, inner)) = &mut self.current {
                if let Some(value) = inner.next() {
                    return Some((self.result_selector)(source, value));
                }
                self.current = None;
            }
            let element = self.upstream.next()?;
            let index = self.index;
            self.index += 1;
            let inner = (self.selector)(element.clone(), index).into_iter();
            self.current = Some((element, inner));
        }
    }
}

/// Yields at most `remaining` upstream elements.
///
/// Once the budget is spent, or the upstream runs dry, the upstream is
/// never pulled again.
pub struct Take<I> {
    upstream: I,
    remaining: usize,
}

impl<I> Take<I> {
    pub(crate) const fn new(upstream: I, count: usize) -> Self {
        Self {
            upstream,
            remaining: count,
        }
    }
}

impl<I: Iterator> Iterator for Take<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let Some(element) = self.upstream.next() else {
            self.remaining = 0;
            return None;
        };
        self.remaining -= 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.remaining == 0 {
            return (0, Some(0));
        }
        let (lower, upper) = self.upstream.size_hint();
        (
            lower.min(self.remaining),
            Some(upper.map_or(self.remaining, |upper| upper.min(self.remaining))),
        )
    }
}

impl<I: Iterator> FusedIterator for Take<I> {}

/// Yields while the predicate holds and stops for good at the first failure
/// or at upstream exhaustion.
pub struct TakeWhile<I, P> {
    upstream: I,
    predicate: Rc<P>,
    index: usize,
    done: bool,
}

impl<I, P> TakeWhile<I, P> {
    pub(crate) const fn new(upstream: I, predicate: Rc<P>) -> Self {
        Self {
            upstream,
            predicate,
            index: 0,
            done: false,
        }
    }
}

impl<I, P> Iterator for TakeWhile<I, P>
where
    I: Iterator,
    P: Fn(&I::Item, usize) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(element) = self.upstream.next() else {
            self.done = true;
            return None;
        };
        let index = self.index;
        self.index += 1;
        if (self.predicate)(&element, index) {
            Some(element)
        } else {
            self.done = true;
            None
        }
    }
}

impl<I, P> FusedIterator for TakeWhile<I, P>
where
    I: Iterator,
    P: Fn(&I::Item, usize) -> bool,
{
}

/// Discards the leading run for which the predicate holds, then yields
/// everything else unconditionally.
pub struct SkipWhile<I, P> {
    upstream: I,
    predicate: Rc<P>,
    index: usize,
    skipping: bool,
}

impl<I, P> SkipWhile<I, P> {
    pub(crate) const fn new(upstream: I, predicate: Rc<P>) -> Self {
        Self {
            upstream,
            predicate,
            index: 0,
            skipping: true,
        }
    }
}

impl<I, P> Iterator for SkipWhile<I, P>
where
    I: Iterator,
    P: Fn(&I::Item, usize) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.skipping {
            return self.upstream.next();
        }
        for element in self.upstream.by_ref() {
            let index = self.index;
            self.index += 1;
            if !(self.predicate)(&element, index) {
                self.skipping = false;
                return Some(element);
            }
        }
        None
    }
}

/// Yields every element of `first`, then every element of `second`.
///
/// `second` is not pulled until `first` is exhausted.
pub struct Concat<I, J> {
    first: Option<I>,
    second: J,
}

impl<I, J> Concat<I, J> {
    pub(crate) const fn new(first: I, second: J) -> Self {
        Self {
            first: Some(first),
            second,
        }
    }
}

impl<I, J> Iterator for Concat<I, J>
where
    I: Iterator,
    J: Iterator<Item = I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(first) = &mut self.first {
            if let Some(element) = first.next() {
                return Some(element);
            }
            self.first = None;
        }
        self.second.next()
    }
}

/// Yields each element once, comparing every candidate against all
/// previously yielded elements with the supplied equality.
pub struct Distinct<I: Iterator, E> {
    upstream: I,
    equality: Rc<E>,
    seen: Vec<I::Item>,
}

impl<I: Iterator, E> Distinct<I, E> {
    pub(crate) const fn new(upstream: I, equality: Rc<E>) -> Self {
        Self {
            upstream,
            equality,
            seen: Vec::new(),
        }
    }
}

impl<I, E> Iterator for Distinct<I, E>
where
    I: Iterator,
    I::Item: Clone,
    E: Fn(&I::Item, &I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        for element in self.upstream.by_ref() {
            let duplicate = self
                .seen
                .iter()
                .any(|previous| (self.equality)(previous, &element));
            if !duplicate {
                self.seen.push(element.clone());
                return Some(element);
            }
        }
        None
    }
}

#[cfg(feature = "fxhash")]
type SeenSet<T> = rustc_hash::FxHashSet<T>;

#[cfg(not(feature = "fxhash"))]
type SeenSet<T> = std::collections::HashSet<T>;

/// Hash-based variant of [`Distinct`] for `Eq + Hash` elements.
///
/// Observably identical to [`Distinct`] under `==`, in O(n) instead of O(n²).
pub struct DistinctHashed<I: Iterator> {
    upstream: I,
    seen: SeenSet<I::Item>,
}

impl<I: Iterator> DistinctHashed<I> {
    pub(crate) fn new(upstream: I) -> Self {
        Self {
            upstream,
            seen: SeenSet::default(),
        }
    }
}

impl<I> Iterator for DistinctHashed<I>
where
    I: Iterator,
    I::Item: Clone + Eq + std::hash::Hash,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.upstream
            .by_ref()
            .find(|element| self.seen.insert(element.clone()))
    }
}

/// Combines elements pairwise and stops as soon as either side runs out.
pub struct Zip<I, J, F> {
    left: I,
    right: J,
    combine: Rc<F>,
}

impl<I, J, F> Zip<I, J, F> {
    pub(crate) const fn new(left: I, right: J, combine: Rc<F>) -> Self {
        Self {
            left,
            right,
            combine,
        }
    }
}

impl<I, J, F, R> Iterator for Zip<I, J, F>
where
    I: Iterator,
    J: Iterator,
    F: Fn(I::Item, J::Item) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let left = self.left.next()?;
        let right = self.right.next()?;
        Some((self.combine)(left, right))
    }
}

/// Passes upstream through, or yields `fallback` once if upstream is empty.
pub struct DefaultIfEmpty<I: Iterator> {
    upstream: I,
    fallback: Option<I::Item>,
}

impl<I: Iterator> DefaultIfEmpty<I> {
    pub(crate) const fn new(upstream: I, fallback: I::Item) -> Self {
        Self {
            upstream,
            fallback: Some(fallback),
        }
    }
}

impl<I: Iterator> Iterator for DefaultIfEmpty<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self.upstream.next() {
            Some(element) => {
                self.fallback = None;
                Some(element)
            }
            None => self.fallback.take(),
        }
    }
}

/// Defers building an iterator until the first pull.
///
/// Materializing operators (ordering, grouping) wrap their work in this
/// stage so that obtaining an iterator stays free.
pub struct Deferred<F, I> {
    build: Option<F>,
    active: Option<I>,
}

impl<F, I> Deferred<F, I>
where
    F: FnOnce() -> I,
{
    /// Wraps `build`, which runs at most once.
    pub const fn new(build: F) -> Self {
        Self {
            build: Some(build),
            active: None,
        }
    }
}

impl<F, I> Iterator for Deferred<F, I>
where
    F: FnOnce() -> I,
    I: Iterator,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if let Some(build) = self.build.take() {
            self.active = Some(build());
        }
        self.active.as_mut()?.next()
    }
}

/// Buffers the whole upstream on the first pull, then yields back to front.
pub struct Reverse<I: Iterator> {
    upstream: Option<I>,
    buffer: Vec<I::Item>,
}

impl<I: Iterator> Reverse<I> {
    pub(crate) const fn new(upstream: I) -> Self {
        Self {
            upstream: Some(upstream),
            buffer: Vec::new(),
        }
    }
}

impl<I: Iterator> Iterator for Reverse<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(upstream) = self.upstream.take() {
            self.buffer = upstream.collect();
            tracing::trace!(length = self.buffer.len(), "reverse materialized upstream");
        }
        self.buffer.pop()
    }
}
