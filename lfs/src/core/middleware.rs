use std::boxed::Box;
use std::future::Future;
use std::pin::Pin;

use crate::core::context::FilterContext;

pub type FilterReturnValue<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
pub type FilterFn = for<'a> fn(&'a mut FilterContext, FilterNext<'a>) -> FilterReturnValue<'a>;
pub type Filters = Vec<Box<dyn Filter>>;

///
/// A single step of a filter chain. A filter receives the request context and
/// the rest of the chain; it may act before and after running `next`, or skip
/// it entirely to short-circuit, usually after setting a response status.
///
pub trait Filter: Send + Sync {
    fn invoke<'a>(&'a self, context: &'a mut FilterContext, next: FilterNext<'a>)
        -> FilterReturnValue<'a>;
}

impl<F> Filter for F
where
    F: for<'a> Fn(&'a mut FilterContext, FilterNext<'a>) -> FilterReturnValue<'a> + Send + Sync,
{
    fn invoke<'a>(
        &'a self,
        context: &'a mut FilterContext,
        next: FilterNext<'a>,
    ) -> FilterReturnValue<'a> {
        (self)(context, next)
    }
}

///
/// Everything after the current filter. Running the continuation past the
/// last filter does nothing.
///
pub struct FilterNext<'a> {
    rest: &'a [Box<dyn Filter>],
}

impl<'a> FilterNext<'a> {
    pub fn run<'b>(self, context: &'b mut FilterContext) -> FilterReturnValue<'b>
    where
        'a: 'b,
    {
        match self.rest.split_first() {
            Some((filter, rest)) => filter.invoke(context, FilterNext { rest }),
            None => Box::pin(async {}),
        }
    }
}

///
/// An ordered, immutable sequence of filters ending in the built-in file
/// operation. Built once and then shared by every request of one kind, running
/// it never mutates the chain.
///
pub struct FilterChain {
    filters: Filters,
}

impl FilterChain {
    pub fn new(filters: Filters) -> FilterChain {
        FilterChain { filters }
    }

    ///
    /// Compose the configured filters with `terminal` as the innermost step.
    ///
    pub fn build<F: Filter + 'static>(mut filters: Filters, terminal: F) -> FilterChain {
        filters.push(Box::new(terminal));

        FilterChain::new(filters)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn run<'a>(&'a self, context: &'a mut FilterContext) -> FilterReturnValue<'a> {
        FilterNext {
            rest: &self.filters,
        }
        .run(context)
    }
}
