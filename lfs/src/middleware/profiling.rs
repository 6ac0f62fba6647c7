use std::time::Instant;

use crate::core::context::FilterContext;
use crate::core::middleware::{FilterNext, FilterReturnValue};

///
/// Filter that logs how long the rest of the chain took for a request.
///
pub fn profile<'a>(context: &'a mut FilterContext, next: FilterNext<'a>) -> FilterReturnValue<'a> {
    Box::pin(async move {
        let start_time = Instant::now();

        next.run(context).await;

        let elapsed_time = start_time.elapsed();
        info!(
            "{}μs\t\t{}\t{}\t{}",
            elapsed_time.as_micros(),
            context.method(),
            context.route(),
            context.response_code
        );
    })
}
