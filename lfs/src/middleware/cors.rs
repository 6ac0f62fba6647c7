use crate::core::context::FilterContext;
use crate::core::middleware::{FilterNext, FilterReturnValue};

///
/// Filter to allow CORS.
///
pub fn cors<'a>(context: &'a mut FilterContext, next: FilterNext<'a>) -> FilterReturnValue<'a> {
    Box::pin(async move {
        context.set("Access-Control-Allow-Origin", "*");
        context.set("Access-Control-Allow-Headers", "*");
        context.set("Access-Control-Allow-Methods", "GET, POST, DELETE");

        next.run(context).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::middleware::FilterChain;
    use hyper::Request;

    #[tokio::test]
    async fn it_should_set_the_cors_headers_and_continue() {
        let (parts, _) = Request::get("/a").body(()).unwrap().into_parts();
        let mut ctx = FilterContext::new(parts, "/a".to_string(), None);
        let chain = FilterChain::new(filters![cors]);

        chain.run(&mut ctx).await;

        assert_eq!(
            ctx.response_headers.get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
        assert_eq!(ctx.response_code, 0);
    }
}
