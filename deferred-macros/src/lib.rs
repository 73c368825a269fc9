mod args;
use args::TestArgs;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Error, ItemFn, parse_macro_input};

/// Runs a test body against a fresh event loop.
///
/// The body sees two bindings:
/// - `event_loop`: a `deferred::EventLoop`,
/// - `runtime`: the `deferred::Runtime` scheduling onto it.
///
/// After the body returns, the loop is drained; the test fails if it does
/// not go idle within its turn budget (`max_turns = N`, optional).
///
/// ```rust,ignore
/// #[deferred::test(max_turns = 64)]
/// fn resolves() {
///     let deferred: deferred::Deferred<i32, String> = runtime.defer();
///     deferred.resolve(Ok(1));
///     event_loop.run().unwrap();
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as TestArgs);
    let input = parse_macro_input!(item as ItemFn);

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;

    if let Some(asyncness) = sig.asyncness {
        return Error::new_spanned(
            asyncness,
            "#[deferred::test] drives an event loop; the function must not be async",
        )
        .to_compile_error()
        .into();
    }

    if !sig.inputs.is_empty() {
        return Error::new_spanned(
            &sig.inputs,
            "#[deferred::test] functions take no arguments",
        )
        .to_compile_error()
        .into();
    }

    let builder: TokenStream2 = match args.max_turns {
        Some(max_turns) => quote! {
            ::deferred::EventLoop::builder().max_turns(#max_turns).build()
        },
        None => quote! { ::deferred::EventLoop::new() },
    };

    quote! {
        #[::core::prelude::v1::test]
        #(#attrs)*
        #vis #sig {
            let event_loop = #builder;
            #[allow(unused_variables)]
            let runtime = event_loop.runtime();

            #block

            if let ::core::result::Result::Err(err) = event_loop.run() {
                panic!("event loop did not go idle after the test body: {err}");
            }
        }
    }
    .into()
}
