use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Error, Expr, ExprLit, Lit, LitInt, MetaNameValue, Token};

/// Arguments accepted by `#[deferred::test(...)]`.
///
/// ```text
/// #[deferred::test]
/// #[deferred::test(max_turns = 64)]
/// ```
pub(crate) struct TestArgs {
    /// Turn budget forwarded to `EventLoopBuilder::max_turns`.
    pub(crate) max_turns: Option<LitInt>,
}

impl Parse for TestArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut max_turns = None;

        let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated(input)?;

        for pair in pairs {
            if !pair.path.is_ident("max_turns") {
                return Err(Error::new_spanned(
                    &pair.path,
                    "unknown argument, expected `max_turns`",
                ));
            }

            if max_turns.is_some() {
                return Err(Error::new_spanned(&pair.path, "`max_turns` given twice"));
            }

            match pair.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Int(lit), ..
                }) => {
                    if lit.base10_parse::<usize>()? == 0 {
                        return Err(Error::new_spanned(lit, "`max_turns` must be > 0"));
                    }

                    max_turns = Some(lit);
                }
                other => {
                    return Err(Error::new_spanned(
                        other,
                        "`max_turns` must be an integer literal",
                    ));
                }
            }
        }

        Ok(Self { max_turns })
    }
}
