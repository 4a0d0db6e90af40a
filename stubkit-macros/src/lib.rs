//! Procedural macros for stubkit
//!
//! This crate provides the `#[stubkit::test]` attribute macro, which gives
//! each test function its own mock session.
//!
//! # Example
//!
//! ```rust,ignore
//! use stubkit::prelude::*;
//!
//! #[stubkit::test]
//! fn my_test(session: MockSession) {
//!     let calc = session.mock("calcService");
//!     session.when(calc.call("add", args![1.0, 2.0])).then_return(3.0);
//!     assert_eq!(calc.invoke::<f64>("add", args![1.0, 2.0]), Ok(3.0));
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, FnArg, Ident, ItemFn, Lit, Pat, Token, Type,
};

/// Configuration options for the test macro.
#[derive(Default)]
struct TestConfig {
    /// Raise a fault for unstubbed calls instead of returning defaults
    strict: bool,
    /// Initial time for the mock clock, in seconds
    start_time_secs: Option<u64>,
}

impl Parse for TestConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut config = TestConfig::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "strict" => {
                    let lit: Lit = input.parse()?;
                    match lit {
                        Lit::Bool(b) => config.strict = b.value(),
                        other => {
                            return Err(syn::Error::new_spanned(other, "expected true or false"))
                        }
                    }
                }
                "start_time" => {
                    let lit: Lit = input.parse()?;
                    match lit {
                        Lit::Int(i) => config.start_time_secs = Some(i.base10_parse()?),
                        other => {
                            return Err(syn::Error::new_spanned(
                                other,
                                "expected a whole number of seconds",
                            ))
                        }
                    }
                }
                _ => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {ident}"),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(config)
    }
}

/// Returns true if the parameter's type path ends in `name`.
fn is_param_of_type(arg: &FnArg, name: &str) -> bool {
    if let FnArg::Typed(pat_type) = arg {
        if let Type::Path(type_path) = &*pat_type.ty {
            if let Some(segment) = type_path.path.segments.last() {
                return segment.ident == name;
            }
        }
    }
    false
}

/// Extracts the parameter name from a function argument.
fn get_param_name(arg: &FnArg) -> Option<&Pat> {
    if let FnArg::Typed(pat_type) = arg {
        Some(&pat_type.pat)
    } else {
        None
    }
}

/// Test attribute macro giving each test a fresh mock session.
///
/// # Injected Parameters
///
/// - `session: MockSession` - a session private to this test
/// - `clock: MockClock` - a virtual clock; when present, the session uses it
///   for invocation timestamps
///
/// ```rust,ignore
/// use stubkit::prelude::*;
/// use std::time::Duration;
///
/// #[stubkit::test]
/// fn test_with_clock(session: MockSession, clock: MockClock) {
///     let calc = session.mock("calcService");
///     let _ = calc.invoke::<f64>("add", args![20.0, 10.0]);
///     clock.advance(Duration::from_millis(50));
///     assert!(calc.verify("add", args![20.0, 10.0], timeout(Duration::from_millis(100))).is_ok());
/// }
/// ```
///
/// # Configuration Options
///
/// - `strict = true` - unstubbed calls raise an `Unstubbed` fault
/// - `start_time = 100` - mock clock start time in seconds (default: 0);
///   the session runs on a mock clock even without a `MockClock` parameter
///
/// ```rust,ignore
/// #[stubkit::test(strict = true)]
/// fn test_strict(session: MockSession) {
///     let calc = session.mock("calcService");
///     assert!(calc.invoke::<f64>("add", args![1.0, 2.0]).is_err());
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let config = parse_macro_input!(attr as TestConfig);
    let input = parse_macro_input!(item as ItemFn);

    expand_test(&config, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_test(config: &TestConfig, input: &ItemFn) -> syn::Result<TokenStream2> {
    let name = &input.sig.ident;
    let body = &input.block;
    let attrs = &input.attrs;
    let vis = &input.vis;
    let output = &input.sig.output;

    if input.sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            &input.sig,
            "stubkit::test functions must not be async",
        ));
    }

    for arg in &input.sig.inputs {
        if !is_param_of_type(arg, "MockSession") && !is_param_of_type(arg, "MockClock") {
            return Err(syn::Error::new_spanned(
                arg,
                "only MockSession and MockClock parameters can be injected",
            ));
        }
    }

    let session_param = input
        .sig
        .inputs
        .iter()
        .find(|arg| is_param_of_type(arg, "MockSession"))
        .and_then(get_param_name);
    let clock_param = input
        .sig
        .inputs
        .iter()
        .find(|arg| is_param_of_type(arg, "MockClock"))
        .and_then(get_param_name);

    let start_time = config.start_time_secs.unwrap_or(0);
    let default_answer = if config.strict {
        quote! { ::stubkit::DefaultAnswer::Raise }
    } else {
        quote! { ::stubkit::DefaultAnswer::ReturnDefault }
    };

    // The session always exists, so state never outlives the test even
    // when no parameter asks for it. A start time always gets a mock
    // clock, bound to a parameter or not.
    let clock_init = if clock_param.is_some() || config.start_time_secs.is_some() {
        let clock_binding = clock_param.map(|clock_name| {
            quote! {
                let #clock_name = ::std::clone::Clone::clone(&__stubkit_clock);
            }
        });
        quote! {
            let __stubkit_clock = ::stubkit::clock::MockClock::with_start_time(
                ::std::time::Duration::from_secs(#start_time)
            );
            #clock_binding
            let __stubkit_builder = ::stubkit::MockSession::builder().clock(__stubkit_clock);
        }
    } else {
        quote! {
            let __stubkit_builder = ::stubkit::MockSession::builder();
        }
    };

    let session_binding = session_param.map(|session_name| {
        quote! {
            let #session_name = ::std::clone::Clone::clone(&__stubkit_session);
        }
    });

    Ok(quote! {
        #[::core::prelude::v1::test]
        #(#attrs)*
        #vis fn #name() #output {
            #clock_init
            let __stubkit_session = __stubkit_builder
                .default_answer(#default_answer)
                .build();
            let __stubkit_scope = __stubkit_session.scoped();
            #session_binding
            #body
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{expand_test, TestConfig};

    #[::core::prelude::v1::test]
    fn test_config_parse_empty() {
        let config: TestConfig = syn::parse_str("").unwrap();
        assert!(!config.strict);
        assert!(config.start_time_secs.is_none());
    }

    #[::core::prelude::v1::test]
    fn test_config_parse_multiple() {
        let config: TestConfig = syn::parse_str("strict = true, start_time = 100").unwrap();
        assert!(config.strict);
        assert_eq!(config.start_time_secs, Some(100));
    }

    #[::core::prelude::v1::test]
    fn test_config_rejects_unknown_option() {
        let result: syn::Result<TestConfig> = syn::parse_str("verbose = true");
        assert!(result.is_err());
    }

    #[::core::prelude::v1::test]
    fn test_config_rejects_wrong_literal() {
        let result: syn::Result<TestConfig> = syn::parse_str("strict = 1");
        assert!(result.is_err());
    }

    #[::core::prelude::v1::test]
    fn test_rejects_async_fn() {
        let item: syn::ItemFn = syn::parse_str("async fn t() {}").unwrap();
        assert!(expand_test(&TestConfig::default(), &item).is_err());
    }

    #[::core::prelude::v1::test]
    fn test_rejects_unknown_parameter() {
        let item: syn::ItemFn = syn::parse_str("fn t(x: u32) {}").unwrap();
        assert!(expand_test(&TestConfig::default(), &item).is_err());
    }

    #[::core::prelude::v1::test]
    fn test_expands_session_injection() {
        let item: syn::ItemFn = syn::parse_str("fn t(session: MockSession) {}").unwrap();
        let tokens = expand_test(&TestConfig::default(), &item).unwrap().to_string();
        assert!(tokens.contains("MockSession :: builder"));
        assert!(tokens.contains("scoped"));
    }

    #[::core::prelude::v1::test]
    fn test_start_time_without_clock_parameter_uses_mock_clock() {
        let item: syn::ItemFn = syn::parse_str("fn t(session: MockSession) {}").unwrap();
        let config: TestConfig = syn::parse_str("start_time = 1000").unwrap();
        let tokens = expand_test(&config, &item).unwrap().to_string();
        assert!(tokens.contains("MockClock :: with_start_time"));
    }

    #[::core::prelude::v1::test]
    fn test_no_clock_without_parameter_or_start_time() {
        let item: syn::ItemFn = syn::parse_str("fn t(session: MockSession) {}").unwrap();
        let tokens = expand_test(&TestConfig::default(), &item).unwrap().to_string();
        assert!(!tokens.contains("MockClock"));
    }

    #[::core::prelude::v1::test]
    fn test_accepts_mut_parameters() {
        let item: syn::ItemFn =
            syn::parse_str("fn t(mut session: MockSession, mut clock: MockClock) {}").unwrap();
        let config: TestConfig = syn::parse_str("start_time = 3").unwrap();
        assert!(expand_test(&config, &item).is_ok());
    }
}
