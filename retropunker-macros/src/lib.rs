use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, parse_macro_input};

/// Applies the default target feature configurations for retropunker hot loops.
///
/// This macro expands to `#[multiversion(targets(...))]`, so the calling crate
/// needs `multiversion` as a dependency.
///
/// # Example
///
/// ```ignore
/// use retropunker_macros::simd_targets;
///
/// #[simd_targets]
/// pub fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
///     (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
/// }
/// ```
#[proc_macro_attribute]
pub fn simd_targets(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let func = parse_macro_input!(input as ItemFn);

    // Use minimal targets for debug builds to speed up compilation
    #[cfg(debug_assertions)]
    let expanded = quote! {
        #[multiversion::multiversion(targets(
            "x86_64+sse2",
            "aarch64+neon",
        ))]
        #func
    };

    // Use full target set for release builds
    #[cfg(not(debug_assertions))]
    let expanded = quote! {
        #[multiversion::multiversion(targets(
            "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
            "x86_64+avx2+fma",
            "x86_64+sse4.2",
            "x86_64+sse2",
            "aarch64+neon",
        ))]
        #func
    };

    TokenStream::from(expanded)
}
